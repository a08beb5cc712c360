//! Custom message headers

/// An ordered collection of message headers.
///
/// Names keep the casing they were inserted with; lookups and replacement are
/// case-insensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Create an empty header collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing the value of an existing header with the same name
    /// while keeping its position.
    pub fn insert(&mut self, name: &str, value: &str) {
        match self.0.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(entry) => *entry = (name.to_string(), value.to_string()),
            None => self.0.push((name.to_string(), value.to_string())),
        }
    }

    /// Get the value of a header by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<N: AsRef<str>, V: AsRef<str>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Self::new();

        for (name, value) in iter {
            headers.insert(name.as_ref(), value.as_ref());
        }

        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_case_insensitively_in_place() {
        let mut headers = Headers::new();
        headers.insert("X-Campaign", "spring");
        headers.insert("X-Other", "1");
        headers.insert("x-campaign", "summer");

        let pairs: Vec<_> = headers.iter().collect();

        assert_eq!(pairs, [("x-campaign", "summer"), ("X-Other", "1")]);
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let headers: Headers = [("X-Tag", "a")].into_iter().collect();

        assert_eq!(headers.get("x-tag"), Some("a"));
        assert_eq!(headers.get("x-missing"), None);
    }
}
