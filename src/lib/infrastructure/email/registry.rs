//! Transport registry
//!
//! Transports are selected by DSN scheme. Each [`TransportFactory`] declares the schemes it
//! handles; the registry hands a DSN to the first factory that supports it.

use std::{fmt, sync::Arc};

use crate::domain::communication::transport::{ConfigurationError, MailerError, Transport};

use super::dsn::Dsn;

/// Creates transports from DSNs
pub trait TransportFactory: Send + Sync {
    /// The schemes this factory handles
    fn schemes(&self) -> &'static [&'static str];

    /// Whether this factory handles the DSN's scheme
    fn supports(&self, dsn: &Dsn) -> bool {
        self.schemes().iter().any(|scheme| *scheme == dsn.scheme())
    }

    /// Create a transport
    fn create(&self, dsn: &Dsn) -> Result<Arc<dyn Transport>, MailerError>;
}

/// Builds an [`ConfigurationError::UnsupportedScheme`] for `dsn`
pub fn unsupported_scheme(dsn: &Dsn, supported: &[&str]) -> ConfigurationError {
    ConfigurationError::UnsupportedScheme {
        scheme: dsn.scheme().to_string(),
        supported: supported
            .iter()
            .map(|scheme| format!("\"{scheme}\""))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// The set of known transport factories
#[derive(Default)]
pub struct TransportRegistry {
    factories: Vec<Box<dyn TransportFactory>>,
}

impl TransportRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory. Earlier registrations win when schemes overlap.
    pub fn register(mut self, factory: impl TransportFactory + 'static) -> Self {
        self.factories.push(Box::new(factory));
        self
    }

    /// Every scheme a registered factory handles
    pub fn schemes(&self) -> Vec<&'static str> {
        self.factories
            .iter()
            .flat_map(|factory| factory.schemes().iter().copied())
            .collect()
    }

    /// Create the transport for a DSN
    pub fn create(&self, dsn: &Dsn) -> Result<Arc<dyn Transport>, MailerError> {
        let factory = self
            .factories
            .iter()
            .find(|factory| factory.supports(dsn))
            .ok_or_else(|| unsupported_scheme(dsn, &self.schemes()))?;

        factory.create(dsn)
    }

    /// Parse a DSN string and create its transport
    pub fn from_dsn(&self, raw: &str) -> Result<Arc<dyn Transport>, MailerError> {
        self.create(&Dsn::parse(raw)?)
    }
}

impl fmt::Debug for TransportRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::communication::transport::tests::MockTransport;

    use super::*;

    struct NullFactory;

    impl TransportFactory for NullFactory {
        fn schemes(&self) -> &'static [&'static str] {
            &["null"]
        }

        fn create(&self, _dsn: &Dsn) -> Result<Arc<dyn Transport>, MailerError> {
            Ok(Arc::new(MockTransport::new()))
        }
    }

    #[test]
    fn test_create_with_matching_factory() -> TestResult {
        let registry = TransportRegistry::new().register(NullFactory);

        registry.from_dsn("null://default")?;

        Ok(())
    }

    #[test]
    fn test_unknown_scheme_lists_supported_schemes() {
        let registry = TransportRegistry::new().register(NullFactory);

        let err = registry.from_dsn("smtp://localhost").err();

        match err {
            Some(MailerError::Configuration(ConfigurationError::UnsupportedScheme {
                scheme,
                supported,
            })) => {
                assert_eq!(scheme, "smtp");
                assert_eq!(supported, "\"null\"");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
