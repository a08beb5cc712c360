#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Send a single email through Azure Communication Services

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use azure_mailer::{
    domain::communication::{
        email::{Attachment, Email, Priority},
        email_addresses::Address,
        envelope::Envelope,
        transport::{SendResult, Transport},
    },
    infrastructure::{
        email::azure::{AzureConfig, AzureTransport},
        http::{HttpClientConfig, ReqwestExecutor},
    },
};
use clap::Parser;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The Azure email configuration
    #[clap(flatten)]
    pub azure: AzureConfig,

    /// The HTTP client configuration
    #[clap(flatten)]
    pub http: HttpClientConfig,

    /// The sender, e.g. `DoNotReply <donotreply@example.com>`
    #[clap(long, env = "AZURE_EMAIL_SENDER")]
    pub from: Address,

    /// Recipients
    #[clap(long, required = true)]
    pub to: Vec<Address>,

    /// Carbon copy recipients
    #[clap(long)]
    pub cc: Vec<Address>,

    /// Blind carbon copy recipients
    #[clap(long)]
    pub bcc: Vec<Address>,

    /// Reply-to addresses
    #[clap(long)]
    pub reply_to: Vec<Address>,

    /// The subject
    #[clap(long)]
    pub subject: String,

    /// The HTML body
    #[clap(long)]
    pub html: Option<String>,

    /// The plain text body
    #[clap(long)]
    pub text: Option<String>,

    /// The priority, by name or level 1-5
    #[clap(long, default_value = "normal")]
    pub priority: Priority,

    /// Files to attach
    #[clap(long = "attach")]
    pub attachments: Vec<PathBuf>,
}

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("txt") => "text/plain",
        Some("html" | "htm") => "text/html",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

async fn attachment(path: &Path) -> Result<Attachment> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no file name", path.display()))?;

    Ok(Attachment::new(filename, content_type(path), bytes))
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut email = Email::new(&args.subject).priority(args.priority);
    email.html = args.html;
    email.text = args.text;

    for path in &args.attachments {
        email = email.attach(attachment(path).await?);
    }

    let envelope = Envelope::new(args.from, args.to)?
        .cc(args.cc)
        .bcc(args.bcc)
        .reply_to(args.reply_to);

    let client = Arc::new(ReqwestExecutor::new(&args.http)?);
    let transport = AzureTransport::new(&args.azure, client)?;

    match transport.send(&email, &envelope).await? {
        SendResult::Success {
            provider_message_id,
        } => {
            println!("{}", provider_message_id);

            Ok(())
        }
        SendResult::Failure(failure) => bail!("the email was not accepted: {}", failure),
    }
}
