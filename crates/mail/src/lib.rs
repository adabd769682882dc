//! Confirmation-code email delivery.
//!
//! - [`Mailer`] -- the delivery seam the API depends on.
//! - [`SmtpMailer`] -- sends through an SMTP relay (STARTTLS).
//! - [`FileMailer`] -- writes each message as an `.eml` file into a
//!   directory; the development default.
//! - [`EmailConfig`] -- backend selection loaded from the environment.

pub mod config;
pub mod file;
pub mod message;
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;

pub use config::{EmailConfig, MailBackend, SmtpConfig};
pub use file::FileMailer;
pub use smtp::SmtpMailer;

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The file backend could not write the message.
    #[error("File transport error: {0}")]
    File(#[from] lettre::transport::file::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The output directory of the file backend could not be created.
    #[error("Mail directory error: {0}")]
    Io(#[from] std::io::Error),
}

/// Delivers confirmation codes to users.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send `code` to `to_email`, addressed to `username`.
    async fn send_confirmation_code(
        &self,
        to_email: &str,
        username: &str,
        code: &str,
    ) -> Result<(), MailError>;
}

/// Build the mailer selected by `config`.
pub fn build_mailer(config: &EmailConfig) -> Arc<dyn Mailer> {
    match (&config.backend, &config.smtp) {
        (MailBackend::Smtp, Some(smtp)) => {
            Arc::new(SmtpMailer::new(smtp.clone(), config.from_address.clone()))
        }
        (MailBackend::Smtp, None) => {
            tracing::warn!("SMTP backend selected without SMTP settings, writing mail to files");
            Arc::new(FileMailer::new(
                config.file_path.clone(),
                config.from_address.clone(),
            ))
        }
        (MailBackend::File, _) => Arc::new(FileMailer::new(
            config.file_path.clone(),
            config.from_address.clone(),
        )),
    }
}
