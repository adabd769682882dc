use std::path::PathBuf;
use std::str::FromStr;

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@yamdb.local";

/// Default output directory of the file backend.
const DEFAULT_FILE_PATH: &str = "sent_emails";

/// Where outgoing mail goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackend {
    /// Write `.eml` files into a directory.
    File,
    /// Relay through an SMTP server.
    Smtp,
}

impl FromStr for MailBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(MailBackend::File),
            "smtp" => Ok(MailBackend::Smtp),
            other => Err(format!(
                "Unknown EMAIL_BACKEND '{other}'. Expected 'file' or 'smtp'"
            )),
        }
    }
}

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port (defaults to 587).
    pub port: u16,
    /// Optional SMTP username.
    pub user: Option<String>,
    /// Optional SMTP password.
    pub password: Option<String>,
}

/// Configuration for confirmation email delivery.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub backend: MailBackend,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Output directory of the file backend.
    pub file_path: PathBuf,
    /// Present whenever `SMTP_HOST` is set.
    pub smtp: Option<SmtpConfig>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable          | Required | Default               |
    /// |-------------------|----------|-----------------------|
    /// | `EMAIL_BACKEND`   | no       | `file`                |
    /// | `EMAIL_FILE_PATH` | no       | `sent_emails`         |
    /// | `SMTP_HOST`       | for smtp | --                    |
    /// | `SMTP_PORT`       | no       | `587`                 |
    /// | `SMTP_FROM`       | no       | `noreply@yamdb.local` |
    /// | `SMTP_USER`       | no       | --                    |
    /// | `SMTP_PASSWORD`   | no       | --                    |
    ///
    /// # Panics
    ///
    /// Panics if `EMAIL_BACKEND` holds an unknown value, or is `smtp` while
    /// `SMTP_HOST` is unset.
    pub fn from_env() -> Self {
        let backend: MailBackend = std::env::var("EMAIL_BACKEND")
            .unwrap_or_else(|_| "file".into())
            .parse()
            .unwrap_or_else(|e: String| panic!("{e}"));

        let smtp = std::env::var("SMTP_HOST").ok().map(|host| SmtpConfig {
            host,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            user: std::env::var("SMTP_USER").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
        });

        assert!(
            backend != MailBackend::Smtp || smtp.is_some(),
            "SMTP_HOST must be set when EMAIL_BACKEND=smtp"
        );

        Self {
            backend,
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            file_path: std::env::var("EMAIL_FILE_PATH")
                .unwrap_or_else(|_| DEFAULT_FILE_PATH.to_string())
                .into(),
            smtp,
        }
    }
}
