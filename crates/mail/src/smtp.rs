use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::message::confirmation_message;
use crate::{MailError, Mailer};

/// Sends confirmation emails through an SMTP relay.
pub struct SmtpMailer {
    config: SmtpConfig,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig, from_address: String) -> Self {
        Self {
            config,
            from_address,
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_confirmation_code(
        &self,
        to_email: &str,
        username: &str,
        code: &str,
    ) -> Result<(), MailError> {
        let email = confirmation_message(&self.from_address, to_email, username, code)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
                .port(self.config.port);

        if let (Some(user), Some(pass)) = (&self.config.user, &self.config.password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, username, "Confirmation email sent");
        Ok(())
    }
}
