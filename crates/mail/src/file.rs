use std::path::PathBuf;

use async_trait::async_trait;
use lettre::{AsyncFileTransport, AsyncTransport, Tokio1Executor};

use crate::message::confirmation_message;
use crate::{MailError, Mailer};

/// Writes confirmation emails as `<message-id>.eml` files into a directory.
pub struct FileMailer {
    dir: PathBuf,
    from_address: String,
}

impl FileMailer {
    pub fn new(dir: PathBuf, from_address: String) -> Self {
        Self { dir, from_address }
    }
}

#[async_trait]
impl Mailer for FileMailer {
    async fn send_confirmation_code(
        &self,
        to_email: &str,
        username: &str,
        code: &str,
    ) -> Result<(), MailError> {
        let email = confirmation_message(&self.from_address, to_email, username, code)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let transport = AsyncFileTransport::<Tokio1Executor>::new(&self.dir);
        let id = transport.send(email).await?;

        tracing::info!(to = to_email, username, %id, dir = %self.dir.display(), "Confirmation email written");
        Ok(())
    }
}
