//! The confirmation email itself.

use lettre::message::header::ContentType;
use lettre::Message;

use crate::MailError;

/// Subject line of every confirmation email.
pub const CONFIRMATION_SUBJECT: &str = "YaMDB confirmation code";

/// Assemble the plain-text email carrying `code`.
pub fn confirmation_message(
    from: &str,
    to_email: &str,
    username: &str,
    code: &str,
) -> Result<Message, MailError> {
    let body = format!(
        "Hello, {username}!\n\n\
         Your confirmation code: {code}\n\n\
         Exchange it for an access token at POST /api/v1/auth/token/."
    );

    Message::builder()
        .from(from.parse()?)
        .to(to_email.parse()?)
        .subject(CONFIRMATION_SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| MailError::Build(e.to_string()))
}
