use async_trait::async_trait;

use super::{MailTransport, MailerError, OutgoingMail};

/// Development transport used when no `mail` section is configured. Only the
/// envelope is logged; bodies carry verification codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailerError> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            body_len = mail.html_body.len(),
            "mail delivery skipped (no smtp configured)"
        );
        Ok(())
    }
}
