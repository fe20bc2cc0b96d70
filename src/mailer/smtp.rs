use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use super::{MailTransport, MailerError, OutgoingMail};
use crate::config::MailConfig;

pub struct SmtpTransport {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    pub fn from_config(cfg: &MailConfig) -> Result<Self, MailerError> {
        let from = Mailbox::new(Some(cfg.from_name.clone()), parse_address(&cfg.from_addr)?);

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_server)?
            .port(cfg.smtp_port);
        if !cfg.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                cfg.smtp_username.clone(),
                cfg.smtp_password.clone(),
            ));
        }

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailerError> {
        let to = Mailbox::new(None, parse_address(&mail.to)?);
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body)?;

        self.transport.send(message).await?;
        Ok(())
    }
}

fn parse_address(raw: &str) -> Result<lettre::Address, MailerError> {
    raw.parse().map_err(|source| MailerError::Address {
        address: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use crate::{config::MailConfig, mailer::MailerError};

    use super::{SmtpTransport, parse_address};

    fn mail_config(from_addr: &str) -> MailConfig {
        MailConfig {
            from_addr: from_addr.to_string(),
            from_name: "Modular Auth".to_string(),
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "mailer".to_string(),
            smtp_password: "secret".to_string(),
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        let err = parse_address("not an address").expect_err("address should not parse");

        assert!(matches!(err, MailerError::Address { .. }));
    }

    #[tokio::test]
    async fn builds_from_valid_config() {
        SmtpTransport::from_config(&mail_config("noreply@example.com"))
            .expect("transport should build");
    }

    #[tokio::test]
    async fn invalid_sender_fails_at_construction() {
        let result = SmtpTransport::from_config(&mail_config("noreply"));

        assert!(matches!(result, Err(MailerError::Address { .. })));
    }
}
