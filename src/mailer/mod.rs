use std::sync::Arc;

use askama::Template;
use async_trait::async_trait;

mod error;
pub mod log;
pub mod smtp;
pub mod templates;

pub use error::MailerError;
pub use log::LogTransport;
pub use smtp::SmtpTransport;

use crate::config::MailConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailerError>;
}

#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
}

impl Mailer {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// SMTP when configured, otherwise the logging transport.
    pub fn from_config(cfg: Option<&MailConfig>) -> Result<Self, MailerError> {
        match cfg {
            Some(cfg) => {
                tracing::info!(server = %cfg.smtp_server, port = cfg.smtp_port, "using smtp mail transport");
                Ok(Self::new(Arc::new(SmtpTransport::from_config(cfg)?)))
            }
            None => {
                tracing::warn!("no mail config present; outgoing mail will only be logged");
                Ok(Self::new(Arc::new(LogTransport)))
            }
        }
    }

    pub async fn send_templated(
        &self,
        to: &str,
        subject: &str,
        template: &impl Template,
    ) -> Result<(), MailerError> {
        let html_body = template.render()?;
        self.transport
            .send(OutgoingMail {
                to: to.to_string(),
                subject: subject.to_string(),
                html_body,
            })
            .await
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{
        Mailer, MailerError,
        templates::{VERIFY_EMAIL_SUBJECT, VerifyEmailTemplate},
        testing::{FailingTransport, RecordingTransport},
    };

    #[tokio::test]
    async fn send_templated_renders_before_delivery() {
        let transport = RecordingTransport::default();
        let mailer = Mailer::new(Arc::new(transport.clone()));

        mailer
            .send_templated(
                "alice@example.com",
                VERIFY_EMAIL_SUBJECT,
                &VerifyEmailTemplate {
                    name: "Alice Liddell",
                    code: "a1B2c3",
                },
            )
            .await
            .expect("send should succeed");

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "alice@example.com");
        assert_eq!(sent[0].subject, "Email Verification");
        assert!(sent[0].html_body.contains("a1B2c3"));
    }

    #[tokio::test]
    async fn transport_errors_are_returned() {
        let mailer = Mailer::new(Arc::new(FailingTransport));

        let err = mailer
            .send_templated(
                "alice@example.com",
                VERIFY_EMAIL_SUBJECT,
                &VerifyEmailTemplate {
                    name: "Alice",
                    code: "a1B2c3",
                },
            )
            .await
            .expect_err("send should fail");

        assert!(matches!(err, MailerError::Unavailable(_)));
    }

    #[tokio::test]
    async fn missing_config_falls_back_to_logging() {
        let mailer = Mailer::from_config(None).expect("log transport should build");

        mailer
            .send_templated(
                "alice@example.com",
                VERIFY_EMAIL_SUBJECT,
                &VerifyEmailTemplate {
                    name: "Alice",
                    code: "a1B2c3",
                },
            )
            .await
            .expect("log transport never fails");
    }
}
