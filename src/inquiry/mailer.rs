//! Outbound email transport

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::error::MailError;
use crate::config::SmtpSettings;

/// A single HTML notification
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// `secure` selects implicit TLS; otherwise the connection is upgraded
    /// with STARTTLS
    pub fn new(settings: SmtpSettings) -> Result<Self, MailError> {
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| MailError::Transport(e.to_string()))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(settings.user, settings.password))
            .build();

        Ok(Self {
            transport,
            from: mailbox(&settings.from)?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(mailbox(&email.to)?)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML);
        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(mailbox(reply_to)?);
        }

        let message = builder
            .body(email.html)
            .map_err(|e| MailError::Build(e.to_string()))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        debug!(code = %response.code(), "SMTP message accepted");
        Ok(())
    }
}

pub(crate) fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse::<Mailbox>().map_err(|e| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(secure: bool) -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: if secure { 465 } else { 587 },
            secure,
            user: "mailer".to_string(),
            password: "secret".to_string(),
            from: "Diamonds <shop@example.com>".to_string(),
        }
    }

    #[test]
    fn test_mailbox_parsing() {
        assert!(mailbox("Ada <ada@example.com>").is_ok());
        assert!(mailbox("ada@example.com").is_ok());
        assert!(matches!(mailbox("not an address"), Err(MailError::Address { .. })));
    }

    #[tokio::test]
    async fn test_transport_builds_for_both_tls_modes() {
        assert!(SmtpMailer::new(settings(true)).is_ok());
        assert!(SmtpMailer::new(settings(false)).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_from_is_rejected() {
        let mut bad = settings(true);
        bad.from = "nobody".to_string();
        assert!(SmtpMailer::new(bad).is_err());
    }

    #[tokio::test]
    async fn test_debug_hides_credentials() {
        let mailer = SmtpMailer::new(settings(false)).unwrap();
        assert!(!format!("{mailer:?}").contains("secret"));
    }
}
