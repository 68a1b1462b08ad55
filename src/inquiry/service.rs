use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::InquiryError;
use super::mailer::{Mailer, OutgoingEmail};
use super::models::InquiryRequest;
use super::template;
use crate::observability::Metrics;

/// What happened to an accepted inquiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InquiryOutcome {
    /// The owner was emailed
    Notified,
    /// Recorded but nobody was notified
    Accepted(NotNotified),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotNotified {
    MailNotConfigured,
    DeliveryFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryReceipt {
    pub id: Uuid,
    pub outcome: InquiryOutcome,
}

impl InquiryReceipt {
    pub fn email_sent(&self) -> bool {
        self.outcome == InquiryOutcome::Notified
    }

    pub fn message(&self) -> &'static str {
        match &self.outcome {
            InquiryOutcome::Notified => "Inquiry sent successfully",
            InquiryOutcome::Accepted(_) => "Inquiry received",
        }
    }
}

pub struct InquiryService {
    mailer: Option<Arc<dyn Mailer>>,
    owner: Option<String>,
    metrics: Arc<Metrics>,
}

impl InquiryService {
    pub fn new(
        mailer: Option<Arc<dyn Mailer>>,
        owner: Option<String>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            mailer,
            owner,
            metrics,
        }
    }

    pub fn can_notify(&self) -> bool {
        self.mailer.is_some() && self.owner.is_some()
    }

    /// Validates before any delivery attempt; delivery failures never fail
    /// the inquiry
    pub async fn submit(&self, request: InquiryRequest) -> Result<InquiryReceipt, InquiryError> {
        let inquiry = request.validate()?;
        let id = Uuid::now_v7();
        self.metrics.inquiry_accepted();

        info!(inquiry_id = %id, sku = ?inquiry.diamond.sku(), "Inquiry received");

        let (Some(mailer), Some(owner)) = (&self.mailer, &self.owner) else {
            warn!(inquiry_id = %id, "Mail transport not configured, owner not notified");
            return Ok(InquiryReceipt {
                id,
                outcome: InquiryOutcome::Accepted(NotNotified::MailNotConfigured),
            });
        };

        let email = OutgoingEmail {
            to: owner.clone(),
            reply_to: Some(inquiry.email.clone()),
            subject: template::subject(&inquiry),
            html: template::render(&inquiry, id),
        };

        let outcome = match mailer.send(email).await {
            Ok(()) => {
                info!(inquiry_id = %id, "Inquiry notification sent");
                InquiryOutcome::Notified
            }
            Err(err) => {
                warn!(inquiry_id = %id, error = %err, "Failed to send inquiry notification");
                self.metrics.email_failed();
                InquiryOutcome::Accepted(NotNotified::DeliveryFailed(err.to_string()))
            }
        };

        Ok(InquiryReceipt { id, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inquiry::error::MailError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _email: OutgoingEmail) -> Result<(), MailError> {
            Err(MailError::Transport("connection refused".to_string()))
        }
    }

    fn request(phone: Option<&str>) -> InquiryRequest {
        serde_json::from_value(json!({
            "customer": {"name": "Ada", "email": "ada@example.com", "phone": phone},
            "diamond": {"stock_num": "RG-1", "shape": "Round"},
            "quantity": 1,
            "message": "Hello"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_notifies_owner_with_reply_to_customer() {
        let mailer = Arc::new(RecordingMailer::default());
        let service = InquiryService::new(
            Some(mailer.clone() as Arc<dyn Mailer>),
            Some("owner@example.com".to_string()),
            Arc::new(Metrics::new()),
        );

        let receipt = service.submit(request(Some("555-0100"))).await.unwrap();

        assert!(receipt.email_sent());
        assert_eq!(receipt.message(), "Inquiry sent successfully");
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owner@example.com");
        assert_eq!(sent[0].reply_to.as_deref(), Some("ada@example.com"));
        assert!(sent[0].html.contains(&receipt.id.to_string()));
    }

    #[tokio::test]
    async fn test_missing_phone_sends_nothing() {
        let mailer = Arc::new(RecordingMailer::default());
        let metrics = Arc::new(Metrics::new());
        let service = InquiryService::new(
            Some(mailer.clone() as Arc<dyn Mailer>),
            Some("owner@example.com".to_string()),
            metrics.clone(),
        );

        let err = service.submit(request(None)).await.unwrap_err();

        assert!(matches!(err, InquiryError::Validation { .. }));
        assert!(mailer.sent.lock().unwrap().is_empty());
        assert_eq!(metrics.snapshot().inquiries_accepted, 0);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_downgraded() {
        let metrics = Arc::new(Metrics::new());
        let service = InquiryService::new(
            Some(Arc::new(FailingMailer) as Arc<dyn Mailer>),
            Some("owner@example.com".to_string()),
            metrics.clone(),
        );

        let receipt = service.submit(request(Some("555-0100"))).await.unwrap();

        assert!(!receipt.email_sent());
        assert_eq!(receipt.message(), "Inquiry received");
        assert!(matches!(
            receipt.outcome,
            InquiryOutcome::Accepted(NotNotified::DeliveryFailed(_))
        ));
        assert_eq!(metrics.snapshot().emails_failed, 1);
    }

    #[tokio::test]
    async fn test_unconfigured_mail_accepts_without_notifying() {
        let service = InquiryService::new(None, None, Arc::new(Metrics::new()));

        assert!(!service.can_notify());
        let receipt = service.submit(request(Some("555-0100"))).await.unwrap();
        assert_eq!(
            receipt.outcome,
            InquiryOutcome::Accepted(NotNotified::MailNotConfigured)
        );
    }
}
