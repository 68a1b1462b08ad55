use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::auth::TokenCache;
use crate::config::Config;
use crate::inquiry::{InquiryService, Mailer, SmtpMailer};
use crate::observability::Metrics;
use crate::products::{ProductError, ProductUpserter};
use crate::rapnet::{ClientCredentials, RapnetClient, RapnetError};

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Rapnet(#[from] RapnetError),
    #[error(transparent)]
    Products(#[from] ProductError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<TokenCache>,
    pub rapnet: Arc<RapnetClient>,
    pub products: Arc<ProductUpserter>,
    pub inquiries: Arc<InquiryService>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wire every collaborator from configuration. Missing Shopify or SMTP
    /// settings disable those features rather than failing startup.
    pub fn from_config(config: Config) -> Result<Self, StateError> {
        let metrics = Arc::new(Metrics::new());
        let rapnet = Arc::new(RapnetClient::new(&config.rapnet)?);

        let tokens = TokenCache::new(
            rapnet.clone(),
            ClientCredentials::from_config(&config.rapnet),
            config.rapnet.refresh_skew.as_duration(),
        )
        .with_metrics(metrics.clone());

        let products = ProductUpserter::new(&config.shopify, metrics.clone())?;

        let mailer = config.mail.smtp_settings().and_then(|settings| {
            match SmtpMailer::new(settings) {
                Ok(mailer) => Some(Arc::new(mailer) as Arc<dyn Mailer>),
                Err(err) => {
                    warn!(error = %err, "SMTP transport unusable, inquiry emails disabled");
                    None
                }
            }
        });
        let inquiries = InquiryService::new(mailer, config.mail.owner_address(), metrics.clone());

        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            rapnet,
            products: Arc::new(products),
            inquiries: Arc::new(inquiries),
            metrics,
        })
    }

    /// Replace the mail transport, keeping the configured owner address
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.inquiries = Arc::new(InquiryService::new(
            Some(mailer),
            self.config.mail.owner_address(),
            self.metrics.clone(),
        ));
        self
    }
}
