use thiserror::Error;

#[derive(Debug, Error)]
pub enum InquiryError {
    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },
}

/// Mail delivery failures; never fatal to an inquiry
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mailbox {address:?}: {reason}")]
    Address { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}
