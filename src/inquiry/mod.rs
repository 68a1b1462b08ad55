//! Customer inquiries about a specific diamond
//!
//! An inquiry is validated, assigned a time-ordered id and, when SMTP and an
//! owner address are configured, emailed to the owner. Delivery is best
//! effort: a failed send still accepts the inquiry and is reported through
//! [`InquiryOutcome`].

pub mod error;
pub mod mailer;
pub mod models;
pub mod service;
pub mod template;

pub use error::{InquiryError, MailError};
pub use mailer::{Mailer, OutgoingEmail, SmtpMailer};
pub use models::{CustomerDetails, InquiryRequest, ValidInquiry};
pub use service::{InquiryOutcome, InquiryReceipt, InquiryService, NotNotified};
