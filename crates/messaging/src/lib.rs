//! Outbound messaging for the Stand With Crypto backend.
//!
//! SMS delivery through the provider REST API, workflow events for the
//! advocate CRM, and the SMS opt-in flow that ties them to user records.

pub mod error;
pub mod events;
pub mod opt_in;
pub mod sms;
pub mod validation;

pub use error::{MessagingError, MessagingResult};
pub use events::{EventSink, HttpEventSink, NoopEventSink, WorkflowEvent};
pub use opt_in::{SmsOptInResult, SmsOptInService};
pub use sms::{SendSmsPayload, SentMessage, SmsClient, TwilioConfig, TwilioSmsClient};
pub use validation::FieldErrors;
