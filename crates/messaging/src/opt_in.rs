//! SMS opt-in flow.

use serde::Serialize;
use std::sync::Arc;
use swc_db::models::User;
use swc_db::{queries, DbPool};
use tracing::info;

use crate::error::{MessagingError, MessagingResult};
use crate::events::{
    EventSink, UpsertAdvocateOpts, UpsertAdvocatePayload, WorkflowEvent, UPSERT_ADVOCATE_EVENT_NAME,
};
use crate::validation::{normalize_phone_number, FieldErrors};

pub const PHONE_NUMBER_FIELD: &str = "phoneNumber";

/// Outcome of an opt-in request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SmsOptInResult {
    Updated { user: User },
    Invalid { errors: FieldErrors },
}

/// Stores a user's SMS consent and tells the CRM about it.
pub struct SmsOptInService {
    db: DbPool,
    events: Arc<dyn EventSink>,
    campaign_id: u64,
}

impl SmsOptInService {
    /// # Arguments
    /// * `db` - Database pool
    /// * `events` - Where the upsert-advocate event goes
    /// * `campaign_id` - CRM campaign for default subscribers
    pub fn new(db: DbPool, events: Arc<dyn EventSink>, campaign_id: u64) -> Self {
        Self {
            db,
            events,
            campaign_id,
        }
    }

    /// Validate `phone_number`, save it on the user and emit the upsert event.
    ///
    /// Invalid input is returned as field errors rather than an `Err`; the
    /// user row is left untouched in that case.
    pub async fn update_user_has_opted_in_to_sms(
        &self,
        user_id: &str,
        phone_number: &str,
    ) -> MessagingResult<SmsOptInResult> {
        let phone_number = match normalize_phone_number(phone_number) {
            Ok(normalized) => normalized,
            Err(message) => {
                let mut errors = FieldErrors::new();
                errors.add(PHONE_NUMBER_FIELD, message);
                return Ok(SmsOptInResult::Invalid { errors });
            }
        };

        let user = queries::update_user_sms_opt_in(&self.db, user_id, &phone_number).await?;
        info!(user_id, has_opted_in_to_sms = user.has_opted_in_to_sms, "Updated SMS opt-in");

        let payload = UpsertAdvocatePayload {
            campaign_id: self.campaign_id,
            user_id: user.id.clone(),
            opts: UpsertAdvocateOpts {
                is_sms_optin: user.has_opted_in_to_sms,
            },
        };
        let data = serde_json::to_value(&payload).map_err(|e| MessagingError::Event {
            name: UPSERT_ADVOCATE_EVENT_NAME.to_string(),
            message: e.to_string(),
        })?;
        self.events
            .send(&WorkflowEvent::new(UPSERT_ADVOCATE_EVENT_NAME, data))
            .await?;

        Ok(SmsOptInResult::Updated { user })
    }
}
