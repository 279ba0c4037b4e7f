//! Client-facing projection of stored user actions, including sensitive fields.
//!
//! Only the owner of an action should receive this shape: it carries phone
//! numbers, sender emails and addresses.

use chrono::SecondsFormat;
use rust_decimal::Decimal;
use serde::Serialize;
use swc_db::models::{Address, NftMint, UserActionRecord, UserActionType};

use crate::error::ProjectionError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientNftMint {
    pub id: String,
    pub nft_slug: String,
    pub status: String,
    pub contract_address: String,
    pub transaction_hash: Option<String>,
    pub cost_at_mint: Decimal,
    pub cost_at_mint_currency_code: String,
    pub cost_at_mint_usd: Decimal,
}

impl ClientNftMint {
    fn from_model(mint: &NftMint) -> Result<Self, ProjectionError> {
        let parse = |value: &str, field: &'static str| {
            value.parse::<Decimal>().map_err(|_| ProjectionError::InvalidAmount {
                id: mint.id.clone(),
                source: swc_db::DbError::InvalidDecimal {
                    field,
                    value: value.to_string(),
                },
            })
        };

        Ok(Self {
            id: mint.id.clone(),
            nft_slug: mint.nft_slug.clone(),
            status: mint.status.clone(),
            contract_address: mint.contract_address.clone(),
            transaction_hash: mint.transaction_hash.clone(),
            cost_at_mint: parse(&mint.cost_at_mint, "cost_at_mint")?,
            cost_at_mint_currency_code: mint.cost_at_mint_currency_code.clone(),
            cost_at_mint_usd: parse(&mint.cost_at_mint_usd, "cost_at_mint_usd")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAddress {
    pub id: String,
    pub formatted_description: String,
    pub administrative_area_level_1: String,
    pub country_code: String,
}

impl From<&Address> for ClientAddress {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id.clone(),
            formatted_description: address.formatted_description.clone(),
            administrative_area_level_1: address.administrative_area_level_1.clone(),
            country_code: address.country_code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientEmailRecipient {
    pub id: String,
}

/// Type-specific fields, tagged by `actionType`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "actionType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensitiveUserActionDetails {
    #[serde(rename_all = "camelCase")]
    OptIn { opt_in_type: String },
    #[serde(rename_all = "camelCase")]
    Call { recipient_phone_number: String },
    #[serde(rename_all = "camelCase")]
    Donation {
        amount: Decimal,
        amount_usd: Decimal,
        amount_currency_code: String,
        recipient: String,
    },
    #[serde(rename_all = "camelCase")]
    Email {
        sender_email: String,
        first_name: String,
        last_name: String,
        /// Missing when address lookup failed upstream.
        address: Option<ClientAddress>,
        user_action_email_recipients: Vec<ClientEmailRecipient>,
    },
    Tweet,
    NftMint,
    #[serde(rename_all = "camelCase")]
    VoterRegistration { usa_state: Option<String> },
    LiveEvent,
    #[serde(rename_all = "camelCase")]
    TweetAtPerson { recipient_dtsi_slug: Option<String> },
}

/// A user action as shown to its owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitiveUserAction {
    pub id: String,
    pub datetime_created: String,
    pub nft_mint: Option<ClientNftMint>,
    #[serde(flatten)]
    pub details: SensitiveUserActionDetails,
}

impl SensitiveUserAction {
    /// Project a joined action record.
    ///
    /// Fails when the relation required by the action type is missing.
    pub fn from_record(record: &UserActionRecord) -> Result<Self, ProjectionError> {
        let action = &record.action;
        let missing = |relation: &'static str| ProjectionError::MissingRelation {
            relation,
            id: action.id.clone(),
            action_type: action.action_type,
        };

        let nft_mint = record
            .nft_mint
            .as_ref()
            .map(ClientNftMint::from_model)
            .transpose()?;

        let details = match action.action_type {
            UserActionType::OptIn => {
                let opt_in = record.opt_in.as_ref().ok_or_else(|| missing("userActionOptIn"))?;
                SensitiveUserActionDetails::OptIn {
                    opt_in_type: opt_in.opt_in_type.clone(),
                }
            }
            UserActionType::Call => {
                let call = record.call.as_ref().ok_or_else(|| missing("userActionCall"))?;
                SensitiveUserActionDetails::Call {
                    recipient_phone_number: call.recipient_phone_number.clone(),
                }
            }
            UserActionType::Donation => {
                let donation = record
                    .donation
                    .as_ref()
                    .ok_or_else(|| missing("userActionDonation"))?;
                let invalid = |source| ProjectionError::InvalidAmount {
                    id: action.id.clone(),
                    source,
                };
                SensitiveUserActionDetails::Donation {
                    amount: donation.amount().map_err(invalid)?,
                    amount_usd: donation.amount_usd().map_err(invalid)?,
                    amount_currency_code: donation.amount_currency_code.clone(),
                    recipient: donation.recipient.clone(),
                }
            }
            UserActionType::Email => {
                let email = record.email.as_ref().ok_or_else(|| missing("userActionEmail"))?;
                SensitiveUserActionDetails::Email {
                    sender_email: email.email.sender_email.clone(),
                    first_name: email.email.first_name.clone(),
                    last_name: email.email.last_name.clone(),
                    address: email.address.as_ref().map(ClientAddress::from),
                    user_action_email_recipients: email
                        .recipients
                        .iter()
                        .map(|recipient| ClientEmailRecipient {
                            id: recipient.id.clone(),
                        })
                        .collect(),
                }
            }
            UserActionType::NftMint => {
                if nft_mint.is_none() {
                    return Err(missing("nftMint"));
                }
                SensitiveUserActionDetails::NftMint
            }
            UserActionType::Tweet => SensitiveUserActionDetails::Tweet,
            UserActionType::VoterRegistration => {
                let registration = record
                    .voter_registration
                    .as_ref()
                    .ok_or_else(|| missing("userActionVoterRegistration"))?;
                SensitiveUserActionDetails::VoterRegistration {
                    usa_state: registration.usa_state.clone(),
                }
            }
            UserActionType::LiveEvent => SensitiveUserActionDetails::LiveEvent,
            UserActionType::TweetAtPerson => {
                let tweet = record
                    .tweet_at_person
                    .as_ref()
                    .ok_or_else(|| missing("userActionTweetAtPerson"))?;
                SensitiveUserActionDetails::TweetAtPerson {
                    recipient_dtsi_slug: tweet.recipient_dtsi_slug.clone(),
                }
            }
        };

        Ok(Self {
            id: action.id.clone(),
            datetime_created: action.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            nft_mint,
            details,
        })
    }

    pub fn action_type(&self) -> UserActionType {
        match &self.details {
            SensitiveUserActionDetails::OptIn { .. } => UserActionType::OptIn,
            SensitiveUserActionDetails::Call { .. } => UserActionType::Call,
            SensitiveUserActionDetails::Donation { .. } => UserActionType::Donation,
            SensitiveUserActionDetails::Email { .. } => UserActionType::Email,
            SensitiveUserActionDetails::Tweet => UserActionType::Tweet,
            SensitiveUserActionDetails::NftMint => UserActionType::NftMint,
            SensitiveUserActionDetails::VoterRegistration { .. } => UserActionType::VoterRegistration,
            SensitiveUserActionDetails::LiveEvent => UserActionType::LiveEvent,
            SensitiveUserActionDetails::TweetAtPerson { .. } => UserActionType::TweetAtPerson,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use swc_db::models::{UserAction, UserActionCall, UserActionDonation};

    fn record(action_type: UserActionType) -> UserActionRecord {
        UserActionRecord {
            action: UserAction {
                id: "action-1".to_string(),
                user_id: "user-1".to_string(),
                action_type,
                campaign_name: "DEFAULT".to_string(),
                nft_mint_id: None,
                created_at: Utc::now(),
            },
            nft_mint: None,
            call: None,
            donation: None,
            email: None,
            opt_in: None,
            voter_registration: None,
            tweet_at_person: None,
        }
    }

    #[test]
    fn test_call_projection_serializes_with_tag() {
        let mut rec = record(UserActionType::Call);
        rec.call = Some(UserActionCall {
            id: "action-1".to_string(),
            recipient_phone_number: "+12025550100".to_string(),
            recipient_dtsi_slug: "nancy---pelosi".to_string(),
        });

        let projected = SensitiveUserAction::from_record(&rec).unwrap();
        let json = serde_json::to_value(&projected).unwrap();
        assert_eq!(json["actionType"], "CALL");
        assert_eq!(json["recipientPhoneNumber"], "+12025550100");
        assert_eq!(json["id"], "action-1");
        assert!(json["nftMint"].is_null());
    }

    #[test]
    fn test_donation_amounts_are_parsed() {
        let mut rec = record(UserActionType::Donation);
        rec.donation = Some(UserActionDonation {
            id: "action-1".to_string(),
            amount: "0.05".to_string(),
            amount_currency_code: "ETH".to_string(),
            amount_usd: "150.50".to_string(),
            recipient: "STAND_WITH_CRYPTO".to_string(),
        });

        let projected = SensitiveUserAction::from_record(&rec).unwrap();
        match projected.details {
            SensitiveUserActionDetails::Donation { amount_usd, .. } => {
                assert_eq!(amount_usd, Decimal::new(15050, 2));
            }
            other => panic!("unexpected details: {other:?}"),
        }
    }

    #[test]
    fn test_missing_relation_names_action() {
        let err = SensitiveUserAction::from_record(&record(UserActionType::Email)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "no userActionEmail found for id action-1 of type EMAIL"
        );
        assert!(SensitiveUserAction::from_record(&record(UserActionType::NftMint)).is_err());
    }

    #[test]
    fn test_datetime_created_uses_millisecond_utc() {
        let mut rec = record(UserActionType::Tweet);
        rec.action.created_at = Utc.with_ymd_and_hms(2024, 5, 22, 13, 4, 5).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);

        let projected = SensitiveUserAction::from_record(&rec).unwrap();
        assert_eq!(projected.datetime_created, "2024-05-22T13:04:05.123Z");
    }

    #[test]
    fn test_types_without_relations_project() {
        let projected = SensitiveUserAction::from_record(&record(UserActionType::Tweet)).unwrap();
        assert_eq!(projected.action_type(), UserActionType::Tweet);
    }
}
