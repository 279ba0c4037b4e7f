//! Database models and types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::{DbError, DbResult};

/// Kind of advocacy activity a user performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserActionType {
    OptIn,
    Call,
    Email,
    Donation,
    Tweet,
    NftMint,
    VoterRegistration,
    LiveEvent,
    TweetAtPerson,
}

impl UserActionType {
    pub const ALL: [UserActionType; 9] = [
        UserActionType::OptIn,
        UserActionType::Call,
        UserActionType::Email,
        UserActionType::Donation,
        UserActionType::Tweet,
        UserActionType::NftMint,
        UserActionType::VoterRegistration,
        UserActionType::LiveEvent,
        UserActionType::TweetAtPerson,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserActionType::OptIn => "OPT_IN",
            UserActionType::Call => "CALL",
            UserActionType::Email => "EMAIL",
            UserActionType::Donation => "DONATION",
            UserActionType::Tweet => "TWEET",
            UserActionType::NftMint => "NFT_MINT",
            UserActionType::VoterRegistration => "VOTER_REGISTRATION",
            UserActionType::LiveEvent => "LIVE_EVENT",
            UserActionType::TweetAtPerson => "TWEET_AT_PERSON",
        }
    }
}

impl fmt::Display for UserActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserActionType {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserActionType::ALL
            .into_iter()
            .find(|action_type| action_type.as_str() == s)
            .ok_or_else(|| DbError::UnknownActionType(s.to_string()))
    }
}

/// Opt-in type recorded when a user signs up.
pub const OPT_IN_TYPE_SWC_SIGN_UP: &str = "SWC_SIGN_UP";

/// Postal address.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Address {
    pub id: String,
    pub formatted_description: String,
    pub street_number: String,
    pub route: String,
    pub subpremise: String,
    pub locality: String,
    pub administrative_area_level_1: String,
    pub administrative_area_level_2: String,
    pub postal_code: String,
    pub country_code: String,
    pub created_at: DateTime<Utc>,
}

/// Registered advocate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: String,
    pub has_opted_in_to_sms: bool,
    pub has_opted_in_to_emails: bool,
    pub total_donation_amount_usd: String, // Stored as string to preserve precision
    pub address_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn total_donation_amount_usd(&self) -> DbResult<Decimal> {
        parse_decimal("total_donation_amount_usd", &self.total_donation_amount_usd)
    }
}

/// Fields accepted when creating a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: String,
    pub has_opted_in_to_emails: bool,
    pub total_donation_amount_usd: Decimal,
}

/// Fields accepted when attaching an address to a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAddress {
    pub formatted_description: String,
    pub street_number: String,
    pub route: String,
    pub subpremise: String,
    pub locality: String,
    pub administrative_area_level_1: String,
    pub administrative_area_level_2: String,
    pub postal_code: String,
    pub country_code: String,
}

/// Wallet linked to a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserCryptoAddress {
    pub id: String,
    pub user_id: String,
    pub crypto_address: String,
    pub is_primary: bool,
    pub ens_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// On-chain token issued as an action reward.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NftMint {
    pub id: String,
    pub nft_slug: String,
    pub status: String,
    pub contract_address: String,
    pub transaction_hash: Option<String>,
    pub cost_at_mint: String,
    pub cost_at_mint_currency_code: String,
    pub cost_at_mint_usd: String,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when recording a mint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNftMint {
    pub nft_slug: String,
    pub status: String,
    pub contract_address: String,
    pub transaction_hash: Option<String>,
    pub cost_at_mint: Decimal,
    pub cost_at_mint_currency_code: String,
    pub cost_at_mint_usd: Decimal,
}

/// A recorded advocacy activity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAction {
    pub id: String,
    pub user_id: String,
    pub action_type: UserActionType,
    pub campaign_name: String,
    pub nft_mint_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserActionCall {
    pub id: String,
    pub recipient_phone_number: String,
    pub recipient_dtsi_slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserActionDonation {
    pub id: String,
    pub amount: String,
    pub amount_currency_code: String,
    pub amount_usd: String,
    pub recipient: String,
}

impl UserActionDonation {
    pub fn amount(&self) -> DbResult<Decimal> {
        parse_decimal("amount", &self.amount)
    }

    pub fn amount_usd(&self) -> DbResult<Decimal> {
        parse_decimal("amount_usd", &self.amount_usd)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserActionEmail {
    pub id: String,
    pub sender_email: String,
    pub first_name: String,
    pub last_name: String,
    pub address_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserActionEmailRecipient {
    pub id: String,
    pub user_action_email_id: String,
    pub dtsi_slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserActionOptIn {
    pub id: String,
    pub opt_in_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserActionVoterRegistration {
    pub id: String,
    pub usa_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserActionTweetAtPerson {
    pub id: String,
    pub recipient_dtsi_slug: Option<String>,
}

/// Type-specific data for a new user action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "actionType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NewUserActionDetails {
    OptIn {
        opt_in_type: String,
    },
    Call {
        recipient_phone_number: String,
        recipient_dtsi_slug: String,
    },
    Email {
        sender_email: String,
        first_name: String,
        last_name: String,
        address_id: Option<String>,
        recipient_dtsi_slugs: Vec<String>,
    },
    Donation {
        amount: Decimal,
        amount_currency_code: String,
        amount_usd: Decimal,
        recipient: String,
    },
    Tweet,
    NftMint,
    VoterRegistration {
        usa_state: Option<String>,
    },
    LiveEvent,
    TweetAtPerson {
        recipient_dtsi_slug: Option<String>,
    },
}

impl NewUserActionDetails {
    pub fn action_type(&self) -> UserActionType {
        match self {
            NewUserActionDetails::OptIn { .. } => UserActionType::OptIn,
            NewUserActionDetails::Call { .. } => UserActionType::Call,
            NewUserActionDetails::Email { .. } => UserActionType::Email,
            NewUserActionDetails::Donation { .. } => UserActionType::Donation,
            NewUserActionDetails::Tweet => UserActionType::Tweet,
            NewUserActionDetails::NftMint => UserActionType::NftMint,
            NewUserActionDetails::VoterRegistration { .. } => UserActionType::VoterRegistration,
            NewUserActionDetails::LiveEvent => UserActionType::LiveEvent,
            NewUserActionDetails::TweetAtPerson { .. } => UserActionType::TweetAtPerson,
        }
    }
}

/// Email action with its address and recipients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActionEmailWithRelations {
    pub email: UserActionEmail,
    pub address: Option<Address>,
    pub recipients: Vec<UserActionEmailRecipient>,
}

/// A user action joined with every type-specific relation.
///
/// At most one of the relation fields is expected to be set, matching
/// `action.action_type`; the schema cannot enforce this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActionRecord {
    pub action: UserAction,
    pub nft_mint: Option<NftMint>,
    pub call: Option<UserActionCall>,
    pub donation: Option<UserActionDonation>,
    pub email: Option<UserActionEmailWithRelations>,
    pub opt_in: Option<UserActionOptIn>,
    pub voter_registration: Option<UserActionVoterRegistration>,
    pub tweet_at_person: Option<UserActionTweetAtPerson>,
}

/// Action type and campaign a user has already performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PerformedUserAction {
    pub action_type: UserActionType,
    pub campaign_name: String,
}

/// Persisted result of a DTSI/DDHQ matching run.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateMatchRecord {
    pub id: i64,
    pub dtsi_slug: String,
    pub ddhq_cand_id: String,
    pub is_direct_match: bool,
    pub reason_codes: Option<String>, // JSON array of reason codes
    pub created_at: DateTime<Utc>,
}

/// Donation totals including manually tracked contributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SumDonations {
    pub amount_usd: Decimal,
    pub fairshake_amount_usd: Decimal,
}

pub(crate) fn parse_decimal(field: &'static str, value: &str) -> DbResult<Decimal> {
    Decimal::from_str(value).map_err(|_| DbError::InvalidDecimal {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_round_trips_through_str() {
        for action_type in UserActionType::ALL {
            assert_eq!(action_type.as_str().parse::<UserActionType>().unwrap(), action_type);
        }
        assert!("SKYDIVE".parse::<UserActionType>().is_err());
    }

    #[test]
    fn test_details_report_their_type() {
        let details = NewUserActionDetails::VoterRegistration {
            usa_state: Some("CA".to_string()),
        };
        assert_eq!(details.action_type(), UserActionType::VoterRegistration);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(parse_decimal("amount", "12.50").is_ok());
        assert!(matches!(
            parse_decimal("amount", "twelve"),
            Err(DbError::InvalidDecimal { field: "amount", .. })
        ));
    }
}
