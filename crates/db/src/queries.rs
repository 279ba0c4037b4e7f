//! Queries over users, user actions, donations and candidate matches.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::{
    parse_decimal, Address, CandidateMatchRecord, NewAddress, NewNftMint, NewUser,
    NewUserActionDetails, NftMint, PerformedUserAction, SumDonations, User, UserAction,
    UserActionCall, UserActionDonation, UserActionEmail, UserActionEmailRecipient,
    UserActionEmailWithRelations, UserActionOptIn, UserActionRecord, UserActionTweetAtPerson,
    UserActionVoterRegistration, UserCryptoAddress,
};
use crate::DbPool;

/// Donations tracked outside the database, in USD.
pub const FAIRSHAKE_DONATIONS_AMOUNT_USD: i64 = 85_718_453;
/// 2024-05-13 MoonPay donation, in USD.
pub const MOONPAY_DONATION_AMOUNT_USD: i64 = 1_000_000;

pub const MANUALLY_TRACKED_DONATIONS_USD: [i64; 2] =
    [FAIRSHAKE_DONATIONS_AMOUNT_USD, MOONPAY_DONATION_AMOUNT_USD];

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Insert a user and return the stored row.
pub async fn create_user(db: &DbPool, user: &NewUser) -> DbResult<User> {
    let id = new_id();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO users (
            id, first_name, last_name, email_address, phone_number,
            has_opted_in_to_sms, has_opted_in_to_emails, total_donation_amount_usd,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email_address)
    .bind(&user.phone_number)
    .bind(user.has_opted_in_to_emails)
    .bind(user.total_donation_amount_usd.to_string())
    .bind(now)
    .bind(now)
    .execute(db.pool())
    .await?;

    debug!(user_id = %id, "Created user");
    get_user(db, &id).await
}

/// Fetch a user by id.
pub async fn get_user(db: &DbPool, user_id: &str) -> DbResult<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(db.pool())
        .await?
        .ok_or_else(|| DbError::UserNotFound(user_id.to_string()))
}

/// Store an address and make it the user's current address.
pub async fn set_user_address(db: &DbPool, user_id: &str, address: &NewAddress) -> DbResult<Address> {
    let id = new_id();
    let now = Utc::now();
    let mut tx = db.pool().begin().await?;

    sqlx::query(
        r#"
        INSERT INTO addresses (
            id, formatted_description, street_number, route, subpremise, locality,
            administrative_area_level_1, administrative_area_level_2, postal_code,
            country_code, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&address.formatted_description)
    .bind(&address.street_number)
    .bind(&address.route)
    .bind(&address.subpremise)
    .bind(&address.locality)
    .bind(&address.administrative_area_level_1)
    .bind(&address.administrative_area_level_2)
    .bind(&address.postal_code)
    .bind(&address.country_code)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let updated = sqlx::query("UPDATE users SET address_id = ?, updated_at = ? WHERE id = ?")
        .bind(&id)
        .bind(now)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(DbError::UserNotFound(user_id.to_string()));
    }

    tx.commit().await?;

    let stored = sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = ?")
        .bind(&id)
        .fetch_one(db.pool())
        .await?;
    Ok(stored)
}

/// Link a wallet to a user. Addresses are stored lowercased.
pub async fn add_crypto_address(
    db: &DbPool,
    user_id: &str,
    crypto_address: &str,
    is_primary: bool,
    ens_name: Option<&str>,
) -> DbResult<UserCryptoAddress> {
    let id = new_id();

    sqlx::query(
        r#"
        INSERT INTO user_crypto_addresses (id, user_id, crypto_address, is_primary, ens_name, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(crypto_address.to_lowercase())
    .bind(is_primary)
    .bind(ens_name)
    .bind(Utc::now())
    .execute(db.pool())
    .await?;

    let stored = sqlx::query_as::<_, UserCryptoAddress>("SELECT * FROM user_crypto_addresses WHERE id = ?")
        .bind(&id)
        .fetch_one(db.pool())
        .await?;
    Ok(stored)
}

/// The user's primary wallet, if any.
pub async fn primary_crypto_address(db: &DbPool, user_id: &str) -> DbResult<Option<UserCryptoAddress>> {
    let address = sqlx::query_as::<_, UserCryptoAddress>(
        "SELECT * FROM user_crypto_addresses WHERE user_id = ? AND is_primary = 1 LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(db.pool())
    .await?;
    Ok(address)
}

/// Record an NFT mint.
pub async fn record_nft_mint(db: &DbPool, mint: &NewNftMint) -> DbResult<NftMint> {
    let id = new_id();

    sqlx::query(
        r#"
        INSERT INTO nft_mints (
            id, nft_slug, status, contract_address, transaction_hash,
            cost_at_mint, cost_at_mint_currency_code, cost_at_mint_usd, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&mint.nft_slug)
    .bind(&mint.status)
    .bind(&mint.contract_address)
    .bind(&mint.transaction_hash)
    .bind(mint.cost_at_mint.to_string())
    .bind(&mint.cost_at_mint_currency_code)
    .bind(mint.cost_at_mint_usd.to_string())
    .bind(Utc::now())
    .execute(db.pool())
    .await?;

    let stored = sqlx::query_as::<_, NftMint>("SELECT * FROM nft_mints WHERE id = ?")
        .bind(&id)
        .fetch_one(db.pool())
        .await?;
    Ok(stored)
}

/// Record a user action together with its type-specific row.
///
/// Donations also add `amount_usd` to the user's running donation total.
///
/// # Arguments
/// * `db` - Database pool
/// * `user_id` - Acting user
/// * `campaign_name` - Campaign the action belongs to
/// * `details` - Type-specific fields; they determine the action type
/// * `nft_mint_id` - Mint rewarded for the action, if any
pub async fn record_user_action(
    db: &DbPool,
    user_id: &str,
    campaign_name: &str,
    details: &NewUserActionDetails,
    nft_mint_id: Option<&str>,
) -> DbResult<UserAction> {
    let id = new_id();
    let action_type = details.action_type();
    let now = Utc::now();
    let mut tx = db.pool().begin().await?;

    let user_total: Option<String> =
        sqlx::query_scalar("SELECT total_donation_amount_usd FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(user_total) = user_total else {
        return Err(DbError::UserNotFound(user_id.to_string()));
    };

    sqlx::query(
        r#"
        INSERT INTO user_actions (id, user_id, action_type, campaign_name, nft_mint_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(action_type)
    .bind(campaign_name)
    .bind(nft_mint_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    match details {
        NewUserActionDetails::OptIn { opt_in_type } => {
            sqlx::query("INSERT INTO user_action_opt_ins (id, opt_in_type) VALUES (?, ?)")
                .bind(&id)
                .bind(opt_in_type)
                .execute(&mut *tx)
                .await?;
        }
        NewUserActionDetails::Call {
            recipient_phone_number,
            recipient_dtsi_slug,
        } => {
            sqlx::query(
                "INSERT INTO user_action_calls (id, recipient_phone_number, recipient_dtsi_slug) VALUES (?, ?, ?)",
            )
            .bind(&id)
            .bind(recipient_phone_number)
            .bind(recipient_dtsi_slug)
            .execute(&mut *tx)
            .await?;
        }
        NewUserActionDetails::Email {
            sender_email,
            first_name,
            last_name,
            address_id,
            recipient_dtsi_slugs,
        } => {
            sqlx::query(
                "INSERT INTO user_action_emails (id, sender_email, first_name, last_name, address_id) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(sender_email)
            .bind(first_name)
            .bind(last_name)
            .bind(address_id)
            .execute(&mut *tx)
            .await?;

            for dtsi_slug in recipient_dtsi_slugs {
                sqlx::query(
                    "INSERT INTO user_action_email_recipients (id, user_action_email_id, dtsi_slug) VALUES (?, ?, ?)",
                )
                .bind(new_id())
                .bind(&id)
                .bind(dtsi_slug)
                .execute(&mut *tx)
                .await?;
            }
        }
        NewUserActionDetails::Donation {
            amount,
            amount_currency_code,
            amount_usd,
            recipient,
        } => {
            sqlx::query(
                "INSERT INTO user_action_donations (id, amount, amount_currency_code, amount_usd, recipient) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(amount.to_string())
            .bind(amount_currency_code)
            .bind(amount_usd.to_string())
            .bind(recipient)
            .execute(&mut *tx)
            .await?;

            let total = parse_decimal("total_donation_amount_usd", &user_total)? + *amount_usd;
            sqlx::query("UPDATE users SET total_donation_amount_usd = ?, updated_at = ? WHERE id = ?")
                .bind(total.to_string())
                .bind(now)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }
        NewUserActionDetails::VoterRegistration { usa_state } => {
            sqlx::query("INSERT INTO user_action_voter_registrations (id, usa_state) VALUES (?, ?)")
                .bind(&id)
                .bind(usa_state)
                .execute(&mut *tx)
                .await?;
        }
        NewUserActionDetails::TweetAtPerson { recipient_dtsi_slug } => {
            sqlx::query("INSERT INTO user_action_tweet_at_persons (id, recipient_dtsi_slug) VALUES (?, ?)")
                .bind(&id)
                .bind(recipient_dtsi_slug)
                .execute(&mut *tx)
                .await?;
        }
        NewUserActionDetails::Tweet | NewUserActionDetails::NftMint | NewUserActionDetails::LiveEvent => {}
    }

    tx.commit().await?;
    info!(user_id, action_type = %action_type, campaign_name, "Recorded user action");

    let stored = sqlx::query_as::<_, UserAction>("SELECT * FROM user_actions WHERE id = ?")
        .bind(&id)
        .fetch_one(db.pool())
        .await?;
    Ok(stored)
}

/// Set the user's phone number and SMS opt-in flag.
///
/// A non-empty phone number opts the user in; an empty one opts them out.
pub async fn update_user_sms_opt_in(db: &DbPool, user_id: &str, phone_number: &str) -> DbResult<User> {
    let updated = sqlx::query(
        "UPDATE users SET phone_number = ?, has_opted_in_to_sms = ?, updated_at = ? WHERE id = ?",
    )
    .bind(phone_number)
    .bind(!phone_number.is_empty())
    .bind(Utc::now())
    .bind(user_id)
    .execute(db.pool())
    .await?;

    if updated.rows_affected() == 0 {
        return Err(DbError::UserNotFound(user_id.to_string()));
    }

    get_user(db, user_id).await
}

/// Total donations in USD: every user's running total plus manually tracked donations.
pub async fn sum_donations(db: &DbPool) -> DbResult<SumDonations> {
    let totals: Vec<String> = sqlx::query_scalar("SELECT total_donation_amount_usd FROM users")
        .fetch_all(db.pool())
        .await?;

    let mut amount_usd = Decimal::ZERO;
    for total in &totals {
        amount_usd += parse_decimal("total_donation_amount_usd", total)?;
    }
    amount_usd += MANUALLY_TRACKED_DONATIONS_USD
        .iter()
        .map(|amount| Decimal::from(*amount))
        .sum::<Decimal>();

    Ok(SumDonations {
        amount_usd,
        fairshake_amount_usd: Decimal::from(FAIRSHAKE_DONATIONS_AMOUNT_USD),
    })
}

/// Distinct action types and campaigns the user has performed.
pub async fn performed_action_types(db: &DbPool, user_id: &str) -> DbResult<Vec<PerformedUserAction>> {
    let performed = sqlx::query_as::<_, PerformedUserAction>(
        "SELECT DISTINCT action_type, campaign_name FROM user_actions WHERE user_id = ? ORDER BY action_type, campaign_name",
    )
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;
    Ok(performed)
}

/// Load a user action with all of its relations.
pub async fn load_user_action_record(db: &DbPool, action_id: &str) -> DbResult<UserActionRecord> {
    let pool = db.pool();
    let action = sqlx::query_as::<_, UserAction>("SELECT * FROM user_actions WHERE id = ?")
        .bind(action_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::UserActionNotFound(action_id.to_string()))?;

    let nft_mint = match &action.nft_mint_id {
        Some(mint_id) => {
            sqlx::query_as::<_, NftMint>("SELECT * FROM nft_mints WHERE id = ?")
                .bind(mint_id)
                .fetch_optional(pool)
                .await?
        }
        None => None,
    };

    let call = sqlx::query_as::<_, UserActionCall>("SELECT * FROM user_action_calls WHERE id = ?")
        .bind(action_id)
        .fetch_optional(pool)
        .await?;
    let donation = sqlx::query_as::<_, UserActionDonation>("SELECT * FROM user_action_donations WHERE id = ?")
        .bind(action_id)
        .fetch_optional(pool)
        .await?;
    let opt_in = sqlx::query_as::<_, UserActionOptIn>("SELECT * FROM user_action_opt_ins WHERE id = ?")
        .bind(action_id)
        .fetch_optional(pool)
        .await?;
    let voter_registration = sqlx::query_as::<_, UserActionVoterRegistration>(
        "SELECT * FROM user_action_voter_registrations WHERE id = ?",
    )
    .bind(action_id)
    .fetch_optional(pool)
    .await?;
    let tweet_at_person =
        sqlx::query_as::<_, UserActionTweetAtPerson>("SELECT * FROM user_action_tweet_at_persons WHERE id = ?")
            .bind(action_id)
            .fetch_optional(pool)
            .await?;

    let email = match sqlx::query_as::<_, UserActionEmail>("SELECT * FROM user_action_emails WHERE id = ?")
        .bind(action_id)
        .fetch_optional(pool)
        .await?
    {
        Some(email) => {
            let address = match &email.address_id {
                Some(address_id) => {
                    sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = ?")
                        .bind(address_id)
                        .fetch_optional(pool)
                        .await?
                }
                None => None,
            };
            let recipients = sqlx::query_as::<_, UserActionEmailRecipient>(
                "SELECT * FROM user_action_email_recipients WHERE user_action_email_id = ? ORDER BY dtsi_slug",
            )
            .bind(action_id)
            .fetch_all(pool)
            .await?;
            Some(UserActionEmailWithRelations {
                email,
                address,
                recipients,
            })
        }
        None => None,
    };

    Ok(UserActionRecord {
        action,
        nft_mint,
        call,
        donation,
        email,
        opt_in,
        voter_registration,
        tweet_at_person,
    })
}

/// Store a matched DTSI/DDHQ pair, replacing an earlier result for the same pair.
pub async fn insert_candidate_match(
    db: &DbPool,
    dtsi_slug: &str,
    ddhq_cand_id: &str,
    is_direct_match: bool,
    reason_codes: &[&str],
) -> DbResult<i64> {
    let reason_codes = if reason_codes.is_empty() {
        None
    } else {
        Some(serde_json::to_string(reason_codes)?)
    };

    let result = sqlx::query(
        r#"
        INSERT OR REPLACE INTO candidate_matches (
            dtsi_slug, ddhq_cand_id, is_direct_match, reason_codes, created_at
        ) VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(dtsi_slug)
    .bind(ddhq_cand_id)
    .bind(is_direct_match)
    .bind(reason_codes)
    .bind(Utc::now())
    .execute(db.pool())
    .await?;

    Ok(result.last_insert_rowid())
}

/// All stored candidate matches ordered by DTSI slug.
pub async fn list_candidate_matches(db: &DbPool) -> DbResult<Vec<CandidateMatchRecord>> {
    let matches = sqlx::query_as::<_, CandidateMatchRecord>(
        "SELECT * FROM candidate_matches ORDER BY dtsi_slug, ddhq_cand_id",
    )
    .fetch_all(db.pool())
    .await?;
    Ok(matches)
}
