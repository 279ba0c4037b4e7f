//! Integration tests for the SQLite storage layer.

use rust_decimal::Decimal;
use swc_db::models::{
    NewAddress, NewNftMint, NewUser, NewUserActionDetails, UserActionType, OPT_IN_TYPE_SWC_SIGN_UP,
};
use swc_db::{queries, DbError, DbPool};

async fn setup() -> DbPool {
    let db = DbPool::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    db
}

fn new_user(first_name: &str) -> NewUser {
    NewUser {
        first_name: first_name.to_string(),
        last_name: "Advocate".to_string(),
        email_address: format!("{}@example.com", first_name.to_lowercase()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_database_creation() {
    let db = setup().await;
    assert!(queries::list_candidate_matches(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sms_opt_in_follows_phone_number() {
    let db = setup().await;
    let user = queries::create_user(&db, &new_user("Ada")).await.unwrap();
    assert!(!user.has_opted_in_to_sms);

    let opted_in = queries::update_user_sms_opt_in(&db, &user.id, "+15555550123").await.unwrap();
    assert!(opted_in.has_opted_in_to_sms);
    assert_eq!(opted_in.phone_number, "+15555550123");

    let opted_out = queries::update_user_sms_opt_in(&db, &user.id, "").await.unwrap();
    assert!(!opted_out.has_opted_in_to_sms);
}

#[tokio::test]
async fn test_sms_opt_in_unknown_user() {
    let db = setup().await;
    let err = queries::update_user_sms_opt_in(&db, "missing", "+15555550123")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::UserNotFound(id) if id == "missing"));
}

#[tokio::test]
async fn test_sum_donations_includes_manual_donations() {
    let db = setup().await;
    let empty = queries::sum_donations(&db).await.unwrap();
    assert_eq!(empty.amount_usd, Decimal::from(86_718_453));
    assert_eq!(empty.fairshake_amount_usd, Decimal::from(85_718_453));

    let user = queries::create_user(&db, &new_user("Grace")).await.unwrap();
    queries::record_user_action(
        &db,
        &user.id,
        "DEFAULT",
        &NewUserActionDetails::Donation {
            amount: Decimal::new(5, 2),
            amount_currency_code: "ETH".to_string(),
            amount_usd: Decimal::new(15050, 2),
            recipient: "STAND_WITH_CRYPTO".to_string(),
        },
        None,
    )
    .await
    .unwrap();

    let user = queries::get_user(&db, &user.id).await.unwrap();
    assert_eq!(user.total_donation_amount_usd().unwrap(), Decimal::new(15050, 2));

    let totals = queries::sum_donations(&db).await.unwrap();
    assert_eq!(totals.amount_usd, Decimal::new(8_671_860_350, 2));
}

#[tokio::test]
async fn test_performed_action_types_are_distinct() {
    let db = setup().await;
    let user = queries::create_user(&db, &new_user("Linus")).await.unwrap();
    let tweet = NewUserActionDetails::Tweet;
    queries::record_user_action(&db, &user.id, "DEFAULT", &tweet, None).await.unwrap();
    queries::record_user_action(&db, &user.id, "DEFAULT", &tweet, None).await.unwrap();
    queries::record_user_action(
        &db,
        &user.id,
        "DEFAULT",
        &NewUserActionDetails::OptIn {
            opt_in_type: OPT_IN_TYPE_SWC_SIGN_UP.to_string(),
        },
        None,
    )
    .await
    .unwrap();

    let performed = queries::performed_action_types(&db, &user.id).await.unwrap();
    assert_eq!(performed.len(), 2);
    assert!(performed.iter().any(|p| p.action_type == UserActionType::Tweet));
    assert!(performed.iter().any(|p| p.action_type == UserActionType::OptIn));
}

#[tokio::test]
async fn test_load_email_action_with_relations() {
    let db = setup().await;
    let user = queries::create_user(&db, &new_user("Barbara")).await.unwrap();
    let address = queries::set_user_address(
        &db,
        &user.id,
        &NewAddress {
            formatted_description: "1 Main St, Springfield, IL".to_string(),
            administrative_area_level_1: "IL".to_string(),
            country_code: "US".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let action = queries::record_user_action(
        &db,
        &user.id,
        "CNN_PRESIDENTIAL_DEBATE_2024",
        &NewUserActionDetails::Email {
            sender_email: "barbara@example.com".to_string(),
            first_name: "Barbara".to_string(),
            last_name: "Advocate".to_string(),
            address_id: Some(address.id.clone()),
            recipient_dtsi_slugs: vec!["dick---durbin".to_string(), "tammy---duckworth".to_string()],
        },
        None,
    )
    .await
    .unwrap();

    let record = queries::load_user_action_record(&db, &action.id).await.unwrap();
    assert_eq!(record.action.action_type, UserActionType::Email);
    let email = record.email.unwrap();
    assert_eq!(email.address.unwrap().id, address.id);
    assert_eq!(email.recipients.len(), 2);
    assert!(record.call.is_none());
}

#[tokio::test]
async fn test_nft_mint_action_links_mint() {
    let db = setup().await;
    let user = queries::create_user(&db, &new_user("Hal")).await.unwrap();
    let mint = queries::record_nft_mint(
        &db,
        &NewNftMint {
            nft_slug: "swc-shield".to_string(),
            status: "CLAIMED".to_string(),
            contract_address: "0x0000000000000000000000000000000000000001".to_string(),
            transaction_hash: None,
            cost_at_mint: Decimal::ZERO,
            cost_at_mint_currency_code: "ETH".to_string(),
            cost_at_mint_usd: Decimal::ZERO,
        },
    )
    .await
    .unwrap();

    let action = queries::record_user_action(&db, &user.id, "DEFAULT", &NewUserActionDetails::NftMint, Some(&mint.id))
        .await
        .unwrap();
    let record = queries::load_user_action_record(&db, &action.id).await.unwrap();
    assert_eq!(record.nft_mint.unwrap().nft_slug, "swc-shield");
}

#[tokio::test]
async fn test_candidate_matches_replace_on_conflict() {
    let db = setup().await;
    queries::insert_candidate_match(&db, "ruben---gallego", "101", false, &["last_name"])
        .await
        .unwrap();
    queries::insert_candidate_match(&db, "ruben---gallego", "101", true, &[])
        .await
        .unwrap();

    let matches = queries::list_candidate_matches(&db).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].is_direct_match);
    assert!(matches[0].reason_codes.is_none());
}

#[tokio::test]
async fn test_crypto_addresses_are_lowercased() {
    let db = setup().await;
    let user = queries::create_user(&db, &new_user("Vitalik")).await.unwrap();
    queries::add_crypto_address(&db, &user.id, "0xABCDEF0000000000000000000000000000000001", true, None)
        .await
        .unwrap();

    let primary = queries::primary_crypto_address(&db, &user.id).await.unwrap().unwrap();
    assert_eq!(primary.crypto_address, "0xabcdef0000000000000000000000000000000001");
}
