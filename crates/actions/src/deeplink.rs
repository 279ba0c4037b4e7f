//! Deeplinks into the action flows.

use crate::locale::SupportedLocale;
use swc_db::models::UserActionType;

fn action_path(action_type: UserActionType) -> Option<&'static str> {
    let path = match action_type {
        UserActionType::OptIn => "/action/opt-in",
        UserActionType::Call => "/action/call",
        UserActionType::Email => "/action/email",
        UserActionType::Donation => "/action/donate",
        UserActionType::Tweet => "/action/tweet",
        UserActionType::NftMint => "/action/nft-mint",
        UserActionType::VoterRegistration
        | UserActionType::LiveEvent
        | UserActionType::TweetAtPerson => return None,
    };
    Some(path)
}

/// Localized deeplink that opens the flow for `action_type`, if it has one.
pub fn deeplink_url(action_type: UserActionType, locale: SupportedLocale) -> Option<String> {
    action_path(action_type).map(|path| format!("{}{}", locale.intl_prefix(), path))
}
