//! One-line descriptions for the recent-activity feed.

use serde::Serialize;
use swc_db::models::OPT_IN_TYPE_SWC_SIGN_UP;
use tracing::warn;

use crate::client_action::{SensitiveUserAction, SensitiveUserActionDetails};

const FALLBACK_TEXT: &str = "helped crypto";

/// Name and party of a politician an action was addressed to.
#[derive(Debug, Clone, Default)]
pub struct DtsiPersonSummary {
    pub first_name: String,
    pub last_name: String,
    pub political_affiliation_category: Option<String>,
}

impl DtsiPersonSummary {
    fn display(&self) -> String {
        let full_name = format!("{} {}", self.first_name, self.last_name);
        match self
            .political_affiliation_category
            .as_deref()
            .and_then(affiliation_abbreviation)
        {
            Some(abbreviation) => format!("{full_name} ({abbreviation})"),
            None => full_name,
        }
    }
}

fn affiliation_abbreviation(category: &str) -> Option<&'static str> {
    match category {
        "DEMOCRAT" => Some("D"),
        "REPUBLICAN" => Some("R"),
        "INDEPENDENT" => Some("I"),
        "LIBERTARIAN" => Some("L"),
        _ => None,
    }
}

/// Text rendered for one activity row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityText {
    pub main: String,
    pub sub: Option<String>,
}

impl ActivityText {
    fn main(main: String) -> Self {
        Self { main, sub: None }
    }
}

/// "STAND_WITH_CRYPTO" -> "Stand With Crypto".
pub fn format_donation_organization(recipient: &str) -> String {
    recipient
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Describe an action for the public activity feed.
///
/// # Arguments
/// * `action` - The projected action
/// * `display_name` - How the acting user is shown
/// * `recipients` - Politicians the call or email went to, in display order
pub fn recent_activity_text(
    action: &SensitiveUserAction,
    display_name: &str,
    recipients: &[DtsiPersonSummary],
) -> ActivityText {
    let people = recipients
        .iter()
        .map(DtsiPersonSummary::display)
        .collect::<Vec<_>>()
        .join(", ");

    match &action.details {
        SensitiveUserActionDetails::OptIn { opt_in_type } => {
            let text = if opt_in_type == OPT_IN_TYPE_SWC_SIGN_UP {
                "joined Stand With Crypto"
            } else {
                warn!(opt_in_type = %opt_in_type, "Unknown opt-in type in recent activity");
                FALLBACK_TEXT
            };
            ActivityText::main(format!("{display_name} {text}"))
        }
        SensitiveUserActionDetails::Call { .. } => ActivityText {
            main: format!("{display_name} called their representative"),
            sub: Some(people),
        },
        SensitiveUserActionDetails::Donation {
            amount,
            amount_currency_code,
            recipient,
            ..
        } => ActivityText {
            main: format!("{display_name} donated"),
            sub: Some(format!(
                "{} {} to {}",
                amount.normalize(),
                amount_currency_code,
                format_donation_organization(recipient)
            )),
        },
        SensitiveUserActionDetails::Email {
            user_action_email_recipients,
            ..
        } => {
            let plural = if user_action_email_recipients.len() > 1 { "s" } else { "" };
            ActivityText {
                main: format!("{display_name} emailed their representative{plural}"),
                sub: Some(people),
            }
        }
        SensitiveUserActionDetails::NftMint => {
            ActivityText::main(format!("{display_name} donated by minting an NFT"))
        }
        SensitiveUserActionDetails::Tweet => {
            ActivityText::main(format!("{display_name} tweeted in support of crypto"))
        }
        _ => {
            warn!(action_id = %action.id, action_type = %action.action_type(), "Unknown action type in recent activity");
            ActivityText::main(FALLBACK_TEXT.to_string())
        }
    }
}
