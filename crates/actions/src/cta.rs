//! Call-to-action catalogue and next-action selection.

use serde::Serialize;
use swc_db::models::{PerformedUserAction, UserActionType};

/// Campaign name used for an action type when no specific campaign applies.
pub const DEFAULT_CAMPAIGN_NAME: &str = "DEFAULT";

/// Display metadata for an action row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserActionCta {
    pub action_type: UserActionType,
    pub image: &'static str,
    pub text: &'static str,
    pub subtext: &'static str,
    pub can_be_triggered_multiple_times: bool,
}

/// Action rows in the order they are offered to users.
pub const ORDERED_USER_ACTION_CTAS: [UserActionCta; 6] = [
    UserActionCta {
        action_type: UserActionType::OptIn,
        image: "/actionTypeIcons/optIn.svg",
        text: "Join Stand With Crypto",
        subtext: "Join over 100,000 advocates fighting to keep crypto in America.",
        can_be_triggered_multiple_times: false,
    },
    UserActionCta {
        action_type: UserActionType::Call,
        image: "/actionTypeIcons/call.svg",
        text: "Call your Congressperson",
        subtext: "The most effective way to make your voice heard.",
        can_be_triggered_multiple_times: true,
    },
    UserActionCta {
        action_type: UserActionType::Email,
        image: "/actionTypeIcons/email.svg",
        text: "Email your Congressperson",
        subtext: "We drafted an email for you. All you have to do is hit send.",
        can_be_triggered_multiple_times: true,
    },
    UserActionCta {
        action_type: UserActionType::Donation,
        image: "/actionTypeIcons/donate.svg",
        text: "Donate to Stand With Crypto",
        subtext: "Support our aim to mobilize 52 million crypto advocates in the U.S.",
        can_be_triggered_multiple_times: true,
    },
    UserActionCta {
        action_type: UserActionType::Tweet,
        image: "/actionTypeIcons/tweet.svg",
        text: "Share on Twitter/X",
        subtext: "Bring more people to the movement.",
        can_be_triggered_multiple_times: true,
    },
    UserActionCta {
        action_type: UserActionType::NftMint,
        image: "/actionTypeIcons/mintNFT.svg",
        text: "Mint your Supporter NFT",
        subtext: "All mint proceeds are donated to the movement.",
        can_be_triggered_multiple_times: true,
    },
];

/// Default campaign for an action type.
pub fn default_campaign_name(_action_type: UserActionType) -> &'static str {
    DEFAULT_CAMPAIGN_NAME
}

/// CTA metadata for an action type, if it is offered as a row.
pub fn cta_for(action_type: UserActionType) -> Option<&'static UserActionCta> {
    ORDERED_USER_ACTION_CTAS
        .iter()
        .find(|cta| cta.action_type == action_type)
}

/// The first action, after opt-in, the user has not yet performed in its default campaign.
pub fn next_action(performed: &[PerformedUserAction]) -> Option<&'static UserActionCta> {
    ORDERED_USER_ACTION_CTAS
        .iter()
        .filter(|cta| cta.action_type != UserActionType::OptIn)
        .find(|cta| {
            !performed.iter().any(|done| {
                done.action_type == cta.action_type
                    && done.campaign_name == default_campaign_name(cta.action_type)
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn performed(action_type: UserActionType, campaign_name: &str) -> PerformedUserAction {
        PerformedUserAction {
            action_type,
            campaign_name: campaign_name.to_string(),
        }
    }

    #[test]
    fn test_next_action_skips_opt_in() {
        let next = next_action(&[]).unwrap();
        assert_eq!(next.action_type, UserActionType::Call);
    }

    #[test]
    fn test_next_action_skips_performed_default_campaigns() {
        let done = [
            performed(UserActionType::Call, DEFAULT_CAMPAIGN_NAME),
            performed(UserActionType::Email, "SOME_OTHER_CAMPAIGN"),
        ];
        assert_eq!(next_action(&done).unwrap().action_type, UserActionType::Email);
    }

    #[test]
    fn test_next_action_none_when_everything_done() {
        let done: Vec<_> = ORDERED_USER_ACTION_CTAS
            .iter()
            .map(|cta| performed(cta.action_type, DEFAULT_CAMPAIGN_NAME))
            .collect();
        assert!(next_action(&done).is_none());
    }

    #[test]
    fn test_only_opt_in_is_single_use() {
        let single_use: Vec<_> = ORDERED_USER_ACTION_CTAS
            .iter()
            .filter(|cta| !cta.can_be_triggered_multiple_times)
            .map(|cta| cta.action_type)
            .collect();
        assert_eq!(single_use, vec![UserActionType::OptIn]);
        assert!(cta_for(UserActionType::LiveEvent).is_none());
    }
}
