//! Metadata for transactional email templates.

use serde::Serialize;

use crate::nft::NftSlug;

/// Actions that emails can promote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailActiveAction {
    Call,
    Email,
    Donation,
    NftMint,
    VoterRegistration,
    VoterAttestation,
}

/// Actions whose completion emails show an NFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailEnabledActionNft {
    Call,
    VoterRegistration,
    VoterAttestation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionEmailMetadata {
    pub image: &'static str,
    pub text: &'static str,
    pub subtext: &'static str,
    pub button_label: &'static str,
    pub button_href: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NftImage {
    pub src: &'static str,
    pub alt: &'static str,
}

pub const SOCIAL_MEDIA_FACEBOOK_URL: &str = "https://www.facebook.com/standwithcrypto";
pub const SOCIAL_MEDIA_INSTAGRAM_URL: &str = "https://www.instagram.com/standwithcrypto";
pub const SOCIAL_MEDIA_TWITTER_URL: &str = "https://twitter.com/standwithcrypto";

impl EmailActiveAction {
    pub fn metadata(&self) -> ActionEmailMetadata {
        match self {
            EmailActiveAction::VoterRegistration => ActionEmailMetadata {
                image: "/actionTypeIcons/registerToVote.png",
                text: "Make sure you're registered to vote",
                subtext: "Double check your registration information or find out how to get registered.",
                button_label: "Register",
                button_href: "/action/voter-registration",
            },
            EmailActiveAction::VoterAttestation => ActionEmailMetadata {
                image: "/actionTypeIcons/voterAttestation.png",
                text: "Pledge to vote",
                subtext: "Pledge to vote for pro-crypto candidates",
                button_label: "Pledge",
                button_href: "/action/pledge",
            },
            EmailActiveAction::Email => ActionEmailMetadata {
                image: "/actionTypeIcons/email.png",
                text: "Email your Congressperson",
                subtext: "Make your voice heard. We make it easy.",
                button_label: "Send an email",
                button_href: "/action/email",
            },
            EmailActiveAction::Call => ActionEmailMetadata {
                image: "/actionTypeIcons/call.png",
                text: "Call your Congressperson",
                subtext: "The most effective way to make your voice heard. We'll show you how.",
                button_label: "Make a call",
                button_href: "/action/call",
            },
            EmailActiveAction::Donation => ActionEmailMetadata {
                image: "/actionTypeIcons/donate.png",
                text: "Donate to Stand With Crypto",
                subtext: "Support Stand With Crypto's aim to mobilize 52 million crypto advocates in the US.",
                button_label: "Donate",
                button_href: "/donate",
            },
            EmailActiveAction::NftMint => ActionEmailMetadata {
                image: "/actionTypeIcons/mintNFT.png",
                text: "Mint your Supporter NFT",
                subtext: "All mint proceeds are donated to the movement.",
                button_label: "Mint",
                button_href: "/action/nft-mint",
            },
        }
    }
}

impl EmailEnabledActionNft {
    /// Email action shown for a minted NFT, if that NFT is featured in emails.
    pub fn for_slug(slug: NftSlug) -> Option<Self> {
        match slug {
            NftSlug::CallRepresentativeSept11 => Some(EmailEnabledActionNft::Call),
            NftSlug::IAmAVoter => Some(EmailEnabledActionNft::VoterRegistration),
            NftSlug::VoterAttestation => Some(EmailEnabledActionNft::VoterAttestation),
            _ => None,
        }
    }

    pub fn image(&self) -> NftImage {
        match self {
            EmailEnabledActionNft::Call => NftImage {
                src: "/email/nfts/call.png",
                alt: "Call Action NFT",
            },
            EmailEnabledActionNft::VoterRegistration => NftImage {
                src: "/email/nfts/voter-registration.png",
                alt: "Voter Registration NFT",
            },
            EmailEnabledActionNft::VoterAttestation => NftImage {
                src: "/email/nfts/voter-attestation.png",
                alt: "Voter Attestation NFT",
            },
        }
    }
}
