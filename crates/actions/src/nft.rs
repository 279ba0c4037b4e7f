//! NFT slugs and their contract configuration.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use tracing::info;

use crate::error::ConfigError;

/// NFTs the campaign has issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NftSlug {
    SwcShield,
    CallRepresentativeSept11,
    IAmAVoter,
    StandWithCryptoLegacy,
    StandWithCryptoSupporter,
    LaCryptoEvent20240304,
    PizzaDay20240522,
    VoterAttestation,
}

impl NftSlug {
    pub const ALL: [NftSlug; 8] = [
        NftSlug::SwcShield,
        NftSlug::CallRepresentativeSept11,
        NftSlug::IAmAVoter,
        NftSlug::StandWithCryptoLegacy,
        NftSlug::StandWithCryptoSupporter,
        NftSlug::LaCryptoEvent20240304,
        NftSlug::PizzaDay20240522,
        NftSlug::VoterAttestation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NftSlug::SwcShield => "swc-shield",
            NftSlug::CallRepresentativeSept11 => "call-representative-sept-11",
            NftSlug::IAmAVoter => "i-am-a-voter",
            NftSlug::StandWithCryptoLegacy => "stand-with-crypto-legacy",
            NftSlug::StandWithCryptoSupporter => "stand-with-crypto-supporter",
            NftSlug::LaCryptoEvent20240304 => "la-crypto-event-2024-03-04",
            NftSlug::PizzaDay20240522 => "pizza-day-2024-05-22",
            NftSlug::VoterAttestation => "voter-attestation",
        }
    }

    /// Environment variable holding this NFT's contract address.
    pub fn contract_address_env(&self) -> &'static str {
        match self {
            NftSlug::SwcShield => "SWC_SHIELD_NFT_CONTRACT_ADDRESS",
            NftSlug::CallRepresentativeSept11 => "CALL_REPRESENTATIVE_NFT_CONTRACT_ADDRESS",
            NftSlug::IAmAVoter => "I_AM_A_VOTER_NFT_CONTRACT_ADDRESS",
            NftSlug::StandWithCryptoLegacy => "STAND_WITH_CRYPTO_LEGACY_NFT_CONTRACT_ADDRESS",
            NftSlug::StandWithCryptoSupporter => "STAND_WITH_CRYPTO_SUPPORTER_NFT_CONTRACT_ADDRESS",
            NftSlug::LaCryptoEvent20240304 => "LA_CRYPTO_EVENT_2024_03_04_NFT_CONTRACT_ADDRESS",
            NftSlug::PizzaDay20240522 => "SWC_PIZZA_DAY_NFT_CONTRACT_ADDRESS",
            NftSlug::VoterAttestation => "SWC_VOTER_ATTESTATION_NFT_CONTRACT_ADDRESS",
        }
    }

    fn associated_wallet(&self) -> AssociatedWallet {
        match self {
            NftSlug::SwcShield | NftSlug::CallRepresentativeSept11 | NftSlug::StandWithCryptoSupporter => {
                AssociatedWallet::LegacyDeployer
            }
            _ => AssociatedWallet::SwcDotEth,
        }
    }
}

impl FromStr for NftSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NftSlug::ALL
            .into_iter()
            .find(|slug| slug.as_str() == s)
            .ok_or_else(|| format!("unknown NFT slug: {s}"))
    }
}

#[derive(Debug, Clone, Copy)]
enum AssociatedWallet {
    LegacyDeployer,
    SwcDotEth,
}

pub const LEGACY_NFT_DEPLOYER_WALLET_ENV: &str = "LEGACY_NFT_DEPLOYER_WALLET";
pub const SWC_DOT_ETH_WALLET_ENV: &str = "SWC_DOT_ETH_WALLET";

/// Contract address and the wallet that receives proceeds for one NFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NftContractMetadata {
    pub contract_address: Address,
    pub associated_wallet: Address,
}

/// Backend configuration for every NFT slug.
#[derive(Debug, Clone)]
pub struct NftBackendMetadata {
    by_slug: HashMap<NftSlug, NftContractMetadata>,
}

impl NftBackendMetadata {
    /// Load every contract and wallet address from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load addresses through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let legacy_deployer = required_address(&lookup, LEGACY_NFT_DEPLOYER_WALLET_ENV)?;
        let swc_dot_eth = required_address(&lookup, SWC_DOT_ETH_WALLET_ENV)?;

        let mut by_slug = HashMap::with_capacity(NftSlug::ALL.len());
        for slug in NftSlug::ALL {
            let contract_address = required_address(&lookup, slug.contract_address_env())?;
            let associated_wallet = match slug.associated_wallet() {
                AssociatedWallet::LegacyDeployer => legacy_deployer,
                AssociatedWallet::SwcDotEth => swc_dot_eth,
            };
            by_slug.insert(
                slug,
                NftContractMetadata {
                    contract_address,
                    associated_wallet,
                },
            );
        }

        info!("Loaded contract metadata for {} NFTs", by_slug.len());
        Ok(Self { by_slug })
    }

    pub fn get(&self, slug: NftSlug) -> Option<&NftContractMetadata> {
        self.by_slug.get(&slug)
    }

    /// Resolve which NFT a contract address belongs to.
    pub fn slug_for_contract(&self, contract_address: &Address) -> Option<NftSlug> {
        self.by_slug
            .iter()
            .find(|(_, metadata)| metadata.contract_address == *contract_address)
            .map(|(slug, _)| *slug)
    }
}

fn required_address<F>(lookup: &F, name: &str) -> Result<Address, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))?;

    Address::from_str(&value).map_err(|_| ConfigError::InvalidAddress {
        name: name.to_string(),
        value,
    })
}
