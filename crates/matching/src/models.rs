//! Candidate records and match results.

use serde::{Deserialize, Serialize};

/// A political figure from the DTSI dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtsiPerson {
    #[serde(default)]
    pub slug: String,
    pub first_name: String,
    pub last_name: String,
    /// Preferred first name, e.g. `Bob` for `Robert`. Empty when the person has none.
    #[serde(default)]
    pub first_nickname: String,
    #[serde(default)]
    pub primary_role: Option<PrimaryRole>,
}

/// The role a DTSI person is running for or holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryRole {
    #[serde(default)]
    pub primary_state: Option<String>,
    #[serde(default)]
    pub primary_district: Option<String>,
}

impl DtsiPerson {
    pub fn primary_state(&self) -> &str {
        self.primary_role
            .as_ref()
            .and_then(|role| role.primary_state.as_deref())
            .unwrap_or("")
    }

    pub fn primary_district(&self) -> &str {
        self.primary_role
            .as_ref()
            .and_then(|role| role.primary_district.as_deref())
            .unwrap_or("")
    }
}

/// A candidate record from the DDHQ election-results feed.
///
/// Race results carry a district but no state; presidential voting data
/// carries a state. `state` is `Some` exactly when the record has state data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DdhqCandidate {
    #[serde(default, alias = "cand_id")]
    pub cand_id: String,
    #[serde(alias = "first_name")]
    pub first_name: String,
    #[serde(alias = "last_name")]
    pub last_name: String,
    #[serde(default, alias = "party_name")]
    pub party_name: Option<String>,
    #[serde(default)]
    pub votes: Option<u64>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl DdhqCandidate {
    pub fn district(&self) -> &str {
        self.district.as_deref().unwrap_or("")
    }
}

/// Which name rule accepted a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    FullName,
    Nickname,
    LastName,
    LastNameParts,
}

impl MatchReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchReason::FullName => "full_name",
            MatchReason::Nickname => "nickname",
            MatchReason::LastName => "last_name",
            MatchReason::LastNameParts => "last_name_parts",
        }
    }
}

/// Why a pair was not matched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchRejection {
    DistrictMismatch,
    StateMismatch,
    NoNameMatch,
}

impl MatchRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRejection::DistrictMismatch => "district_mismatch",
            MatchRejection::StateMismatch => "state_mismatch",
            MatchRejection::NoNameMatch => "no_name_match",
        }
    }
}

/// Outcome of comparing one DTSI person with one DDHQ candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateMatch {
    pub is_match: bool,
    /// Every name rule that passed, even when a later gate rejected the pair.
    pub reasons: Vec<MatchReason>,
    pub rejection: Option<MatchRejection>,
}
