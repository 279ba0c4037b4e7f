//! Candidate matching between DTSI political figures and DDHQ election-results records.

pub mod analyzer;
pub mod distance;
pub mod matcher;
pub mod models;
pub mod normalize;

pub use analyzer::{CandidateMatcher, MatchReport, MatchedPair};
pub use matcher::{
    analyze_match, find_matching_ddhq_candidate, find_matching_dtsi_person,
    is_names_direct_match, is_politician_match,
};
pub use models::{CandidateMatch, DdhqCandidate, DtsiPerson, MatchReason, MatchRejection, PrimaryRole};
pub use normalize::normalize_name;
