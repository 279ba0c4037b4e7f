//! Name-matching heuristics between DTSI people and DDHQ candidates.

use crate::distance::within_threshold;
use crate::models::{CandidateMatch, DdhqCandidate, DtsiPerson, MatchReason, MatchRejection};
use crate::normalize::normalize_name;
use tracing::{debug, debug_span};

/// Last names whose DTSI and DDHQ districts are known to disagree.
///
/// The district gate is skipped for these people.
pub const DISTRICT_OVERRIDE_LAST_NAMES: [&str; 7] =
    ["boebert", "banks", "slotkin", "kim", "allred", "curtis", "gallego"];

/// Whether the person's legal or nickname-based full name equals the candidate's
/// full name after normalization.
pub fn is_names_direct_match(person: &DtsiPerson, candidate: &DdhqCandidate) -> bool {
    let dtsi_name = full_name(&person.first_name, &person.last_name);
    let dtsi_nickname = full_name(&person.first_nickname, &person.last_name);
    let ddhq_name = full_name(&candidate.first_name, &candidate.last_name);

    dtsi_name == ddhq_name || dtsi_nickname == ddhq_name
}

/// Fuzzy match a DTSI person against a DDHQ candidate.
pub fn is_politician_match(person: &DtsiPerson, candidate: &DdhqCandidate) -> bool {
    analyze_match(person, candidate).is_match
}

/// Run the fuzzy match and report which rules fired.
///
/// # Arguments
/// * `person` - Canonical DTSI record
/// * `candidate` - Record from the results feed
///
/// # Returns
/// The match decision together with the passing name rules and, when the
/// pair was not matched, the reason it was rejected
pub fn analyze_match(person: &DtsiPerson, candidate: &DdhqCandidate) -> CandidateMatch {
    let state = candidate
        .state
        .as_deref()
        .unwrap_or_else(|| person.primary_state());
    let span = debug_span!("politician_match", state, dtsi = %person.slug, ddhq = %candidate.cand_id);
    let _guard = span.enter();

    let dtsi_name = full_name(&person.first_name, &person.last_name);
    let dtsi_nickname = full_name(&person.first_nickname, &person.last_name);
    let dtsi_last_name = normalize_name(&person.last_name);
    let ddhq_name = full_name(&candidate.first_name, &candidate.last_name);
    let ddhq_last_name = normalize_name(&candidate.last_name);

    if !is_district_override(&dtsi_last_name)
        && person.primary_district().to_lowercase() != candidate.district().to_lowercase()
    {
        debug!(
            dtsi_district = person.primary_district(),
            ddhq_district = candidate.district(),
            "District mismatch between DTSI {} and DDHQ {}",
            dtsi_name,
            ddhq_name
        );
        return CandidateMatch {
            is_match: false,
            reasons: Vec::new(),
            rejection: Some(MatchRejection::DistrictMismatch),
        };
    }

    let mut reasons = Vec::new();
    if within_threshold(&dtsi_name, &ddhq_name) {
        reasons.push(MatchReason::FullName);
    }
    if within_threshold(&dtsi_nickname, &ddhq_name) {
        reasons.push(MatchReason::Nickname);
    }
    if within_threshold(&dtsi_last_name, &ddhq_last_name) {
        reasons.push(MatchReason::LastName);
    }
    if last_name_parts_match(person, candidate) {
        reasons.push(MatchReason::LastNameParts);
    }

    let mut rejection = reasons.is_empty().then_some(MatchRejection::NoNameMatch);

    if let Some(ddhq_state) = candidate.state.as_deref() {
        if rejection.is_none() && person.primary_state().to_lowercase() != ddhq_state.to_lowercase() {
            rejection = Some(MatchRejection::StateMismatch);
        }
    }

    let is_match = rejection.is_none();
    debug!(?reasons, ?rejection, is_match, "Compared DTSI {} with DDHQ {}", dtsi_name, ddhq_name);

    CandidateMatch {
        is_match,
        reasons,
        rejection,
    }
}

/// Find the DDHQ candidate for a DTSI person, preferring an exact name match.
pub fn find_matching_ddhq_candidate<'a>(
    person: &DtsiPerson,
    candidates: &'a [DdhqCandidate],
) -> Option<&'a DdhqCandidate> {
    candidates
        .iter()
        .find(|candidate| is_names_direct_match(person, candidate))
        .or_else(|| {
            candidates
                .iter()
                .find(|candidate| is_politician_match(person, candidate))
        })
}

/// Find the DTSI person for a DDHQ candidate, preferring an exact name match.
pub fn find_matching_dtsi_person<'a>(
    candidate: &DdhqCandidate,
    people: &'a [DtsiPerson],
) -> Option<&'a DtsiPerson> {
    people
        .iter()
        .find(|person| is_names_direct_match(person, candidate))
        .or_else(|| people.iter().find(|person| is_politician_match(person, candidate)))
}

fn full_name(first: &str, last: &str) -> String {
    normalize_name(&format!("{first} {last}"))
}

fn is_district_override(normalized_last_name: &str) -> bool {
    DISTRICT_OVERRIDE_LAST_NAMES.contains(&normalized_last_name)
}

/// First names within threshold and at least one pair of last-name parts within threshold.
///
/// Last names are split on whitespace and hyphens, so `Garcia Lopez` can
/// match `Lopez` when the first names agree.
fn last_name_parts_match(person: &DtsiPerson, candidate: &DdhqCandidate) -> bool {
    let dtsi_first_name = normalize_name(&person.first_name);
    let ddhq_first_name = normalize_name(&candidate.first_name);
    if !within_threshold(&dtsi_first_name, &ddhq_first_name) {
        return false;
    }

    let dtsi_parts = last_name_parts(&person.last_name);
    let ddhq_parts = last_name_parts(&candidate.last_name);

    dtsi_parts
        .iter()
        .any(|dtsi_part| ddhq_parts.iter().any(|ddhq_part| within_threshold(dtsi_part, ddhq_part)))
}

fn last_name_parts(last_name: &str) -> Vec<String> {
    last_name
        .split(|c: char| c == '-' || c.is_whitespace())
        .map(normalize_name)
        .collect()
}
