//! Bulk pairing of DTSI people with DDHQ candidates.

use crate::matcher::{analyze_match, find_matching_ddhq_candidate, is_names_direct_match};
use crate::models::{DdhqCandidate, DtsiPerson, MatchReason};
use serde::Serialize;

/// A DTSI person paired with the DDHQ candidate that matched them.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedPair {
    pub dtsi_slug: String,
    pub ddhq_cand_id: String,
    /// Whether the names matched exactly after normalization.
    pub is_direct_match: bool,
    /// Name rules that accepted the pair. Empty for direct matches that only
    /// passed because of the exact name comparison.
    pub reasons: Vec<MatchReason>,
}

/// Result of matching a whole race or feed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    pub pairs: Vec<MatchedPair>,
    /// DTSI slugs with no candidate in the feed.
    pub unmatched_people: Vec<String>,
    /// Feed candidate ids that no DTSI person claimed.
    pub unmatched_candidates: Vec<String>,
}

impl MatchReport {
    pub fn direct_match_count(&self) -> usize {
        self.pairs.iter().filter(|pair| pair.is_direct_match).count()
    }
}

/// Matcher over a set of feed candidates.
pub struct CandidateMatcher;

impl CandidateMatcher {
    /// Pair every DTSI person with its DDHQ candidate.
    ///
    /// # Arguments
    /// * `people` - DTSI records to resolve
    /// * `candidates` - Candidates from the results feed
    ///
    /// # Returns
    /// Matched pairs in `people` order plus the records left on each side
    pub fn match_all(people: &[DtsiPerson], candidates: &[DdhqCandidate]) -> MatchReport {
        let mut report = MatchReport::default();
        let mut claimed = vec![false; candidates.len()];

        for person in people {
            let Some(candidate) = find_matching_ddhq_candidate(person, candidates) else {
                report.unmatched_people.push(person.slug.clone());
                continue;
            };

            if let Some(index) = candidates.iter().position(|c| std::ptr::eq(c, candidate)) {
                claimed[index] = true;
            }

            let is_direct_match = is_names_direct_match(person, candidate);
            let reasons = if is_direct_match {
                Vec::new()
            } else {
                analyze_match(person, candidate).reasons
            };

            report.pairs.push(MatchedPair {
                dtsi_slug: person.slug.clone(),
                ddhq_cand_id: candidate.cand_id.clone(),
                is_direct_match,
                reasons,
            });
        }

        report.unmatched_candidates = candidates
            .iter()
            .zip(claimed)
            .filter(|(_, claimed)| !claimed)
            .map(|(candidate, _)| candidate.cand_id.clone())
            .collect();

        report
    }
}
