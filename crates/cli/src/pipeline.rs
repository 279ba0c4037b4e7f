//! Candidate matching run shared by the CLI command and the HTTP route.

use serde::Serialize;
use std::path::Path;
use swc_db::{queries, DbPool};
use swc_matching::{analyze_match, CandidateMatcher, DdhqCandidate, DtsiPerson, MatchReport};
use swc_telemetry::{audit::write_audit_sample, Metrics};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct AuditMatch<'a> {
    dtsi_slug: &'a str,
    ddhq_cand_id: &'a str,
    is_direct_match: bool,
    reasons: Vec<&'static str>,
}

/// Match `people` against `candidates`, count the outcome and optionally persist it.
///
/// # Arguments
/// * `people` - DTSI records
/// * `candidates` - Results feed candidates
/// * `metrics` - Metrics collector
/// * `store` - Database to write matched pairs to, if any
/// * `sample_output_path` - Optional path for audit samples
pub async fn run_match(
    people: &[DtsiPerson],
    candidates: &[DdhqCandidate],
    metrics: &Metrics,
    store: Option<&DbPool>,
    sample_output_path: Option<&Path>,
) -> anyhow::Result<MatchReport> {
    let report = CandidateMatcher::match_all(people, candidates);

    metrics.inc_match_comparisons((people.len() * candidates.len()) as u64);
    metrics.inc_matches_found(report.pairs.len() as u64);
    metrics.inc_direct_matches(report.direct_match_count() as u64);
    record_rejections(people, candidates, &report, metrics);

    info!(
        people = people.len(),
        candidates = candidates.len(),
        matched = report.pairs.len(),
        direct = report.direct_match_count(),
        "Matched candidates"
    );

    for pair in &report.pairs {
        let reasons: Vec<&'static str> = pair.reasons.iter().map(|r| r.as_str()).collect();

        if let Some(db) = store {
            queries::insert_candidate_match(
                db,
                &pair.dtsi_slug,
                &pair.ddhq_cand_id,
                pair.is_direct_match,
                &reasons,
            )
            .await?;
        }

        let sample = AuditMatch {
            dtsi_slug: &pair.dtsi_slug,
            ddhq_cand_id: &pair.ddhq_cand_id,
            is_direct_match: pair.is_direct_match,
            reasons,
        };
        if let Err(e) = write_audit_sample(sample_output_path, "candidate_match", &sample) {
            warn!("Failed to write audit sample: {}", e);
        }
    }

    Ok(report)
}

// Rejections are only interesting for people who ended up unmatched.
fn record_rejections(
    people: &[DtsiPerson],
    candidates: &[DdhqCandidate],
    report: &MatchReport,
    metrics: &Metrics,
) {
    for person in people
        .iter()
        .filter(|p| report.unmatched_people.contains(&p.slug))
    {
        for candidate in candidates {
            if let Some(rejection) = analyze_match(person, candidate).rejection {
                metrics.inc_match_rejection(rejection.as_str());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(slug: &str, first: &str, last: &str) -> DtsiPerson {
        serde_json::from_value(serde_json::json!({
            "slug": slug,
            "firstName": first,
            "lastName": last,
            "firstNickname": "",
            "primaryRole": { "primaryState": "AZ", "primaryDistrict": "" }
        }))
        .unwrap()
    }

    fn candidate(id: &str, first: &str, last: &str) -> DdhqCandidate {
        serde_json::from_value(serde_json::json!({
            "cand_id": id,
            "first_name": first,
            "last_name": last,
            "state": "AZ"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_match_stores_pairs() {
        let db = DbPool::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        let metrics = Metrics::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let sample_path = dir.path().join("samples.jsonl");

        let people = vec![
            person("ruben---gallego", "Ruben", "Gallego"),
            person("satoshi---nakamoto", "Satoshi", "Nakamoto"),
        ];
        let candidates = vec![candidate("1", "Ruben", "Gallego"), candidate("2", "Kari", "Lake")];

        let report = run_match(&people, &candidates, &metrics, Some(&db), Some(sample_path.as_path()))
            .await
            .unwrap();
        assert_eq!(report.pairs.len(), 1);
        assert_eq!(report.unmatched_people, vec!["satoshi---nakamoto".to_string()]);

        let stored = queries::list_candidate_matches(&db).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].is_direct_match);

        let text = metrics.gather().unwrap();
        assert!(text.contains("swc_match_comparisons_total 4"));
        assert!(text.contains("swc_direct_matches_total 1"));
        assert!(text.contains(r#"swc_match_rejections_total{reason="no_name_match"} 2"#));
        assert!(std::fs::read_to_string(&sample_path).unwrap().contains("ruben---gallego"));
    }
}
