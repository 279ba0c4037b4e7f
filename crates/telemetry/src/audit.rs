//! Audit logging for match samples.

use chrono::Utc;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Serialize)]
struct AuditEntry<'a, T: Serialize> {
    recorded_at: String,
    kind: &'a str,
    payload: &'a T,
}

/// Append a JSON sample to the audit file, if one is configured.
///
/// # Arguments
/// * `path` - Path to the audit file; `None` disables auditing
/// * `kind` - Short label for the sample, e.g. "candidate_match"
/// * `payload` - Serializable payload to write
pub fn write_audit_sample<P: AsRef<Path>, T: Serialize>(
    path: Option<P>,
    kind: &str,
    payload: &T,
) -> anyhow::Result<()> {
    let Some(audit_path) = path else {
        return Ok(());
    };

    let entry = AuditEntry {
        recorded_at: Utc::now().to_rfc3339(),
        kind,
        payload,
    };
    let json = serde_json::to_string_pretty(&entry)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&audit_path)?;
    writeln!(file, "{}", json)?;
    info!(kind, "Wrote audit sample to {:?}", audit_path.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_appends_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        write_audit_sample(Some(&path), "candidate_match", &serde_json::json!({"slug": "a"})).unwrap();
        write_audit_sample(Some(&path), "candidate_match", &serde_json::json!({"slug": "b"})).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"slug\": \"a\""));
        assert!(contents.contains("\"slug\": \"b\""));
        assert_eq!(contents.matches("\"kind\": \"candidate_match\"").count(), 2);
    }

    #[test]
    fn test_no_path_is_noop() {
        write_audit_sample(None::<&Path>, "candidate_match", &1).unwrap();
    }
}
