use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use crate::error::{Error, Result};
use crate::types::Report;

/// Outputs the report as JSON. Writes to a file if given, otherwise stdout.
pub fn report_json(report: &Report, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        write_json(report, BufWriter::new(file)).map_err(|e| match e {
            Error::Io { source, .. } => Error::io(path, source),
            other => other,
        })?;
        eprintln!("✓ JSON report written to {}", path.display());
    } else {
        let stdout = std::io::stdout();
        write_json(report, BufWriter::new(stdout.lock()))?;
    }

    Ok(())
}

/// Pretty-printed report followed by a newline.
pub fn write_json<W: Write>(report: &Report, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io("<stdout>", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TeamHealthAnalyzer;
    use crate::types::{Commit, RawData};

    fn sample_report() -> Report {
        let data = RawData {
            repository: Some("demo".to_string()),
            commits: (0..3).map(|_| Commit {
                author: Some("alice".to_string()),
                files_changed: vec!["a.py".to_string()],
                message: "tweak".to_string(),
            }).collect(),
            ..Default::default()
        };
        TeamHealthAnalyzer::new().without_sentiment().analyze(&data)
    }

    #[test]
    fn test_json_uses_snake_case_keys() {
        let mut buf = Vec::new();
        write_json(&sample_report(), &mut buf).expect("write to Vec cannot fail");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("output should be valid JSON");

        let collab = &value["collaboration"];
        assert_eq!(collab["knowledge_silos_detected"], true);
        assert_eq!(collab["knowledge_silos"][0]["risk_level"], "critical");
        assert_eq!(collab["knowledge_silos"][0]["primary_owner"], "alice");
        assert!(collab["collaboration_network"]["density"].is_number());
        assert_eq!(collab["team_health_metrics"]["knowledge_distribution"], "poor");
        assert_eq!(collab["team_health_metrics"]["collaboration_balance"], "insufficient_data");
        assert!(value.get("sentiment").is_none(), "Disabled sentiment is omitted");
        assert_eq!(value["meta"]["repository"], "demo");
    }

    #[test]
    fn test_json_written_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        report_json(&sample_report(), Some(&path)).expect("report should be written");
        let text = std::fs::read_to_string(&path).expect("file should exist");
        assert!(text.ends_with('\n'));
        assert!(text.contains("\"member_metrics\""));
    }

    #[test]
    fn test_json_to_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("report.json");
        let err = report_json(&sample_report(), Some(&path)).unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "Expected an I/O error, got {err:?}");
    }
}
