use serde::Deserialize;
use std::path::{Path, PathBuf};
use crate::analyzers::silo::DEFAULT_SILO_THRESHOLD;
use crate::error::{Error, Result};
use crate::insights::InsightThresholds;

/// File name looked up in the working directory when `--config` is not given.
pub const LOCAL_CONFIG_FILE: &str = ".team-pulse.yml";

/// All settings that can be placed in a .team-pulse.yml config file.
/// Every field is optional; omitted fields fall back to CLI defaults.
/// CLI flags always take precedence over values set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamPulseConfig {
    // Output defaults (overridden by the corresponding CLI flag)
    pub format: Option<String>,
    pub output: Option<String>,
    pub top: Option<usize>,
    pub sentiment: Option<bool>,

    pub thresholds: Option<ConfigThresholds>,
    pub minimums: Option<ConfigMinimums>,
}

/// Score cut-offs. `knowledge_silo` changes which files count as silos; the
/// others only decide when a recommendation is emitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigThresholds {
    pub knowledge_silo: Option<f64>,
    pub collaboration: Option<f64>,
    pub communication: Option<f64>,
}

/// Dataset sizes below which a data-sufficiency warning is emitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigMinimums {
    pub contributors: Option<usize>,
    pub commits: Option<usize>,
    pub pull_requests: Option<usize>,
    pub period_days: Option<u32>,
}

impl TeamPulseConfig {
    /// Silo threshold from the file, or the built-in default.
    pub fn silo_threshold(&self) -> f64 {
        self.thresholds.as_ref()
            .and_then(|t| t.knowledge_silo)
            .unwrap_or(DEFAULT_SILO_THRESHOLD)
    }

    /// Insight thresholds with every configured value applied over the defaults.
    pub fn insight_thresholds(&self) -> InsightThresholds {
        let mut out = InsightThresholds::default();
        if let Some(t) = &self.thresholds {
            if let Some(v) = t.collaboration { out.collaboration = v; }
            if let Some(v) = t.communication { out.communication = v; }
        }
        if let Some(m) = &self.minimums {
            if let Some(v) = m.contributors  { out.min_contributors = v; }
            if let Some(v) = m.commits       { out.min_commits = v; }
            if let Some(v) = m.pull_requests { out.min_pull_requests = v; }
            if let Some(v) = m.period_days   { out.min_period_days = v; }
        }
        out
    }

    /// Validates semantic constraints that serde cannot enforce.
    ///
    /// Returns a human-readable error describing exactly what is wrong and what
    /// values are accepted. Called automatically by [`load_config`].
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(fmt) = &self.format {
            match fmt.as_str() {
                "terminal" | "json" => {}
                other => {
                    return Err(format!(
                        "Invalid 'format' value: \"{other}\". \
                         Expected one of: \"terminal\", \"json\""
                    ))
                }
            }
        }

        if let Some(0) = self.top {
            return Err("Invalid 'top' value: 0. Must be 1 or greater".to_string());
        }

        if let Some(t) = &self.thresholds {
            if let Some(v) = t.knowledge_silo {
                if !v.is_finite() || v <= 0.0 || v > 1.0 {
                    return Err(format!(
                        "Invalid threshold 'thresholds.knowledge_silo': {v}. \
                         Must be greater than 0 and at most 1 (e.g. 0.8 = one person made 80% of the commits)"
                    ));
                }
            }
            let scores: &[(&str, Option<f64>)] = &[
                ("collaboration", t.collaboration),
                ("communication", t.communication),
            ];
            for (name, val) in scores {
                if let Some(v) = val {
                    if !v.is_finite() || !(0.0..=1.0).contains(v) {
                        return Err(format!(
                            "Invalid threshold 'thresholds.{name}': {v}. Must be between 0 and 1"
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Reads, parses, and validates a YAML config file from `path`.
pub fn load_config(path: &Path) -> Result<TeamPulseConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let cfg: TeamPulseConfig = serde_yaml::from_str(&content)
        .map_err(|source| Error::Yaml { path: path.to_path_buf(), source })?;
    cfg.validate()
        .map_err(|e| Error::Config(format!("Config file '{}': {e}", path.display())))?;
    Ok(cfg)
}

/// First existing config file: `./.team-pulse.yml`, then
/// `<config dir>/team-pulse/config.yml`.
pub fn discover_config() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|d| d.join("team-pulse").join("config.yml"))
        .filter(|p| p.is_file())
}

/// Annotated YAML template, printed by `--generate-config`.
pub static TEMPLATE: &str = r#"# team-pulse configuration file
# Generated by: team-pulse --generate-config
#
# All settings are optional. Omit any field to use the built-in default.
# CLI flags always take precedence over values in this file.
# Save this file as .team-pulse.yml in the directory you run from, or as
# team-pulse/config.yml in your user config directory, or pass it explicitly:
#
#   team-pulse --config .team-pulse.yml dataset.json

# ── Output ─────────────────────────────────────────────────────────────────────

# Output format: terminal, json
# format: "terminal"

# Output file path. For several datasets the dataset name is appended.
# output: "team-health.json"

# Number of members and silos listed in the terminal report.
# top: 20

# Score the tone of commit messages, PR titles, reviews and comments.
# sentiment: true

# ── Thresholds ─────────────────────────────────────────────────────────────────

# thresholds:
#   knowledge_silo: 0.80   # Owner share at which a file becomes a silo (0-1]
#   collaboration:  0.5    # Collaboration score below which it is flagged
#   communication:  0.5    # Communication health below which tone is flagged

# ── Data sufficiency ───────────────────────────────────────────────────────────
# Smaller datasets are still analyzed but carry a warning.

# minimums:
#   contributors:  3
#   commits:       20
#   pull_requests: 5
#   period_days:   30
"#;

/// Prints the config template to stdout, or writes it to `output_path` if given.
pub fn print_template(output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => std::fs::write(path, TEMPLATE).map_err(|e| Error::io(path, e)),
        None => {
            print!("{TEMPLATE}");
            Ok(())
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_is_valid_yaml() {
        let result: std::result::Result<TeamPulseConfig, _> = serde_yaml::from_str(TEMPLATE);
        assert!(
            result.is_ok(),
            "TEMPLATE must parse as valid TeamPulseConfig: {:?}",
            result.err()
        );
        let cfg = result.unwrap();
        // everything is commented out in the template
        assert!(cfg.format.is_none());
        assert!(cfg.thresholds.is_none());
        assert!(cfg.minimums.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg: TeamPulseConfig = serde_yaml::from_str("{}").expect("empty map should parse");
        assert_eq!(cfg.silo_threshold(), DEFAULT_SILO_THRESHOLD);
        assert_eq!(cfg.insight_thresholds(), InsightThresholds::default());
    }

    #[test]
    fn test_thresholds_and_minimums_parsed() {
        let yaml = "thresholds:\n  knowledge_silo: 0.9\n  communication: 0.4\nminimums:\n  commits: 50\n";
        let cfg: TeamPulseConfig = serde_yaml::from_str(yaml).expect("should parse");
        assert!((cfg.silo_threshold() - 0.9).abs() < 1e-9);
        let t = cfg.insight_thresholds();
        assert!((t.communication - 0.4).abs() < 1e-9);
        assert_eq!(t.collaboration, 0.5, "Unset thresholds keep their default");
        assert_eq!(t.min_commits, 50);
        assert_eq!(t.min_contributors, 3);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<TeamPulseConfig, _> = serde_yaml::from_str("weights:\n  churn: 1\n");
        assert!(result.is_err(), "Unknown fields should be rejected by deny_unknown_fields");
        let nested: std::result::Result<TeamPulseConfig, _> = serde_yaml::from_str("thresholds:\n  silo: 0.5\n");
        assert!(nested.is_err(), "Unknown nested fields should be rejected too");
    }

    #[test]
    fn test_validate_invalid_format_rejected() {
        let cfg: TeamPulseConfig = serde_yaml::from_str("format: \"html\"\n").expect("should parse");
        let msg = cfg.validate().unwrap_err();
        assert!(msg.contains("format"), "Error should mention 'format': {msg}");
        assert!(msg.contains("terminal") && msg.contains("json"), "Error should list valid values: {msg}");
    }

    #[test]
    fn test_validate_zero_top_rejected() {
        let cfg: TeamPulseConfig = serde_yaml::from_str("top: 0\n").expect("should parse");
        let msg = cfg.validate().unwrap_err();
        assert!(msg.contains("top"), "Error should mention 'top': {msg}");
    }

    #[test]
    fn test_validate_silo_threshold_range() {
        for bad in ["0", "-0.2", "1.5"] {
            let yaml = format!("thresholds:\n  knowledge_silo: {bad}\n");
            let cfg: TeamPulseConfig = serde_yaml::from_str(&yaml).expect("should parse");
            let msg = cfg.validate().unwrap_err();
            assert!(msg.contains("knowledge_silo"), "Error for {bad} should name the field: {msg}");
        }
        let cfg: TeamPulseConfig = serde_yaml::from_str("thresholds:\n  knowledge_silo: 1.0\n").expect("should parse");
        assert!(cfg.validate().is_ok(), "1.0 means only sole owners are silos");
    }

    #[test]
    fn test_validate_score_thresholds_range() {
        for field in ["collaboration", "communication"] {
            let yaml = format!("thresholds:\n  {field}: 1.2\n");
            let cfg: TeamPulseConfig = serde_yaml::from_str(&yaml).expect("should parse");
            let msg = cfg.validate().unwrap_err();
            assert!(msg.contains(field), "Error for '{field}' should name the field: {msg}");
        }
    }

    #[test]
    fn test_load_config_reports_invalid_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "top: 0\n").expect("write");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("bad.yml"));
    }

    #[test]
    fn test_load_config_reports_yaml_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.yml");
        std::fs::write(&path, "top: [unclosed\n").expect("write");
        assert!(matches!(load_config(&path).unwrap_err(), Error::Yaml { .. }));
    }

    #[test]
    fn test_print_template_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("generated.yml");
        print_template(Some(&path)).expect("template should be written");
        let cfg = load_config(&path).expect("generated template should load");
        assert!(cfg.top.is_none());
    }

    // ── Example file test ─────────────────────────────────────────────────────

    #[test]
    fn test_load_example_file() {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let example_path = manifest_dir.join(".team-pulse.example.yml");

        let cfg = load_config(&example_path).unwrap_or_else(|e| {
            panic!("Example config file should parse and validate successfully: {e}")
        });

        assert_eq!(cfg.format.as_deref(), Some("terminal"), "format should match example file");
        assert_eq!(cfg.top, Some(15), "top should match example file");
        assert_eq!(cfg.sentiment, Some(true), "sentiment should match example file");
        assert!((cfg.silo_threshold() - 0.85).abs() < 1e-9, "knowledge_silo should be 0.85");

        let t = cfg.insight_thresholds();
        assert!((t.collaboration - 0.6).abs() < 1e-9, "collaboration threshold should be 0.6");
        assert!((t.communication - 0.5).abs() < 1e-9, "communication threshold should be 0.5");
        assert_eq!(t.min_contributors, 3);
        assert_eq!(t.min_commits, 30);
        assert_eq!(t.min_pull_requests, 10);
        assert_eq!(t.min_period_days, 60);
    }
}
