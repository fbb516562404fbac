use std::collections::BTreeSet;
use tracing::info;
use crate::analyzers::members::round3;
use crate::types::*;

/// Cut-offs for advisory output. None of these change the scores.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightThresholds {
    /// Collaboration score below which collaboration is flagged.
    pub collaboration: f64,
    /// Communication health below which team tone is flagged.
    pub communication: f64,
    pub min_contributors: usize,
    pub min_commits: usize,
    pub min_pull_requests: usize,
    pub min_period_days: u32,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        InsightThresholds {
            collaboration:     0.5,
            communication:     0.5,
            min_contributors:  3,
            min_commits:       20,
            min_pull_requests: 5,
            min_period_days:   30,
        }
    }
}

/// Flags datasets too small for the scores to mean much. The analysis still
/// runs; these only tell the reader to interpret it with care.
pub fn data_warnings(data: &RawData, t: &InsightThresholds) -> Vec<String> {
    let contributors: BTreeSet<&str> = data.commits.iter().filter_map(|c| c.known_author()).collect();
    let mut warnings = Vec::new();

    if contributors.len() < t.min_contributors {
        warnings.push(format!(
            "Small team: only {} contributor(s) found in commits; at least {} are recommended for meaningful results",
            contributors.len(), t.min_contributors
        ));
    }
    if data.commits.len() < t.min_commits {
        warnings.push(format!(
            "Few commits: only {} found; at least {} are recommended for reliable sentiment results",
            data.commits.len(), t.min_commits
        ));
    }
    if data.pull_requests.len() < t.min_pull_requests {
        warnings.push(format!(
            "Few pull requests: only {} found; at least {} are recommended for collaboration analysis",
            data.pull_requests.len(), t.min_pull_requests
        ));
    }
    if let Some(days) = data.analysis_period_days.filter(|&d| d < t.min_period_days) {
        warnings.push(format!(
            "Short period: only {days} day(s) analyzed; at least {} are recommended for meaningful patterns",
            t.min_period_days
        ));
    }

    for w in &warnings {
        info!("{w}");
    }
    warnings
}

/// Sentiment mapped from [-1, 1] onto [0, 1]; zero when nothing was scored.
pub fn communication_health(sentiment: Option<&SentimentSummary>) -> f64 {
    match sentiment {
        Some(s) if s.overall.sample_size > 0 => round3((s.overall.overall_sentiment_score + 1.0) / 2.0),
        _ => 0.0,
    }
}

pub fn summarize_health(report: &CollaborationReport, sentiment: Option<&SentimentSummary>) -> HealthSummary {
    let communication = communication_health(sentiment);
    let collaboration = report.collaboration_score;
    let knowledge = report.knowledge_distribution_score;
    let overall = round3((communication + collaboration + knowledge) / 3.0);
    HealthSummary {
        overall_team_health: overall,
        communication_health: communication,
        collaboration_health: collaboration,
        knowledge_distribution: knowledge,
        health_status: health_status(overall),
    }
}

pub fn health_status(score: f64) -> HealthStatus {
    if score >= 0.8 { HealthStatus::Excellent }
    else if score >= 0.6 { HealthStatus::Good }
    else if score >= 0.4 { HealthStatus::Fair }
    else if score >= 0.2 { HealthStatus::NeedsAttention }
    else { HealthStatus::Critical }
}

pub fn recommendations(
    report: &CollaborationReport,
    sentiment: Option<&SentimentSummary>,
    summary: &HealthSummary,
    t: &InsightThresholds,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    let scored = sentiment.is_some_and(|s| s.overall.sample_size > 0);
    if scored && summary.communication_health < t.communication {
        recs.push(Recommendation {
            kind: RecommendationKind::Communication,
            priority: Priority::High,
            message: "Communication tone could improve; encourage more constructive, positive feedback in reviews".to_string(),
        });
    }

    if let Some(top) = report.knowledge_silos.first() {
        recs.push(Recommendation {
            kind: RecommendationKind::KnowledgeSharing,
            priority: Priority::Medium,
            message: format!(
                "{} knowledge silo(s) detected (largest: {} owns {:.0}% of {} file(s)); consider pair programming or cross-reviews",
                report.knowledge_silos.len(),
                top.primary_owner,
                top.ownership_percentage * 100.0,
                top.files.len(),
            ),
        });
    }

    if report.collaboration_score < t.collaboration {
        recs.push(Recommendation {
            kind: RecommendationKind::Collaboration,
            priority: Priority::Medium,
            message: "Collaboration between members could improve; consider regular syncs and spreading reviews".to_string(),
        });
    }

    let isolated = &report.collaboration_network.isolated_members;
    if !isolated.is_empty() {
        let names: Vec<&str> = isolated.iter().take(3).map(|s| s.as_str()).collect();
        let more = if isolated.len() > names.len() { format!(" and {} more", isolated.len() - names.len()) } else { String::new() };
        recs.push(Recommendation {
            kind: RecommendationKind::Isolation,
            priority: Priority::Low,
            message: format!("No review or comment interactions recorded for {}{more}; involve them in code review", names.join(", ")),
        });
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(author: &str) -> Commit {
        Commit { author: Some(author.to_string()), files_changed: Vec::new(), message: String::new() }
    }

    fn report(collaboration_score: f64, silos: usize, isolated: &[&str]) -> CollaborationReport {
        CollaborationReport {
            member_metrics: Vec::new(),
            knowledge_silos: (0..silos).map(|i| KnowledgeSilo {
                files: vec![format!("f{i}.rs")],
                primary_owner: format!("owner{i}"),
                ownership_percentage: 1.0,
                risk_level: RiskLevel::Critical,
                collaborators: Vec::new(),
            }).collect(),
            collaboration_network: CollaborationNetwork {
                isolated_members: isolated.iter().map(|s| s.to_string()).collect(),
                ..CollaborationNetwork::empty()
            },
            team_health_metrics: TeamHealthMetrics {
                team_size: 0,
                active_contributors: 0,
                review_participation_rate: 0.0,
                knowledge_distribution: KnowledgeDistribution::Unknown,
                collaboration_balance: CollaborationBalance::InsufficientData,
            },
            collaboration_score,
            knowledge_distribution_score: 0.0,
            knowledge_silos_detected: silos > 0,
        }
    }

    fn sentiment(score: f64, n: usize) -> SentimentSummary {
        SentimentSummary {
            overall: OverallSentiment { overall_sentiment_score: score, sample_size: n, ..Default::default() },
            communication_patterns: CommunicationPatterns {
                comment_sentiment_avg: 0.0,
                review_sentiment_avg: 0.0,
                communication_balance: CommunicationBalance::Balanced,
            },
        }
    }

    #[test]
    fn test_small_dataset_warnings() {
        let data = RawData {
            analysis_period_days: Some(7),
            commits: vec![commit("a"), commit("a"), commit("Unknown")],
            ..Default::default()
        };
        let w = data_warnings(&data, &InsightThresholds::default());
        assert_eq!(w.len(), 4, "Expected team, commit, PR and period warnings: {w:?}");
        assert!(w[0].contains("1 contributor"), "Unknown authors are not contributors: {}", w[0]);
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_warnings_stay_quiet_at_default_log_level() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();
        let data = RawData { commits: vec![commit("a")], ..Default::default() };

        let w = tracing::subscriber::with_default(subscriber, || data_warnings(&data, &InsightThresholds::default()));

        assert!(!w.is_empty());
        assert!(captured.0.lock().unwrap().is_empty(), "Report already lists the warnings; stderr should not repeat them");
    }

    #[test]
    fn test_no_warnings_for_large_dataset() {
        let t = InsightThresholds { min_contributors: 1, min_commits: 1, min_pull_requests: 0, ..Default::default() };
        let data = RawData { commits: vec![commit("a")], ..Default::default() };
        assert!(data_warnings(&data, &t).is_empty());
    }

    #[test]
    fn test_communication_health_mapping() {
        assert_eq!(communication_health(None), 0.0);
        assert_eq!(communication_health(Some(&sentiment(0.5, 0))), 0.0, "Nothing scored");
        assert_eq!(communication_health(Some(&sentiment(0.0, 3))), 0.5);
        assert_eq!(communication_health(Some(&sentiment(1.0, 3))), 1.0);
        assert_eq!(communication_health(Some(&sentiment(-1.0, 3))), 0.0);
    }

    #[test]
    fn test_health_status_thresholds() {
        assert_eq!(health_status(0.8), HealthStatus::Excellent);
        assert_eq!(health_status(0.79), HealthStatus::Good);
        assert_eq!(health_status(0.6), HealthStatus::Good);
        assert_eq!(health_status(0.4), HealthStatus::Fair);
        assert_eq!(health_status(0.2), HealthStatus::NeedsAttention);
        assert_eq!(health_status(0.19), HealthStatus::Critical);
    }

    #[test]
    fn test_summary_averages_three_dimensions() {
        let mut r = report(0.6, 0, &[]);
        r.knowledge_distribution_score = 0.9;
        let s = summarize_health(&r, Some(&sentiment(0.0, 10)));
        assert_eq!(s.overall_team_health, 0.667);
        assert_eq!(s.health_status, HealthStatus::Good);
    }

    #[test]
    fn test_recommendations_for_struggling_team() {
        let r = report(0.2, 2, &["a", "b", "c", "d"]);
        let sent = sentiment(-0.6, 5);
        let summary = summarize_health(&r, Some(&sent));
        let recs = recommendations(&r, Some(&sent), &summary, &InsightThresholds::default());
        let kinds: Vec<RecommendationKind> = recs.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![
            RecommendationKind::Communication,
            RecommendationKind::KnowledgeSharing,
            RecommendationKind::Collaboration,
            RecommendationKind::Isolation,
        ]);
        assert!(recs[1].message.contains("owner0"), "Largest silo owner should be named");
        assert!(recs[3].message.contains("and 1 more"));
    }

    #[test]
    fn test_no_recommendations_for_healthy_team() {
        let r = report(0.9, 0, &[]);
        let sent = sentiment(0.5, 5);
        let summary = summarize_health(&r, Some(&sent));
        assert!(recommendations(&r, Some(&sent), &summary, &InsightThresholds::default()).is_empty());
    }

    #[test]
    fn test_disabled_sentiment_skips_communication_advice() {
        let r = report(0.9, 0, &[]);
        let summary = summarize_health(&r, None);
        assert!(recommendations(&r, None, &summary, &InsightThresholds::default()).is_empty());
    }
}
