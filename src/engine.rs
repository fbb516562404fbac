use chrono::Utc;
use tracing::{debug, info};
use crate::analyzers::graph::CollaborationGraph;
use crate::analyzers::knowledge_areas::label_members;
use crate::analyzers::members::MemberTable;
use crate::analyzers::network::analyze_network;
use crate::analyzers::ownership::OwnershipLedger;
use crate::analyzers::sentiment::{self, LexiconScorer, SentimentScorer};
use crate::analyzers::silo::{detect_silos, DEFAULT_SILO_THRESHOLD};
use crate::insights::{self, InsightThresholds};
use crate::scoring;
use crate::types::*;

/// Collaboration analysis over one dataset.
///
/// Holds configuration only. Every call to [`analyze`](Self::analyze) builds
/// its ledger, member table and graph from scratch, so one engine can be
/// shared across threads and repeated calls on the same input give the same
/// report.
#[derive(Debug, Clone, PartialEq)]
pub struct CollaborationEngine {
    silo_threshold: f64,
}

impl Default for CollaborationEngine {
    fn default() -> Self {
        CollaborationEngine { silo_threshold: DEFAULT_SILO_THRESHOLD }
    }
}

impl CollaborationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_silo_threshold(mut self, threshold: f64) -> Self {
        self.silo_threshold = threshold;
        self
    }

    pub fn silo_threshold(&self) -> f64 {
        self.silo_threshold
    }

    pub fn analyze(&self, data: &RawData) -> CollaborationReport {
        let mut ledger = OwnershipLedger::default();
        let mut members = MemberTable::default();
        let mut graph = CollaborationGraph::default();

        for commit in &data.commits {
            ledger.record_commit(commit);
            members.record_commit(commit);
        }
        for pr in &data.pull_requests {
            members.record_pull_request(pr, &mut graph);
        }
        debug!(
            "Tracked {} files, {} members, {} interaction edges",
            ledger.len(), members.len(), graph.edge_count()
        );

        let member_metrics = members.ranked_metrics();
        let knowledge_silos = detect_silos(&ledger, self.silo_threshold);
        let collaboration_network = analyze_network(&graph, &members);
        let team_health_metrics = scoring::team_health_metrics(&members, &ledger);
        let collaboration_score = scoring::collaboration_score(&collaboration_network, &team_health_metrics);
        let knowledge_distribution_score = scoring::knowledge_distribution_score(&team_health_metrics, &knowledge_silos);

        info!(
            "Collaboration analysis: {} members, {} silos, collaboration {:.3}, knowledge {:.3}",
            members.len(), knowledge_silos.len(), collaboration_score, knowledge_distribution_score
        );

        CollaborationReport {
            knowledge_silos_detected: !knowledge_silos.is_empty(),
            member_metrics,
            knowledge_silos,
            collaboration_network,
            team_health_metrics,
            collaboration_score,
            knowledge_distribution_score,
        }
    }
}

/// Full team-health run: collaboration analysis, optional sentiment,
/// knowledge areas, a health summary, recommendations and data warnings.
pub struct TeamHealthAnalyzer {
    engine: CollaborationEngine,
    scorer: Option<Box<dyn SentimentScorer>>,
    thresholds: InsightThresholds,
}

impl Default for TeamHealthAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamHealthAnalyzer {
    pub fn new() -> Self {
        TeamHealthAnalyzer {
            engine: CollaborationEngine::default(),
            scorer: Some(Box::new(LexiconScorer)),
            thresholds: InsightThresholds::default(),
        }
    }

    pub fn without_sentiment(mut self) -> Self {
        self.scorer = None;
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn SentimentScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn with_engine(mut self, engine: CollaborationEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_thresholds(mut self, thresholds: InsightThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn analyze(&self, data: &RawData) -> Report {
        let warnings = insights::data_warnings(data, &self.thresholds);
        let collaboration = self.engine.analyze(data);
        let sentiment = self.scorer.as_deref().map(|s| sentiment::summarize(s, data));
        let knowledge_areas = label_members(&collaboration);
        let summary = insights::summarize_health(&collaboration, sentiment.as_ref());
        let recommendations =
            insights::recommendations(&collaboration, sentiment.as_ref(), &summary, &self.thresholds);

        info!("Team health {:.3} ({})", summary.overall_team_health, summary.health_status);

        Report {
            meta: ReportMeta {
                repository: data.repository.clone()
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| "unnamed".to_string()),
                commit_count: data.commits.len(),
                pull_request_count: data.pull_requests.len(),
                analyzed_at: Utc::now().to_rfc3339(),
            },
            collaboration,
            knowledge_areas,
            sentiment,
            summary,
            recommendations,
            warnings,
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
