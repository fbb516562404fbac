use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ─── Input Records ────────────────────────────────────────────────────────────

/// Identity the ingestion layer uses when it cannot resolve an author.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Returns the identity if it is attributable: present, non-blank and not the
/// [`UNKNOWN_AUTHOR`] sentinel.
pub fn known_identity(id: Option<&str>) -> Option<&str> {
    let id = id?.trim();
    if id.is_empty() || id == UNKNOWN_AUTHOR { None } else { Some(id) }
}

// Treats an explicit JSON `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub files_changed: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
}

impl Commit {
    pub fn known_author(&self) -> Option<&str> {
        known_identity(self.author.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub state: String,
    #[serde(default, deserialize_with = "nullable")]
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub reviews: Vec<Review>,
    #[serde(default, deserialize_with = "nullable")]
    pub comments: Vec<Comment>,
}

impl PullRequest {
    pub fn known_author(&self) -> Option<&str> {
        known_identity(self.author.as_deref())
    }
}

/// Everything the ingestion layer hands to the engine for one repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawData {
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub analysis_period_days: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub commits: Vec<Commit>,
    #[serde(default, deserialize_with = "nullable")]
    pub pull_requests: Vec<PullRequest>,
}

// ─── Collaboration Results ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberMetrics {
    pub member: String,
    pub files_touched: Vec<String>,
    pub commits_count: usize,
    pub pr_count: usize,
    pub reviews_given: usize,
    pub reviews_received: usize,
    pub collaborators: Vec<String>,
    pub collaboration_score: f64,
}

/// Ordinal risk of a knowledge silo: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Critical => write!(f, "CRITICAL"),
            RiskLevel::High     => write!(f, "HIGH"),
            RiskLevel::Medium   => write!(f, "MEDIUM"),
            RiskLevel::Low      => write!(f, "LOW"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeSilo {
    pub files: Vec<String>,
    pub primary_owner: String,
    /// Primary owner's share of contributions, 0–1.
    pub ownership_percentage: f64,
    pub risk_level: RiskLevel,
    pub collaborators: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralMember {
    pub member: String,
    pub centrality: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkHealth {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl NetworkHealth {
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkHealth::Excellent => "excellent",
            NetworkHealth::Good      => "good",
            NetworkHealth::Fair      => "fair",
            NetworkHealth::Poor      => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaborationNetwork {
    pub density: f64,
    pub central_members: Vec<CentralMember>,
    pub isolated_members: Vec<String>,
    pub clusters: Vec<Vec<String>>,
    pub network_health: NetworkHealth,
}

impl CollaborationNetwork {
    /// The verdict when no interactions were recorded at all. Nobody is
    /// reported as isolated since there is no network to be isolated from.
    pub fn empty() -> Self {
        CollaborationNetwork {
            density: 0.0,
            central_members: Vec::new(),
            isolated_members: Vec::new(),
            clusters: Vec::new(),
            network_health: NetworkHealth::Poor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeDistribution {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
}

impl KnowledgeDistribution {
    pub fn as_str(self) -> &'static str {
        match self {
            KnowledgeDistribution::Excellent => "excellent",
            KnowledgeDistribution::Good      => "good",
            KnowledgeDistribution::Fair      => "fair",
            KnowledgeDistribution::Poor      => "poor",
            KnowledgeDistribution::Unknown   => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationBalance {
    Balanced,
    SomewhatUnbalanced,
    Unbalanced,
    InsufficientData,
}

impl CollaborationBalance {
    pub fn as_str(self) -> &'static str {
        match self {
            CollaborationBalance::Balanced           => "balanced",
            CollaborationBalance::SomewhatUnbalanced => "somewhat_unbalanced",
            CollaborationBalance::Unbalanced         => "unbalanced",
            CollaborationBalance::InsufficientData   => "insufficient_data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamHealthMetrics {
    pub team_size: usize,
    pub active_contributors: usize,
    pub review_participation_rate: f64,
    pub knowledge_distribution: KnowledgeDistribution,
    pub collaboration_balance: CollaborationBalance,
}

/// Output of one `CollaborationEngine::analyze` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaborationReport {
    pub member_metrics: Vec<MemberMetrics>,
    pub knowledge_silos: Vec<KnowledgeSilo>,
    pub collaboration_network: CollaborationNetwork,
    pub team_health_metrics: TeamHealthMetrics,
    pub collaboration_score: f64,
    pub knowledge_distribution_score: f64,
    pub knowledge_silos_detected: bool,
}

// ─── Sentiment ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentScore {
    /// -1.0 (very negative) to 1.0 (very positive).
    pub score: f64,
    pub label: SentimentLabel,
    /// 0.0 to 1.0.
    pub confidence: f64,
}

impl SentimentScore {
    pub fn neutral() -> Self {
        SentimentScore { score: 0.0, label: SentimentLabel::Neutral, confidence: 0.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverallSentiment {
    pub overall_sentiment_score: f64,
    pub positive_ratio: f64,
    pub negative_ratio: f64,
    pub neutral_ratio: f64,
    pub average_confidence: f64,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationBalance {
    PositiveHeavy,
    NegativeHeavy,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunicationPatterns {
    pub comment_sentiment_avg: f64,
    pub review_sentiment_avg: f64,
    pub communication_balance: CommunicationBalance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub overall: OverallSentiment,
    pub communication_patterns: CommunicationPatterns,
}

// ─── Insights ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    NeedsAttention,
    Critical,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Excellent      => write!(f, "EXCELLENT"),
            HealthStatus::Good           => write!(f, "GOOD"),
            HealthStatus::Fair           => write!(f, "FAIR"),
            HealthStatus::NeedsAttention => write!(f, "NEEDS ATTENTION"),
            HealthStatus::Critical       => write!(f, "CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    pub overall_team_health: f64,
    pub communication_health: f64,
    pub collaboration_health: f64,
    pub knowledge_distribution: f64,
    pub health_status: HealthStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Communication,
    KnowledgeSharing,
    Collaboration,
    Isolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub message: String,
}

// ─── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub repository: String,
    pub commit_count: usize,
    pub pull_request_count: usize,
    pub analyzed_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub collaboration: CollaborationReport,
    pub knowledge_areas: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentSummary>,
    pub summary: HealthSummary,
    pub recommendations: Vec<Recommendation>,
    pub warnings: Vec<String>,
}
