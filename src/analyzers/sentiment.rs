//! Lexicon-based sentiment scoring for commit messages, PR titles, review and
//! comment bodies, plus the per-dataset summary built from those scores.
//!
//! The scorer sits behind [`SentimentScorer`] so a pretrained classifier can
//! replace the built-in lexicon without touching the summary path.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use crate::types::*;

pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> SentimentScore;
}

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("url regex"));
static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[\w-]+").expect("mention regex"));
static NOISE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.,!?'()-]").expect("noise regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("space regex"));

// Phrases with a development-specific tone the general lexicon misses
static POSITIVE_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[
    r"\bgood\s+(?:job|work|catch|point)\b",
    r"\bnice\s+(?:work|job|fix|solution)\b",
    r"\b(?:well|great)\s+done\b",
    r"\b(?:looks|sounds)\s+good\b",
    r"\bthanks?\s+for\b",
    r"\bappreciate\s+(?:it|this|the)\b",
    r"\bclever\s+(?:solution|fix|approach)\b",
    r"\bclean\s+(?:code|implementation)\b",
    r"\bexcellent\s+(?:work|job|solution)\b",
]));

static NEGATIVE_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[
    r"\b(?:terrible|awful|horrible)\b",
    r"\bwhat\s+(?:the\s+hell|were\s+you\s+thinking)\b",
    r"\bdoesn'?t\s+(?:work|make\s+sense)\b",
    r"\b(?:completely\s+)?(?:wrong|broken|buggy)\b",
    r"\b(?:waste\s+of\s+time|pointless)\b",
    r"\b(?:stupid|dumb|ridiculous)\s+(?:mistake|error|approach)\b",
    r"\b(?:why\s+would\s+you|how\s+could\s+you)\b",
    r"\b(?:sloppy|messy)\s+code\b",
]));

static FRUSTRATION_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[
    r"\b(?:still\s+)?not\s+working\b",
    r"\b(?:keeps?\s+)?(?:failing|crashing)\b",
    r"\bcan'?t\s+(?:figure\s+out|understand)\b",
    r"\b(?:confusing|unclear)\b",
    r"\b(?:urgent|critical)\s+(?:fix|bug)\b",
    r"\b(?:blocking|blocked\s+by)\b",
]));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter()
        .filter_map(|p| Regex::new(&format!("(?i){p}")).ok())
        .collect()
}

// Valence on a -4..4 scale
static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| HashMap::from([
    ("good", 1.9), ("great", 3.1), ("nice", 1.8), ("excellent", 2.7), ("awesome", 3.1),
    ("amazing", 2.8), ("thanks", 1.9), ("thank", 1.5), ("love", 3.2), ("clean", 1.7),
    ("happy", 2.7), ("helpful", 1.8), ("appreciate", 1.7), ("perfect", 2.7), ("lgtm", 2.0),
    ("improve", 1.9), ("improved", 2.1), ("improvement", 1.8), ("better", 1.9), ("best", 3.2),
    ("agree", 1.5), ("cool", 1.3), ("elegant", 2.1), ("neat", 1.3), ("solid", 1.3),
    ("welcome", 2.0), ("glad", 2.0), ("correct", 1.3), ("clever", 1.9), ("brilliant", 2.8),
    ("bad", -2.5), ("terrible", -2.1), ("awful", -2.0), ("horrible", -2.5), ("wrong", -2.1),
    ("broken", -1.7), ("buggy", -1.6), ("fail", -2.3), ("failed", -2.3), ("failing", -2.3),
    ("crash", -1.7), ("crashes", -1.7), ("ugly", -2.3), ("hate", -2.7), ("stupid", -2.4),
    ("dumb", -2.3), ("messy", -1.5), ("sloppy", -1.9), ("confusing", -1.3), ("confused", -1.3),
    ("unclear", -1.0), ("problem", -1.7), ("annoying", -1.7), ("wtf", -2.8), ("worse", -2.1),
    ("worst", -3.1), ("ridiculous", -1.5), ("pointless", -1.6), ("useless", -1.8),
    ("frustrating", -2.2), ("regression", -1.5), ("blocked", -1.0), ("mess", -1.8),
]));

const NEGATIONS: &[&str] = &["not", "no", "never", "none", "nothing", "neither", "nor", "cannot"];
const INTENSIFIERS: &[&str] = &["very", "really", "extremely", "so", "super", "totally", "completely"];

const NEGATION_SCALAR:   f64 = -0.74;
const INTENSIFIER_BOOST: f64 = 0.293;
const NORMALIZATION:     f64 = 15.0;
const NEGATION_WINDOW:   usize = 3;

const POSITIVE_PHRASE_BONUS:    f64 = 0.2;
const NEGATIVE_PHRASE_PENALTY:  f64 = 0.3;
const FRUSTRATION_PENALTY:      f64 = 0.1;
const MAX_PHRASE_ADJUSTMENT:    f64 = 0.5;

const LABEL_THRESHOLD: f64 = 0.1;

/// Built-in word-valence scorer with development-phrase adjustment.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconScorer;

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> SentimentScore {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return SentimentScore::neutral();
        }
        let score = (lexicon_compound(&cleaned) + phrase_adjustment(&cleaned)).clamp(-1.0, 1.0);
        SentimentScore { score, label: label_for(score), confidence: score.abs() }
    }
}

/// Drops URLs, @mentions and stray symbols; collapses whitespace.
pub fn clean_text(text: &str) -> String {
    let text = URL_RE.replace_all(text, "");
    let text = MENTION_RE.replace_all(&text, "");
    let text = NOISE_RE.replace_all(&text, " ");
    SPACE_RE.replace_all(&text, " ").trim().to_string()
}

fn lexicon_compound(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .collect();

    let mut sum = 0.0;
    for (i, token) in tokens.iter().enumerate() {
        let Some(&valence) = LEXICON.get(*token) else { continue };
        let mut v = valence;
        if i > 0 && INTENSIFIERS.contains(&tokens[i - 1]) {
            v += INTENSIFIER_BOOST * v.signum();
        }
        let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
        if window.iter().any(|t| NEGATIONS.contains(t) || t.ends_with("n't")) {
            v *= NEGATION_SCALAR;
        }
        sum += v;
    }

    if sum == 0.0 { 0.0 } else { sum / (sum * sum + NORMALIZATION).sqrt() }
}

fn phrase_adjustment(text: &str) -> f64 {
    let hits = |set: &[Regex]| set.iter().filter(|re| re.is_match(text)).count() as f64;
    let adjustment = hits(&POSITIVE_PHRASES) * POSITIVE_PHRASE_BONUS
        - hits(&NEGATIVE_PHRASES) * NEGATIVE_PHRASE_PENALTY
        - hits(&FRUSTRATION_PHRASES) * FRUSTRATION_PENALTY;
    adjustment.clamp(-MAX_PHRASE_ADJUSTMENT, MAX_PHRASE_ADJUSTMENT)
}

pub fn label_for(score: f64) -> SentimentLabel {
    if score >= LABEL_THRESHOLD { SentimentLabel::Positive }
    else if score <= -LABEL_THRESHOLD { SentimentLabel::Negative }
    else { SentimentLabel::Neutral }
}

// ─── Summary ──────────────────────────────────────────────────────────────────

const HEAVY_TONE: f64 = 0.2;

/// Scores every commit message and PR title, and every non-blank review and
/// comment body, then aggregates the scores into ratios and averages.
pub fn summarize(scorer: &dyn SentimentScorer, data: &RawData) -> SentimentSummary {
    let mut all: Vec<SentimentScore> = Vec::new();
    let mut comments: Vec<f64> = Vec::new();
    let mut reviews: Vec<f64> = Vec::new();

    for commit in &data.commits {
        all.push(scorer.score(&commit.message));
    }
    for pr in &data.pull_requests {
        all.push(scorer.score(&pr.title));
        for comment in pr.comments.iter().filter(|c| !c.body.trim().is_empty()) {
            let s = scorer.score(&comment.body);
            comments.push(s.score);
            all.push(s);
        }
        for review in pr.reviews.iter().filter(|r| !r.body.trim().is_empty()) {
            let s = scorer.score(&review.body);
            reviews.push(s.score);
            all.push(s);
        }
    }

    let comment_avg = mean(&comments);
    let review_avg = mean(&reviews);
    let communication_balance = if comment_avg > HEAVY_TONE && review_avg > HEAVY_TONE {
        CommunicationBalance::PositiveHeavy
    } else if comment_avg < -HEAVY_TONE || review_avg < -HEAVY_TONE {
        CommunicationBalance::NegativeHeavy
    } else {
        CommunicationBalance::Balanced
    };

    SentimentSummary {
        overall: overall(&all),
        communication_patterns: CommunicationPatterns {
            comment_sentiment_avg: comment_avg,
            review_sentiment_avg: review_avg,
            communication_balance,
        },
    }
}

fn overall(scores: &[SentimentScore]) -> OverallSentiment {
    if scores.is_empty() {
        return OverallSentiment::default();
    }
    let n = scores.len() as f64;
    let share = |label: SentimentLabel| scores.iter().filter(|s| s.label == label).count() as f64 / n;
    OverallSentiment {
        overall_sentiment_score: scores.iter().map(|s| s.score).sum::<f64>() / n,
        positive_ratio: share(SentimentLabel::Positive),
        negative_ratio: share(SentimentLabel::Negative),
        neutral_ratio: share(SentimentLabel::Neutral),
        average_confidence: scores.iter().map(|s| s.confidence).sum::<f64>() / n,
        sample_size: scores.len(),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() { 0.0 } else { values.iter().sum::<f64>() / values.len() as f64 }
}
