use crate::analyzers::members::{round3, MemberTable};
use crate::analyzers::ownership::OwnershipLedger;
use crate::types::*;

const DISTRIBUTION_EXCELLENT: f64 = 0.50;
const DISTRIBUTION_GOOD:      f64 = 0.70;
const DISTRIBUTION_FAIR:      f64 = 0.85;

const BALANCED_RANGE:          f64 = 0.3;
const SOMEWHAT_BALANCED_RANGE: f64 = 0.5;

const ISOLATION_PENALTY:     f64 = 0.1;
const CRITICAL_SILO_PENALTY: f64 = 0.2;

/// Team-wide counters and verdicts derived from the member table and the
/// ownership ledger. Every ratio falls back to a neutral value on empty input.
pub fn team_health_metrics(members: &MemberTable, ledger: &OwnershipLedger) -> TeamHealthMetrics {
    let team_size = members.len();
    let active_contributors = members.iter().filter(|(_, r)| r.is_active()).count();
    let reviewers = members.iter().filter(|(_, r)| r.reviews_given > 0).count();

    TeamHealthMetrics {
        team_size,
        active_contributors,
        review_participation_rate: ratio(reviewers, team_size),
        knowledge_distribution: knowledge_distribution(ledger),
        collaboration_balance: collaboration_balance(members),
    }
}

/// Mean dominant-owner share across files, mapped to a verdict.
pub fn knowledge_distribution(ledger: &OwnershipLedger) -> KnowledgeDistribution {
    let shares: Vec<f64> = ledger.owners().map(|o| o.share()).collect();
    if shares.is_empty() {
        return KnowledgeDistribution::Unknown;
    }
    let avg = shares.iter().sum::<f64>() / shares.len() as f64;
    if avg <= DISTRIBUTION_EXCELLENT { KnowledgeDistribution::Excellent }
    else if avg <= DISTRIBUTION_GOOD { KnowledgeDistribution::Good }
    else if avg <= DISTRIBUTION_FAIR { KnowledgeDistribution::Fair }
    else { KnowledgeDistribution::Poor }
}

/// Spread between the highest and lowest member collaboration scores.
pub fn collaboration_balance(members: &MemberTable) -> CollaborationBalance {
    if members.len() < 2 {
        return CollaborationBalance::InsufficientData;
    }
    let scores: Vec<f64> = members.iter().map(|(_, r)| r.collaboration_score()).collect();
    let max = scores.iter().copied().fold(f64::MIN, f64::max);
    let min = scores.iter().copied().fold(f64::MAX, f64::min);
    let range = max - min;
    if range <= BALANCED_RANGE { CollaborationBalance::Balanced }
    else if range <= SOMEWHAT_BALANCED_RANGE { CollaborationBalance::SomewhatUnbalanced }
    else { CollaborationBalance::Unbalanced }
}

/// Half network density, half review participation, minus a penalty per
/// isolated member; floored at 0.
pub fn collaboration_score(network: &CollaborationNetwork, health: &TeamHealthMetrics) -> f64 {
    let base = network.density * 0.5 + health.review_participation_rate * 0.5;
    let penalty = network.isolated_members.len() as f64 * ISOLATION_PENALTY;
    round3((base - penalty).max(0.0))
}

/// Knowledge-distribution verdict as a number, minus a penalty per critical
/// silo; floored at 0.
pub fn knowledge_distribution_score(health: &TeamHealthMetrics, silos: &[KnowledgeSilo]) -> f64 {
    let base = match health.knowledge_distribution {
        KnowledgeDistribution::Excellent => 1.0,
        KnowledgeDistribution::Good      => 0.8,
        KnowledgeDistribution::Fair      => 0.6,
        KnowledgeDistribution::Poor      => 0.3,
        KnowledgeDistribution::Unknown   => 0.0,
    };
    let critical = silos.iter().filter(|s| s.risk_level == RiskLevel::Critical).count();
    round3((base - critical as f64 * CRITICAL_SILO_PENALTY).max(0.0))
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 { 0.0 } else { round3(part as f64 / whole as f64) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::graph::CollaborationGraph;

    fn ledger(entries: &[(&str, &str, usize)]) -> OwnershipLedger {
        let mut l = OwnershipLedger::default();
        for &(file, author, n) in entries {
            for _ in 0..n { l.record(file, author); }
        }
        l
    }

    fn network(density: f64, isolated: usize) -> CollaborationNetwork {
        CollaborationNetwork {
            density,
            central_members: Vec::new(),
            isolated_members: (0..isolated).map(|i| format!("dev{i}")).collect(),
            clusters: Vec::new(),
            network_health: NetworkHealth::Poor,
        }
    }

    fn health(rate: f64, distribution: KnowledgeDistribution) -> TeamHealthMetrics {
        TeamHealthMetrics {
            team_size: 2,
            active_contributors: 2,
            review_participation_rate: rate,
            knowledge_distribution: distribution,
            collaboration_balance: CollaborationBalance::Balanced,
        }
    }

    fn silo(risk_level: RiskLevel) -> KnowledgeSilo {
        KnowledgeSilo {
            files: vec!["a.rs".to_string()],
            primary_owner: "dev".to_string(),
            ownership_percentage: 1.0,
            risk_level,
            collaborators: Vec::new(),
        }
    }

    #[test]
    fn test_empty_team_metrics_are_neutral() {
        let m = team_health_metrics(&MemberTable::default(), &OwnershipLedger::default());
        assert_eq!(m.team_size, 0);
        assert_eq!(m.active_contributors, 0);
        assert_eq!(m.review_participation_rate, 0.0);
        assert_eq!(m.knowledge_distribution, KnowledgeDistribution::Unknown);
        assert_eq!(m.collaboration_balance, CollaborationBalance::InsufficientData);
    }

    #[test]
    fn test_knowledge_distribution_thresholds() {
        // one file per case, share = top / total
        assert_eq!(knowledge_distribution(&ledger(&[("a", "x", 1), ("a", "y", 1)])), KnowledgeDistribution::Excellent);
        assert_eq!(knowledge_distribution(&ledger(&[("a", "x", 7), ("a", "y", 3)])), KnowledgeDistribution::Good);
        assert_eq!(knowledge_distribution(&ledger(&[("a", "x", 8), ("a", "y", 2)])), KnowledgeDistribution::Fair);
        assert_eq!(knowledge_distribution(&ledger(&[("a", "x", 9), ("a", "y", 1)])), KnowledgeDistribution::Poor);
        assert_eq!(knowledge_distribution(&OwnershipLedger::default()), KnowledgeDistribution::Unknown);
    }

    #[test]
    fn test_knowledge_distribution_averages_files() {
        // shares 1.0 and 0.5 average to 0.75 → fair
        let l = ledger(&[("a", "x", 4), ("b", "x", 1), ("b", "y", 1)]);
        assert_eq!(knowledge_distribution(&l), KnowledgeDistribution::Fair);
    }

    #[test]
    fn test_collaboration_balance_single_member() {
        let mut members = MemberTable::default();
        members.record_commit(&Commit {
            author: Some("solo".to_string()),
            files_changed: Vec::new(),
            message: String::new(),
        });
        assert_eq!(collaboration_balance(&members), CollaborationBalance::InsufficientData);
    }

    #[test]
    fn test_collaboration_balance_pair() {
        let mut members = MemberTable::default();
        let mut graph = CollaborationGraph::default();
        members.record_pull_request(&PullRequest {
            author: Some("a".to_string()),
            title: String::new(),
            reviews: vec![Review { author: Some("b".to_string()), state: "APPROVED".to_string(), body: String::new() }],
            comments: Vec::new(),
        }, &mut graph);
        // a: 0.04 + 0.08 + 0.01 = 0.13, b: 0.04 + 0.08 = 0.12
        assert_eq!(collaboration_balance(&members), CollaborationBalance::Balanced);
    }

    #[test]
    fn test_collaboration_score_two_person_review() {
        let score = collaboration_score(&network(1.0, 0), &health(0.5, KnowledgeDistribution::Unknown));
        assert_eq!(score, 0.75);
    }

    #[test]
    fn test_collaboration_score_floored() {
        let score = collaboration_score(&network(0.1, 5), &health(0.0, KnowledgeDistribution::Unknown));
        assert_eq!(score, 0.0, "Isolation penalty must not push the score below zero");
    }

    #[test]
    fn test_knowledge_score_mapping() {
        assert_eq!(knowledge_distribution_score(&health(0.0, KnowledgeDistribution::Excellent), &[]), 1.0);
        assert_eq!(knowledge_distribution_score(&health(0.0, KnowledgeDistribution::Good), &[]), 0.8);
        assert_eq!(knowledge_distribution_score(&health(0.0, KnowledgeDistribution::Fair), &[]), 0.6);
        assert_eq!(knowledge_distribution_score(&health(0.0, KnowledgeDistribution::Poor), &[]), 0.3);
        assert_eq!(knowledge_distribution_score(&health(0.0, KnowledgeDistribution::Unknown), &[]), 0.0);
    }

    #[test]
    fn test_knowledge_score_penalizes_only_critical_silos() {
        let silos = [silo(RiskLevel::Critical), silo(RiskLevel::High), silo(RiskLevel::Low)];
        let score = knowledge_distribution_score(&health(0.0, KnowledgeDistribution::Excellent), &silos);
        assert_eq!(score, 0.8);
    }

    #[test]
    fn test_knowledge_score_floored() {
        let silos = [silo(RiskLevel::Critical), silo(RiskLevel::Critical)];
        let score = knowledge_distribution_score(&health(0.0, KnowledgeDistribution::Poor), &silos);
        assert_eq!(score, 0.0);
    }
}
