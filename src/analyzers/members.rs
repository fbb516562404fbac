use std::collections::{BTreeMap, BTreeSet};
use crate::analyzers::graph::{CollaborationGraph, COMMENT_WEIGHT, REVIEW_WEIGHT};
use crate::types::{known_identity, Commit, MemberMetrics, PullRequest};

// Saturation points of the per-member collaboration score
const REVIEWS_FOR_FULL_PARTICIPATION: f64 = 10.0;
const COLLABORATORS_FOR_FULL_BREADTH: f64 = 5.0;
const ACTIVITY_FOR_FULL_LEVEL:        f64 = 20.0;

/// Aggregate counters for one contributor within one analysis run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberRecord {
    pub commits: usize,
    pub files_touched: BTreeSet<String>,
    pub prs_authored: usize,
    pub reviews_given: usize,
    pub reviews_received: usize,
    pub collaborators: BTreeSet<String>,
}

impl MemberRecord {
    pub fn is_active(&self) -> bool {
        self.commits > 0 || self.prs_authored > 0
    }

    /// Weighted blend of review participation, collaborator breadth and raw
    /// activity, each saturating at 1.0. Rounded to 3 decimals.
    pub fn collaboration_score(&self) -> f64 {
        let review_participation =
            ((self.reviews_given + self.reviews_received) as f64 / REVIEWS_FOR_FULL_PARTICIPATION).min(1.0);
        let collaboration_breadth =
            (self.collaborators.len() as f64 / COLLABORATORS_FOR_FULL_BREADTH).min(1.0);
        let activity_level =
            ((self.commits + self.prs_authored) as f64 / ACTIVITY_FOR_FULL_LEVEL).min(1.0);

        round3(review_participation * 0.4 + collaboration_breadth * 0.4 + activity_level * 0.2)
    }
}

/// Every contributor mentioned as commit author, PR author, reviewer or
/// commenter. Records are created lazily and never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberTable {
    members: BTreeMap<String, MemberRecord>,
}

impl MemberTable {
    fn member(&mut self, name: &str) -> &mut MemberRecord {
        self.members.entry(name.to_string()).or_default()
    }

    pub fn record_commit(&mut self, commit: &Commit) {
        let Some(author) = commit.known_author() else { return };
        let record = self.member(author);
        record.commits += 1;
        record.files_touched.extend(commit.files_changed.iter().cloned());
    }

    /// Counts the PR for its author and turns every review and comment from
    /// someone else into a collaborator link and a graph edge.
    pub fn record_pull_request(&mut self, pr: &PullRequest, graph: &mut CollaborationGraph) {
        let Some(author) = pr.known_author() else { return };
        self.member(author).prs_authored += 1;

        for review in &pr.reviews {
            let Some(reviewer) = known_identity(review.author.as_deref()) else { continue };
            if reviewer == author { continue; }
            self.member(reviewer).reviews_given += 1;
            self.member(author).reviews_received += 1;
            self.link(author, reviewer);
            graph.add_interaction(author, reviewer, REVIEW_WEIGHT);
        }

        for comment in &pr.comments {
            let Some(commenter) = known_identity(comment.author.as_deref()) else { continue };
            if commenter == author { continue; }
            self.link(author, commenter);
            graph.add_interaction(author, commenter, COMMENT_WEIGHT);
        }
    }

    fn link(&mut self, a: &str, b: &str) {
        self.member(a).collaborators.insert(b.to_string());
        self.member(b).collaborators.insert(a.to_string());
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MemberRecord> {
        self.members.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MemberRecord)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(|k| k.as_str())
    }

    /// Member metrics ranked by collaboration score, highest first; equal
    /// scores keep name order.
    pub fn ranked_metrics(&self) -> Vec<MemberMetrics> {
        let mut metrics: Vec<MemberMetrics> = self.members.iter().map(|(name, r)| MemberMetrics {
            member:              name.clone(),
            files_touched:       r.files_touched.iter().cloned().collect(),
            commits_count:       r.commits,
            pr_count:            r.prs_authored,
            reviews_given:       r.reviews_given,
            reviews_received:    r.reviews_received,
            collaborators:       r.collaborators.iter().cloned().collect(),
            collaboration_score: r.collaboration_score(),
        }).collect();
        metrics.sort_by(|a, b| b.collaboration_score.total_cmp(&a.collaboration_score));
        metrics
    }
}

pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
