use std::collections::{BTreeMap, BTreeSet};
use crate::types::Commit;

/// Per-file attribution: file → contributor → number of commits that touched
/// the file. Commits without a known author contribute nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnershipLedger {
    files: BTreeMap<String, BTreeMap<String, usize>>,
}

/// The dominant contributor of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOwnership<'a> {
    pub file: &'a str,
    pub owner: &'a str,
    pub owner_count: usize,
    pub total: usize,
    pub contributors: &'a BTreeMap<String, usize>,
}

impl FileOwnership<'_> {
    /// Owner's share of all contributions to the file, 0–1.
    pub fn share(&self) -> f64 {
        if self.total == 0 { 0.0 } else { self.owner_count as f64 / self.total as f64 }
    }
}

impl OwnershipLedger {
    pub fn from_commits(commits: &[Commit]) -> Self {
        let mut ledger = OwnershipLedger::default();
        for commit in commits {
            ledger.record_commit(commit);
        }
        ledger
    }

    pub fn record_commit(&mut self, commit: &Commit) {
        let Some(author) = commit.known_author() else { return };
        // a path listed twice in one commit is still one touch
        let touched: BTreeSet<&str> = commit.files_changed.iter().map(|f| f.as_str()).collect();
        for file in touched {
            self.record(file, author);
        }
    }

    pub fn record(&mut self, file: &str, author: &str) {
        *self.files.entry(file.to_string()).or_default()
            .entry(author.to_string()).or_insert(0) += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[cfg(test)]
    fn contributors(&self, file: &str) -> Option<&BTreeMap<String, usize>> {
        self.files.get(file)
    }

    /// Dominant contributor of every file with at least one contribution,
    /// in file order. Equal counts resolve to the alphabetically first name.
    pub fn owners(&self) -> impl Iterator<Item = FileOwnership<'_>> {
        self.files.iter().filter_map(|(file, authors)| {
            let total: usize = authors.values().sum();
            if total == 0 { return None; }
            let (owner, owner_count) = authors.iter().fold(None, |best: Option<(&String, usize)>, (a, &c)| {
                match best {
                    Some((_, bc)) if bc >= c => best,
                    _ => Some((a, c)),
                }
            })?;
            Some(FileOwnership {
                file: file.as_str(),
                owner: owner.as_str(),
                owner_count,
                total,
                contributors: authors,
            })
        })
    }
}
