use std::collections::{BTreeMap, BTreeSet};
use crate::analyzers::ownership::OwnershipLedger;
use crate::types::{KnowledgeSilo, RiskLevel};

/// Default share at which a single contributor's dominance makes a file a silo.
pub const DEFAULT_SILO_THRESHOLD: f64 = 0.80;

const RISK_CRITICAL: f64 = 0.95;
const RISK_HIGH:     f64 = 0.90;
const RISK_MEDIUM:   f64 = 0.85;

/// Finds files dominated by one contributor and merges them per owner.
///
/// A file is a silo when its top contributor holds at least `threshold` of
/// its contributions. An owner with several silo files gets one merged
/// record whose percentage is the plain mean of the per-file percentages.
/// The result is sorted by ownership percentage, highest first.
pub fn detect_silos(ledger: &OwnershipLedger, threshold: f64) -> Vec<KnowledgeSilo> {
    let per_file: Vec<KnowledgeSilo> = ledger.owners()
        .filter(|o| o.share() >= threshold)
        .map(|o| {
            let share = o.share();
            KnowledgeSilo {
                files: vec![o.file.to_string()],
                primary_owner: o.owner.to_string(),
                ownership_percentage: share,
                risk_level: risk_level(share, o.total),
                collaborators: o.contributors.iter()
                    .filter(|(name, &count)| name.as_str() != o.owner && count > 0)
                    .map(|(name, _)| name.clone())
                    .collect(),
            }
        })
        .collect();

    let mut silos = group_by_owner(per_file);
    silos.sort_by(|a, b| {
        b.ownership_percentage.total_cmp(&a.ownership_percentage)
            .then_with(|| a.primary_owner.cmp(&b.primary_owner))
    });
    silos
}

fn group_by_owner(silos: Vec<KnowledgeSilo>) -> Vec<KnowledgeSilo> {
    let mut by_owner: BTreeMap<String, Vec<KnowledgeSilo>> = BTreeMap::new();
    for silo in silos {
        by_owner.entry(silo.primary_owner.clone()).or_default().push(silo);
    }

    by_owner.into_iter().flat_map(|(owner, group)| {
        if group.len() < 2 {
            return group;
        }
        let count = group.len() as f64;
        let avg = group.iter().map(|s| s.ownership_percentage).sum::<f64>() / count;
        let files: Vec<String> = group.iter().flat_map(|s| s.files.iter().cloned()).collect();
        let collaborators: BTreeSet<String> =
            group.iter().flat_map(|s| s.collaborators.iter().cloned()).collect();
        vec![KnowledgeSilo {
            risk_level: risk_level(avg, files.len()),
            files,
            primary_owner: owner,
            ownership_percentage: avg,
            collaborators: collaborators.into_iter().collect(),
        }]
    }).collect()
}

/// Risk tier from the ownership percentage. `_contributions` is accepted for
/// callers that know the volume behind the share; the tier depends on the
/// percentage alone.
pub fn risk_level(ownership_percentage: f64, _contributions: usize) -> RiskLevel {
    if ownership_percentage >= RISK_CRITICAL { RiskLevel::Critical }
    else if ownership_percentage >= RISK_HIGH { RiskLevel::High }
    else if ownership_percentage >= RISK_MEDIUM { RiskLevel::Medium }
    else { RiskLevel::Low }
}
