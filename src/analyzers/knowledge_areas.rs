use std::collections::BTreeMap;
use crate::types::CollaborationReport;

const MAX_AREAS:          usize = 3;
const MIN_EXTENSION_HITS: usize = 2;
const MIN_DIRECTORY_HITS: usize = 3;

/// Labels the areas a member works in from the files they touched.
///
/// Extensions seen on at least two files become "`ext` development",
/// top-level directories seen on at least three files become "`dir` module".
/// Extension labels come first; at most three labels are returned.
pub fn identify_knowledge_areas<'a>(files: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut extensions: BTreeMap<String, usize> = BTreeMap::new();
    let mut directories: BTreeMap<&str, usize> = BTreeMap::new();

    for path in files {
        let mut segments = path.split('/');
        let first = segments.next().unwrap_or("");
        let file_name = path.rsplit('/').next().unwrap_or(path);

        if let Some((_, ext)) = file_name.rsplit_once('.') {
            if !ext.is_empty() {
                *extensions.entry(ext.to_lowercase()).or_insert(0) += 1;
            }
        }
        if segments.next().is_some() && !first.is_empty() {
            *directories.entry(first).or_insert(0) += 1;
        }
    }

    let mut areas: Vec<String> = most_common(&extensions)
        .filter(|(_, n)| *n >= MIN_EXTENSION_HITS)
        .take(MAX_AREAS)
        .map(|(ext, _)| format!("{ext} development"))
        .collect();
    areas.extend(
        most_common(&directories)
            .filter(|(_, n)| *n >= MIN_DIRECTORY_HITS)
            .map(|(dir, _)| format!("{dir} module")),
    );
    areas.truncate(MAX_AREAS);
    areas
}

// Highest count first; equal counts keep key order.
fn most_common<K: Ord + Clone>(counts: &BTreeMap<K, usize>) -> impl Iterator<Item = (K, usize)> {
    let mut entries: Vec<(K, usize)> = counts.iter().map(|(k, &v)| (k.clone(), v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.into_iter()
}

/// Knowledge areas for every member of a finished report.
pub fn label_members(report: &CollaborationReport) -> BTreeMap<String, Vec<String>> {
    report.member_metrics.iter()
        .map(|m| (m.member.clone(), identify_knowledge_areas(m.files_touched.iter().map(|f| f.as_str()))))
        .collect()
}
