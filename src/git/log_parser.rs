use crate::error::{Error, Result};
use crate::types::Commit;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

/// Runs a single `git log --numstat` in `cwd` and returns one [`Commit`] per
/// history entry, with the author name, subject and touched files filled in.
///
/// Git history has no pull requests, so datasets built this way only feed the
/// ownership and activity parts of the analysis.
pub fn read_commits(cwd: &Path, since: &str) -> Result<Vec<Commit>> {
    let mut args: Vec<String> = vec![
        "log".into(),
        "--format=COMMIT|%H|%an|%s".into(),
        "--numstat".into(),
        "--no-merges".into(),
    ];

    if !since.is_empty() {
        args.push(format!("--since={since}"));
    }

    let mut child = Command::new("git")
        .args(&args)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::Git(format!("Failed to run git in '{}': {e}", cwd.display())))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::Git("Failed to capture git stdout".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| Error::Git("Failed to capture git stderr".to_string()))?;

    let stderr_reader = thread::spawn(move || {
        let mut stderr_text = String::new();
        let mut reader = BufReader::new(stderr);
        let _ = reader.read_to_string(&mut stderr_text);
        stderr_text
    });

    let mut commits: Vec<Commit> = Vec::new();
    let mut current: Option<Commit> = None;

    for line in BufReader::new(stdout).lines() {
        let line = line.map_err(|e| Error::Git(format!("Failed reading git output: {e}")))?;
        parse_commit_line(&line, &mut commits, &mut current);
    }

    if let Some(c) = current.take() {
        commits.push(c);
    }

    let status = child
        .wait()
        .map_err(|e| Error::Git(format!("Failed to wait for git process: {e}")))?;

    if !status.success() {
        let stderr_text = stderr_reader.join().unwrap_or_default();
        return Err(Error::Git(format!("git log failed in '{}': {}", cwd.display(), stderr_text.trim())));
    }

    let _ = stderr_reader.join();

    debug!("Read {} commits from '{}'", commits.len(), cwd.display());
    Ok(commits)
}

fn parse_commit_line(line: &str, commits: &mut Vec<Commit>, current: &mut Option<Commit>) {
    let trimmed = line.trim();

    if let Some(rest) = trimmed.strip_prefix("COMMIT|") {
        if let Some(c) = current.take() {
            commits.push(c);
        }
        // hash is only a delimiter here; subjects may themselves contain '|'
        let mut parts = rest.splitn(3, '|');
        if let (Some(_hash), Some(author), Some(subject)) = (parts.next(), parts.next(), parts.next()) {
            *current = Some(Commit {
                author: Some(author.to_string()),
                files_changed: Vec::new(),
                message: subject.to_string(),
            });
        }
    } else if !trimmed.is_empty() {
        let mut parts = trimmed.splitn(3, '\t');
        if let (Some(_added), Some(_deleted), Some(raw_name)) = (parts.next(), parts.next(), parts.next()) {
            if let (Some(filename), Some(c)) = (normalize_filename(raw_name), current.as_mut()) {
                c.files_changed.push(filename);
            }
        }
    }
}

/// Normalizes git rename notations:
///   "src/{old => new}/file.js" → "src/new/file.js"
///   "old-name => new-name"     → "new-name"
fn normalize_filename(raw: &str) -> Option<String> {
    if raw.contains('{') && raw.contains("=>") {
        let result = RENAME_RE.replace(raw, "$1").replace("//", "/");
        return if result.contains('{') {
            None
        } else {
            Some(result.trim().to_string())
        };
    }
    if raw.contains(" => ") {
        return raw.split(" => ").last().map(|s| s.trim().to_string());
    }
    let t = raw.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

static RENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]*? => ([^}]*)\}").expect("rename pattern is valid"));
