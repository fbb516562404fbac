use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, Table};
use crate::types::{HealthStatus, Priority, Report, RiskLevel};

/// Prints a human-readable report. `top` caps the member and silo tables.
pub fn report_terminal(report: &Report, top: usize) {
    eprintln!();
    println!(
        "{} {} ({} commits, {} pull requests)",
        "👥 team-pulse —".cyan().bold(),
        report.meta.repository.bold(),
        report.meta.commit_count.to_string().bright_black(),
        report.meta.pull_request_count.to_string().bright_black(),
    );
    println!();

    let s = &report.summary;
    println!(
        "  Team health: {}  {}",
        score_text(s.overall_team_health),
        status_text(s.health_status),
    );
    println!(
        "    {} {}   {} {}   {} {}",
        "communication".bright_black(), score_text(s.communication_health),
        "collaboration".bright_black(), score_text(s.collaboration_health),
        "knowledge".bright_black(),     score_text(s.knowledge_distribution),
    );
    println!();

    let collab = &report.collaboration;

    // ── Members ────────────────────────────────────────────────────────────
    if collab.member_metrics.is_empty() {
        println!("{}", "  No attributable contributors found.".yellow());
        println!();
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["MEMBER", "SCORE", "COMMITS", "PRS", "REVIEWS GIVEN", "REVIEWS RECEIVED", "COLLABORATORS", "AREAS"]);
        for m in collab.member_metrics.iter().take(top) {
            let areas = report.knowledge_areas.get(&m.member).map(|a| a.join(", ")).unwrap_or_default();
            table.add_row(vec![
                Cell::new(&m.member),
                score_cell(m.collaboration_score),
                Cell::new(m.commits_count),
                Cell::new(m.pr_count),
                Cell::new(m.reviews_given),
                Cell::new(m.reviews_received),
                Cell::new(m.collaborators.len()),
                Cell::new(areas).fg(Color::DarkGrey),
            ]);
        }
        println!("{table}");
        if collab.member_metrics.len() > top {
            println!("{}", format!("  … {} more member(s)", collab.member_metrics.len() - top).bright_black());
        }
        println!();
    }

    // ── Knowledge silos ────────────────────────────────────────────────────
    if !collab.knowledge_silos.is_empty() {
        println!("{}", "🧱 Knowledge silos:".yellow().bold());
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["OWNER", "FILES", "OWNERSHIP", "RISK", "OTHER CONTRIBUTORS"]);
        for silo in collab.knowledge_silos.iter().take(top) {
            table.add_row(vec![
                Cell::new(&silo.primary_owner),
                Cell::new(files_text(&silo.files)),
                Cell::new(format!("{:.0}%", silo.ownership_percentage * 100.0)),
                risk_cell(silo.risk_level),
                Cell::new(if silo.collaborators.is_empty() { "—".to_string() } else { silo.collaborators.join(", ") }),
            ]);
        }
        println!("{table}");
        println!();
    }

    // ── Network ────────────────────────────────────────────────────────────
    let net = &collab.collaboration_network;
    println!(
        "🕸  Network: density {}, health {}",
        format!("{:.3}", net.density).bold(),
        net.network_health.as_str().bold(),
    );
    if !net.central_members.is_empty() {
        let central: Vec<String> = net.central_members.iter()
            .map(|c| format!("{} ({:.3})", c.member, c.centrality))
            .collect();
        println!("    central:  {}", central.join(", ").cyan());
    }
    if !net.isolated_members.is_empty() {
        println!("    isolated: {}", net.isolated_members.join(", ").yellow());
    }
    for (i, cluster) in net.clusters.iter().enumerate() {
        println!("    cluster {}: {}", i + 1, cluster.join(", ").bright_black());
    }

    let health = &collab.team_health_metrics;
    println!(
        "    team size {}, active {}, review participation {:.0}%, knowledge {}, balance {}",
        health.team_size,
        health.active_contributors,
        health.review_participation_rate * 100.0,
        health.knowledge_distribution.as_str(),
        health.collaboration_balance.as_str(),
    );

    if let Some(sent) = &report.sentiment {
        println!(
            "💬 Sentiment: {:+.3} over {} texts ({:.0}% positive, {:.0}% negative)",
            sent.overall.overall_sentiment_score,
            sent.overall.sample_size,
            sent.overall.positive_ratio * 100.0,
            sent.overall.negative_ratio * 100.0,
        );
    }

    // ── Recommendations ────────────────────────────────────────────────────
    if !report.recommendations.is_empty() {
        println!();
        println!("{}", "💡 Recommendations:".cyan());
        for rec in &report.recommendations {
            let marker = match rec.priority {
                Priority::High   => "•".red(),
                Priority::Medium => "•".yellow(),
                Priority::Low    => "•".white(),
            };
            println!("    {marker} {}", rec.message);
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("{}", "⚠️  Data warnings:".yellow());
        for w in &report.warnings {
            println!("    {}", w.bright_black());
        }
    }

    println!();
}

// ─── Cell builders ────────────────────────────────────────────────────────────

// Plain text plus native color so comfy-table measures visible width.
fn score_cell(score: f64) -> Cell {
    let text = format!("{score:.3}");
    if score >= 0.7 {
        Cell::new(text).fg(Color::Green).add_attribute(Attribute::Bold)
    } else if score >= 0.4 {
        Cell::new(text)
    } else {
        Cell::new(text).fg(Color::Yellow)
    }
}

fn risk_cell(risk: RiskLevel) -> Cell {
    match risk {
        RiskLevel::Critical => Cell::new("🔴 CRITICAL").fg(Color::Red),
        RiskLevel::High     => Cell::new("🟠 HIGH").fg(Color::Yellow),
        RiskLevel::Medium   => Cell::new("🟡 MEDIUM"),
        RiskLevel::Low      => Cell::new("🟢 LOW").fg(Color::Green),
    }
}

// ─── Other helpers ────────────────────────────────────────────────────────────

fn score_text(score: f64) -> colored::ColoredString {
    let text = format!("{score:.3}");
    if score >= 0.6 { text.green() } else if score >= 0.4 { text.yellow() } else { text.red() }
}

fn status_text(status: HealthStatus) -> colored::ColoredString {
    let text = status.to_string();
    match status {
        HealthStatus::Excellent | HealthStatus::Good => text.green().bold(),
        HealthStatus::Fair                           => text.yellow().bold(),
        HealthStatus::NeedsAttention | HealthStatus::Critical => text.red().bold(),
    }
}

fn files_text(files: &[String]) -> String {
    match files {
        [] => String::new(),
        [one] => truncate_path(one, 40),
        [first, rest @ ..] => format!("{} +{}", truncate_path(first, 34), rest.len()),
    }
}

fn truncate_path(s: &str, max: usize) -> String {
    let chars = s.chars().count();
    if chars <= max { return s.to_string(); }
    let tail: String = s.chars().skip(chars - (max - 1)).collect();
    format!("…{tail}")
}
