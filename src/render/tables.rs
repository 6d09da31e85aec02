use chrono::{DateTime, Utc};
use console::style;
use crate::models::{Candidate, ConfidenceTier, ExportHistoryEntry, HistoryStats, JobHistoryEntry};
use crate::utils::formatting::{
    format_confidence, format_file_size, format_job_id, format_relative_time, truncate_text,
};

fn tier_label(tier: ConfidenceTier) -> String {
    match tier {
        ConfidenceTier::High => style("high").green().to_string(),
        ConfidenceTier::Medium => style("medium").yellow().to_string(),
        ConfidenceTier::Low => style("low").red().to_string(),
        ConfidenceTier::Insufficient => style("insufficient").dim().to_string(),
    }
}

/// Ranked candidate table, highest score first.
pub fn render_candidates(candidates: &[Candidate]) -> String {
    if candidates.is_empty() {
        return "  No candidates returned.".to_string();
    }

    let mut ranked: Vec<&Candidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut out = format!(
        "  {:>3}  {:<24} {:>6}  {:<13} {}\n",
        style("#").bold(),
        style("Drug").bold(),
        style("Score").bold(),
        style("Confidence").bold(),
        style("Summary").bold(),
    );
    for (rank, c) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "  {:>3}  {:<24} {:>6}  {:<13} {}\n",
            rank + 1,
            truncate_text(&c.drug, 24),
            format_confidence(c.score),
            tier_label(c.confidence_tier()),
            truncate_text(&c.summary, 60),
        ));
        let mut flags = Vec::new();
        if let Some(market) = &c.market_estimate {
            flags.push(format!("market {}", market));
        }
        if !c.patent_flags.is_empty() {
            flags.push(format!("patents {}", c.patent_flags.join(", ")));
        }
        if !c.safety_flags.is_empty() {
            flags.push(style(format!("safety {}", c.safety_flags.join(", "))).red().to_string());
        }
        if !flags.is_empty() {
            out.push_str(&format!("       {}\n", style(flags.join(" | ")).dim()));
        }
    }
    out
}

pub fn render_job_history(jobs: &[JobHistoryEntry], now: DateTime<Utc>) -> String {
    if jobs.is_empty() {
        return "  No jobs in history.".to_string();
    }
    jobs.iter()
        .map(|j| {
            format!(
                "  {:<12} {:<10} {:>4} candidates  {:<14} {}",
                format_job_id(&truncate_text(&j.id, 10)),
                j.status,
                j.candidates_count,
                format_relative_time(j.timestamp, now),
                truncate_text(&j.query, 50),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_export_history(exports: &[ExportHistoryEntry], now: DateTime<Utc>) -> String {
    if exports.is_empty() {
        return "  No exports in history.".to_string();
    }
    exports
        .iter()
        .map(|e| {
            format!(
                "  {:<18} {:<12} {:<5} {:>10}  {}",
                e.id,
                format_job_id(&truncate_text(&e.job_id, 10)),
                e.format,
                format_file_size(e.size_bytes),
                format_relative_time(e.timestamp, now),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_stats(stats: &HistoryStats, now: DateTime<Utc>) -> String {
    format!(
        "  Jobs: {}  Exports: {}  Last activity: {}  Top format: {}",
        stats.total_jobs,
        stats.total_exports,
        stats
            .recent_activity
            .map(|t| format_relative_time(t, now))
            .unwrap_or_else(|| "No activity".to_string()),
        stats.most_exported_format.as_deref().unwrap_or("N/A"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(drug: &str, score: f64) -> Candidate {
        serde_json::from_value(serde_json::json!({"id": 1, "drug": drug, "score": score})).unwrap()
    }

    #[test]
    fn test_candidates_ranked_by_score() {
        console::set_colors_enabled(false);
        let out = render_candidates(&[candidate("Metformin", 0.6), candidate("Baricitinib", 0.92)]);
        let bari = out.find("Baricitinib").unwrap();
        let met = out.find("Metformin").unwrap();
        assert!(bari < met);
        assert!(out.contains("92%"));
    }

    #[test]
    fn test_empty_tables() {
        assert!(render_candidates(&[]).contains("No candidates"));
        assert!(render_job_history(&[], Utc::now()).contains("No jobs"));
        assert!(render_export_history(&[], Utc::now()).contains("No exports"));
    }

    #[test]
    fn test_stats_without_activity() {
        let stats = HistoryStats {
            total_jobs: 0,
            total_exports: 0,
            recent_activity: None,
            most_exported_format: None,
        };
        let out = render_stats(&stats, Utc::now());
        assert!(out.contains("No activity"));
        assert!(out.contains("N/A"));
    }
}
