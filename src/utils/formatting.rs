use chrono::{DateTime, Utc};

pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else if ms < 3_600_000 {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = ms / 3_600_000;
        let mins = (ms % 3_600_000) / 60_000;
        format!("{}h {}m", hours, mins)
    }
}

/// `0.873` -> `87%`
pub fn format_confidence(score: f64) -> String {
    if !score.is_finite() {
        return "N/A".to_string();
    }
    format!("{}%", (score * 100.0).round() as i64)
}

/// Abbreviate with one decimal: `1.5K`, `2.0M`, `3.1B`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "N/A".to_string();
    }
    if n >= 1e9 {
        format!("{:.1}B", n / 1e9)
    } else if n >= 1e6 {
        format!("{:.1}M", n / 1e6)
    } else if n >= 1e3 {
        format!("{:.1}K", n / 1e3)
    } else {
        format!("{}", n)
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

/// Display form of a job id, always with a leading `#`.
pub fn format_job_id(job_id: &str) -> String {
    if job_id.is_empty() || job_id.starts_with('#') {
        job_id.to_string()
    } else {
        format!("#{}", job_id)
    }
}

/// Cut to `max_chars` characters and append `...`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}

pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let mins = secs / 60;
    let hours = mins / 60;
    let days = hours / 24;
    let plural = |n: i64| if n > 1 { "s" } else { "" };

    if secs < 60 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{} minute{} ago", mins, plural(mins))
    } else if hours < 24 {
        format!("{} hour{} ago", hours, plural(hours))
    } else if days < 7 {
        format!("{} day{} ago", days, plural(days))
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(450), "450ms");
        assert_eq!(format_duration(26_400), "26.4s");
        assert_eq!(format_duration(125_000), "2m 5s");
        assert_eq!(format_duration(3_780_000), "1h 3m");
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(0.873), "87%");
        assert_eq!(format_confidence(1.0), "100%");
        assert_eq!(format_confidence(f64::NAN), "N/A");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(950.0), "950");
        assert_eq!(format_number(1_500.0), "1.5K");
        assert_eq!(format_number(8_200_000_000.0), "8.2B");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_format_job_id() {
        assert_eq!(format_job_id("AB12CD34"), "#AB12CD34");
        assert_eq!(format_job_id("#AB12CD34"), "#AB12CD34");
    }

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("short", 50), "short");
        assert_eq!(truncate_text("αβγδε", 3), "αβγ...");
    }

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(now - Duration::seconds(10), now), "just now");
        assert_eq!(format_relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_relative_time(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(format_relative_time(now - Duration::days(2), now), "2 days ago");
    }
}
