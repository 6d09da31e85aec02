use chrono::Utc;
use console::style;
use crate::cli::commands::HistoryArgs;
use crate::config::Settings;
use crate::db::Database;
use crate::errors::RepurposeError;
use crate::render::tables::{render_export_history, render_job_history, render_stats};

pub async fn handle_history(args: HistoryArgs, settings: Settings) -> Result<(), RepurposeError> {
    let db = Database::new(&settings.database_path)?.with_limits(settings.history);

    if args.clear {
        db.clear_history()?;
        println!("  {} History cleared", style("✓").green());
        return Ok(());
    }

    let now = Utc::now();
    if args.stats {
        let stats = db.history_stats()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!("{}", render_stats(&stats, now));
        }
    } else if args.exports {
        let exports = db.list_exports()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&exports)?);
        } else {
            println!("{}", render_export_history(&exports, now));
        }
    } else {
        let jobs = db.list_jobs()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&jobs)?);
        } else {
            println!("{}", render_job_history(&jobs, now));
        }
    }
    Ok(())
}
