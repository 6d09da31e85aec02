use console::style;
use tracing::{info, warn};
use crate::agents::AgentName;
use crate::cli::commands::StatusArgs;
use crate::config::Settings;
use crate::errors::RepurposeError;
use crate::simulator::{apply_status_response, AgentSimulator, AgentStats, DataSource, JobSnapshot};
use crate::utils::formatting::format_job_id;
use crate::utils::validation::validate_job_id;

pub async fn handle_status(args: StatusArgs, settings: Settings) -> Result<(), RepurposeError> {
    let job_id = validate_job_id(&args.job_id)?;
    info!(job_id = %job_id, "Querying job status");

    let client = super::backend_client(&settings)?;
    let agents = AgentSimulator::new(settings.simulation.clone()).initialize(&AgentName::ALL);
    let mut snapshot = JobSnapshot::new(job_id, "", DataSource::Backend, agents);

    loop {
        match client.get_status(job_id).await {
            Ok(response) => {
                apply_status_response(&mut snapshot, &response);
                snapshot.connection_error = None;
                print_snapshot(&snapshot, args.json)?;
            }
            // A single failed poll is not fatal while following
            Err(e) if args.follow => {
                warn!(job_id = %job_id, error = %e, "Status poll failed");
                eprintln!("  {} {}", style("⚠").yellow(), e.user_message());
            }
            Err(e) => return Err(e),
        }

        if !args.follow || snapshot.status.is_terminal() {
            break;
        }
        tokio::time::sleep(settings.poll_interval).await;
    }

    Ok(())
}

fn print_snapshot(snapshot: &JobSnapshot, json: bool) -> Result<(), RepurposeError> {
    let stats = AgentStats::compute(&snapshot.agents);
    if json {
        let out = serde_json::json!({"snapshot": snapshot, "stats": stats});
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} {}  {}% overall",
        style(format_job_id(&snapshot.job_id)).bold(),
        snapshot.status,
        stats.overall_progress
    );
    for agent in &snapshot.agents {
        println!(
            "  {:<10} {:<9} {:>3}%  {}",
            agent.name.as_str(),
            agent.status,
            agent.progress,
            agent.task
        );
    }
    Ok(())
}
