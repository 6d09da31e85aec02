use std::collections::HashMap;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use console::style;
use crate::agents::AgentName;
use crate::session::SessionEvent;
use crate::simulator::{Agent, AgentStats, AgentStatus, JobStatus};
use crate::utils::formatting::{format_duration, format_job_id};

/// Live agent bars for `repurpose run`.
pub struct DashboardProgress {
    multi: MultiProgress,
    agent_bars: HashMap<AgentName, ProgressBar>,
    status_bar: ProgressBar,
    job_id: String,
    connection_error: Option<String>,
    stats: AgentStats,
    start_time: std::time::Instant,
}

impl DashboardProgress {
    pub fn new(agents: &[Agent], hidden: bool) -> Self {
        let multi = MultiProgress::new();
        if hidden {
            multi.set_draw_target(ProgressDrawTarget::hidden());
        }

        let bar_style = ProgressStyle::default_bar()
            .template("  {prefix:>9.bold} {bar:30.cyan/dark_gray} {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");

        let mut agent_bars = HashMap::new();
        for agent in agents {
            let bar = multi.add(ProgressBar::new(100));
            bar.set_style(bar_style.clone());
            bar.set_prefix(agent.name.as_str());
            bar.set_message(agent.task.clone());
            agent_bars.insert(agent.name, bar);
        }

        // Status line at the bottom showing job id / elapsed / overall progress
        let status_bar = multi.add(ProgressBar::new_spinner());
        status_bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
        );
        status_bar.set_message("Initializing agents...");
        if !hidden {
            status_bar.enable_steady_tick(std::time::Duration::from_millis(120));
        }

        Self {
            multi,
            agent_bars,
            status_bar,
            job_id: String::new(),
            connection_error: None,
            stats: AgentStats::compute(agents),
            start_time: std::time::Instant::now(),
        }
    }

    /// Handle a session event and update the bars accordingly.
    pub fn handle_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::JobStarted { job_id, .. } | SessionEvent::JobBound { job_id } => {
                self.job_id = job_id.clone();
                self.update_status();
            }
            SessionEvent::AgentsUpdated { agents } => {
                for agent in agents {
                    self.update_agent(agent);
                }
                self.stats = AgentStats::compute(agents);
                self.update_status();
            }
            SessionEvent::StatusChanged { .. } => self.update_status(),
            SessionEvent::Activity(line) => {
                self.println(&format!("  {}", style(&line.text).dim()));
            }
            SessionEvent::ConnectionError { message } => {
                if self.connection_error.as_deref() != Some(message.as_str()) {
                    self.println(&format!(
                        "  {} {} Running in demo mode.",
                        style("⚠").yellow(),
                        message
                    ));
                }
                self.connection_error = Some(message.clone());
                self.update_status();
            }
            SessionEvent::ConnectionRestored => {
                self.connection_error = None;
                self.println(&format!("  {} Backend connection restored", style("✓").green()));
                self.update_status();
            }
            SessionEvent::JobFinished { job_id, status } => {
                let elapsed = format_duration(self.start_time.elapsed().as_millis() as u64);
                for bar in self.agent_bars.values() {
                    bar.finish();
                }
                match status {
                    JobStatus::Failed => self.status_bar.abandon_with_message(format!(
                        "Job {} failed after {}",
                        format_job_id(job_id),
                        elapsed
                    )),
                    _ => self.status_bar.finish_with_message(format!(
                        "Job {} complete: {}/{} agents | {}",
                        format_job_id(job_id),
                        self.stats.completed,
                        self.stats.total,
                        elapsed
                    )),
                }
            }
        }
    }

    fn update_agent(&self, agent: &Agent) {
        let Some(bar) = self.agent_bars.get(&agent.name) else {
            return;
        };
        bar.set_position(agent.progress as u64);
        let task = match agent.status {
            AgentStatus::Completed => style(&agent.task).green().to_string(),
            AgentStatus::Error => style(&agent.task).red().to_string(),
            AgentStatus::Idle | AgentStatus::Pending => style(&agent.task).dim().to_string(),
            AgentStatus::Running => agent.task.clone(),
        };
        bar.set_message(task);
    }

    fn update_status(&self) {
        let elapsed = format_duration(self.start_time.elapsed().as_millis() as u64);
        let mut msg = format!(
            "{} | {} | {}% overall | {} running, {} done, {} waiting",
            format_job_id(&self.job_id),
            elapsed,
            self.stats.overall_progress,
            self.stats.running,
            self.stats.completed,
            self.stats.waiting(),
        );
        if self.connection_error.is_some() {
            msg.push_str(&format!(" | {}", style("offline").yellow()));
        }
        self.status_bar.set_message(msg);
    }

    /// Print a line through the multi-progress (won't interfere with bars).
    pub fn println(&self, msg: &str) {
        let _ = self.multi.println(msg);
    }
}
