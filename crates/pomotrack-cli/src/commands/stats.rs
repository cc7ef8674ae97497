use clap::Subcommand;
use pomotrack_core::analytics::format_minutes;

use super::{print_json, CliResult, Workspace};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals, completion rate and productivity score
    Show,
    /// Recently finished or abandoned phases
    History {
        /// Maximum rows to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Zero the counters
    Reset {
        /// Also delete the session history
        #[arg(long)]
        history: bool,
    },
}

pub fn run(action: StatsAction) -> CliResult {
    let mut ws = Workspace::open()?;
    let events = ws.app.catch_up();

    match action {
        StatsAction::Show => {
            let summary = ws.app.analytics_summary();
            eprintln!(
                "Focus {} / Break {} / Score {} ({})",
                format_minutes(summary.total_focus_minutes),
                format_minutes(summary.total_break_minutes),
                summary.productivity_score,
                summary.productivity_level.label(),
            );
            print_json(&summary)?;
        }
        StatsAction::History { limit } => {
            ws.commit(&events)?;
            print_json(&ws.db.history(limit)?)?;
            return Ok(());
        }
        StatsAction::Reset { history } => {
            ws.app.reset_analytics();
            if history {
                let removed = ws.db.clear_history()?;
                eprintln!("Deleted {removed} history row(s)");
            }
            eprintln!("statistics reset");
        }
    }

    ws.commit(&events)?;
    Ok(())
}
