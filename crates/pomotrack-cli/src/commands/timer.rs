use std::io::Write;

use clap::Subcommand;
use pomotrack_core::runtime::{Intent, TimerDriver, TimerHandle};
use pomotrack_core::{AppSnapshot, CoreError, Event};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{print_json, CliResult, Workspace};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown (resumes if paused)
    Start,
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Reload the current phase; a running phase counts as incomplete
    Reset,
    /// Reset and clear the session count
    Stop,
    /// Print current timer state as JSON
    Status,
    /// Live countdown in the foreground
    Run {
        /// Task to credit with finished work phases
        #[arg(long)]
        task: Option<String>,
    },
}

#[derive(Serialize)]
struct Outcome<'a> {
    events: &'a [Event],
    state: AppSnapshot,
}

pub fn run(action: TimerAction) -> CliResult {
    let mut ws = Workspace::open()?;

    let events = match action {
        TimerAction::Start => ws.app.start(),
        TimerAction::Pause => ws.app.pause(),
        TimerAction::Resume => ws.app.resume(),
        TimerAction::Reset => ws.app.reset(),
        TimerAction::Stop => ws.app.stop(),
        TimerAction::Status => ws.app.catch_up(),
        TimerAction::Run { task } => {
            if let Some(id) = task.as_deref() {
                if ws.app.tasks().get(id).is_none() {
                    return Err(CoreError::TaskNotFound(id.to_string()).into());
                }
            }
            return run_foreground(ws, task);
        }
    };

    ws.commit(&events)?;
    print_json(&Outcome {
        events: &events,
        state: ws.app.snapshot(),
    })
}

fn run_foreground(ws: Workspace, task: Option<String>) -> CliResult {
    let Workspace { db, config: _, app } = ws;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let (handle, join) = TimerDriver::spawn(app);
        eprintln!("commands: s start, p pause, r resume, x reset, q stop and quit");

        let outcome = view_loop(&handle, task).await;
        // The driver stops once it sees Shutdown, even if the loop failed.
        let _ = handle.send(Intent::Shutdown).await;
        let exit = join.await?;
        println!();
        db.record_events(&exit.events)?;
        exit.app.save(&db)?;
        outcome
    })
}

async fn view_loop(handle: &TimerHandle, task: Option<String>) -> CliResult {
    if task.is_some() {
        handle.send(Intent::SetCurrentTask(task)).await?;
    }
    let mut snapshots = handle.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    render(&handle.snapshot())?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };
                let intent = match line.trim() {
                    "s" => Intent::Start,
                    "p" => Intent::Pause,
                    "r" => Intent::Resume,
                    "x" => Intent::Reset,
                    "q" => {
                        handle.send(Intent::Stop).await?;
                        return Ok(());
                    }
                    "" => continue,
                    other => {
                        eprintln!("unknown command '{other}'");
                        continue;
                    }
                };
                handle.send(intent).await?;
            }
            snapshot = snapshots.changed() => {
                render(&snapshot?)?;
            }
        }
    }
}

fn render(snapshot: &AppSnapshot) -> CliResult {
    let timer = &snapshot.timer;
    let task = snapshot
        .current_task
        .as_ref()
        .map(|t| format!("  [{} {}/{}]", t.title, t.completed_pomodoros, t.pomodoros))
        .unwrap_or_default();
    let mut out = std::io::stdout();
    write!(
        out,
        "\r\x1b[2K{:<10} {}  {:?}  #{}{}",
        timer.phase.label(),
        timer.display,
        timer.state,
        timer.session_count,
        task,
    )?;
    out.flush()?;
    Ok(())
}
