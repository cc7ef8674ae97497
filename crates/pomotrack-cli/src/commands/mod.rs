pub mod config;
pub mod settings;
pub mod stats;
pub mod task;
pub mod timer;

use std::io::Write;
use std::sync::Arc;

use pomotrack_core::events::Event;
use pomotrack_core::notify::{AlertResult, AlertSink, PreferenceGateway};
use pomotrack_core::timer::SystemClock;
use pomotrack_core::{App, Config, Database, PhaseCompletion};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Alerts for a terminal: the bell stands in for sound, the message goes to
/// stderr so stdout stays JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSink;

impl AlertSink for TerminalSink {
    fn sound(&self, _completion: &PhaseCompletion) -> AlertResult {
        let mut err = std::io::stderr();
        err.write_all(b"\x07").and_then(|_| err.flush()).map_err(|e| e.to_string())
    }

    fn vibrate(&self, _completion: &PhaseCompletion) -> AlertResult {
        tracing::debug!("no vibration on a terminal");
        Ok(())
    }

    fn desktop(&self, completion: &PhaseCompletion) -> AlertResult {
        writeln!(std::io::stderr(), "{}: {}", completion.title(), completion.message())
            .map_err(|e| e.to_string())
    }
}

/// Persisted state opened for one command.
pub struct Workspace {
    pub db: Database,
    pub config: Config,
    pub app: App,
}

impl Workspace {
    pub fn open() -> CliResult<Self> {
        let config = Config::load()?;
        let db = Database::open()?;
        let gateway = PreferenceGateway::new(config.notifications.clone(), TerminalSink);
        let app = App::load(&db, &config, Box::new(gateway), Arc::new(SystemClock))?;
        Ok(Self { db, config, app })
    }

    /// Log terminal events and write state back.
    pub fn commit(&self, events: &[Event]) -> CliResult {
        self.db.record_events(events)?;
        self.app.save(&self.db)?;
        Ok(())
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
