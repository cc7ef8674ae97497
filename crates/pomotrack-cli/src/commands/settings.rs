use clap::Subcommand;
use pomotrack_core::SettingsField;

use super::{print_json, CliResult, Workspace};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current durations
    Show,
    /// Set the work duration in minutes (1-60, out-of-range values are clamped)
    Work {
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },
    /// Set the break duration in minutes (1-30, out-of-range values are clamped)
    Break {
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },
}

pub fn run(action: SettingsAction) -> CliResult {
    let mut ws = Workspace::open()?;

    let (field, input) = match action {
        SettingsAction::Show => return print_json(&ws.app.settings()),
        SettingsAction::Work { minutes } => (SettingsField::WorkMinutes, minutes),
        SettingsAction::Break { minutes } => (SettingsField::BreakMinutes, minutes),
    };

    let events = ws.app.set_setting_from_input(field, &input)?;
    ws.config.set_settings(&ws.app.settings());
    ws.config.save()?;
    ws.commit(&events)?;
    print_json(&ws.app.settings())
}
