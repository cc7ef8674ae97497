mod clock;
mod engine;
mod phase;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{Collaborators, PomodoroCredit, TimerEngine, TimerState, TimerView};
pub use phase::{format_clock, Phase};
pub use ticker::TickAnchor;
