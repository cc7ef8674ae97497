use serde::{Deserialize, Serialize};

/// Kind of interval the countdown is measuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// The phase that follows this one.
    pub fn other(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Focus Time",
            Phase::Break => "Break Time",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Phase::Work),
            "break" => Ok(Phase::Break),
            other => Err(format!("unknown phase: {other}")),
        }
    }
}

/// Render seconds as `m:ss`.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
