pub mod disk_cache;
pub mod loader;
pub mod provider;

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::LapchartError;

pub use loader::{LapCache, LoadOutcome, MemoryLapCache, SessionLoader};
pub use provider::{OpenF1Provider, TelemetryProvider};

pub const MIN_YEAR: i32 = 2018;
pub const MAX_YEAR: i32 = 2024;
pub const DEFAULT_YEAR: i32 = 2024;
pub const DEFAULT_RACE: &str = "Monza";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    #[default]
    Race,
    Qualifying,
    FP1,
    FP2,
    FP3,
}

impl SessionKind {
    pub const ALL: [SessionKind; 5] = [
        SessionKind::Race,
        SessionKind::Qualifying,
        SessionKind::FP1,
        SessionKind::FP2,
        SessionKind::FP3,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Race => "Race",
            Self::Qualifying => "Qualifying",
            Self::FP1 => "FP1",
            Self::FP2 => "FP2",
            Self::FP3 => "FP3",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SessionKind {
    type Err = LapchartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "race" | "r" => Ok(Self::Race),
            "qualifying" | "q" => Ok(Self::Qualifying),
            "fp1" | "practice 1" => Ok(Self::FP1),
            "fp2" | "practice 2" => Ok(Self::FP2),
            "fp3" | "practice 3" => Ok(Self::FP3),
            other => Err(LapchartError::InvalidUserInput {
                field: "session".to_string(),
                reason: format!("unknown session kind '{other}'"),
            }),
        }
    }
}

/// The parameters of a single "load" action. Also the memoization key for
/// loaded sessions, so two requests only share cached laps when every field
/// matches exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionRequest {
    pub year: i32,
    pub race: String,
    pub kind: SessionKind,
}

impl SessionRequest {
    pub fn new(year: i32, race: impl Into<String>, kind: SessionKind) -> Self {
        Self {
            year,
            race: race.into(),
            kind,
        }
    }

    pub fn validate(&self) -> Result<(), LapchartError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(LapchartError::InvalidUserInput {
                field: "year".to_string(),
                reason: format!("must be between {MIN_YEAR} and {MAX_YEAR}"),
            });
        }
        if self.race.trim().is_empty() {
            return Err(LapchartError::InvalidUserInput {
                field: "race".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for SessionRequest {
    fn default() -> Self {
        Self::new(DEFAULT_YEAR, DEFAULT_RACE, SessionKind::default())
    }
}

impl fmt::Display for SessionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.year, self.race, self.kind)
    }
}

/// Identifies a session on the provider side once the request has been resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionHandle {
    pub key: u32,
    pub year: i32,
    pub kind: SessionKind,
    /// Human readable name of the event, e.g. "Monza"
    pub name: String,
}

/// One driver's timing for one lap, as returned by the provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    /// Driver abbreviation, or the car number when the provider has no abbreviation
    pub driver: Option<String>,
    pub lap_number: Option<u32>,
    pub lap_time: Option<Duration>,
    pub sector_times: [Option<Duration>; 3],
    pub is_pit_out_lap: Option<bool>,
}
