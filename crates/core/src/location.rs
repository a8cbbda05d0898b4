//! The two fixed physical stock locations.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Stock location: the secretariat store room or the classroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Sekret,
    Kelas,
}

impl Location {
    pub const ALL: [Location; 2] = [Location::Sekret, Location::Kelas];

    pub fn as_str(self) -> &'static str {
        match self {
            Location::Sekret => "sekret",
            Location::Kelas => "kelas",
        }
    }

    /// Human-facing name.
    pub fn display_name(self) -> &'static str {
        match self {
            Location::Sekret => "Sekretariat",
            Location::Kelas => "Kelas",
        }
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sekret" | "sekretariat" => Ok(Location::Sekret),
            "kelas" => Ok(Location::Kelas),
            other => Err(DomainError::validation(format!("unknown location '{other}'"))),
        }
    }
}
