//! Support conditions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FEAError;

/// Support category, resolved once when the model is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportKind {
    /// Translations restrained, rotation free
    #[serde(rename = "pin", alias = "pinned")]
    Pinned,
    /// Transverse (Y) translation restrained only
    #[serde(rename = "roller")]
    Roller,
    /// All DOFs restrained
    #[serde(rename = "fixed")]
    Fixed,
}

impl SupportKind {
    /// Beam restraints [v, θ]
    ///
    /// A beam node has no axial DOF, so pinned and roller supports coincide.
    pub fn beam_restraints(self) -> [bool; 2] {
        match self {
            Self::Pinned | Self::Roller => [true, false],
            Self::Fixed => [true, true],
        }
    }

    /// Frame restraints [u, v, θ]
    pub fn frame_restraints(self) -> [bool; 3] {
        match self {
            Self::Pinned => [true, true, false],
            Self::Roller => [false, true, false],
            Self::Fixed => [true, true, true],
        }
    }

    /// Parse a beam support label: anything other than "fixed" or "roller" is a pin
    pub fn from_beam_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "fixed" => Self::Fixed,
            "roller" => Self::Roller,
            _ => Self::Pinned,
        }
    }

    /// Label used in reports
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pinned => "pin",
            Self::Roller => "roller",
            Self::Fixed => "fixed",
        }
    }
}

/// Local DOF offsets flagged in a restraint pattern
pub fn restrained_dofs(restraints: &[bool]) -> Vec<usize> {
    restraints
        .iter()
        .enumerate()
        .filter_map(|(i, &fixed)| if fixed { Some(i) } else { None })
        .collect()
}

impl FromStr for SupportKind {
    type Err = FEAError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pin" | "pinned" => Ok(Self::Pinned),
            "roller" => Ok(Self::Roller),
            "fixed" => Ok(Self::Fixed),
            other => Err(FEAError::InvalidInput(format!(
                "unknown support type '{}' (expected pin, roller or fixed)",
                other
            ))),
        }
    }
}

impl fmt::Display for SupportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
