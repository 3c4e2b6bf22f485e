//! Euler column buckling
//!
//! Closed-form critical load of an ideal column; no stiffness matrix is
//! assembled.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};

/// Column end conditions and their effective length factor K
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndCondition {
    /// Both ends pinned (K = 1.0)
    #[default]
    PinPin,
    /// Cantilever column (K = 2.0)
    FixedFree,
    /// Both ends fixed (K = 0.5)
    FixedFixed,
    /// One end fixed, one pinned (K = 0.7)
    FixedPin,
}

impl EndCondition {
    /// Effective length factor
    pub fn k_factor(self) -> f64 {
        match self {
            Self::PinPin => 1.0,
            Self::FixedFree => 2.0,
            Self::FixedFixed => 0.5,
            Self::FixedPin => 0.7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PinPin => "pin-pin",
            Self::FixedFree => "fixed-free",
            Self::FixedFixed => "fixed-fixed",
            Self::FixedPin => "fixed-pin",
        }
    }
}

impl FromStr for EndCondition {
    type Err = FEAError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pin-pin" => Ok(Self::PinPin),
            "fixed-free" => Ok(Self::FixedFree),
            "fixed-fixed" => Ok(Self::FixedFixed),
            "fixed-pin" => Ok(Self::FixedPin),
            other => Err(FEAError::InvalidInput(format!(
                "unknown end condition '{}' (expected pin-pin, fixed-free, fixed-fixed or fixed-pin)",
                other
            ))),
        }
    }
}

impl fmt::Display for EndCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An axially loaded prismatic column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnModel {
    /// Unbraced length
    pub length: f64,
    /// Modulus of elasticity
    pub e: f64,
    /// Moment of inertia about the buckling axis
    pub i: f64,
    /// Cross-sectional area
    pub a: f64,
    /// End conditions
    pub end_condition: EndCondition,
}

/// Critical buckling values of a column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucklingResults {
    /// Euler critical load
    #[serde(rename = "P_cr")]
    pub p_cr: f64,
    /// Critical stress (0 without a positive area)
    pub sigma_cr: f64,
    /// Slenderness ratio L_eff / r (0 without a positive radius of gyration)
    pub slenderness: f64,
    /// Effective length factor
    #[serde(rename = "K")]
    pub k: f64,
    /// Effective length
    #[serde(rename = "L_eff")]
    pub l_eff: f64,
}

impl ColumnModel {
    /// Create a new column
    pub fn new(length: f64, e: f64, i: f64, a: f64, end_condition: EndCondition) -> Self {
        Self {
            length,
            e,
            i,
            a,
            end_condition,
        }
    }

    /// Radius of gyration √(I/A), or 0 without a positive area
    pub fn radius_of_gyration(&self) -> f64 {
        if self.a > 0.0 {
            (self.i / self.a).sqrt()
        } else {
            0.0
        }
    }

    /// Compute the Euler critical load and derived values
    pub fn analyze(&self) -> FEAResult<BucklingResults> {
        for (name, value) in [("length", self.length), ("E", self.e), ("I", self.i), ("A", self.a)] {
            if !value.is_finite() {
                return Err(FEAError::InvalidInput(format!(
                    "column {} must be finite (received {})",
                    name, value
                )));
            }
        }
        for (name, value) in [("E", self.e), ("I", self.i)] {
            if value <= 0.0 {
                return Err(FEAError::InvalidInput(format!(
                    "column {} must be positive (received {})",
                    name, value
                )));
            }
        }

        let k = self.end_condition.k_factor();
        let l_eff = k * self.length;
        if l_eff <= 0.0 {
            return Err(FEAError::InvalidGeometry(format!(
                "effective length must be positive (received {})",
                l_eff
            )));
        }

        let p_cr = PI.powi(2) * self.e * self.i / l_eff.powi(2);
        let sigma_cr = if self.a > 0.0 { p_cr / self.a } else { 0.0 };
        let r = self.radius_of_gyration();
        let slenderness = if r > 0.0 { l_eff / r } else { 0.0 };

        Ok(BucklingResults {
            p_cr,
            sigma_cr,
            slenderness,
            k,
            l_eff,
        })
    }
}
