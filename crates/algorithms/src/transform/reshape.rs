//! Variance-stabilizing reshape functions
//!
//! A reshape is a monotonic function applied to a whole column before it
//! is standardized, used to pull in long right tails:
//!
//! ```text
//! log:  x -> ln(x + c)
//! sqrt: x -> sqrt(x + c)
//! ```
//!
//! The shift `c` must keep every shifted value inside the function's
//! domain. It is either given explicitly or derived from the column.

use serde::Deserialize;

/// How the shift constant of a reshape is chosen
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReshapeShift {
    /// Explicit constant
    Fixed(f64),
    /// Derived from the column minimum at run time: `1 - min` for log
    /// (the minimum maps to 0), `-min` for sqrt (the minimum maps to 0)
    #[serde(deserialize_with = "from_minimum::deserialize")]
    FromMinimum,
}

/// A monotonic column reshape
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "function", rename_all = "lowercase")]
pub enum Reshape {
    Log {
        shift: ReshapeShift,
    },
    Sqrt {
        shift: ReshapeShift,
    },
}

impl Reshape {
    pub fn log(shift: f64) -> Self {
        Reshape::Log {
            shift: ReshapeShift::Fixed(shift),
        }
    }

    pub fn sqrt(shift: f64) -> Self {
        Reshape::Sqrt {
            shift: ReshapeShift::Fixed(shift),
        }
    }

    /// Function name, for messages
    pub fn name(&self) -> &'static str {
        match self {
            Reshape::Log { .. } => "log",
            Reshape::Sqrt { .. } => "sqrt",
        }
    }

    fn shift(&self) -> ReshapeShift {
        match *self {
            Reshape::Log { shift } | Reshape::Sqrt { shift } => shift,
        }
    }

    /// Shift constant to use for this column
    pub fn resolve_shift(&self, values: &[f64]) -> f64 {
        match self.shift() {
            ReshapeShift::Fixed(c) => c,
            ReshapeShift::FromMinimum => {
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                if !min.is_finite() {
                    return 0.0;
                }
                match self {
                    Reshape::Log { .. } => 1.0 - min,
                    Reshape::Sqrt { .. } => -min,
                }
            }
        }
    }

    /// Whether `value + shift` is inside the function's domain
    pub fn in_domain(&self, value: f64, shift: f64) -> bool {
        let shifted = value + shift;
        match self {
            Reshape::Log { .. } => shifted > 0.0,
            Reshape::Sqrt { .. } => shifted >= 0.0,
        }
    }

    /// Apply the function to one value
    pub fn apply(&self, value: f64, shift: f64) -> f64 {
        match self {
            Reshape::Log { .. } => (value + shift).ln(),
            Reshape::Sqrt { .. } => (value + shift).sqrt(),
        }
    }
}

/// `shift = "min"` in configuration files
mod from_minimum {
    use serde::de::{Deserializer, Error, Unexpected};
    use serde::Deserialize;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<(), D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "min" {
            Ok(())
        } else {
            Err(D::Error::invalid_value(Unexpected::Str(&s), &"\"min\""))
        }
    }
}
