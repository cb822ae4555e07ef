//! Count function and Synapse action mode vocabularies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Count function mode.
///
/// Selects how a Count combines the edges delivered by its Synapses into
/// accumulator updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    /// Accumulate up on every qualifying edge.
    Increase,
    /// Accumulate down on every qualifying edge.
    Decrease,
    /// One Signal carries pulses, another carries direction.
    PulseDirection,
    /// Quadrature decoding, one count per cycle.
    QuadratureX1,
    /// Quadrature decoding, two counts per cycle.
    QuadratureX2,
    /// Quadrature decoding, four counts per cycle.
    QuadratureX4,
}

impl FunctionKind {
    /// Returns the externally visible name for this function mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::PulseDirection => "pulse-direction",
            Self::QuadratureX1 => "quadrature x1",
            Self::QuadratureX2 => "quadrature x2",
            Self::QuadratureX4 => "quadrature x4",
        }
    }

    /// Returns all function modes.
    pub fn all() -> &'static [FunctionKind] {
        &[
            Self::Increase,
            Self::Decrease,
            Self::PulseDirection,
            Self::QuadratureX1,
            Self::QuadratureX2,
            Self::QuadratureX4,
        ]
    }
}

impl AsRef<str> for FunctionKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for [`FunctionKind`] parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFunctionKindError {
    pub invalid: String,
}

impl fmt::Display for ParseFunctionKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid count function: {}", self.invalid)
    }
}

impl std::error::Error for ParseFunctionKindError {}

impl FromStr for FunctionKind {
    type Err = ParseFunctionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            "pulse-direction" => Ok(Self::PulseDirection),
            "quadrature x1" => Ok(Self::QuadratureX1),
            "quadrature x2" => Ok(Self::QuadratureX2),
            "quadrature x4" => Ok(Self::QuadratureX4),
            _ => Err(ParseFunctionKindError {
                invalid: s.to_string(),
            }),
        }
    }
}

/// Synapse action mode: which Signal edges trigger the owning Count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// The Signal does not trigger the Count.
    None,
    /// Trigger on low-to-high transitions.
    RisingEdge,
    /// Trigger on high-to-low transitions.
    FallingEdge,
    /// Trigger on every transition.
    BothEdges,
}

impl ActionKind {
    /// Returns the externally visible name for this action mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::RisingEdge => "rising edge",
            Self::FallingEdge => "falling edge",
            Self::BothEdges => "both edges",
        }
    }

    /// Returns all action modes.
    pub fn all() -> &'static [ActionKind] {
        &[Self::None, Self::RisingEdge, Self::FallingEdge, Self::BothEdges]
    }
}

impl AsRef<str> for ActionKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for [`ActionKind`] parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseActionKindError {
    pub invalid: String,
}

impl fmt::Display for ParseActionKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid synapse action: {}", self.invalid)
    }
}

impl std::error::Error for ParseActionKindError {}

impl FromStr for ActionKind {
    type Err = ParseActionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "rising edge" => Ok(Self::RisingEdge),
            "falling edge" => Ok(Self::FallingEdge),
            "both edges" => Ok(Self::BothEdges),
            _ => Err(ParseActionKindError {
                invalid: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_round_trip() {
        for kind in FunctionKind::all() {
            assert_eq!(kind.as_str().parse::<FunctionKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_function_names() {
        assert_eq!(FunctionKind::PulseDirection.as_str(), "pulse-direction");
        assert_eq!(FunctionKind::QuadratureX4.as_str(), "quadrature x4");
        assert!("quadrature".parse::<FunctionKind>().is_err());
    }

    #[test]
    fn test_action_round_trip() {
        for kind in ActionKind::all() {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_action_names() {
        assert_eq!(ActionKind::RisingEdge.as_str(), "rising edge");
        assert_eq!(ActionKind::BothEdges.to_string(), "both edges");
        assert!("RISING_EDGE".parse::<ActionKind>().is_err());
    }
}
