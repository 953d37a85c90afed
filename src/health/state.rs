//! Node health state machine.
//!
//! # States
//! - Green: node is serving and preferred for traffic
//! - Yellow: node is degraded or unproven, used only when no Green node exists
//! - Red: node is failing and never selected
//!
//! # State Transitions
//! ```text
//! probe success: Red → Yellow → Green → Green
//! probe failure: Green → Yellow → Red → Red
//! ```
//!
//! # Design Decisions
//! - A single flaky probe moves a node one step, never straight to Red
//! - Two consecutive outcomes of the same kind always settle the state

use std::fmt;

/// Perceived state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Health {
    Green,
    /// Starting state of every node.
    #[default]
    Yellow,
    Red,
}

impl Health {
    /// Move one step towards Green.
    pub fn improve(self) -> Health {
        match self {
            Health::Red => Health::Yellow,
            Health::Yellow | Health::Green => Health::Green,
        }
    }

    /// Move one step towards Red.
    pub fn degrade(self) -> Health {
        match self {
            Health::Green => Health::Yellow,
            Health::Yellow | Health::Red => Health::Red,
        }
    }

    /// Green and Yellow nodes may receive requests.
    pub fn is_selectable(self) -> bool {
        !matches!(self, Health::Red)
    }

    /// Value exported on the node health gauge.
    pub fn gauge_value(self) -> f64 {
        match self {
            Health::Green => 2.0,
            Health::Yellow => 1.0,
            Health::Red => 0.0,
        }
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Health::Green => "Green",
            Health::Yellow => "Yellow",
            Health::Red => "Red",
        };
        f.write_str(name)
    }
}
