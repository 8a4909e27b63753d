//! Frontière avec le moteur de résolution.
//!
//! Le cœur ne fait qu'exiger un contrat : un statut, et une valuation totale
//! de chaque variable soumise quand le statut est `Optimal` ou `Feasible`.
//! `SatBackend` fournit une implémentation sur un solveur SAT CDCL.

mod cnf;
mod sat;

pub use cnf::{encode, Cnf};
pub use sat::SatBackend;

use crate::scheduler::{RosterError, RosterModel};
use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    TimedOut,
}

impl SolveStatus {
    pub fn is_success(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::TimedOut => "TIMED_OUT",
        };
        f.write_str(s)
    }
}

/// Réponse du moteur, consommée une seule fois par le décodeur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    status: SolveStatus,
    values: Option<Vec<bool>>,
}

impl Solution {
    pub fn solved(status: SolveStatus, values: Vec<bool>) -> Self {
        debug_assert!(status.is_success());
        Self {
            status,
            values: Some(values),
        }
    }

    pub fn infeasible() -> Self {
        Self {
            status: SolveStatus::Infeasible,
            values: None,
        }
    }

    pub fn timed_out() -> Self {
        Self {
            status: SolveStatus::TimedOut,
            values: None,
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn values(&self) -> Option<&[bool]> {
        self.values.as_deref()
    }
}

/// Capacité de résolution externe.
pub trait SolvingBackend {
    /// Soumet le modèle (emprunté en lecture) avec un budget de temps réel.
    fn solve(&self, model: &RosterModel, budget: Duration) -> Result<Solution, RosterError>;
}

impl<B: SolvingBackend + ?Sized> SolvingBackend for &B {
    fn solve(&self, model: &RosterModel, budget: Duration) -> Result<Solution, RosterError> {
        (**self).solve(model, budget)
    }
}
