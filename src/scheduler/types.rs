use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Budget de résolution par défaut (secondes).
pub const DEFAULT_TIME_BUDGET_SECS: u64 = 30;

/// Options de résolution
#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    pub time_budget: Duration,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(DEFAULT_TIME_BUDGET_SECS),
        }
    }
}

/// Règle de cohérence de poste pendant une période travaillée.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConsistencyRule {
    /// Le poste tenu un jour est reconduit sur les trois jours suivants.
    BlockLock,
    /// Deux jours travaillés consécutifs portent le même poste.
    AdjacentDay,
}

/// Politique de roulement
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Policy {
    pub worker_count: usize,
    pub workers_per_shift: usize,
    pub min_weekly_work_days: usize,
    pub max_weekly_work_days: usize,
    pub strict_rotation: bool,
    /// `None` : règle déduite de `strict_rotation`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub consistency: Option<ConsistencyRule>,
}

impl Policy {
    pub fn new(
        worker_count: usize,
        workers_per_shift: usize,
        min_weekly_work_days: usize,
        max_weekly_work_days: usize,
        strict_rotation: bool,
    ) -> Self {
        Self {
            worker_count,
            workers_per_shift,
            min_weekly_work_days,
            max_weekly_work_days,
            strict_rotation,
            consistency: None,
        }
    }

    pub fn with_consistency(mut self, rule: ConsistencyRule) -> Self {
        self.consistency = Some(rule);
        self
    }

    /// Règle effectivement appliquée par le constructeur de modèle.
    pub fn consistency_rule(&self) -> ConsistencyRule {
        match (self.consistency, self.strict_rotation) {
            (Some(rule), _) => rule,
            (None, true) => ConsistencyRule::BlockLock,
            (None, false) => ConsistencyRule::AdjacentDay,
        }
    }

    /// Rejette les politiques incohérentes avant toute construction.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.worker_count < 1 {
            return Err(RosterError::InvalidPolicy(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if self.workers_per_shift < 1 {
            return Err(RosterError::InvalidPolicy(
                "workers_per_shift must be at least 1".to_string(),
            ));
        }
        if self.min_weekly_work_days > self.max_weekly_work_days {
            return Err(RosterError::InvalidPolicy(format!(
                "min_weekly_work_days ({}) exceeds max_weekly_work_days ({})",
                self.min_weekly_work_days, self.max_weekly_work_days
            )));
        }
        Ok(())
    }
}

/// Demande de planification pour un mois donné.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RosterRequest {
    pub year: i32,
    pub month: u32,
    pub policy: Policy,
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("invalid calendar input: {0}")]
    InvalidCalendarInput(String),
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
    #[error("no roster satisfies this policy over the horizon")]
    Infeasible,
    #[error("time budget of {0:?} exhausted before a conclusion")]
    TimedOut(Duration),
    #[error("solver contract violation: {0}")]
    SolverContractViolation(String),
    #[error("solver backend failure: {0}")]
    Backend(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistency_follows_rotation_mode() {
        assert_eq!(
            Policy::new(4, 1, 1, 7, true).consistency_rule(),
            ConsistencyRule::BlockLock
        );
        assert_eq!(
            Policy::new(4, 1, 1, 7, false).consistency_rule(),
            ConsistencyRule::AdjacentDay
        );
        let forced = Policy::new(4, 1, 1, 7, true).with_consistency(ConsistencyRule::AdjacentDay);
        assert_eq!(forced.consistency_rule(), ConsistencyRule::AdjacentDay);
    }

    #[test]
    fn rejects_inverted_weekly_bounds() {
        let err = Policy::new(5, 1, 5, 3, false).validate().unwrap_err();
        assert!(matches!(err, RosterError::InvalidPolicy(_)));
    }

    #[test]
    fn rejects_empty_crew_and_zero_headcount() {
        assert!(matches!(
            Policy::new(0, 1, 1, 7, true).validate(),
            Err(RosterError::InvalidPolicy(_))
        ));
        assert!(matches!(
            Policy::new(4, 0, 1, 7, true).validate(),
            Err(RosterError::InvalidPolicy(_))
        ));
    }
}
