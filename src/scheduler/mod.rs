mod audit;
mod builder;
pub mod constraints;
mod decode;
mod types;
pub mod variables;

pub use audit::{audit, Violation, ViolationKind};
pub use builder::{
    build_model, RosterModel, LOCK_SPAN_DAYS, PATTERN_OFF_DAYS, PATTERN_ON_DAYS, WEEK_DAYS,
};
pub use decode::{decode, Assignment};
pub use types::{
    ConsistencyRule, Policy, RosterError, RosterRequest, SolveOptions, DEFAULT_TIME_BUDGET_SECS,
};

use crate::calendar::{expand_month, Horizon};
use crate::model::ShiftCatalog;
use crate::solver::{SolveStatus, SolvingBackend};
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Résultat d'une planification : statut, horizon, affectation si succès.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RosterOutcome {
    pub status: SolveStatus,
    pub horizon: Horizon,
    pub assignment: Option<Assignment>,
    pub time_budget: Duration,
}

impl RosterOutcome {
    /// Affectation, ou l'erreur correspondant au statut.
    pub fn into_assignment(self) -> Result<Assignment, RosterError> {
        match (self.status, self.assignment) {
            (SolveStatus::Infeasible, _) => Err(RosterError::Infeasible),
            (SolveStatus::TimedOut, _) => Err(RosterError::TimedOut(self.time_budget)),
            (_, Some(assignment)) => Ok(assignment),
            (status, None) => Err(RosterError::SolverContractViolation(format!(
                "{status} outcome without assignment"
            ))),
        }
    }
}

/// Scheduler : chaîne calendrier → modèle → moteur → décodage → audit.
///
/// Sans état entre deux appels : chaque `plan` construit son propre modèle.
#[derive(Debug, Default)]
pub struct Scheduler<B> {
    backend: B,
    options: SolveOptions,
    catalog: ShiftCatalog,
}

impl<B: SolvingBackend> Scheduler<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            options: SolveOptions::default(),
            catalog: ShiftCatalog::standard(),
        }
    }

    pub fn with_options(mut self, options: SolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> SolveOptions {
        self.options
    }

    pub fn catalog(&self) -> &ShiftCatalog {
        &self.catalog
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Planifie un mois. `Infeasible` et `TimedOut` sont des statuts, pas des
    /// erreurs ; les entrées invalides et les réponses incohérentes du moteur
    /// en sont.
    pub fn plan(&self, request: &RosterRequest) -> Result<RosterOutcome, RosterError> {
        let horizon = expand_month(request.year, request.month)?;
        self.plan_horizon(&horizon, &request.policy)
    }

    /// Planifie un horizon arbitraire.
    pub fn plan_horizon(
        &self,
        horizon: &Horizon,
        policy: &Policy,
    ) -> Result<RosterOutcome, RosterError> {
        policy.validate()?;
        let started = Instant::now();
        let model = build_model(horizon, policy, &self.catalog)?;

        tracing::info!(
            days = horizon.len(),
            workers = policy.worker_count,
            variables = model.variable_count(),
            constraints = model.constraints().len(),
            strict = policy.strict_rotation,
            "solving roster model"
        );

        let solution = self.backend.solve(&model, self.options.time_budget)?;
        let status = solution.status();
        if !status.is_success() {
            tracing::info!(%status, elapsed_ms = started.elapsed().as_millis() as u64, "no roster");
            return Ok(RosterOutcome {
                status,
                horizon: horizon.clone(),
                assignment: None,
                time_budget: self.options.time_budget,
            });
        }

        let assignment = decode(&solution, &model)?;
        let violations = audit(&model, &assignment);
        if let Some(first) = violations.first() {
            tracing::warn!(count = violations.len(), ?first, "decoded roster breaks the model");
            return Err(RosterError::SolverContractViolation(format!(
                "{} rule violation(s) in decoded roster, first: {:?} on day {}",
                violations.len(),
                first.kind,
                first.day
            )));
        }

        tracing::info!(%status, elapsed_ms = started.elapsed().as_millis() as u64, "roster ready");
        Ok(RosterOutcome {
            status,
            horizon: horizon.clone(),
            assignment: Some(assignment),
            time_budget: self.options.time_budget,
        })
    }
}
