use super::builder::RosterModel;
use super::types::RosterError;
use crate::model::{ShiftId, WorkerId};
use crate::solver::Solution;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Résultat décodé : (travailleur, jour) → au plus un poste.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    worker_count: usize,
    day_count: usize,
    /// `cells[worker * day_count + day]`
    cells: Vec<Option<ShiftId>>,
}

impl Assignment {
    pub fn empty(worker_count: usize, day_count: usize) -> Self {
        Self {
            worker_count,
            day_count,
            cells: vec![None; worker_count * day_count],
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn day_count(&self) -> usize {
        self.day_count
    }

    pub fn shift(&self, worker: WorkerId, day: usize) -> Option<ShiftId> {
        if worker.index() >= self.worker_count || day >= self.day_count {
            return None;
        }
        self.cells[worker.index() * self.day_count + day]
    }

    pub fn set(&mut self, worker: WorkerId, day: usize, shift: Option<ShiftId>) {
        if worker.index() < self.worker_count && day < self.day_count {
            self.cells[worker.index() * self.day_count + day] = shift;
        }
    }

    pub fn works(&self, worker: WorkerId, day: usize) -> bool {
        self.shift(worker, day).is_some()
    }

    /// Séquence du travailleur, dans l'ordre de l'horizon.
    pub fn worker_days(&self, worker: WorkerId) -> &[Option<ShiftId>] {
        if worker.index() >= self.worker_count {
            return &[];
        }
        let start = worker.index() * self.day_count;
        &self.cells[start..start + self.day_count]
    }

    pub fn workers_on(&self, day: usize, shift: ShiftId) -> Vec<WorkerId> {
        (0..self.worker_count)
            .map(WorkerId)
            .filter(|w| self.shift(*w, day) == Some(shift))
            .collect()
    }
}

/// Reconstruit l'affectation à partir de la valuation du moteur.
///
/// Un statut sans valuation, une variable manquante ou plusieurs postes vrais
/// pour un même (travailleur, jour) sont des violations de contrat.
pub fn decode(solution: &Solution, model: &RosterModel) -> Result<Assignment, RosterError> {
    if !solution.status().is_success() {
        return Err(RosterError::SolverContractViolation(format!(
            "cannot decode a {} answer",
            solution.status()
        )));
    }
    let values = solution.values().ok_or_else(|| {
        RosterError::SolverContractViolation("successful answer carries no valuation".to_string())
    })?;
    if values.len() != model.variable_count() {
        return Err(RosterError::SolverContractViolation(format!(
            "valuation covers {} variables, model has {}",
            values.len(),
            model.variable_count()
        )));
    }

    let horizon = model.horizon();
    let catalog = model.catalog();
    let mut assignment = Assignment::empty(model.worker_count(), horizon.len());

    for worker in (0..model.worker_count()).map(WorkerId) {
        for day in horizon.days() {
            let mut chosen: Option<ShiftId> = None;
            for shift in catalog.available_on(day) {
                let var = model.decision(worker, day.index, shift.id).ok_or_else(|| {
                    RosterError::SolverContractViolation(format!(
                        "no variable for {worker} on day {} shift {}",
                        day.index, shift.id
                    ))
                })?;
                if !values[var.index()] {
                    continue;
                }
                if let Some(previous) = chosen {
                    return Err(RosterError::SolverContractViolation(format!(
                        "{worker} holds both {previous} and {} on {}",
                        shift.id, day.date
                    )));
                }
                chosen = Some(shift.id);
            }
            assignment.set(worker, day.index, chosen);
        }
    }

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Horizon;
    use crate::model::ShiftCatalog;
    use crate::scheduler::{build_model, Policy};
    use crate::solver::SolveStatus;
    use chrono::NaiveDate;

    fn tiny_model() -> RosterModel {
        let horizon = Horizon::span(NaiveDate::from_ymd_opt(2025, 4, 5).unwrap(), 2).unwrap();
        build_model(&horizon, &Policy::new(2, 1, 0, 7, false), &ShiftCatalog::standard()).unwrap()
    }

    #[test]
    fn decodes_single_true_shift() {
        let model = tiny_model();
        let mut values = vec![false; model.variable_count()];
        let v = model.decision(WorkerId(1), 1, ShiftId(2)).unwrap();
        values[v.index()] = true;
        let assignment = decode(&Solution::solved(SolveStatus::Feasible, values), &model).unwrap();
        assert_eq!(assignment.shift(WorkerId(1), 1), Some(ShiftId(2)));
        assert_eq!(assignment.shift(WorkerId(0), 0), None);
        assert_eq!(assignment.workers_on(1, ShiftId(2)), vec![WorkerId(1)]);
    }

    #[test]
    fn two_true_shifts_is_a_contract_violation() {
        let model = tiny_model();
        let mut values = vec![false; model.variable_count()];
        for s in [0u8, 3] {
            let v = model.decision(WorkerId(0), 0, ShiftId(s)).unwrap();
            values[v.index()] = true;
        }
        let err = decode(&Solution::solved(SolveStatus::Optimal, values), &model).unwrap_err();
        assert!(matches!(err, RosterError::SolverContractViolation(_)));
    }

    #[test]
    fn short_valuation_is_rejected() {
        let model = tiny_model();
        let values = vec![false; model.variable_count() - 1];
        let err = decode(&Solution::solved(SolveStatus::Optimal, values), &model).unwrap_err();
        assert!(matches!(err, RosterError::SolverContractViolation(_)));
    }

    #[test]
    fn unsuccessful_status_cannot_be_decoded() {
        let model = tiny_model();
        assert!(decode(&Solution::infeasible(), &model).is_err());
        assert!(decode(&Solution::timed_out(), &model).is_err());
    }
}
