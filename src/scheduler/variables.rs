use crate::calendar::Horizon;
use crate::model::{ShiftCatalog, ShiftId, WorkerId};
use std::fmt;

/// Index de variable booléenne dans le modèle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn positive(self) -> Literal {
        Literal {
            var: self,
            negated: false,
        }
    }

    pub fn negative(self) -> Literal {
        Literal {
            var: self,
            negated: true,
        }
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    pub var: VarId,
    pub negated: bool,
}

/// Arène plate des variables.
///
/// Les variables de décision occupent `[0, decision_count)` : l'offset de
/// `(worker, day, shift)` vaut `worker * per_worker + day_offset[day] + slot`,
/// où `slot` est le rang du poste parmi ceux ouverts ce jour-là. Les
/// indicateurs auxiliaires suivent.
#[derive(Debug, Clone)]
pub struct VariableArena {
    worker_count: usize,
    day_count: usize,
    catalog_len: usize,
    per_worker: usize,
    day_offsets: Vec<usize>,
    /// `slots[day * catalog_len + shift]` : rang du poste ce jour, si ouvert.
    slots: Vec<Option<usize>>,
    aux_names: Vec<String>,
}

impl VariableArena {
    pub fn new(horizon: &Horizon, worker_count: usize, catalog: &ShiftCatalog) -> Self {
        let catalog_len = catalog.len();
        let mut day_offsets = Vec::with_capacity(horizon.len());
        let mut slots = vec![None; horizon.len() * catalog_len];
        let mut offset = 0usize;
        for day in horizon.days() {
            day_offsets.push(offset);
            for (rank, shift) in catalog.available_on(day).enumerate() {
                slots[day.index * catalog_len + shift.id.index()] = Some(rank);
                offset += 1;
            }
        }
        Self {
            worker_count,
            day_count: horizon.len(),
            catalog_len,
            per_worker: offset,
            day_offsets,
            slots,
            aux_names: Vec::new(),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn day_count(&self) -> usize {
        self.day_count
    }

    pub fn decision_count(&self) -> usize {
        self.worker_count * self.per_worker
    }

    pub fn aux_count(&self) -> usize {
        self.aux_names.len()
    }

    pub fn total(&self) -> usize {
        self.decision_count() + self.aux_count()
    }

    /// Vrai si le poste est ouvert ce jour-là (test O(1)).
    pub fn is_open(&self, day: usize, shift: ShiftId) -> bool {
        self.slot(day, shift).is_some()
    }

    fn slot(&self, day: usize, shift: ShiftId) -> Option<usize> {
        if day >= self.day_count || shift.index() >= self.catalog_len {
            return None;
        }
        self.slots[day * self.catalog_len + shift.index()]
    }

    pub fn decision(&self, worker: WorkerId, day: usize, shift: ShiftId) -> Option<VarId> {
        if worker.index() >= self.worker_count {
            return None;
        }
        let rank = self.slot(day, shift)?;
        Some(VarId(
            worker.index() * self.per_worker + self.day_offsets[day] + rank,
        ))
    }

    /// Variables du travailleur ce jour, un par poste ouvert.
    pub fn day_vars(&self, worker: WorkerId, day: usize) -> Vec<VarId> {
        (0..self.catalog_len)
            .filter_map(|s| self.decision(worker, day, ShiftId(s as u8)))
            .collect()
    }

    /// Variables du travailleur sur les jours `[start, end)`.
    pub fn span_vars(&self, worker: WorkerId, start: usize, end: usize) -> Vec<VarId> {
        (start..end.min(self.day_count))
            .flat_map(|d| self.day_vars(worker, d))
            .collect()
    }

    pub fn new_aux(&mut self, name: String) -> VarId {
        let id = VarId(self.decision_count() + self.aux_names.len());
        self.aux_names.push(name);
        id
    }

    pub fn aux_name(&self, var: VarId) -> Option<&str> {
        var.index()
            .checked_sub(self.decision_count())
            .and_then(|i| self.aux_names.get(i))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::expand_month;

    #[test]
    fn offsets_skip_closed_slots() {
        // avril 2025 : 26 jours ouvrés à 4 postes, 4 dimanches à 3 postes
        let horizon = expand_month(2025, 4).unwrap();
        let arena = VariableArena::new(&horizon, 4, &ShiftCatalog::standard());
        assert_eq!(arena.decision_count(), 4 * (26 * 4 + 4 * 3));

        // dimanche 6 avril = index 5
        assert!(arena.decision(WorkerId(0), 5, ShiftId(3)).is_none());
        assert_eq!(arena.day_vars(WorkerId(0), 5).len(), 3);

        let mut seen = std::collections::HashSet::new();
        for w in 0..4 {
            for d in 0..horizon.len() {
                for s in 0..4u8 {
                    if let Some(v) = arena.decision(WorkerId(w), d, ShiftId(s)) {
                        assert!(v.index() < arena.decision_count());
                        assert!(seen.insert(v));
                    }
                }
            }
        }
        assert_eq!(seen.len(), arena.decision_count());
    }

    #[test]
    fn aux_follow_decisions() {
        let horizon = expand_month(2025, 2).unwrap();
        let mut arena = VariableArena::new(&horizon, 2, &ShiftCatalog::standard());
        let first = arena.new_aux("works4[W1,d0]".into());
        assert_eq!(first.index(), arena.decision_count());
        assert_eq!(arena.aux_name(first), Some("works4[W1,d0]"));
        assert_eq!(arena.total(), arena.decision_count() + 1);
        assert!(arena.decision(WorkerId(2), 0, ShiftId(0)).is_none());
    }
}
