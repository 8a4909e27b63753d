use super::{encode, Cnf, Solution, SolveStatus, SolvingBackend};
use crate::scheduler::{RosterError, RosterModel};
use cadical::{Callbacks, Solver};
use std::time::{Duration, Instant};

/// Moteur SAT CDCL (CaDiCaL).
///
/// La recherche tourne sur le thread appelant et s'interrompt d'elle-même à
/// l'échéance du budget : rien ne survit à l'appel. Une réponse obtenue après
/// l'échéance est traitée comme un budget épuisé. Le modèle n'ayant pas
/// d'objectif, toute valuation trouvée est rapportée `Optimal`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SatBackend;

impl SatBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Terminateur interrogé par le moteur pendant la recherche.
struct Deadline {
    at: Option<Instant>,
}

impl Callbacks for Deadline {
    fn terminate(&mut self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Issue brute d'une recherche.
#[derive(Debug, PartialEq, Eq)]
enum Search {
    Model(Vec<bool>),
    Unsatisfiable,
    Interrupted,
}

impl SolvingBackend for SatBackend {
    fn solve(&self, model: &RosterModel, budget: Duration) -> Result<Solution, RosterError> {
        let cnf = encode(model);
        if cnf.has_empty_clause() {
            tracing::info!("empty clause while encoding, instance is infeasible");
            return Ok(Solution::infeasible());
        }

        let started = Instant::now();
        let outcome = search(&cnf, started.checked_add(budget));
        let elapsed = started.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;
        let late = elapsed >= budget;

        match outcome {
            Search::Model(mut values) if !late => {
                tracing::debug!(elapsed_ms, "model found");
                values.truncate(model.variable_count());
                Ok(Solution::solved(SolveStatus::Optimal, values))
            }
            Search::Unsatisfiable if !late => {
                tracing::debug!(elapsed_ms, "unsatisfiable");
                Ok(Solution::infeasible())
            }
            _ => {
                tracing::warn!(
                    budget_ms = budget.as_millis() as u64,
                    elapsed_ms,
                    "search stopped, budget exhausted"
                );
                Ok(Solution::timed_out())
            }
        }
    }
}

fn search(cnf: &Cnf, deadline: Option<Instant>) -> Search {
    let mut solver: Solver<Deadline> = Solver::new();
    solver.set_callbacks(Some(Deadline { at: deadline }));
    for clause in cnf.clauses() {
        solver.add_clause(clause.iter().copied());
    }

    match solver.solve() {
        None => Search::Interrupted,
        Some(false) => Search::Unsatisfiable,
        Some(true) => {
            // variables jamais vues par le moteur : non contraintes, valeur fausse
            let seen = solver.max_variable().max(0) as usize;
            let values = (1..=cnf.num_vars())
                .map(|v| v <= seen && solver.value(v as i32) == Some(true))
                .collect();
            Search::Model(values)
        }
    }
}
