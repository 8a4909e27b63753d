use crate::scheduler::constraints::{Comparison, Constraint, Relation};
use crate::scheduler::variables::{Literal, VarId};
use crate::scheduler::RosterModel;

/// Formule CNF au format DIMACS (littéraux signés, variables 1-based).
///
/// Les variables `1..=model.variable_count()` sont celles du modèle ; les
/// compteurs unaires ajoutent des variables au-delà.
#[derive(Debug, Clone, Default)]
pub struct Cnf {
    num_vars: usize,
    clauses: Vec<Vec<i32>>,
    contradiction: bool,
}

impl Cnf {
    pub(super) fn with_vars(num_vars: usize) -> Self {
        Self {
            num_vars,
            ..Self::default()
        }
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn clauses(&self) -> &[Vec<i32>] {
        &self.clauses
    }

    /// Vrai si une clause vide a été produite : instance insatisfiable.
    pub fn has_empty_clause(&self) -> bool {
        self.contradiction
    }

    pub fn into_parts(self) -> (usize, Vec<Vec<i32>>) {
        (self.num_vars, self.clauses)
    }

    fn fresh(&mut self) -> i32 {
        self.num_vars += 1;
        self.num_vars as i32
    }

    pub(super) fn add(&mut self, clause: Vec<i32>) {
        if clause.is_empty() {
            self.contradiction = true;
        }
        self.clauses.push(clause);
    }

    /// Clause gardée : `¬g1 ∨ ... ∨ ¬gk ∨ lits`.
    fn add_guarded(&mut self, guard: &[i32], lits: &[i32]) {
        let mut clause = Vec::with_capacity(guard.len() + lits.len());
        clause.extend_from_slice(guard);
        clause.extend_from_slice(lits);
        self.add(clause);
    }

    /// Compteur unaire séquentiel : renvoie `r[j-1] ⇔ au moins j termes vrais`
    /// pour `j` dans `1..=min(cap, terms.len())`.
    fn unary_counter(&mut self, terms: &[i32], cap: usize) -> Vec<i32> {
        let mut prev: Vec<i32> = Vec::new();
        for &x in terms {
            let width = (prev.len() + 1).min(cap);
            let mut next = Vec::with_capacity(width);
            for j in 1..=width {
                let r = self.fresh();
                let keep = prev.get(j - 1).copied();
                let carry = if j == 1 { None } else { Some(prev[j - 2]) };

                // r ⇐ keep ∨ (carry ∧ x)
                if let Some(k) = keep {
                    self.add(vec![-k, r]);
                }
                match carry {
                    None => self.add(vec![-x, r]),
                    Some(c) => self.add(vec![-c, -x, r]),
                }
                // r ⇒ keep ∨ carry
                match (keep, carry) {
                    (Some(k), Some(c)) => self.add(vec![-r, k, c]),
                    (None, Some(c)) => self.add(vec![-r, c]),
                    _ => {}
                }
                // r ⇒ keep ∨ x
                match keep {
                    Some(k) => self.add(vec![-r, k, x]),
                    None => self.add(vec![-r, x]),
                }
                next.push(r);
            }
            prev = next;
        }
        prev
    }

    fn at_least(&mut self, guard: &[i32], terms: &[i32], k: usize) {
        if k == 0 {
            return;
        }
        if k > terms.len() {
            self.add_guarded(guard, &[]);
            return;
        }
        if k == 1 {
            self.add_guarded(guard, terms);
            return;
        }
        let counter = self.unary_counter(terms, k);
        self.add_guarded(guard, &[counter[k - 1]]);
    }

    fn at_most(&mut self, guard: &[i32], terms: &[i32], k: usize) {
        if k >= terms.len() {
            return;
        }
        if k == 0 {
            for &t in terms {
                self.add_guarded(guard, &[-t]);
            }
            return;
        }
        let counter = self.unary_counter(terms, k + 1);
        self.add_guarded(guard, &[-counter[k]]);
    }

    fn exactly(&mut self, guard: &[i32], terms: &[i32], k: usize) {
        if k > terms.len() {
            self.add_guarded(guard, &[]);
            return;
        }
        if k == 0 {
            self.at_most(guard, terms, 0);
            return;
        }
        let cap = (k + 1).min(terms.len());
        let counter = self.unary_counter(terms, cap);
        self.add_guarded(guard, &[counter[k - 1]]);
        if k < terms.len() {
            self.add_guarded(guard, &[-counter[k]]);
        }
    }

    fn constraint(&mut self, constraint: &Constraint) {
        let guard: Vec<i32> = constraint.enforced_by.iter().map(|l| -dimacs(*l)).collect();
        match &constraint.relation {
            Relation::Linear {
                terms,
                comparison,
                rhs,
            } => {
                let lits: Vec<i32> = terms.iter().map(|v| dimacs(v.positive())).collect();
                match comparison {
                    Comparison::AtMost => self.at_most(&guard, &lits, *rhs),
                    Comparison::AtLeast => self.at_least(&guard, &lits, *rhs),
                    Comparison::Exactly => self.exactly(&guard, &lits, *rhs),
                }
            }
            Relation::Equal { a, b } => {
                let (a, b) = (var_dimacs(*a), var_dimacs(*b));
                self.add_guarded(&guard, &[-a, b]);
                self.add_guarded(&guard, &[a, -b]);
            }
        }
    }
}

fn var_dimacs(var: VarId) -> i32 {
    var.index() as i32 + 1
}

fn dimacs(lit: Literal) -> i32 {
    let v = var_dimacs(lit.var);
    if lit.negated {
        -v
    } else {
        v
    }
}

/// Traduit le modèle en CNF.
pub fn encode(model: &RosterModel) -> Cnf {
    let mut cnf = Cnf::with_vars(model.variable_count());
    for constraint in model.constraints() {
        cnf.constraint(constraint);
    }
    tracing::debug!(
        vars = cnf.num_vars(),
        clauses = cnf.clauses().len(),
        "model lowered to CNF"
    );
    cnf
}
