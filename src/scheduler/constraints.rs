use super::variables::{Literal, VarId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    AtMost,
    AtLeast,
    Exactly,
}

/// Famille de contrainte, pour les comptages et les journaux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    OneShiftPerDay,
    Coverage,
    RotationPattern,
    WeeklyBounds,
    ShiftConsistency,
    NoRestWeek,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// `Σ terms (comparison) rhs`
    Linear {
        terms: Vec<VarId>,
        comparison: Comparison,
        rhs: usize,
    },
    /// `a == b`
    Equal { a: VarId, b: VarId },
}

/// Contrainte nommée, éventuellement conditionnée par une conjonction de
/// littéraux (semi-réification : « si A alors B »).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub name: String,
    pub family: ConstraintFamily,
    pub relation: Relation,
    pub enforced_by: Vec<Literal>,
}

impl Constraint {
    pub fn linear(
        name: String,
        family: ConstraintFamily,
        terms: Vec<VarId>,
        comparison: Comparison,
        rhs: usize,
    ) -> Self {
        Self {
            name,
            family,
            relation: Relation::Linear {
                terms,
                comparison,
                rhs,
            },
            enforced_by: Vec::new(),
        }
    }

    pub fn equal(name: String, family: ConstraintFamily, a: VarId, b: VarId) -> Self {
        Self {
            name,
            family,
            relation: Relation::Equal { a, b },
            enforced_by: Vec::new(),
        }
    }

    /// N'applique la contrainte que lorsque `lit` est vrai.
    pub fn only_if(mut self, lit: Literal) -> Self {
        self.enforced_by.push(lit);
        self
    }

    pub fn is_reified(&self) -> bool {
        !self.enforced_by.is_empty()
    }

    /// Évalue la contrainte sur une valuation complète.
    pub fn holds(&self, values: &[bool]) -> bool {
        let value = |v: VarId| values.get(v.index()).copied().unwrap_or(false);
        let active = self
            .enforced_by
            .iter()
            .all(|lit| value(lit.var) != lit.negated);
        if !active {
            return true;
        }
        match &self.relation {
            Relation::Linear {
                terms,
                comparison,
                rhs,
            } => {
                let sum = terms.iter().filter(|v| value(**v)).count();
                match comparison {
                    Comparison::AtMost => sum <= *rhs,
                    Comparison::AtLeast => sum >= *rhs,
                    Comparison::Exactly => sum == *rhs,
                }
            }
            Relation::Equal { a, b } => value(*a) == value(*b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reified_constraint_is_vacuous_when_guard_false() {
        let c = Constraint::linear(
            "lock".into(),
            ConstraintFamily::ShiftConsistency,
            vec![VarId(1)],
            Comparison::AtLeast,
            1,
        )
        .only_if(VarId(0).positive());
        assert!(c.holds(&[false, false]));
        assert!(!c.holds(&[true, false]));
        assert!(c.holds(&[true, true]));
    }

    #[test]
    fn negated_guard() {
        let c = Constraint::linear(
            "not-both".into(),
            ConstraintFamily::ShiftConsistency,
            vec![VarId(1), VarId(2)],
            Comparison::AtMost,
            1,
        )
        .only_if(VarId(0).negative());
        assert!(!c.holds(&[false, true, true]));
        assert!(c.holds(&[true, true, true]));
    }
}
