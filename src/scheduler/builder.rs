use super::constraints::{Comparison, Constraint, ConstraintFamily};
use super::types::{ConsistencyRule, Policy, RosterError};
use super::variables::{VarId, VariableArena};
use crate::calendar::Horizon;
use crate::model::{ShiftCatalog, ShiftId, WorkerId};

/// Jours travaillés consécutifs du motif strict.
pub const PATTERN_ON_DAYS: usize = 4;
/// Jours de repos qui suivent le bloc travaillé.
pub const PATTERN_OFF_DAYS: usize = 2;
/// Fenêtre hebdomadaire (bornes flexibles, semaine sans repos total).
pub const WEEK_DAYS: usize = 7;
/// Longueur d'un bloc verrouillé sur un même poste.
pub const LOCK_SPAN_DAYS: usize = 4;

/// Modèle booléen complet pour un horizon : variables + contraintes.
#[derive(Debug, Clone)]
pub struct RosterModel {
    horizon: Horizon,
    catalog: ShiftCatalog,
    policy: Policy,
    vars: VariableArena,
    constraints: Vec<Constraint>,
}

impl RosterModel {
    pub fn horizon(&self) -> &Horizon {
        &self.horizon
    }

    pub fn catalog(&self) -> &ShiftCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn variables(&self) -> &VariableArena {
        &self.vars
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn worker_count(&self) -> usize {
        self.vars.worker_count()
    }

    pub fn decision_count(&self) -> usize {
        self.vars.decision_count()
    }

    pub fn variable_count(&self) -> usize {
        self.vars.total()
    }

    pub fn decision(&self, worker: WorkerId, day: usize, shift: ShiftId) -> Option<VarId> {
        self.vars.decision(worker, day, shift)
    }

    pub fn count(&self, family: ConstraintFamily) -> usize {
        self.constraints.iter().filter(|c| c.family == family).count()
    }

    /// Vérifie qu'une valuation complète satisfait toutes les contraintes.
    pub fn first_unsatisfied(&self, values: &[bool]) -> Option<&Constraint> {
        self.constraints.iter().find(|c| !c.holds(values))
    }
}

/// Construit le modèle : une variable par (travailleur, jour, poste ouvert),
/// puis les contraintes de couverture, d'unicité, de roulement, de cohérence
/// de poste et d'absence de semaine entièrement chômée.
pub fn build_model(
    horizon: &Horizon,
    policy: &Policy,
    catalog: &ShiftCatalog,
) -> Result<RosterModel, RosterError> {
    policy.validate()?;
    if horizon.is_empty() {
        return Err(RosterError::InvalidCalendarInput(
            "horizon has no days".to_string(),
        ));
    }

    let mut builder = Builder {
        horizon,
        catalog,
        policy,
        vars: VariableArena::new(horizon, policy.worker_count, catalog),
        constraints: Vec::new(),
    };

    builder.one_shift_per_day();
    builder.exact_coverage();
    if policy.strict_rotation {
        builder.strict_pattern();
    } else {
        builder.weekly_bounds();
    }
    match policy.consistency_rule() {
        ConsistencyRule::BlockLock => builder.block_lock(),
        ConsistencyRule::AdjacentDay => builder.adjacent_day_lock(),
    }
    builder.no_rest_week();

    tracing::debug!(
        decisions = builder.vars.decision_count(),
        auxiliaries = builder.vars.aux_count(),
        constraints = builder.constraints.len(),
        "roster model built"
    );

    Ok(RosterModel {
        horizon: horizon.clone(),
        catalog: *catalog,
        policy: policy.clone(),
        vars: builder.vars,
        constraints: builder.constraints,
    })
}

struct Builder<'a> {
    horizon: &'a Horizon,
    catalog: &'a ShiftCatalog,
    policy: &'a Policy,
    vars: VariableArena,
    constraints: Vec<Constraint>,
}

impl Builder<'_> {
    fn workers(&self) -> impl Iterator<Item = WorkerId> {
        (0..self.policy.worker_count).map(WorkerId)
    }

    fn day_count(&self) -> usize {
        self.horizon.len()
    }

    /// Indices de départ des fenêtres de `len` jours entièrement dans l'horizon.
    fn window_starts(&self, len: usize) -> std::ops::Range<usize> {
        0..(self.day_count() + 1).saturating_sub(len)
    }

    fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    fn one_shift_per_day(&mut self) {
        for worker in self.workers() {
            for day in 0..self.day_count() {
                let terms = self.vars.day_vars(worker, day);
                self.push(Constraint::linear(
                    format!("one_shift[{worker},d{day}]"),
                    ConstraintFamily::OneShiftPerDay,
                    terms,
                    Comparison::AtMost,
                    1,
                ));
            }
        }
    }

    fn exact_coverage(&mut self) {
        for day in self.horizon.days() {
            for shift in self.catalog.available_on(day) {
                let terms: Vec<VarId> = self
                    .workers()
                    .filter_map(|w| self.vars.decision(w, day.index, shift.id))
                    .collect();
                self.push(Constraint::linear(
                    format!("coverage[d{},{}]", day.index, shift.id),
                    ConstraintFamily::Coverage,
                    terms,
                    Comparison::Exactly,
                    self.policy.workers_per_shift,
                ));
            }
        }
    }

    /// Motif 4 jours travaillés / 2 jours de repos, sur chaque fenêtre de 6
    /// jours complète. Les indicateurs sont semi-réifiés : `works4` impose le
    /// bloc travaillé, `off2` impose le repos, et les deux sont égaux.
    fn strict_pattern(&mut self) {
        let window = PATTERN_ON_DAYS + PATTERN_OFF_DAYS;
        for worker in self.workers() {
            for start in self.window_starts(window) {
                let on_end = start + PATTERN_ON_DAYS;
                let works = self.vars.new_aux(format!("works4[{worker},d{start}]"));
                let off = self.vars.new_aux(format!("off2[{worker},d{start}]"));

                let on_terms = self.vars.span_vars(worker, start, on_end);
                let off_terms = self.vars.span_vars(worker, on_end, start + window);

                self.push(
                    Constraint::linear(
                        format!("pattern_on[{worker},d{start}]"),
                        ConstraintFamily::RotationPattern,
                        on_terms,
                        Comparison::Exactly,
                        PATTERN_ON_DAYS,
                    )
                    .only_if(works.positive()),
                );
                self.push(
                    Constraint::linear(
                        format!("pattern_off[{worker},d{start}]"),
                        ConstraintFamily::RotationPattern,
                        off_terms,
                        Comparison::Exactly,
                        0,
                    )
                    .only_if(off.positive()),
                );
                self.push(Constraint::equal(
                    format!("pattern_link[{worker},d{start}]"),
                    ConstraintFamily::RotationPattern,
                    works,
                    off,
                ));
            }
        }
    }

    /// Bornes hebdomadaires sur les tranches 0..7, 7..14, ...; la dernière
    /// tranche peut être plus courte et garde les mêmes bornes.
    fn weekly_bounds(&mut self) {
        let (min, max) = (
            self.policy.min_weekly_work_days,
            self.policy.max_weekly_work_days,
        );
        for worker in self.workers() {
            for start in (0..self.day_count()).step_by(WEEK_DAYS) {
                let terms = self.vars.span_vars(worker, start, start + WEEK_DAYS);
                self.push(Constraint::linear(
                    format!("week_min[{worker},d{start}]"),
                    ConstraintFamily::WeeklyBounds,
                    terms.clone(),
                    Comparison::AtLeast,
                    min,
                ));
                self.push(Constraint::linear(
                    format!("week_max[{worker},d{start}]"),
                    ConstraintFamily::WeeklyBounds,
                    terms,
                    Comparison::AtMost,
                    max,
                ));
            }
        }
    }

    /// Poste tenu au jour `d` reconduit sur `d+1..d+3`, là où il est ouvert.
    fn block_lock(&mut self) {
        for worker in self.workers() {
            for start in self.window_starts(LOCK_SPAN_DAYS) {
                let Some(day) = self.horizon.get(start) else {
                    continue;
                };
                for shift in self.catalog.available_on(day) {
                    let Some(first) = self.vars.decision(worker, start, shift.id) else {
                        continue;
                    };
                    for offset in 1..LOCK_SPAN_DAYS {
                        let Some(next) = self.vars.decision(worker, start + offset, shift.id)
                        else {
                            continue;
                        };
                        self.push(
                            Constraint::linear(
                                format!("lock[{worker},d{start}+{offset},{}]", shift.id),
                                ConstraintFamily::ShiftConsistency,
                                vec![next],
                                Comparison::AtLeast,
                                1,
                            )
                            .only_if(first.positive()),
                        );
                    }
                }
            }
        }
    }

    /// `both[w,d]` vaut vrai ssi w travaille à `d` et à `d+1` ; dans ce cas
    /// chaque poste ouvert les deux jours garde la même valeur.
    fn adjacent_day_lock(&mut self) {
        for worker in self.workers() {
            for day in 0..self.day_count().saturating_sub(1) {
                let both = self.vars.new_aux(format!("both[{worker},d{day}]"));
                let today = self.vars.day_vars(worker, day);
                let tomorrow = self.vars.day_vars(worker, day + 1);
                let mut either = today.clone();
                either.extend(tomorrow.iter().copied());

                self.push(
                    Constraint::linear(
                        format!("both_today[{worker},d{day}]"),
                        ConstraintFamily::ShiftConsistency,
                        today,
                        Comparison::AtLeast,
                        1,
                    )
                    .only_if(both.positive()),
                );
                self.push(
                    Constraint::linear(
                        format!("both_tomorrow[{worker},d{day}]"),
                        ConstraintFamily::ShiftConsistency,
                        tomorrow,
                        Comparison::AtLeast,
                        1,
                    )
                    .only_if(both.positive()),
                );
                self.push(
                    Constraint::linear(
                        format!("not_both[{worker},d{day}]"),
                        ConstraintFamily::ShiftConsistency,
                        either,
                        Comparison::AtMost,
                        1,
                    )
                    .only_if(both.negative()),
                );

                for shift in self.catalog.shifts() {
                    let pair = (
                        self.vars.decision(worker, day, shift.id),
                        self.vars.decision(worker, day + 1, shift.id),
                    );
                    if let (Some(a), Some(b)) = pair {
                        self.push(
                            Constraint::equal(
                                format!("same_shift[{worker},d{day},{}]", shift.id),
                                ConstraintFamily::ShiftConsistency,
                                a,
                                b,
                            )
                            .only_if(both.positive()),
                        );
                    }
                }
            }
        }
    }

    fn no_rest_week(&mut self) {
        for worker in self.workers() {
            for start in self.window_starts(WEEK_DAYS) {
                let terms = self.vars.span_vars(worker, start, start + WEEK_DAYS);
                self.push(Constraint::linear(
                    format!("no_rest_week[{worker},d{start}]"),
                    ConstraintFamily::NoRestWeek,
                    terms,
                    Comparison::AtLeast,
                    1,
                ));
            }
        }
    }
}
