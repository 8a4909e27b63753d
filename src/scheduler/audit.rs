use super::builder::{RosterModel, LOCK_SPAN_DAYS, WEEK_DAYS};
use super::decode::Assignment;
use super::types::ConsistencyRule;
use crate::model::{ShiftId, WorkerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Effectif d'un poste différent de la consigne.
    Coverage,
    /// 7 jours consécutifs sans travail.
    IdleWeek,
    /// Tranche hebdomadaire hors bornes (mode flexible).
    WeeklyBounds,
    /// Poste non reconduit dans son bloc de 4 jours.
    BlockBroken,
    /// Changement de poste entre deux jours travaillés.
    ShiftSwitch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub worker: Option<WorkerId>,
    pub day: usize,
    pub shift: Option<ShiftId>,
}

/// Revérifie l'affectation décodée contre les règles effectivement posées par
/// le modèle, sans faire confiance à la valuation brute.
pub fn audit(model: &RosterModel, assignment: &Assignment) -> Vec<Violation> {
    let mut out = Vec::new();
    let horizon = model.horizon();
    let catalog = model.catalog();
    let policy = model.policy();
    let n = horizon.len();

    for day in horizon.days() {
        for shift in catalog.available_on(day) {
            if assignment.workers_on(day.index, shift.id).len() != policy.workers_per_shift {
                out.push(Violation {
                    kind: ViolationKind::Coverage,
                    worker: None,
                    day: day.index,
                    shift: Some(shift.id),
                });
            }
        }
    }

    for worker in (0..model.worker_count()).map(WorkerId) {
        let days = assignment.worker_days(worker);

        for start in 0..(n + 1).saturating_sub(WEEK_DAYS) {
            if days[start..start + WEEK_DAYS].iter().all(Option::is_none) {
                out.push(Violation {
                    kind: ViolationKind::IdleWeek,
                    worker: Some(worker),
                    day: start,
                    shift: None,
                });
            }
        }

        if !policy.strict_rotation {
            for start in (0..n).step_by(WEEK_DAYS) {
                let end = (start + WEEK_DAYS).min(n);
                let worked = days[start..end].iter().filter(|d| d.is_some()).count();
                if worked < policy.min_weekly_work_days || worked > policy.max_weekly_work_days {
                    out.push(Violation {
                        kind: ViolationKind::WeeklyBounds,
                        worker: Some(worker),
                        day: start,
                        shift: None,
                    });
                }
            }
        }

        match policy.consistency_rule() {
            ConsistencyRule::BlockLock => {
                for start in 0..(n + 1).saturating_sub(LOCK_SPAN_DAYS) {
                    let Some(shift) = days[start] else { continue };
                    for offset in 1..LOCK_SPAN_DAYS {
                        let day = start + offset;
                        let open = horizon
                            .get(day)
                            .is_some_and(|d| catalog.is_available(shift, d));
                        if open && days[day] != Some(shift) {
                            out.push(Violation {
                                kind: ViolationKind::BlockBroken,
                                worker: Some(worker),
                                day,
                                shift: Some(shift),
                            });
                        }
                    }
                }
            }
            ConsistencyRule::AdjacentDay => {
                for (d, pair) in days.windows(2).enumerate() {
                    let (Some(a), Some(b)) = (pair[0], pair[1]) else {
                        continue;
                    };
                    if a == b {
                        continue;
                    }
                    let a_open_next = horizon
                        .get(d + 1)
                        .is_some_and(|day| catalog.is_available(a, day));
                    let b_open_prev = horizon
                        .get(d)
                        .is_some_and(|day| catalog.is_available(b, day));
                    if a_open_next || b_open_prev {
                        out.push(Violation {
                            kind: ViolationKind::ShiftSwitch,
                            worker: Some(worker),
                            day: d + 1,
                            shift: Some(b),
                        });
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Horizon;
    use crate::model::ShiftCatalog;
    use crate::scheduler::{build_model, Policy};
    use chrono::NaiveDate;

    #[test]
    fn flags_switch_idle_week_and_coverage() {
        // lundi 7 avril 2025, 8 jours
        let horizon = Horizon::span(NaiveDate::from_ymd_opt(2025, 4, 7).unwrap(), 8).unwrap();
        let policy = Policy::new(2, 1, 0, 7, false);
        let model = build_model(&horizon, &policy, &ShiftCatalog::standard()).unwrap();

        let mut assignment = Assignment::empty(2, 8);
        assignment.set(WorkerId(0), 0, Some(ShiftId(0)));
        assignment.set(WorkerId(0), 1, Some(ShiftId(1)));

        let violations = audit(&model, &assignment);
        let has = |kind: ViolationKind, worker: Option<WorkerId>| {
            violations.iter().any(|v| v.kind == kind && v.worker == worker)
        };
        assert!(violations.iter().any(|v| {
            v.kind == ViolationKind::ShiftSwitch && v.worker == Some(WorkerId(0)) && v.day == 1
        }));
        assert!(has(ViolationKind::IdleWeek, Some(WorkerId(1))));
        assert!(has(ViolationKind::Coverage, None));
    }

    #[test]
    fn block_lock_ignores_closed_sunday() {
        // samedi 5 avril 2025 : poste 3 le samedi, repos le dimanche, reprise lundi
        let horizon = Horizon::span(NaiveDate::from_ymd_opt(2025, 4, 5).unwrap(), 4).unwrap();
        let policy = Policy::new(1, 1, 0, 7, true);
        let model = build_model(&horizon, &policy, &ShiftCatalog::standard()).unwrap();

        let mut assignment = Assignment::empty(1, 4);
        for day in [0, 2, 3] {
            assignment.set(WorkerId(0), day, Some(ShiftId(3)));
        }
        let broken: Vec<_> = audit(&model, &assignment)
            .into_iter()
            .filter(|v| v.kind == ViolationKind::BlockBroken)
            .collect();
        assert!(broken.is_empty(), "{broken:?}");
    }
}
