#![forbid(unsafe_code)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tournus::{
    build_model, expand_month, Policy, RosterError, RosterModel, RosterRequest, Scheduler,
    ShiftCatalog, ShiftId, Solution, SolveOptions, SolveStatus, SolvingBackend, WorkerId,
};

/// Moteur factice : compte les appels et renvoie une réponse fixe.
struct Scripted {
    calls: AtomicUsize,
    reply: fn(&RosterModel) -> Solution,
}

impl Scripted {
    fn new(reply: fn(&RosterModel) -> Solution) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply,
        }
    }
}

impl SolvingBackend for Scripted {
    fn solve(&self, model: &RosterModel, _budget: Duration) -> Result<Solution, RosterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((self.reply)(model))
    }
}

fn april(policy: Policy) -> RosterRequest {
    RosterRequest {
        year: 2025,
        month: 4,
        policy,
    }
}

#[test]
fn month_horizons_match_calendar() {
    for (year, month, len, sundays) in [
        (2025, 4, 30, 4),
        (2024, 2, 29, 4),
        (2023, 2, 28, 4),
        (2025, 3, 31, 5),
        (2025, 12, 31, 4),
    ] {
        let horizon = expand_month(year, month).unwrap();
        assert_eq!(horizon.len(), len, "{year}-{month}");
        assert_eq!(horizon.days().iter().filter(|d| d.restricted).count(), sundays);
        assert!(horizon.days().iter().enumerate().all(|(i, d)| d.index == i));
    }
}

#[test]
fn decision_variables_follow_open_shifts() {
    let catalog = ShiftCatalog::standard();
    for workers in [1, 4, 7] {
        let horizon = expand_month(2025, 3).unwrap();
        let policy = Policy::new(workers, 1, 1, 7, false);
        let model = build_model(&horizon, &policy, &catalog).unwrap();
        // 26 jours ouverts à 4 postes, 5 dimanches à 3 postes
        assert_eq!(model.decision_count(), workers * (26 * 4 + 5 * 3));
        assert!(model.variable_count() >= model.decision_count());
        let sunday = horizon.days().iter().find(|d| d.restricted).unwrap();
        assert!(model.decision(WorkerId(0), sunday.index, ShiftId(3)).is_none());
        assert!(model.decision(WorkerId(0), sunday.index, ShiftId(2)).is_some());
    }
}

#[test]
fn invalid_policy_rejected_before_solving() {
    let backend = Scripted::new(|_| Solution::infeasible());
    let scheduler = Scheduler::new(&backend);
    let err = scheduler.plan(&april(Policy::new(4, 1, 5, 3, false))).unwrap_err();
    assert!(matches!(err, RosterError::InvalidPolicy(_)));
    let err = scheduler.plan(&april(Policy::new(0, 1, 1, 7, true))).unwrap_err();
    assert!(matches!(err, RosterError::InvalidPolicy(_)));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn invalid_month_rejected_before_solving() {
    let backend = Scripted::new(|_| Solution::infeasible());
    let scheduler = Scheduler::new(&backend);
    let request = RosterRequest {
        year: 2025,
        month: 13,
        policy: Policy::new(4, 1, 1, 7, true),
    };
    let err = scheduler.plan(&request).unwrap_err();
    assert!(matches!(err, RosterError::InvalidCalendarInput(_)));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn timed_out_is_a_status_not_an_error() {
    let backend = Scripted::new(|_| Solution::timed_out());
    let scheduler = Scheduler::new(&backend).with_options(SolveOptions {
        time_budget: Duration::from_secs(2),
    });
    let outcome = scheduler.plan(&april(Policy::new(4, 1, 1, 7, true))).unwrap();
    assert_eq!(outcome.status, SolveStatus::TimedOut);
    assert!(outcome.assignment.is_none());
    assert!(matches!(
        outcome.into_assignment(),
        Err(RosterError::TimedOut(d)) if d == Duration::from_secs(2)
    ));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn two_shifts_same_day_breaks_contract() {
    let backend = Scripted::new(|model| {
        Solution::solved(SolveStatus::Feasible, vec![true; model.variable_count()])
    });
    let err = Scheduler::new(&backend)
        .plan(&april(Policy::new(4, 1, 1, 7, true)))
        .unwrap_err();
    assert!(matches!(err, RosterError::SolverContractViolation(_)));
}

#[test]
fn short_valuation_breaks_contract() {
    let backend = Scripted::new(|_| Solution::solved(SolveStatus::Optimal, vec![false; 3]));
    let err = Scheduler::new(&backend)
        .plan(&april(Policy::new(4, 1, 1, 7, true)))
        .unwrap_err();
    assert!(matches!(err, RosterError::SolverContractViolation(_)));
}

#[test]
fn uncovered_roster_caught_by_audit() {
    // valuation complète et cohérente, mais personne ne travaille
    let backend = Scripted::new(|model| {
        Solution::solved(SolveStatus::Feasible, vec![false; model.variable_count()])
    });
    let err = Scheduler::new(&backend)
        .plan(&april(Policy::new(4, 1, 1, 7, false)))
        .unwrap_err();
    assert!(matches!(err, RosterError::SolverContractViolation(_)));
}
