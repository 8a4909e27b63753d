#![allow(dead_code)]
use tournus::{Assignment, Horizon, RosterOutcome, ShiftCatalog, ShiftId, WorkerId};

/// Suites maximales (début, longueur, travaillé) d'une séquence.
pub fn runs(days: &[Option<ShiftId>]) -> Vec<(usize, usize, bool)> {
    let mut out: Vec<(usize, usize, bool)> = Vec::new();
    for (i, d) in days.iter().enumerate() {
        let working = d.is_some();
        match out.last_mut() {
            Some((_, len, w)) if *w == working => *len += 1,
            _ => out.push((i, 1, working)),
        }
    }
    out
}

pub fn assert_coverage(horizon: &Horizon, assignment: &Assignment, per_shift: usize) {
    let catalog = ShiftCatalog::standard();
    for day in horizon.days() {
        for shift in catalog.available_on(day) {
            let count = (0..assignment.worker_count())
                .filter(|w| assignment.shift(WorkerId(*w), day.index) == Some(shift.id))
                .count();
            assert_eq!(count, per_shift, "coverage on {} {}", day.date, shift.label);
        }
        if day.restricted {
            for w in 0..assignment.worker_count() {
                assert_ne!(assignment.shift(WorkerId(w), day.index), Some(ShiftId(3)));
            }
        }
    }
}

pub fn assert_no_idle_week(assignment: &Assignment) {
    for w in 0..assignment.worker_count() {
        for (start, len, working) in runs(assignment.worker_days(WorkerId(w))) {
            assert!(
                working || len < 7,
                "worker {} idle for {len} days from day {start}",
                w + 1
            );
        }
    }
}

pub fn assert_no_shift_switch(assignment: &Assignment) {
    for w in 0..assignment.worker_count() {
        for (d, pair) in assignment.worker_days(WorkerId(w)).windows(2).enumerate() {
            if let (Some(a), Some(b)) = (pair[0], pair[1]) {
                assert_eq!(a, b, "worker {} switches shift on day {}", w + 1, d + 1);
            }
        }
    }
}

pub fn assert_all_invariants(outcome: &RosterOutcome, per_shift: usize) {
    let assignment = outcome.assignment.as_ref().expect("assignment present");
    assert_eq!(assignment.day_count(), outcome.horizon.len());
    assert_coverage(&outcome.horizon, assignment, per_shift);
    assert_no_idle_week(assignment);
    assert_no_shift_switch(assignment);
}
