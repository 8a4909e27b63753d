#![forbid(unsafe_code)]
//! Tournus : planification mensuelle de roulements par modèle booléen.
//!
//! - Calendrier du mois, dimanche = jour restreint (poste 9h-21h fermé).
//! - Modèle : une variable par (travailleur, jour, poste ouvert), contraintes
//!   de couverture exacte, de roulement 4/2 ou hebdomadaire, de cohérence de
//!   poste et d'absence de semaine chômée.
//! - Résolution déléguée à un moteur SAT sous budget de temps, puis décodage
//!   et audit de l'affectation.

pub mod calendar;
#[cfg(feature = "serde")]
pub mod io;
pub mod model;
pub mod scheduler;
pub mod solver;
pub mod views;

pub use calendar::{days_in_month, expand_month, Day, Horizon, REST_DAY};
pub use model::{Shift, ShiftCatalog, ShiftId, WorkerId};
pub use scheduler::{
    audit, build_model, decode, Assignment, ConsistencyRule, Policy, RosterError, RosterModel,
    RosterOutcome, RosterRequest, Scheduler, SolveOptions, Violation, ViolationKind,
};
pub use solver::{SatBackend, Solution, SolveStatus, SolvingBackend};
pub use views::{day_view, worker_view, DayShiftRow, Locale, WorkerDayRow};
