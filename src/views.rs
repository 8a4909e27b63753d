//! Projections du roster décodé : vue par jour et vue par travailleur.
//!
//! Les libellés passent par [`Locale`], table interchangeable ; aucune règle
//! du modèle n'en dépend.

use crate::calendar::Horizon;
use crate::model::{ShiftCatalog, ShiftId, WorkerId};
use crate::scheduler::Assignment;
use chrono::{Datelike, NaiveDate, Weekday};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Postes d'un jour : tous les postes ouverts, même sans affecté.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DayShiftRow {
    pub day: usize,
    pub date: NaiveDate,
    pub shift: ShiftId,
    pub workers: Vec<WorkerId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkerDayRow {
    pub worker: WorkerId,
    pub day: usize,
    pub date: NaiveDate,
    pub shift: Option<ShiftId>,
}

pub fn day_view(
    horizon: &Horizon,
    catalog: &ShiftCatalog,
    assignment: &Assignment,
) -> Vec<DayShiftRow> {
    let mut rows = Vec::new();
    for day in horizon.days() {
        for shift in catalog.available_on(day) {
            rows.push(DayShiftRow {
                day: day.index,
                date: day.date,
                shift: shift.id,
                workers: assignment.workers_on(day.index, shift.id),
            });
        }
    }
    rows
}

/// Séquence complète (date, poste ou repos) de chaque travailleur.
pub fn worker_view(horizon: &Horizon, assignment: &Assignment) -> Vec<WorkerDayRow> {
    let mut rows = Vec::with_capacity(assignment.worker_count() * horizon.len());
    for worker in (0..assignment.worker_count()).map(WorkerId) {
        for day in horizon.days() {
            rows.push(WorkerDayRow {
                worker,
                day: day.index,
                date: day.date,
                shift: assignment.shift(worker, day.index),
            });
        }
    }
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Locale {
    #[default]
    English,
    Portuguese,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "pt" | "pt-pt" | "portuguese" => Ok(Locale::Portuguese),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

impl Locale {
    pub fn worker(self, worker: WorkerId) -> String {
        let n = worker.index() + 1;
        match self {
            Locale::English => format!("Worker {n}"),
            Locale::Portuguese => format!("Trabalhador {n}"),
        }
    }

    pub fn weekday(self, weekday: Weekday) -> &'static str {
        use Weekday::*;
        match (self, weekday) {
            (Locale::English, Mon) => "Monday",
            (Locale::English, Tue) => "Tuesday",
            (Locale::English, Wed) => "Wednesday",
            (Locale::English, Thu) => "Thursday",
            (Locale::English, Fri) => "Friday",
            (Locale::English, Sat) => "Saturday",
            (Locale::English, Sun) => "Sunday",
            (Locale::Portuguese, Mon) => "Segunda-feira",
            (Locale::Portuguese, Tue) => "Terça-feira",
            (Locale::Portuguese, Wed) => "Quarta-feira",
            (Locale::Portuguese, Thu) => "Quinta-feira",
            (Locale::Portuguese, Fri) => "Sexta-feira",
            (Locale::Portuguese, Sat) => "Sábado",
            (Locale::Portuguese, Sun) => "Domingo",
        }
    }

    /// Nom de période du poste standard (matin, soir, nuit, journée longue).
    pub fn period(self, shift: ShiftId) -> &'static str {
        match (self, shift.0) {
            (Locale::English, 0) => "Morning",
            (Locale::English, 1) => "Evening",
            (Locale::English, 2) => "Night",
            (Locale::English, 3) => "Extended",
            (Locale::Portuguese, 0) => "Manhã",
            (Locale::Portuguese, 1) => "Tarde",
            (Locale::Portuguese, 2) => "Noite",
            (Locale::Portuguese, 3) => "Estendido",
            _ => "",
        }
    }

    pub fn off(self) -> &'static str {
        match self {
            Locale::English => "Off",
            Locale::Portuguese => "Folga",
        }
    }

    pub fn working(self) -> &'static str {
        match self {
            Locale::English => "Working",
            Locale::Portuguese => "Trabalho",
        }
    }

    pub fn unassigned(self) -> &'static str {
        match self {
            Locale::English => "Unassigned",
            Locale::Portuguese => "Não atribuído",
        }
    }

    /// Liste « Worker 1, Worker 3 », ou le libellé « non affecté ».
    pub fn worker_list(self, workers: &[WorkerId]) -> String {
        if workers.is_empty() {
            return self.unassigned().to_string();
        }
        workers
            .iter()
            .map(|w| self.worker(*w))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn shift_or_off(self, catalog: &ShiftCatalog, shift: Option<ShiftId>) -> &'static str {
        shift.map_or(self.off(), |s| catalog.label(s))
    }

    pub fn status(self, shift: Option<ShiftId>) -> &'static str {
        if shift.is_some() {
            self.working()
        } else {
            self.off()
        }
    }
}

/// Rendu texte compact de la vue par jour (une ligne par poste ouvert).
pub fn render_day_view(rows: &[DayShiftRow], catalog: &ShiftCatalog, locale: Locale) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "{} {:<9} {:<8} {}\n",
            row.date,
            locale.weekday(row.date.weekday()),
            catalog.label(row.shift),
            locale.worker_list(&row.workers)
        ));
    }
    out
}
