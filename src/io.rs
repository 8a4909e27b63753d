use crate::model::ShiftCatalog;
use crate::scheduler::{RosterOutcome, RosterRequest};
use crate::views::{DayShiftRow, Locale, WorkerDayRow};
use anyhow::Context;
use chrono::Datelike;
use csv::{Terminator, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Charge une demande de planification (JSON).
pub fn load_request_json<P: AsRef<Path>>(path: P) -> anyhow::Result<RosterRequest> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let request: RosterRequest = serde_json::from_slice(&data)
        .with_context(|| format!("parsing request {}", path.display()))?;
    Ok(request)
}

/// Export JSON du résultat (jolie mise en forme)
pub fn export_outcome_json<P: AsRef<Path>>(path: P, outcome: &RosterOutcome) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(outcome)?;
    write_atomic(path.as_ref(), &json)
}

/// Export CSV de la vue par jour: header `date,day,shift,period,workers,count`
pub fn export_day_view_csv<P: AsRef<Path>>(
    path: P,
    rows: &[DayShiftRow],
    catalog: &ShiftCatalog,
    locale: Locale,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new()
        .has_headers(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    w.write_record(["date", "day", "shift", "period", "workers", "count"])?;
    for row in rows {
        let date = row.date.to_string();
        let count = row.workers.len().to_string();
        let workers = locale.worker_list(&row.workers);
        w.write_record([
            date.as_str(),
            locale.weekday(row.date.weekday()),
            catalog.label(row.shift),
            locale.period(row.shift),
            workers.as_str(),
            count.as_str(),
        ])?;
    }
    let bytes = w
        .into_inner()
        .map_err(|err| anyhow::anyhow!("flushing day view: {err}"))?;
    write_atomic(path.as_ref(), &bytes)
}

/// Export CSV de la vue par travailleur: header `worker,date,day,shift,status`
pub fn export_worker_view_csv<P: AsRef<Path>>(
    path: P,
    rows: &[WorkerDayRow],
    catalog: &ShiftCatalog,
    locale: Locale,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new()
        .has_headers(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    w.write_record(["worker", "date", "day", "shift", "status"])?;
    for row in rows {
        let worker = locale.worker(row.worker);
        let date = row.date.to_string();
        w.write_record([
            worker.as_str(),
            date.as_str(),
            locale.weekday(row.date.weekday()),
            locale.shift_or_off(catalog, row.shift),
            locale.status(row.shift),
        ])?;
    }
    let bytes = w
        .into_inner()
        .map_err(|err| anyhow::anyhow!("flushing worker view: {err}"))?;
    write_atomic(path.as_ref(), &bytes)
}

/// Écriture atomique : fichier temporaire voisin puis renommage.
fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Horizon;
    use crate::model::{ShiftId, WorkerId};
    use crate::scheduler::Assignment;
    use crate::views::{day_view, worker_view};
    use chrono::NaiveDate;

    fn sample() -> (Horizon, Assignment) {
        // dimanche 6 avril 2025
        let horizon = Horizon::span(NaiveDate::from_ymd_opt(2025, 4, 6).unwrap(), 1).unwrap();
        let mut assignment = Assignment::empty(2, 1);
        assignment.set(WorkerId(0), 0, Some(ShiftId(2)));
        (horizon, assignment)
    }

    #[test]
    fn day_view_csv_lists_unassigned_shifts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("days.csv");
        let (horizon, assignment) = sample();
        let catalog = ShiftCatalog::standard();
        let rows = day_view(&horizon, &catalog, &assignment);
        export_day_view_csv(&path, &rows, &catalog, Locale::English).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        insta::assert_snapshot!(text.trim_end(), @r###"
        date,day,shift,period,workers,count
        2025-04-06,Sunday,7h-16h,Morning,Unassigned,0
        2025-04-06,Sunday,15h-00h,Evening,Unassigned,0
        2025-04-06,Sunday,00h-08h,Night,Worker 1,1
        "###);
    }

    #[test]
    fn worker_view_csv_in_portuguese() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workers.csv");
        let (horizon, assignment) = sample();
        let catalog = ShiftCatalog::standard();
        let rows = worker_view(&horizon, &assignment);
        export_worker_view_csv(&path, &rows, &catalog, Locale::Portuguese).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        insta::assert_snapshot!(text.trim_end(), @r###"
        worker,date,day,shift,status
        Trabalhador 1,2025-04-06,Domingo,00h-08h,Trabalho
        Trabalhador 2,2025-04-06,Domingo,Folga,Folga
        "###);
    }
}
