use crate::scheduler::RosterError;
use chrono::{Datelike, NaiveDate, Weekday};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Jour de repos : un poste du catalogue n'y est pas ouvert.
pub const REST_DAY: Weekday = Weekday::Sun;

/// Jour de l'horizon (position 0-based, date, jour restreint ou non).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Day {
    pub index: usize,
    pub date: NaiveDate,
    pub restricted: bool,
}

impl Day {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}

/// Suite ordonnée de jours planifiés.
///
/// À la désérialisation, les jours sont recalculés depuis la première date et
/// doivent coïncider avec ceux reçus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "HorizonDays"))]
pub struct Horizon {
    days: Vec<Day>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct HorizonDays {
    days: Vec<Day>,
}

#[cfg(feature = "serde")]
impl TryFrom<HorizonDays> for Horizon {
    type Error = RosterError;

    fn try_from(raw: HorizonDays) -> Result<Self, Self::Error> {
        let Some(first) = raw.days.first() else {
            return Ok(Self::default());
        };
        let horizon = Self::span(first.date, raw.days.len())?;
        if horizon.days != raw.days {
            return Err(RosterError::InvalidCalendarInput(
                "days are not a contiguous 0-based run from the first date".to_string(),
            ));
        }
        Ok(horizon)
    }
}

impl Horizon {
    /// Horizon contigu de `len` jours à partir de `start`.
    pub fn span(start: NaiveDate, len: usize) -> Result<Self, RosterError> {
        let mut days = Vec::with_capacity(len);
        let mut current = start;
        for index in 0..len {
            days.push(Day {
                index,
                date: current,
                restricted: current.weekday() == REST_DAY,
            });
            if index + 1 < len {
                current = current.succ_opt().ok_or_else(|| {
                    RosterError::InvalidCalendarInput(format!("date overflow after {current}"))
                })?;
            }
        }
        Ok(Self { days })
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn get(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Nombre de jours du mois (calendrier grégorien proleptique).
pub fn days_in_month(year: i32, month: u32) -> Result<u32, RosterError> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| RosterError::InvalidCalendarInput(format!("year {year} out of range")))?;
    let count = next.signed_duration_since(first).num_days();
    u32::try_from(count)
        .map_err(|_| RosterError::InvalidCalendarInput(format!("bad day count for {year}-{month}")))
}

/// Développe (année, mois) en horizon, un jour par date du mois.
pub fn expand_month(year: i32, month: u32) -> Result<Horizon, RosterError> {
    let first = first_of_month(year, month)?;
    let count = days_in_month(year, month)? as usize;
    if count == 0 {
        return Err(RosterError::InvalidCalendarInput(format!(
            "{year}-{month:02} has no days"
        )));
    }
    Horizon::span(first, count)
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, RosterError> {
    if !(1..=12).contains(&month) {
        return Err(RosterError::InvalidCalendarInput(format!(
            "month must be within 1..=12, got {month}"
        )));
    }
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| RosterError::InvalidCalendarInput(format!("year {year} out of range")))
}
