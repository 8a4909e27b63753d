use crate::calendar::Day;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifiant de poste : position dans le catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShiftId(pub u8);

impl ShiftId {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Identifiant de travailleur (0-based, affiché 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkerId(pub usize);

impl WorkerId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0 + 1)
    }
}

/// Poste du catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Shift {
    pub id: ShiftId,
    pub label: &'static str,
    pub available_on_restricted: bool,
}

const STANDARD_SHIFTS: [Shift; 4] = [
    Shift {
        id: ShiftId(0),
        label: "7h-16h",
        available_on_restricted: true,
    },
    Shift {
        id: ShiftId(1),
        label: "15h-00h",
        available_on_restricted: true,
    },
    Shift {
        id: ShiftId(2),
        label: "00h-08h",
        available_on_restricted: true,
    },
    Shift {
        id: ShiftId(3),
        label: "9h-21h",
        available_on_restricted: false,
    },
];

/// Catalogue statique des postes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftCatalog {
    shifts: &'static [Shift],
}

impl Default for ShiftCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ShiftCatalog {
    /// Matin, soir, nuit (tous les jours) et journée longue (fermée le dimanche).
    pub const fn standard() -> Self {
        Self {
            shifts: &STANDARD_SHIFTS,
        }
    }

    pub fn shifts(&self) -> &'static [Shift] {
        self.shifts
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn get(&self, id: ShiftId) -> Option<&'static Shift> {
        self.shifts.get(id.index())
    }

    pub fn label(&self, id: ShiftId) -> &'static str {
        self.get(id).map_or("?", |s| s.label)
    }

    pub fn is_available(&self, id: ShiftId, day: &Day) -> bool {
        self.get(id)
            .is_some_and(|s| !day.restricted || s.available_on_restricted)
    }

    /// Postes ouverts ce jour-là, dans l'ordre du catalogue.
    pub fn available_on<'a>(&'a self, day: &'a Day) -> impl Iterator<Item = &'static Shift> + 'a {
        self.shifts
            .iter()
            .filter(move |s| !day.restricted || s.available_on_restricted)
    }
}
