use crate::model::{Mission, NurseId, ShiftCode};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Affectations `(date, infirmière) -> code de garde`.
///
/// Sert aussi bien pour le planning validé que pour les modifications
/// provisoires (overrides) évaluées avant un échange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleSnapshot {
    by_nurse: HashMap<NurseId, BTreeMap<NaiveDate, ShiftCode>>,
}

impl ScheduleSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construit un instantané à partir de plannings mensuels.
    pub fn from_months<'a, I>(months: I) -> Self
    where
        I: IntoIterator<Item = &'a MonthSchedule>,
    {
        let mut snapshot = Self::new();
        for month in months {
            snapshot.extend_month(month);
        }
        snapshot
    }

    pub fn extend_month(&mut self, month: &MonthSchedule) {
        for (nurse, days) in &month.nurses {
            for (idx, code) in days.shifts.iter().enumerate() {
                let Some(code) = code else { continue };
                if let Some(date) = month.date_of_index(idx) {
                    self.insert(date, nurse.clone(), *code);
                }
            }
        }
    }

    pub fn insert(&mut self, date: NaiveDate, nurse: NurseId, code: ShiftCode) -> Option<ShiftCode> {
        self.by_nurse.entry(nurse).or_default().insert(date, code)
    }

    /// Variante chaînable de [`insert`](Self::insert).
    pub fn with(mut self, date: NaiveDate, nurse: NurseId, code: ShiftCode) -> Self {
        self.insert(date, nurse, code);
        self
    }

    pub fn get(&self, date: NaiveDate, nurse: &NurseId) -> Option<ShiftCode> {
        self.by_nurse
            .get(nurse)
            .and_then(|days| days.get(&date))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_nurse.values().all(BTreeMap::is_empty)
    }

    pub fn len(&self) -> usize {
        self.by_nurse.values().map(BTreeMap::len).sum()
    }
}

/// Garde effective : la modification provisoire l'emporte sur le planning.
pub fn resolve_shift(
    snapshot: &ScheduleSnapshot,
    overrides: &ScheduleSnapshot,
    date: NaiveDate,
    nurse: &NurseId,
) -> Option<ShiftCode> {
    overrides
        .get(date, nurse)
        .or_else(|| snapshot.get(date, nurse))
}

/// Planning d'un mois tel que livré par le fournisseur externe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSchedule {
    pub year: i32,
    pub month: u32,
    pub nurses: BTreeMap<NurseId, NurseMonth>,
}

/// Tableaux par infirmière, index = jour du mois - 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NurseMonth {
    pub shifts: Vec<Option<ShiftCode>>,
    pub missions: Vec<Option<Mission>>,
    pub overtime: Vec<Option<ShiftCode>>,
}

impl MonthSchedule {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            nurses: BTreeMap::new(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    fn date_of_index(&self, idx: usize) -> Option<NaiveDate> {
        let day = u32::try_from(idx).ok()?.checked_add(1)?;
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    fn day_index(&self, date: NaiveDate) -> Option<usize> {
        if !self.contains(date) {
            return None;
        }
        usize::try_from(date.day0()).ok()
    }

    pub fn shift_on(&self, nurse: &NurseId, date: NaiveDate) -> Option<ShiftCode> {
        let idx = self.day_index(date)?;
        self.nurses.get(nurse)?.shifts.get(idx).copied().flatten()
    }

    pub fn mission_on(&self, nurse: &NurseId, date: NaiveDate) -> Option<&Mission> {
        let idx = self.day_index(date)?;
        self.nurses.get(nurse)?.missions.get(idx)?.as_ref()
    }

    pub fn overtime_on(&self, nurse: &NurseId, date: NaiveDate) -> Option<ShiftCode> {
        let idx = self.day_index(date)?;
        self.nurses.get(nurse)?.overtime.get(idx).copied().flatten()
    }
}
