use crate::io;
use crate::model::ShiftSwapRequest;
use crate::schedule::{MonthSchedule, ScheduleSnapshot};
use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};

pub trait RequestSource {
    /// Recharge la collection complète ; aucun cache côté moteur.
    fn load(&self) -> anyhow::Result<Vec<ShiftSwapRequest>>;
}

pub trait ScheduleProvider {
    /// Planning d'un mois, `None` s'il n'existe pas.
    fn month(&self, year: i32, month: u32) -> anyhow::Result<Option<MonthSchedule>>;
}

pub struct JsonRequestFile {
    path: PathBuf,
}

impl JsonRequestFile {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl RequestSource for JsonRequestFile {
    fn load(&self) -> anyhow::Result<Vec<ShiftSwapRequest>> {
        io::import_requests_json(&self.path)
    }
}

/// Répertoire de plannings mensuels `<dir>/AAAA-MM.json`.
pub struct JsonScheduleDir {
    dir: PathBuf,
}

impl JsonScheduleDir {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, year: i32, month: u32) -> PathBuf {
        self.dir.join(format!("{year:04}-{month:02}.json"))
    }
}

impl ScheduleProvider for JsonScheduleDir {
    fn month(&self, year: i32, month: u32) -> anyhow::Result<Option<MonthSchedule>> {
        let path = self.path_for(year, month);
        if !path.exists() {
            return Ok(None);
        }
        let schedule = io::import_month_json(&path)?;
        if schedule.year != year || schedule.month != month {
            anyhow::bail!(
                "{} holds {:04}-{:02}, expected {year:04}-{month:02}",
                path.display(),
                schedule.year,
                schedule.month
            );
        }
        Ok(Some(schedule))
    }
}

/// Charge les mois couvrant `date - 1`, `date` et `date + 1`.
pub fn snapshot_around(
    provider: &dyn ScheduleProvider,
    date: NaiveDate,
) -> anyhow::Result<ScheduleSnapshot> {
    let mut months: Vec<(i32, u32)> = [date.pred_opt(), Some(date), date.succ_opt()]
        .into_iter()
        .flatten()
        .map(|d| (d.year(), d.month()))
        .collect();
    months.dedup();

    let mut snapshot = ScheduleSnapshot::new();
    for (year, month) in months {
        if let Some(schedule) = provider
            .month(year, month)
            .with_context(|| format!("loading schedule {year:04}-{month:02}"))?
        {
            snapshot.extend_month(&schedule);
        }
    }
    Ok(snapshot)
}
