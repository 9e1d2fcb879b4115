use crate::model::{Mission, NurseId, ShiftCode, ShiftSwapRequest, NO_OVERTIME};
use crate::schedule::{MonthSchedule, NurseMonth};
use crate::swap::resolve_display_status;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Import des demandes depuis le JSON du backend (tableau camelCase).
pub fn import_requests_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ShiftSwapRequest>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let requests: Vec<ShiftSwapRequest> =
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(requests)
}

#[derive(Debug, Deserialize)]
struct RawMonth {
    year: i32,
    month: u32,
    #[serde(default)]
    nurses: BTreeMap<String, RawNurseMonth>,
}

#[derive(Debug, Default, Deserialize)]
struct RawNurseMonth {
    #[serde(default)]
    shifts: Vec<Option<String>>,
    #[serde(default)]
    missions: Vec<Option<String>>,
    #[serde(default)]
    overtime: Vec<Option<String>>,
}

/// Import d'un planning mensuel :
/// `{"year":2026,"month":10,"nurses":{"n1":{"shifts":[..],"missions":[..],"overtime":[..]}}}`
pub fn import_month_json<P: AsRef<Path>>(path: P) -> anyhow::Result<MonthSchedule> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    parse_month_json(&data).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_month_json(data: &[u8]) -> anyhow::Result<MonthSchedule> {
    let raw: RawMonth = serde_json::from_slice(data)?;
    if !(1..=12).contains(&raw.month) {
        bail!("invalid month {}", raw.month);
    }
    let mut month = MonthSchedule::new(raw.year, raw.month);
    for (nurse, days) in raw.nurses {
        let parsed = NurseMonth {
            shifts: days
                .shifts
                .iter()
                .map(|c| parse_slot(c.as_deref(), None))
                .collect::<anyhow::Result<_>>()
                .with_context(|| format!("shifts of nurse {nurse}"))?,
            missions: days
                .missions
                .into_iter()
                .map(|m| m.filter(|m| !m.trim().is_empty()).map(Mission::from))
                .collect(),
            overtime: days
                .overtime
                .iter()
                .map(|c| parse_slot(c.as_deref(), Some(NO_OVERTIME)))
                .collect::<anyhow::Result<_>>()
                .with_context(|| format!("overtime of nurse {nurse}"))?,
        };
        month.nurses.insert(NurseId::new(nurse), parsed);
    }
    Ok(month)
}

fn parse_slot(raw: Option<&str>, sentinel: Option<&str>) -> anyhow::Result<Option<ShiftCode>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) if Some(code) == sentinel => Ok(None),
        Some(code) => Ok(Some(code.parse()?)),
    }
}

/// Modification provisoire au format `AAAA-MM-JJ:infirmière:CODE`.
pub fn parse_override(raw: &str) -> anyhow::Result<(NaiveDate, NurseId, ShiftCode)> {
    let mut parts = raw.splitn(3, ':');
    let (Some(date), Some(nurse), Some(code)) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected DATE:NURSE:CODE, got {raw}");
    };
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date in override {raw}"))?;
    let nurse = nurse.trim();
    if nurse.is_empty() {
        bail!("empty nurse in override {raw}");
    }
    let code: ShiftCode = code.parse()?;
    Ok((date, NurseId::new(nurse), code))
}

/// Export CSV des demandes : header `id,from_date,swap_type,from,to,status,requestor,target,notes`.
/// Écriture atomique (fichier temporaire puis renommage).
pub fn export_requests_csv<P: AsRef<Path>>(
    path: P,
    requests: &[&ShiftSwapRequest],
    today: NaiveDate,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let buf = render_requests_csv(requests, today)?;
    let mut tmp = NamedTempFile::new_in(path.parent().unwrap_or_else(|| Path::new(".")))
        .with_context(|| "creating temp file")?;
    tmp.write_all(&buf)?;
    tmp.flush()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}

pub fn render_requests_csv(
    requests: &[&ShiftSwapRequest],
    today: NaiveDate,
) -> anyhow::Result<Vec<u8>> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    w.write_record([
        "id",
        "from_date",
        "swap_type",
        "from",
        "to",
        "status",
        "requestor",
        "target",
        "notes",
    ])?;
    for r in requests {
        let (from, to) = r.detail.labels();
        let date = r.from_date.map(|d| d.to_string()).unwrap_or_default();
        w.write_record([
            r.id.as_str(),
            date.as_str(),
            r.swap_type().as_str(),
            from.as_deref().unwrap_or(""),
            to.as_deref().unwrap_or(""),
            resolve_display_status(r, today).as_str(),
            r.requestor_name().unwrap_or(""),
            r.target_name().unwrap_or(""),
            r.notes.as_deref().unwrap_or(""),
        ])?;
    }
    w.into_inner()
        .map_err(|err| anyhow::anyhow!("flushing csv: {err}"))
}
