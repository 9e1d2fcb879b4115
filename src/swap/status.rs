use crate::model::{ParseCodeError, RequestStatus, ShiftSwapRequest};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Statut affiché : le statut persisté, plus « expiré » dérivé de la date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Expired,
}

impl DisplayStatus {
    pub const ALL: [DisplayStatus; 5] = [
        DisplayStatus::Pending,
        DisplayStatus::Accepted,
        DisplayStatus::Rejected,
        DisplayStatus::Cancelled,
        DisplayStatus::Expired,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayStatus::Pending => "pending",
            DisplayStatus::Accepted => "accepted",
            DisplayStatus::Rejected => "rejected",
            DisplayStatus::Cancelled => "cancelled",
            DisplayStatus::Expired => "expired",
        }
    }
}

impl From<RequestStatus> for DisplayStatus {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => DisplayStatus::Pending,
            RequestStatus::Accepted => DisplayStatus::Accepted,
            RequestStatus::Rejected => DisplayStatus::Rejected,
            RequestStatus::Cancelled => DisplayStatus::Cancelled,
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayStatus {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        DisplayStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .ok_or_else(|| ParseCodeError::UnknownStatus(raw.to_string()))
    }
}

/// Une décision terminale l'emporte toujours sur la date. Une demande en
/// attente expire dès que sa date est strictement antérieure à `today`.
pub fn resolve_display_status(request: &ShiftSwapRequest, today: NaiveDate) -> DisplayStatus {
    match (request.status, request.from_date) {
        (RequestStatus::Pending, Some(date)) if date < today => DisplayStatus::Expired,
        (status, _) => status.into(),
    }
}

pub fn is_expired(request: &ShiftSwapRequest, today: NaiveDate) -> bool {
    resolve_display_status(request, today) == DisplayStatus::Expired
}
