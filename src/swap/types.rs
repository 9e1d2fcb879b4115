use crate::model::{NurseId, ShiftCode};
use thiserror::Error;

/// Raison pour laquelle une nouvelle garde ne peut pas être posée.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Incompatibility {
    #[error("{before} shift cannot be followed by {after} shift")]
    Forbidden { before: ShiftCode, after: ShiftCode },
    #[error("{before} shift followed by {after} shift requires a minimum rest of {hours} hours")]
    InsufficientRest {
        before: ShiftCode,
        after: ShiftCode,
        hours: u8,
    },
    #[error("swap has no date")]
    MissingDate,
    #[error("swap is missing a shift code")]
    MissingShift,
}

/// Incompatibilité rattachée à l'infirmière concernée par l'échange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("nurse {nurse}: {reason}")]
pub struct SwapIncompatibility {
    pub nurse: NurseId,
    pub reason: Incompatibility,
}

/// Refus d'acceptation, dans l'ordre où les contrôles sont faits.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptRefusal {
    #[error("cannot accept own request")]
    OwnRequest,
    #[error("already processed")]
    AlreadyProcessed,
    #[error("reserved for another nurse")]
    ReservedForAnother,
    #[error("admins cannot accept swaps")]
    AdminAccount,
    #[error("requestor identity unknown")]
    UnknownRequestor,
    #[error("different nurse categories cannot swap")]
    CrossCategory,
    #[error("request has expired")]
    Expired,
    #[error("request has no date")]
    MissingDate,
}
