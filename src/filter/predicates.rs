use super::Category;
use crate::model::{NurseId, NurseIdentity, ShiftCode, ShiftSwapRequest, SwapDetail};
use crate::swap::{resolve_display_status, DisplayStatus};
use chrono::NaiveDate;
use std::collections::BTreeSet;

pub(super) fn matches_category(request: &ShiftSwapRequest, category: Category) -> bool {
    match category {
        Category::All => true,
        Category::Only(kind) => request.swap_type() == kind,
    }
}

/// `needle` est déjà en minuscules ; vide, il laisse tout passer.
pub(super) fn matches_search(request: &ShiftSwapRequest, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let hit = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(needle));

    if hit(request.notes.as_deref())
        || hit(request.requestor_name())
        || hit(request.target_name())
    {
        return true;
    }
    // les heures supplémentaires ne sont pas cherchables
    match &request.detail {
        SwapDetail::Overtime { .. } => false,
        SwapDetail::Mission {
            from_mission,
            to_mission,
        } => [from_mission, to_mission]
            .into_iter()
            .flatten()
            .any(|m| m.matches(needle)),
        detail => {
            let (from, to) = detail.labels();
            hit(from.as_deref()) || hit(to.as_deref())
        }
    }
}

pub(super) fn status_visible(
    request: &ShiftSwapRequest,
    hidden: &BTreeSet<DisplayStatus>,
    today: NaiveDate,
) -> bool {
    hidden.is_empty() || !hidden.contains(&resolve_display_status(request, today))
}

/// Bornes incluses ; une borne absente laisse passer. Sans date, une demande
/// échoue dès qu'une borne est posée.
pub(super) fn within_dates(
    request: &ShiftSwapRequest,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(date) = request.from_date else {
        return false;
    };
    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
}

pub(super) fn shift_allowed(request: &ShiftSwapRequest, shifts: &BTreeSet<ShiftCode>) -> bool {
    shifts.is_empty()
        || request
            .from_shift()
            .is_some_and(|code| shifts.contains(&code))
}

pub(super) fn from_requestor(request: &ShiftSwapRequest, requestor: Option<&NurseId>) -> bool {
    requestor.map_or(true, |id| &request.requestor_id == id)
}

pub(super) fn same_identity(request: &ShiftSwapRequest, user: &NurseIdentity) -> bool {
    request
        .requestor_identity()
        .is_some_and(|identity| identity == &user.identity)
}
