mod compat;
mod eligibility;
mod status;
mod types;

pub use eligibility::{
    can_accept, can_delete, can_request_swap, check_acceptable, delete_action, DeleteAction,
};
pub use status::{is_expired, resolve_display_status, DisplayStatus};
pub use types::{AcceptRefusal, Incompatibility, SwapIncompatibility};

use crate::model::{NurseId, ShiftCode, ShiftSwapRequest};
use crate::rules::RuleTable;
use crate::schedule::ScheduleSnapshot;
use chrono::NaiveDate;

/// Contrôle de compatibilité avec la table de repos standard.
pub fn check_compatibility(
    snapshot: &ScheduleSnapshot,
    date: NaiveDate,
    new_shift: ShiftCode,
    nurse: &NurseId,
    overrides: &ScheduleSnapshot,
) -> Result<(), Incompatibility> {
    RuleTable::standard().check(snapshot, date, new_shift, nurse, overrides)
}

/// Vérifie un échange de gardes pour les deux infirmières : le demandeur prend
/// `to_shift`, l'accepteur prend `from_shift`, à la date de la demande.
///
/// Les échanges de mission ou d'heures supplémentaires ne portent pas de règle
/// de repos et passent toujours.
pub fn check_swap(
    rules: &RuleTable,
    snapshot: &ScheduleSnapshot,
    request: &ShiftSwapRequest,
    acceptor: &NurseId,
    overrides: &ScheduleSnapshot,
) -> Result<(), SwapIncompatibility> {
    compat::check_swap(rules, snapshot, request, acceptor, overrides)
}
