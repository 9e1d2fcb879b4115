#![forbid(unsafe_code)]
//! Relève — moteur de règles des échanges de gardes infirmières.
//!
//! - Table de repos minimal entre deux gardes, contrôle de compatibilité.
//! - Statut affiché (expiration dérivée de la date, jamais stockée).
//! - Éligibilité : accepter, annuler/rejeter, libellé du bouton.
//! - Filtrage, tri et pagination de la liste des demandes.
//! - Aucune E/S dans le cœur ; JSON/CSV et CLI autour.

pub mod filter;
pub mod io;
pub mod model;
pub mod rules;
pub mod schedule;
pub mod storage;
pub mod swap;

pub use filter::{apply, paginate, Category, FilterConfig, Page, PAGE_SIZE};
pub use model::{
    Identity, Mission, NurseId, NurseIdentity, PartySnapshot, RequestId, RequestStatus, Role,
    ShiftCode, ShiftSwapRequest, SwapDetail, SwapType,
};
pub use rules::{load_rule_table_from_file, Constraint, RestRule, RuleTable};
pub use schedule::{resolve_shift, MonthSchedule, NurseMonth, ScheduleSnapshot};
pub use storage::{
    snapshot_around, JsonRequestFile, JsonScheduleDir, RequestSource, ScheduleProvider,
};
pub use swap::{
    can_accept, can_delete, can_request_swap, check_acceptable, check_compatibility, check_swap,
    delete_action, resolve_display_status, AcceptRefusal, DeleteAction, DisplayStatus,
    Incompatibility, SwapIncompatibility,
};
