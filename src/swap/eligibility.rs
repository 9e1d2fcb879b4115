use super::status::is_expired;
use super::types::AcceptRefusal;
use crate::model::{Identity, NurseIdentity, RequestStatus, Role, ShiftSwapRequest};
use chrono::NaiveDate;
use std::fmt;

/// Contrôles d'acceptation, dans l'ordre ; le premier échec donne la raison.
///
/// L'expiration n'est pas vérifiée ici : voir [`check_acceptable`].
pub fn can_accept(request: &ShiftSwapRequest, user: &NurseIdentity) -> Result<(), AcceptRefusal> {
    if request.requestor_id == user.id {
        return Err(AcceptRefusal::OwnRequest);
    }
    if request.status != RequestStatus::Pending {
        return Err(AcceptRefusal::AlreadyProcessed);
    }
    if let Some(target) = &request.target_nurse_id {
        if target != &user.id {
            return Err(AcceptRefusal::ReservedForAnother);
        }
    }
    if user.role == Role::Admin {
        return Err(AcceptRefusal::AdminAccount);
    }
    // sans identité du demandeur, la catégorie ne peut pas être vérifiée
    let Some(requestor) = request.requestor_identity() else {
        return Err(AcceptRefusal::UnknownRequestor);
    };
    if crosses_categories(requestor, &user.identity) {
        return Err(AcceptRefusal::CrossCategory);
    }
    Ok(())
}

/// Date, expiration puis [`can_accept`].
pub fn check_acceptable(
    request: &ShiftSwapRequest,
    user: &NurseIdentity,
    today: NaiveDate,
) -> Result<(), AcceptRefusal> {
    if request.from_date.is_none() {
        return Err(AcceptRefusal::MissingDate);
    }
    if is_expired(request, today) {
        return Err(AcceptRefusal::Expired);
    }
    can_accept(request, user)
}

/// Une demande en attente expirée est gelée : personne ne la supprime.
///
/// Une demande en attente sans date ne peut être retirée que par un compte
/// privilégié (rejet).
pub fn can_delete(request: &ShiftSwapRequest, user: &NurseIdentity, today: NaiveDate) -> bool {
    if is_expired(request, today) {
        return false;
    }
    if is_privileged(user) {
        return true;
    }
    request.requestor_id == user.id
        && request.status == RequestStatus::Pending
        && request.from_date.is_some()
}

/// Action proposée par le bouton de suppression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAction {
    RejectAndRestore,
    Cancel,
    Reject,
    Delete,
}

impl DeleteAction {
    pub fn label(self) -> &'static str {
        match self {
            DeleteAction::RejectAndRestore => "reject and restore schedule",
            DeleteAction::Cancel => "cancel request",
            DeleteAction::Reject => "reject request",
            DeleteAction::Delete => "delete",
        }
    }
}

impl fmt::Display for DeleteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn delete_action(request: &ShiftSwapRequest, user: &NurseIdentity) -> DeleteAction {
    let privileged = is_privileged(user);
    let own = request.requestor_id == user.id;
    match request.status {
        RequestStatus::Accepted if privileged => DeleteAction::RejectAndRestore,
        RequestStatus::Pending if own => DeleteAction::Cancel,
        RequestStatus::Pending if privileged => DeleteAction::Reject,
        _ => DeleteAction::Delete,
    }
}

/// Seules certaines spécialités peuvent créer une demande.
pub fn can_request_swap(user: &NurseIdentity) -> bool {
    user.identity.can_request_swap()
}

fn is_privileged(user: &NurseIdentity) -> bool {
    matches!(user.role, Role::Admin | Role::HeadNurse) || user.identity.is_leader()
}

// salle de réveil <-> anesthésie, dans les deux sens
fn crosses_categories(a: &Identity, b: &Identity) -> bool {
    (a.is_recovery() && b.is_anesthesia()) || (a.is_anesthesia() && b.is_recovery())
}
