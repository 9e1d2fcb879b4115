use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Valeur sentinelle du backend pour « pas d'heures supplémentaires ».
pub const NO_OVERTIME: &str = "X";

/// Libellé de la mission explicitement « non attribuée ».
pub const UNASSIGNED_MISSION: &str = "unassigned";
/// Valeur écrite par le backend pour la mission non attribuée.
pub const UNASSIGNED_MISSION_RAW: &str = "未指定";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCodeError {
    #[error("unknown shift code: {0}")]
    UnknownShift(String),
    #[error("unknown status: {0}")]
    UnknownStatus(String),
    #[error("unknown swap type: {0}")]
    UnknownSwapType(String),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// Identifiant fort pour une infirmière
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NurseId(String);

impl NurseId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NurseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiant fort pour une demande d'échange
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Code de garde (une lettre majuscule).
///
/// `O` est le repos ; `V` et `R` sont des congés, affichés mais absents de la
/// table de repos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShiftCode {
    A,
    B,
    C,
    D,
    E,
    F,
    K,
    N,
    O,
    V,
    R,
}

impl ShiftCode {
    pub const ALL: [ShiftCode; 11] = [
        ShiftCode::A,
        ShiftCode::B,
        ShiftCode::C,
        ShiftCode::D,
        ShiftCode::E,
        ShiftCode::F,
        ShiftCode::K,
        ShiftCode::N,
        ShiftCode::O,
        ShiftCode::V,
        ShiftCode::R,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftCode::A => "A",
            ShiftCode::B => "B",
            ShiftCode::C => "C",
            ShiftCode::D => "D",
            ShiftCode::E => "E",
            ShiftCode::F => "F",
            ShiftCode::K => "K",
            ShiftCode::N => "N",
            ShiftCode::O => "O",
            ShiftCode::V => "V",
            ShiftCode::R => "R",
        }
    }

    /// Jour de repos : neutralise le contrôle de repos du côté où il apparaît.
    pub fn is_rest(self) -> bool {
        self == ShiftCode::O
    }

    pub fn is_leave(self) -> bool {
        matches!(self, ShiftCode::V | ShiftCode::R)
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftCode {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        ShiftCode::ALL
            .into_iter()
            .find(|code| code.as_str() == raw)
            .ok_or_else(|| ParseCodeError::UnknownShift(raw.to_string()))
    }
}

/// Rôle applicatif de l'utilisateur
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    HeadNurse,
    Staff,
    Other(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "admin" => Role::Admin,
            "head_nurse" => Role::HeadNurse,
            "staff" => Role::Staff,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::HeadNurse => "head_nurse",
            Role::Staff => "staff",
            Role::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Role::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// Spécialité d'une infirmière, résolue une seule fois depuis la chaîne du backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Identity {
    AnesthesiaSpecialist,
    RecoveryNurse,
    AnesthesiaLeader,
    AnesthesiaSecretary,
    Other(String),
}

impl Identity {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "anesthesia-specialist" => Identity::AnesthesiaSpecialist,
            "recovery-nurse" => Identity::RecoveryNurse,
            "anesthesia-leader" => Identity::AnesthesiaLeader,
            "anesthesia-secretary" => Identity::AnesthesiaSecretary,
            other => Identity::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Identity::AnesthesiaSpecialist => "anesthesia-specialist",
            Identity::RecoveryNurse => "recovery-nurse",
            Identity::AnesthesiaLeader => "anesthesia-leader",
            Identity::AnesthesiaSecretary => "anesthesia-secretary",
            Identity::Other(raw) => raw,
        }
    }

    /// Famille anesthésie (spécialiste, cadre, secrétariat).
    pub fn is_anesthesia(&self) -> bool {
        match self {
            Identity::AnesthesiaSpecialist
            | Identity::AnesthesiaLeader
            | Identity::AnesthesiaSecretary => true,
            Identity::RecoveryNurse => false,
            Identity::Other(raw) => raw.contains("anesthesia"),
        }
    }

    /// Famille salle de réveil.
    pub fn is_recovery(&self) -> bool {
        match self {
            Identity::RecoveryNurse => true,
            Identity::Other(raw) => raw.contains("recovery"),
            _ => false,
        }
    }

    pub fn is_leader(&self) -> bool {
        match self {
            Identity::AnesthesiaLeader => true,
            Identity::Other(raw) => raw.contains("leader"),
            _ => false,
        }
    }

    /// Identités autorisées à créer une demande d'échange.
    pub fn can_request_swap(&self) -> bool {
        matches!(self, Identity::AnesthesiaSpecialist | Identity::RecoveryNurse)
    }
}

impl Default for Identity {
    fn default() -> Self {
        Identity::Other(String::new())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Identity {
    fn from(raw: String) -> Self {
        Identity::parse(&raw)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.as_str().to_string()
    }
}

/// Utilisateur courant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NurseIdentity {
    pub id: NurseId,
    pub role: Role,
    #[serde(default)]
    pub identity: Identity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl NurseIdentity {
    pub fn new(id: NurseId, role: Role, identity: Identity) -> Self {
        Self {
            id,
            role,
            identity,
            full_name: None,
        }
    }
}

/// Instantané dénormalisé d'une personne attaché à une demande.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartySnapshot {
    pub id: NurseId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub identity: Identity,
}

impl PartySnapshot {
    pub fn new<N: Into<String>>(id: NurseId, full_name: N, identity: Identity) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            identity,
        }
    }
}

/// Poste de travail (« mission »).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mission {
    /// Choix métier explicite « aucune mission », distinct d'une valeur absente.
    Unassigned,
    Area(String),
}

impl Mission {
    pub fn label(&self) -> &str {
        match self {
            Mission::Unassigned => UNASSIGNED_MISSION,
            Mission::Area(name) => name,
        }
    }

    /// Recherche sur le libellé ; la mission non attribuée répond aussi à la
    /// valeur du backend. `needle` est déjà en minuscules.
    pub fn matches(&self, needle: &str) -> bool {
        match self {
            Mission::Unassigned => {
                UNASSIGNED_MISSION.contains(needle) || UNASSIGNED_MISSION_RAW.contains(needle)
            }
            Mission::Area(name) => name.to_lowercase().contains(needle),
        }
    }
}

impl From<String> for Mission {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        if trimmed == UNASSIGNED_MISSION || trimmed == UNASSIGNED_MISSION_RAW {
            Mission::Unassigned
        } else {
            Mission::Area(raw)
        }
    }
}

// réécrit la valeur du backend
impl From<Mission> for String {
    fn from(mission: Mission) -> Self {
        match mission {
            Mission::Unassigned => UNASSIGNED_MISSION_RAW.to_string(),
            Mission::Area(name) => name,
        }
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapType {
    Shift,
    Mission,
    Overtime,
}

impl SwapType {
    pub fn as_str(self) -> &'static str {
        match self {
            SwapType::Shift => "shift",
            SwapType::Mission => "mission",
            SwapType::Overtime => "overtime",
        }
    }
}

impl FromStr for SwapType {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "shift" => Ok(SwapType::Shift),
            "mission" => Ok(SwapType::Mission),
            "overtime" => Ok(SwapType::Overtime),
            other => Err(ParseCodeError::UnknownSwapType(other.to_string())),
        }
    }
}

/// Objet de l'échange : seule la paire `from`/`to` du type concerné existe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "swapType", rename_all = "lowercase")]
pub enum SwapDetail {
    #[serde(rename_all = "camelCase")]
    Shift {
        #[serde(default)]
        from_shift: Option<ShiftCode>,
        #[serde(default)]
        to_shift: Option<ShiftCode>,
    },
    #[serde(rename_all = "camelCase")]
    Mission {
        #[serde(default)]
        from_mission: Option<Mission>,
        #[serde(default)]
        to_mission: Option<Mission>,
    },
    #[serde(rename_all = "camelCase")]
    Overtime {
        #[serde(default, with = "overtime_code")]
        from_overtime: Option<ShiftCode>,
        #[serde(default, with = "overtime_code")]
        to_overtime: Option<ShiftCode>,
    },
}

impl SwapDetail {
    pub fn swap_type(&self) -> SwapType {
        match self {
            SwapDetail::Shift { .. } => SwapType::Shift,
            SwapDetail::Mission { .. } => SwapType::Mission,
            SwapDetail::Overtime { .. } => SwapType::Overtime,
        }
    }

    /// Côtés `from`/`to` rendus en texte, pour l'affichage et la recherche.
    pub fn labels(&self) -> (Option<String>, Option<String>) {
        match self {
            SwapDetail::Shift {
                from_shift,
                to_shift,
            } => (
                from_shift.map(|c| c.to_string()),
                to_shift.map(|c| c.to_string()),
            ),
            SwapDetail::Mission {
                from_mission,
                to_mission,
            } => (
                from_mission.as_ref().map(|m| m.to_string()),
                to_mission.as_ref().map(|m| m.to_string()),
            ),
            SwapDetail::Overtime {
                from_overtime,
                to_overtime,
            } => (
                Some(from_overtime.map_or(NO_OVERTIME, ShiftCode::as_str).to_string()),
                Some(to_overtime.map_or(NO_OVERTIME, ShiftCode::as_str).to_string()),
            ),
        }
    }
}

/// `"X"` (ou une valeur absente) devient `None` à la frontière.
mod overtime_code {
    use super::{ShiftCode, NO_OVERTIME};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<ShiftCode>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.map_or(NO_OVERTIME, ShiftCode::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ShiftCode>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") | Some(NO_OVERTIME) => Ok(None),
            Some(code) => code.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

/// Statut persisté par le backend ; « expiré » n'en fait jamais partie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }
}

/// Demande d'échange telle que fournie par le backend (lecture seule ici).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSwapRequest {
    pub id: RequestId,
    pub requestor_id: NurseId,
    #[serde(default)]
    pub target_nurse_id: Option<NurseId>,
    #[serde(flatten)]
    pub detail: SwapDetail,
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    pub status: RequestStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub requestor: Option<PartySnapshot>,
    #[serde(default)]
    pub target_nurse: Option<PartySnapshot>,
    #[serde(default)]
    pub acceptor: Option<PartySnapshot>,
    pub created_at: DateTime<Utc>,
}

impl ShiftSwapRequest {
    /// Nouvelle demande en attente, ouverte à toute infirmière éligible.
    pub fn new(requestor: PartySnapshot, detail: SwapDetail, from_date: NaiveDate) -> Self {
        Self {
            id: RequestId::random(),
            requestor_id: requestor.id.clone(),
            target_nurse_id: None,
            detail,
            from_date: Some(from_date),
            status: RequestStatus::Pending,
            notes: None,
            requestor: Some(requestor),
            target_nurse: None,
            acceptor: None,
            created_at: Utc::now(),
        }
    }

    pub fn swap_type(&self) -> SwapType {
        self.detail.swap_type()
    }

    pub fn from_shift(&self) -> Option<ShiftCode> {
        match self.detail {
            SwapDetail::Shift { from_shift, .. } => from_shift,
            _ => None,
        }
    }

    pub fn to_shift(&self) -> Option<ShiftCode> {
        match self.detail {
            SwapDetail::Shift { to_shift, .. } => to_shift,
            _ => None,
        }
    }

    pub fn requestor_name(&self) -> Option<&str> {
        self.requestor.as_ref().map(|p| p.full_name.as_str())
    }

    pub fn target_name(&self) -> Option<&str> {
        self.target_nurse.as_ref().map(|p| p.full_name.as_str())
    }

    pub fn requestor_identity(&self) -> Option<&Identity> {
        self.requestor.as_ref().map(|p| &p.identity)
    }
}
