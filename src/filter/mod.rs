mod paginate;
mod predicates;

pub use paginate::{paginate, Page};

use crate::model::{NurseId, NurseIdentity, ParseCodeError, ShiftCode, ShiftSwapRequest, SwapType};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::swap::DisplayStatus;

/// Taille de page de la liste des demandes.
pub const PAGE_SIZE: usize = 10;

/// Onglet actif de la liste.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    All,
    Only(SwapType),
}

impl FromStr for Category {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(Category::All),
            other => other
                .parse::<SwapType>()
                .map(Category::Only)
                .map_err(|_| ParseCodeError::UnknownCategory(other.to_string())),
        }
    }
}

/// Configuration de filtrage, immuable : chaque setter rend une nouvelle valeur.
///
/// Modifier un critère ramène à la première page ; [`with_page`](Self::with_page)
/// est le seul setter qui conserve les critères sans toucher à la pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    search: String,
    hidden: BTreeSet<DisplayStatus>,
    category: Category,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    shifts: BTreeSet<ShiftCode>,
    requestor: Option<NurseId>,
    same_identity: bool,
    page: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            search: String::new(),
            hidden: BTreeSet::new(),
            category: Category::All,
            start: None,
            end: None,
            shifts: BTreeSet::new(),
            requestor: None,
            same_identity: false,
            page: 1,
        }
    }
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    fn touched(mut self) -> Self {
        self.page = 1;
        self
    }

    pub fn with_search<S: Into<String>>(mut self, term: S) -> Self {
        self.search = term.into();
        self.touched()
    }

    pub fn hide_status(mut self, status: DisplayStatus) -> Self {
        self.hidden.insert(status);
        self.touched()
    }

    pub fn with_hidden_statuses<I>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = DisplayStatus>,
    {
        self.hidden = statuses.into_iter().collect();
        self.touched()
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self.touched()
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self.touched()
    }

    pub fn with_shifts<I>(mut self, shifts: I) -> Self
    where
        I: IntoIterator<Item = ShiftCode>,
    {
        self.shifts = shifts.into_iter().collect();
        self.touched()
    }

    pub fn toggle_shift(mut self, shift: ShiftCode) -> Self {
        if !self.shifts.remove(&shift) {
            self.shifts.insert(shift);
        }
        self.touched()
    }

    pub fn with_requestor(mut self, requestor: Option<NurseId>) -> Self {
        self.requestor = requestor;
        self.touched()
    }

    pub fn with_same_identity(mut self, enabled: bool) -> Self {
        self.same_identity = enabled;
        self.touched()
    }

    /// Remet tous les critères à leur valeur par défaut.
    pub fn cleared(self) -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn search(&self) -> &str {
        &self.search
    }
    pub fn hidden(&self) -> &BTreeSet<DisplayStatus> {
        &self.hidden
    }
    pub fn category(&self) -> Category {
        self.category
    }
    pub fn date_range(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.start, self.end)
    }
    pub fn shifts(&self) -> &BTreeSet<ShiftCode> {
        &self.shifts
    }
    pub fn requestor(&self) -> Option<&NurseId> {
        self.requestor.as_ref()
    }
    pub fn same_identity(&self) -> bool {
        self.same_identity
    }
    pub fn page(&self) -> usize {
        self.page
    }

    /// Nombre de dimensions hors valeur par défaut (recherche et onglet exclus).
    pub fn active_filter_count(&self) -> usize {
        [
            !self.hidden.is_empty(),
            self.start.is_some() || self.end.is_some(),
            !self.shifts.is_empty(),
            self.requestor.is_some(),
            self.same_identity,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Filtre puis trie ; la pagination reste séparée (voir [`paginate`]).
    pub fn apply<'a>(
        &self,
        requests: &'a [ShiftSwapRequest],
        user: &NurseIdentity,
        today: NaiveDate,
    ) -> Vec<&'a ShiftSwapRequest> {
        apply(requests, self, user, today)
    }

    /// Page courante de `items`, taille [`PAGE_SIZE`].
    pub fn page_of<T>(&self, items: Vec<T>) -> Page<T> {
        paginate(items, self.page, PAGE_SIZE)
    }
}

/// Garde les demandes qui passent tous les critères, triées par date
/// décroissante ; les demandes sans date vont en fin de liste.
pub fn apply<'a>(
    requests: &'a [ShiftSwapRequest],
    config: &FilterConfig,
    user: &NurseIdentity,
    today: NaiveDate,
) -> Vec<&'a ShiftSwapRequest> {
    let needle = config.search.to_lowercase();
    let mut out: Vec<&ShiftSwapRequest> = requests
        .iter()
        .filter(|r| predicates::matches_category(r, config.category))
        .filter(|r| predicates::matches_search(r, &needle))
        .filter(|r| predicates::status_visible(r, &config.hidden, today))
        .filter(|r| predicates::within_dates(r, config.start, config.end))
        .filter(|r| predicates::shift_allowed(r, &config.shifts))
        .filter(|r| predicates::from_requestor(r, config.requestor.as_ref()))
        .filter(|r| !config.same_identity || predicates::same_identity(r, user))
        .collect();

    out.sort_by(|a, b| by_date_desc(a.from_date, b.from_date));

    #[cfg(feature = "logging")]
    tracing::debug!(
        total = requests.len(),
        kept = out.len(),
        active = config.active_filter_count(),
        "requests filtered"
    );

    out
}

fn by_date_desc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
