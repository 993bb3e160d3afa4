//! Filter and pagination state, and its translation into server query
//! parameters.
//!
//! The collection endpoint follows the json-server convention: 1-based
//! `_page`, `_limit`, and optional `_sort`/`_order`. The translator is a
//! pure function; malformed input degrades by omitting the affected
//! parameter rather than erroring.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Profession choices offered by the filter panel.
pub const PROFESSION_OPTIONS: &[&str] =
    &["Yönetici", "Geliştirici", "Tasarımcı", "Analist"];

const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_SORT: &str = "id:asc";

/// Sort direction accepted by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDirection::Ascending),
            "desc" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed `field:direction` sort expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Parse a `field:direction` expression.
    ///
    /// Returns `None` unless the expression contains exactly one `:`
    /// separating two non-empty halves and the direction is `asc` or
    /// `desc`. Callers treat `None` as "no sorting requested".
    pub fn parse(expr: &str) -> Option<Self> {
        let mut parts = expr.splitn(3, ':');
        let field = parts.next()?;
        let direction = parts.next()?;
        if parts.next().is_some() || field.is_empty() {
            return None;
        }
        Some(SortSpec {
            field: field.to_string(),
            direction: SortDirection::parse(direction)?,
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction)
    }
}

impl FromStr for SortSpec {
    type Err = ModelError;

    /// Strict form of [`SortSpec::parse`] for callers that must surface
    /// the malformed expression instead of omitting the parameter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortSpec::parse(s).ok_or_else(|| ModelError::InvalidSort(s.to_string()))
    }
}

/// Profession filter value.
///
/// The wire protocol only ever carries the single-value form; the
/// multi-value form is representable for forward compatibility but is
/// not serialized (see `FilterState::to_query_pairs`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfessionFilter {
    One(String),
    Many(Vec<String>),
}

impl ProfessionFilter {
    pub fn none() -> Self {
        ProfessionFilter::One(String::new())
    }

    /// The single serializable value, if any.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ProfessionFilter::One(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ProfessionFilter::One(value) => value.is_empty(),
            ProfessionFilter::Many(values) => values.is_empty(),
        }
    }
}

impl Default for ProfessionFilter {
    fn default() -> Self {
        ProfessionFilter::none()
    }
}

impl From<&str> for ProfessionFilter {
    fn from(value: &str) -> Self {
        ProfessionFilter::One(value.to_string())
    }
}

/// Keys addressable through a filter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Profession,
    Name,
    TcknPrefix,
}

/// A single filter-field update.
///
/// Applying any update resets the page to 0; a changed filter always
/// restarts pagination from the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Profession(ProfessionFilter),
    Name(String),
    TcknPrefix(String),
}

impl FilterUpdate {
    pub fn key(&self) -> FilterKey {
        match self {
            FilterUpdate::Profession(_) => FilterKey::Profession,
            FilterUpdate::Name(_) => FilterKey::Name,
            FilterUpdate::TcknPrefix(_) => FilterKey::TcknPrefix,
        }
    }

    /// Apply this update to a state, resetting the page.
    pub fn apply_to(self, state: &mut FilterState) {
        match self {
            FilterUpdate::Profession(value) => state.profession = value,
            FilterUpdate::Name(value) => state.name = value,
            FilterUpdate::TcknPrefix(value) => state.tckn_prefix = value,
        }
        state.page = 0;
    }
}

/// Current list-view query state: pagination, sorting, and filters.
///
/// `page` is 0-based internally; the translator emits it 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub page: u32,
    pub size: u32,
    pub sort: String,
    pub profession: ProfessionFilter,
    pub name: String,
    #[serde(rename = "tcknPrefix")]
    pub tckn_prefix: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: DEFAULT_SORT.to_string(),
            profession: ProfessionFilter::none(),
            name: String::new(),
            tckn_prefix: String::new(),
        }
    }
}

impl FilterState {
    /// Translate this state into server query parameters.
    ///
    /// Pure and infallible: a malformed sort expression or empty filter
    /// value simply omits the corresponding parameter and the server
    /// falls back to its defaults.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("_page", (self.page + 1).to_string()),
            ("_limit", self.size.to_string()),
        ];

        if let Some(sort) = SortSpec::parse(&self.sort) {
            pairs.push(("_sort", sort.field));
            pairs.push(("_order", sort.direction.as_str().to_string()));
        }

        if !self.name.is_empty() {
            pairs.push(("name", self.name.clone()));
        }
        if !self.tckn_prefix.is_empty() {
            pairs.push(("tcknPrefix", self.tckn_prefix.clone()));
        }
        if let Some(profession) = self.profession.as_single() {
            pairs.push(("profession", profession.to_string()));
        }

        pairs
    }

    /// Render the query pairs as a percent-encoded query string.
    ///
    /// Key order matters: it doubles as the cache key for list queries,
    /// so equal states always render identically.
    pub fn to_query_string(&self) -> String {
        let pairs = self.to_query_pairs();
        let mut out = String::new();
        for (i, (key, value)) in pairs.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(&urlencoding::encode(value));
        }
        out
    }
}
