use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Display};

/// District sentinel meaning "no district narrowing".
pub const ALL_DISTRICTS: &str = "Semua Kecamatan";

/// One row of the Podes survey: a single village and its indicator values.
#[derive(Debug, Clone, Serialize)]
pub struct Village {
    pub id: String,
    pub district: String,
    pub name: String,
    /// Indicator key -> value. Catalog-declared count fields are always
    /// present (missing or unreadable values coerced to 0); status fields
    /// are absent when the source row carried no usable value.
    pub values: HashMap<String, IndicatorValue>,
}

impl Village {
    pub fn value(&self, key: &str) -> Option<&IndicatorValue> {
        self.values.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Count(i64),
    Status(String),
}

impl IndicatorValue {
    /// Numeric reading of the value. `Count` is numeric by construction;
    /// a `Status` only qualifies when the whole string parses.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            IndicatorValue::Count(v) => Some(*v),
            IndicatorValue::Status(s) => s.trim().parse().ok(),
        }
    }
}

impl Display for IndicatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorValue::Count(v) => write!(f, "{}", v),
            IndicatorValue::Status(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Quantitative,
    Qualitative,
}

/// A per-request filter selection. Built fresh from raw parameters,
/// immutable once constructed.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Exact district name, or [`ALL_DISTRICTS`].
    pub district: String,
    /// Village names to keep; empty means no village narrowing.
    pub villages: Vec<String>,
}

impl Selection {
    pub fn new(district: impl Into<String>, villages: Vec<String>) -> Self {
        Self {
            district: district.into(),
            villages,
        }
    }

    pub fn matches(&self, village: &Village) -> bool {
        let district_ok = self.district == ALL_DISTRICTS || village.district == self.district;
        let village_ok =
            self.villages.is_empty() || self.villages.iter().any(|n| *n == village.name);
        district_ok && village_ok
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            district: ALL_DISTRICTS.to_string(),
            villages: Vec::new(),
        }
    }
}

/// Computed summary for one indicator over a filtered view.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KpiResult {
    /// Empty view or indicator absent from every row; nothing to compute.
    Empty,
    Quantitative(QuantitativeKpis),
    Qualitative(QualitativeKpis),
    Summary(CategorySummary),
}

impl KpiResult {
    pub fn is_empty(&self) -> bool {
        matches!(self, KpiResult::Empty)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuantitativeKpis {
    pub total: i64,
    pub median: f64,
    pub max: i64,
    pub min: i64,
    /// First village (input order) holding the maximum; absent when max <= 0.
    pub top_village: Option<TopVillage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopVillage {
    pub name: String,
    pub district: String,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualitativeKpis {
    /// Distinct value -> occurrence count over non-missing rows, ordered by
    /// descending count with first-encounter order breaking ties.
    pub value_counts: Vec<(String, u64)>,
    /// Share of non-missing rows per value, aligned with `value_counts`,
    /// rounded to 1 decimal.
    pub percentages: Vec<(String, f64)>,
    pub most_common: String,
    pub most_common_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub total_villages: usize,
    pub total_districts: usize,
    pub category: String,
    pub indicator_count: usize,
}

/// An entry of a quantitative top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVillage {
    pub name: String,
    pub district: String,
    pub value: i64,
}

/// One row of the plain listing returned for qualitative indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRow {
    pub name: String,
    pub district: String,
    pub value: Option<IndicatorValue>,
}

/// Ranking output. Quantitative indicators rank; qualitative indicators
/// fall back to the full filtered set in dataset order, for callers to
/// render as a plain listing.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RankingResult {
    Ranked(Vec<RankedVillage>),
    Listing(Vec<ListingRow>),
}

/// Per-village projection produced by the comparison engine.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonEntry {
    pub district: String,
    /// (display label, verbatim value) per requested indicator; pairs with
    /// no value for this village are omitted.
    pub values: Vec<(String, IndicatorValue)>,
}
