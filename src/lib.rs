pub mod catalog;
pub mod cli;
pub mod comparison;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod ranking;
pub mod report;
pub mod structures;

pub use loader::{DataError, DatasetRepository};
pub use structures::{
    ComparisonEntry, IndicatorKind, IndicatorValue, KpiResult, ListingRow, RankedVillage,
    RankingResult, Selection, Village, ALL_DISTRICTS,
};
