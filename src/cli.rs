use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "podes-analytics")]
#[command(about = "Podes village survey analysis tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List districts and their villages
    Districts(DistrictsArgs),
    /// Show KPIs for one indicator, or a category summary with "Semua"
    Kpis(KpisArgs),
    /// Rank villages by an indicator
    Rank(RankArgs),
    /// Compare villages side by side over a category's indicators
    Compare(CompareArgs),
    /// Write report artifacts (markdown, JSON, CSV) for a category
    Report(ReportArgs),
}

#[derive(Args, Debug)]
pub struct DistrictsArgs {
    /// Path to the record-oriented survey JSON
    #[arg(long, default_value = "data/data_podes_2024.json")]
    pub data_file: PathBuf,
}

#[derive(Args, Debug)]
pub struct KpisArgs {
    #[arg(long, default_value = "data/data_podes_2024.json")]
    pub data_file: PathBuf,

    /// Analysis category (e.g. "Pendidikan")
    #[arg(long, default_value = crate::catalog::DEFAULT_CATEGORY)]
    pub category: String,

    /// Indicator key, or "Semua" for the whole category
    #[arg(long, default_value = crate::catalog::ALL_INDICATORS)]
    pub indicator: String,

    /// District name, or "Semua Kecamatan" for no narrowing
    #[arg(long, default_value = crate::structures::ALL_DISTRICTS)]
    pub district: String,

    /// Optional village names to narrow to (repeatable)
    #[arg(long = "village")]
    pub villages: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RankArgs {
    #[arg(long, default_value = "data/data_podes_2024.json")]
    pub data_file: PathBuf,

    /// Indicator key to rank by
    #[arg(long)]
    pub indicator: String,

    #[arg(long, default_value = crate::structures::ALL_DISTRICTS)]
    pub district: String,

    #[arg(long = "village")]
    pub villages: Vec<String>,

    /// Ranking depth
    #[arg(long, default_value_t = crate::ranking::DEFAULT_TOP_N)]
    pub top: usize,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[arg(long, default_value = "data/data_podes_2024.json")]
    pub data_file: PathBuf,

    /// Villages to compare (2 to 4)
    #[arg(long = "village", required = true)]
    pub villages: Vec<String>,

    /// Category whose indicators are projected
    #[arg(long, default_value = crate::catalog::DEFAULT_CATEGORY)]
    pub category: String,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(long, default_value = "data/data_podes_2024.json")]
    pub data_file: PathBuf,

    #[arg(long, default_value = crate::catalog::DEFAULT_CATEGORY)]
    pub category: String,

    #[arg(long, default_value = crate::structures::ALL_DISTRICTS)]
    pub district: String,

    #[arg(long = "village")]
    pub villages: Vec<String>,

    /// Ranking depth used in the report tables
    #[arg(long, default_value_t = crate::ranking::DEFAULT_TOP_N)]
    pub top: usize,

    /// Directory receiving the artifacts
    #[arg(long, default_value = "reports")]
    pub output_dir: PathBuf,
}
