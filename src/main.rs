use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use podes_analytics::cli::{Cli, Commands, CompareArgs, DistrictsArgs, KpisArgs, RankArgs};
use podes_analytics::structures::{KpiResult, RankingResult, Selection, ALL_DISTRICTS};
use podes_analytics::{catalog, comparison, filter, metrics, ranking, report, DatasetRepository};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Districts(args) => run_districts(args)?,
        Commands::Kpis(args) => run_kpis(args)?,
        Commands::Rank(args) => run_rank(args)?,
        Commands::Compare(args) => run_compare(args)?,
        Commands::Report(args) => {
            let outcome = report::run_report(args)?;
            println!(
                "{} {} villages across {} districts -> {}",
                "Report written:".green().bold(),
                outcome.villages,
                outcome.districts,
                outcome.output_dir.display()
            );
        }
    }

    Ok(())
}

fn run_districts(args: DistrictsArgs) -> Result<()> {
    let repository = DatasetRepository::new(&args.data_file);
    for district in repository.districts()? {
        if district == ALL_DISTRICTS {
            continue;
        }
        let villages = repository.villages_in(&district)?;
        println!("{} ({} desa)", district.bold(), villages.len());
        for name in villages {
            println!("  {}", name);
        }
    }
    Ok(())
}

fn run_kpis(args: KpisArgs) -> Result<()> {
    let repository = DatasetRepository::new(&args.data_file);
    let dataset = repository.load()?;

    let selection = Selection::new(args.district, args.villages);
    let view = filter::apply(dataset, &selection);

    let label = catalog::indicator_label(&args.indicator);
    println!(
        "{}",
        report::analysis_title(&args.category, label, &selection).bold()
    );

    if view.is_empty() {
        println!(
            "{}",
            "Tidak ada desa yang cocok dengan filter; sesuaikan pilihan Anda.".yellow()
        );
        return Ok(());
    }

    match metrics::compute_kpis(&view, &args.indicator, &args.category) {
        KpiResult::Quantitative(k) => {
            println!("  Total    : {}", k.total.to_string().cyan());
            println!("  Median   : {:.1}", k.median);
            println!("  Max      : {}", k.max);
            println!("  Min      : {}", k.min);
            match k.top_village {
                Some(t) => println!(
                    "  Tertinggi: {} ({}) — {}",
                    t.name.green(),
                    t.district,
                    t.value
                ),
                None => println!("  Tertinggi: Tidak ada"),
            }
        }
        KpiResult::Qualitative(k) => {
            for ((value, count), (_, pct)) in k.value_counts.iter().zip(&k.percentages) {
                println!("  {:<30} {:>4} desa  {:>5.1}%", value, count, pct);
            }
            println!(
                "  Paling umum: {} ({} desa)",
                k.most_common.green(),
                k.most_common_count
            );
        }
        KpiResult::Summary(s) => {
            println!("  Desa     : {}", s.total_villages.to_string().cyan());
            println!("  Kecamatan: {}", s.total_districts);
            println!("  Indikator: {} ({})", s.indicator_count, s.category);
        }
        KpiResult::Empty => {
            println!(
                "{}",
                "Indikator tidak ditemukan pada pilihan saat ini.".yellow()
            );
        }
    }
    Ok(())
}

fn run_rank(args: RankArgs) -> Result<()> {
    let repository = DatasetRepository::new(&args.data_file);
    let dataset = repository.load()?;

    let selection = Selection::new(args.district, args.villages);
    let view = filter::apply(dataset, &selection);

    if let Some(value) = ranking::uniform_value(&view, &args.indicator) {
        println!(
            "{} {}",
            "Semua desa memiliki nilai seragam:".yellow(),
            value.to_string().bold()
        );
        return Ok(());
    }

    match ranking::top_n(&view, &args.indicator, args.top) {
        RankingResult::Ranked(rows) if rows.is_empty() => {
            println!(
                "{}",
                "Tidak ada data untuk peringkat; sesuaikan pilihan Anda.".yellow()
            );
        }
        RankingResult::Ranked(rows) => {
            for (i, row) in rows.iter().enumerate() {
                println!(
                    "{:>3}. {} ({}) — {}",
                    i + 1,
                    row.name.bold(),
                    row.district,
                    row.value.to_string().cyan()
                );
            }
        }
        RankingResult::Listing(rows) => {
            // Qualitative indicators have no ranking, only a distribution.
            for row in rows {
                let value = row
                    .value
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("  {} ({}) — {}", row.name, row.district, value);
            }
        }
    }
    Ok(())
}

fn run_compare(args: CompareArgs) -> Result<()> {
    let repository = DatasetRepository::new(&args.data_file);
    let dataset = repository.load()?;

    let keys: Vec<String> = catalog::category_keys(&args.category)
        .into_iter()
        .map(str::to_string)
        .collect();
    let result = comparison::compare(dataset, &args.villages, &keys);

    if result.is_empty() {
        println!(
            "{}",
            "Pilih minimal 2 desa berbeda untuk perbandingan.".yellow()
        );
        return Ok(());
    }

    for (name, entry) in result {
        println!("{} ({})", name.bold(), entry.district);
        for (label, value) in entry.values {
            println!("  {:<40} {}", label, value.to_string().cyan());
        }
    }
    Ok(())
}
