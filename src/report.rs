use crate::cli::ReportArgs;
use crate::loader::DatasetRepository;
use crate::structures::{KpiResult, RankingResult, Selection, Village, ALL_DISTRICTS};
use crate::{catalog, filter, metrics, ranking};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use tracing::{info, warn};

pub struct ReportOutcome {
    pub output_dir: PathBuf,
    pub villages: usize,
    pub districts: usize,
}

#[derive(Serialize)]
struct CategoryReport {
    generated_at: String,
    category: String,
    district: String,
    selected_villages: Vec<String>,
    total_villages: usize,
    total_districts: usize,
    indicators: Vec<IndicatorReport>,
}

#[derive(Serialize)]
struct IndicatorReport {
    key: String,
    label: String,
    kpis: KpiResult,
}

/// Headline describing the current analysis scope, mirroring the dashboard
/// title bar.
pub fn analysis_title(category: &str, indicator_label: Option<&str>, selection: &Selection) -> String {
    let mut parts = vec![format!("Data {}", category)];
    if let Some(label) = indicator_label {
        parts.push(format!("- {}", label));
    }
    if selection.district == ALL_DISTRICTS {
        parts.push("di Kota Batu".to_string());
    } else {
        parts.push(format!("di Kecamatan {}", selection.district));
    }
    match selection.villages.len() {
        0 => {}
        1 => parts.push(format!("(Desa {})", selection.villages[0])),
        n if n <= 3 => parts.push(format!("({})", selection.villages.join(", "))),
        n => parts.push(format!("({} desa terpilih)", n)),
    }
    parts.join(" ")
}

/// Computes every indicator of one category over the selected view and
/// writes the report artifacts: category_report.md, category_summary.json
/// and rankings.csv (top-N per quantitative indicator).
pub fn run_report(args: ReportArgs) -> Result<ReportOutcome> {
    info!(data_file = ?args.data_file, category = %args.category, output_dir = ?args.output_dir, "starting report");

    let category = catalog::category(&args.category)
        .ok_or_else(|| anyhow!("unknown category: {}", args.category))?;

    let repository = DatasetRepository::new(&args.data_file);
    let dataset = repository.load().context("Failed to load survey dataset")?;

    let selection = Selection::new(args.district.clone(), args.villages.clone());
    let view = filter::apply(dataset, &selection);
    if view.is_empty() {
        warn!("selection matches no villages; writing an empty report");
    }

    std::fs::create_dir_all(&args.output_dir)?;

    let mut indicators = Vec::with_capacity(category.indicators.len());
    for (key, label) in category.indicators {
        indicators.push(IndicatorReport {
            key: (*key).to_string(),
            label: (*label).to_string(),
            kpis: metrics::compute_kpis(&view, key, category.name),
        });
    }

    let districts = {
        let mut d: Vec<&str> = view.iter().map(|v| v.district.as_str()).collect();
        d.sort_unstable();
        d.dedup();
        d.len()
    };

    let report = CategoryReport {
        generated_at: Utc::now().to_rfc3339(),
        category: category.name.to_string(),
        district: selection.district.clone(),
        selected_villages: selection.villages.clone(),
        total_villages: view.len(),
        total_districts: districts,
        indicators,
    };

    let json_out = args.output_dir.join("category_summary.json");
    let f = File::create(&json_out)
        .with_context(|| format!("Failed to create report file: {:?}", json_out))?;
    serde_json::to_writer_pretty(f, &report)?;

    let csv_out = args.output_dir.join("rankings.csv");
    write_rankings_csv(&csv_out, &view, category, args.top)?;

    let md_out = args.output_dir.join("category_report.md");
    std::fs::write(&md_out, render_markdown(&report, &view, &selection, args.top))?;

    info!(
        villages = report.total_villages,
        districts = report.total_districts,
        output_dir = ?args.output_dir,
        "report completed"
    );

    Ok(ReportOutcome {
        output_dir: args.output_dir,
        villages: report.total_villages,
        districts: report.total_districts,
    })
}

fn write_rankings_csv(
    path: &PathBuf,
    view: &[Village],
    category: &catalog::Category,
    top: usize,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create rankings CSV: {:?}", path))?;
    writer.write_record(["indicator", "rank", "village", "district", "value"])?;

    for (key, _) in category.indicators {
        let RankingResult::Ranked(rows) = ranking::top_n(view, key, top) else {
            // Qualitative indicators have no ranking to export.
            continue;
        };
        for (i, row) in rows.iter().enumerate() {
            let rank = (i + 1).to_string();
            let value = row.value.to_string();
            writer.write_record([
                *key,
                rank.as_str(),
                row.name.as_str(),
                row.district.as_str(),
                value.as_str(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn render_markdown(
    report: &CategoryReport,
    view: &[Village],
    selection: &Selection,
    top: usize,
) -> String {
    let mut md = String::new();

    md.push_str(&format!(
        "# {}\n\n",
        analysis_title(&report.category, None, selection)
    ));
    md.push_str(&format!("Generated: {}\n\n", report.generated_at));

    md.push_str("## Scope\n\n| Metric | Value |\n|---|---:|\n");
    md.push_str(&format!("| Villages | {} |\n", report.total_villages));
    md.push_str(&format!("| Districts | {} |\n", report.total_districts));
    md.push_str(&format!(
        "| Indicators | {} |\n\n",
        report.indicators.len()
    ));

    for indicator in &report.indicators {
        md.push_str(&format!("## {}\n\n", indicator.label));
        match &indicator.kpis {
            KpiResult::Quantitative(k) => {
                md.push_str("| Metric | Value |\n|---|---:|\n");
                md.push_str(&format!("| Total | {} |\n", k.total));
                md.push_str(&format!("| Median | {:.1} |\n", k.median));
                md.push_str(&format!("| Max | {} |\n", k.max));
                md.push_str(&format!("| Min | {} |\n", k.min));
                match &k.top_village {
                    Some(t) => md.push_str(&format!(
                        "| Desa tertinggi | {} ({}) — {} |\n",
                        t.name, t.district, t.value
                    )),
                    None => md.push_str("| Desa tertinggi | Tidak ada |\n"),
                }
                if let Some(v) = ranking::uniform_value(view, &indicator.key) {
                    md.push_str(&format!(
                        "\nSemua desa memiliki nilai seragam: **{}**\n",
                        v
                    ));
                } else if let RankingResult::Ranked(rows) = ranking::top_n(view, &indicator.key, top)
                {
                    md.push_str(&format!(
                        "\n### Top {} Desa\n\n| Rank | Desa | Kecamatan | Nilai |\n|---:|---|---|---:|\n",
                        rows.len()
                    ));
                    for (i, row) in rows.iter().enumerate() {
                        md.push_str(&format!(
                            "| {} | {} | {} | {} |\n",
                            i + 1,
                            row.name,
                            row.district,
                            row.value
                        ));
                    }
                }
                md.push('\n');
            }
            KpiResult::Qualitative(k) => {
                md.push_str("| Nilai | Jumlah Desa | % |\n|---|---:|---:|\n");
                for ((value, count), (_, pct)) in k.value_counts.iter().zip(&k.percentages) {
                    md.push_str(&format!("| {} | {} | {:.1} |\n", value, count, pct));
                }
                md.push_str(&format!(
                    "\nPaling umum: **{}** ({} desa)\n\n",
                    k.most_common, k.most_common_count
                ));
            }
            KpiResult::Summary(_) => {}
            KpiResult::Empty => {
                md.push_str("Tidak ada data untuk indikator ini pada pilihan saat ini.\n\n");
            }
        }
    }

    md
}
