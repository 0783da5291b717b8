use crate::catalog::{self, ALL_INDICATORS};
use crate::structures::{
    CategorySummary, IndicatorKind, KpiResult, QualitativeKpis, QuantitativeKpis, TopVillage,
    Village,
};
use std::collections::HashSet;

/// Computes the KPI block for one indicator (or, for the [`ALL_INDICATORS`]
/// sentinel, a category summary) over an already-filtered view.
///
/// Empty views and indicators absent from every row produce
/// [`KpiResult::Empty`]; the caller renders a "cannot compute" state.
pub fn compute_kpis(view: &[Village], indicator: &str, category: &str) -> KpiResult {
    if indicator == ALL_INDICATORS {
        return KpiResult::Summary(category_summary(view, category));
    }
    if view.is_empty() || !catalog::has_indicator(view, indicator) {
        return KpiResult::Empty;
    }
    match catalog::classify(view, indicator) {
        IndicatorKind::Quantitative => KpiResult::Quantitative(quantitative_kpis(view, indicator)),
        IndicatorKind::Qualitative => KpiResult::Qualitative(qualitative_kpis(view, indicator)),
    }
}

fn category_summary(view: &[Village], category: &str) -> CategorySummary {
    let districts: HashSet<&str> = view.iter().map(|v| v.district.as_str()).collect();
    CategorySummary {
        total_villages: view.len(),
        total_districts: districts.len(),
        category: category.to_string(),
        indicator_count: catalog::category_keys(category).len(),
    }
}

/// Numeric value of an indicator for one row; anything non-numeric reads
/// as 0, matching the loader's coercion rule.
pub(crate) fn numeric_value(village: &Village, key: &str) -> i64 {
    village.value(key).and_then(|v| v.as_number()).unwrap_or(0)
}

fn quantitative_kpis(view: &[Village], indicator: &str) -> QuantitativeKpis {
    let values: Vec<i64> = view.iter().map(|v| numeric_value(v, indicator)).collect();
    let total = values.iter().sum();
    let max = values.iter().copied().max().unwrap_or(0);
    let min = values.iter().copied().min().unwrap_or(0);

    // First village in input order holding the maximum; suppressed when
    // nothing was counted anywhere.
    let top_village = if max > 0 {
        view.iter()
            .zip(&values)
            .find(|(_, v)| **v == max)
            .map(|(village, v)| TopVillage {
                name: village.name.clone(),
                district: village.district.clone(),
                value: *v,
            })
    } else {
        None
    };

    QuantitativeKpis {
        total,
        median: median(&values),
        max,
        min,
        top_village,
    }
}

fn median(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    let m = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    };
    round1(m)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn qualitative_kpis(view: &[Village], indicator: &str) -> QualitativeKpis {
    // Frequency over non-missing values only; first-encounter order is kept
    // so equal counts resolve deterministically.
    let mut counts: Vec<(String, u64)> = Vec::new();
    for village in view {
        let Some(value) = village.value(indicator) else {
            continue;
        };
        let text = value.to_string();
        match counts.iter_mut().find(|(v, _)| *v == text) {
            Some((_, n)) => *n += 1,
            None => counts.push((text, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let non_missing: u64 = counts.iter().map(|(_, n)| n).sum();
    let percentages = counts
        .iter()
        .map(|(v, n)| (v.clone(), round1(*n as f64 / non_missing as f64 * 100.0)))
        .collect();

    let (most_common, most_common_count) = counts[0].clone();
    QualitativeKpis {
        value_counts: counts,
        percentages,
        most_common,
        most_common_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::IndicatorValue;
    use std::collections::HashMap;

    fn village(name: &str, district: &str, fields: &[(&str, IndicatorValue)]) -> Village {
        Village {
            id: name.to_string(),
            district: district.to_string(),
            name: name.to_string(),
            values: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    fn counts(rows: &[(&str, &str, i64)]) -> Vec<Village> {
        rows.iter()
            .map(|(name, district, v)| {
                village(name, district, &[("jumlah_tk", IndicatorValue::Count(*v))])
            })
            .collect()
    }

    #[test]
    fn quantitative_scenario() {
        let view = counts(&[("A", "X", 2), ("B", "X", 5), ("C", "Y", 5)]);
        let filtered: Vec<Village> = view[..2].to_vec();

        match compute_kpis(&filtered, "jumlah_tk", "Pendidikan") {
            KpiResult::Quantitative(k) => {
                assert_eq!(k.total, 7);
                assert_eq!(k.max, 5);
                assert_eq!(k.min, 2);
                assert_eq!(k.median, 3.5);
                let top = k.top_village.expect("max > 0 has a top village");
                assert_eq!(top.name, "B");
                assert_eq!(top.district, "X");
                assert_eq!(top.value, 5);
            }
            other => panic!("expected quantitative kpis, got {other:?}"),
        }
    }

    #[test]
    fn quantitative_bounds_hold() {
        let view = counts(&[("A", "X", 1), ("B", "X", 9), ("C", "Y", 4), ("D", "Y", 4)]);
        match compute_kpis(&view, "jumlah_tk", "Pendidikan") {
            KpiResult::Quantitative(k) => {
                assert!(k.min as f64 <= k.median && k.median <= k.max as f64);
                assert_eq!(k.total, 18);
            }
            other => panic!("expected quantitative kpis, got {other:?}"),
        }
    }

    #[test]
    fn top_village_tie_breaks_by_input_order() {
        let view = counts(&[("A", "X", 5), ("B", "X", 5)]);
        match compute_kpis(&view, "jumlah_tk", "Pendidikan") {
            KpiResult::Quantitative(k) => {
                assert_eq!(k.top_village.unwrap().name, "A");
            }
            other => panic!("expected quantitative kpis, got {other:?}"),
        }
    }

    #[test]
    fn all_zero_has_no_top_village() {
        let view = counts(&[("A", "X", 0), ("B", "X", 0)]);
        match compute_kpis(&view, "jumlah_tk", "Pendidikan") {
            KpiResult::Quantitative(k) => assert!(k.top_village.is_none()),
            other => panic!("expected quantitative kpis, got {other:?}"),
        }
    }

    #[test]
    fn qualitative_scenario() {
        let ada = IndicatorValue::Status("Ada".into());
        let tidak = IndicatorValue::Status("Tidak Ada".into());
        let view = vec![
            village("A", "X", &[("status_tps", ada.clone())]),
            village("B", "X", &[("status_tps", ada)]),
            village("C", "Y", &[("status_tps", tidak)]),
        ];
        match compute_kpis(&view, "status_tps", "Lingkungan & Kebencanaan") {
            KpiResult::Qualitative(k) => {
                assert_eq!(
                    k.value_counts,
                    vec![("Ada".to_string(), 2), ("Tidak Ada".to_string(), 1)]
                );
                assert_eq!(
                    k.percentages,
                    vec![("Ada".to_string(), 66.7), ("Tidak Ada".to_string(), 33.3)]
                );
                assert_eq!(k.most_common, "Ada");
                assert_eq!(k.most_common_count, 2);
            }
            other => panic!("expected qualitative kpis, got {other:?}"),
        }
    }

    #[test]
    fn qualitative_skips_missing_values() {
        let ada = IndicatorValue::Status("Ada".into());
        let view = vec![
            village("A", "X", &[("status_tps", ada.clone())]),
            village("B", "X", &[]),
            village("C", "Y", &[("status_tps", ada)]),
        ];
        match compute_kpis(&view, "status_tps", "Lingkungan & Kebencanaan") {
            KpiResult::Qualitative(k) => {
                // Denominator is the 2 non-missing rows, not the view size.
                assert_eq!(k.value_counts, vec![("Ada".to_string(), 2)]);
                assert_eq!(k.percentages, vec![("Ada".to_string(), 100.0)]);
            }
            other => panic!("expected qualitative kpis, got {other:?}"),
        }
    }

    #[test]
    fn qualitative_percentages_sum_to_100() {
        let view = vec![
            village("A", "X", &[("s", IndicatorValue::Status("P".into()))]),
            village("B", "X", &[("s", IndicatorValue::Status("Q".into()))]),
            village("C", "Y", &[("s", IndicatorValue::Status("R".into()))]),
        ];
        match compute_kpis(&view, "s", "Pendidikan") {
            KpiResult::Qualitative(k) => {
                let sum: f64 = k.percentages.iter().map(|(_, p)| p).sum();
                assert!((sum - 100.0).abs() < 0.2, "sum was {sum}");
                let total: u64 = k.value_counts.iter().map(|(_, n)| n).sum();
                assert_eq!(total, 3);
            }
            other => panic!("expected qualitative kpis, got {other:?}"),
        }
    }

    #[test]
    fn most_common_tie_prefers_first_encounter() {
        let view = vec![
            village("A", "X", &[("s", IndicatorValue::Status("Q".into()))]),
            village("B", "X", &[("s", IndicatorValue::Status("P".into()))]),
            village("C", "Y", &[("s", IndicatorValue::Status("P".into()))]),
            village("D", "Y", &[("s", IndicatorValue::Status("Q".into()))]),
        ];
        match compute_kpis(&view, "s", "Pendidikan") {
            KpiResult::Qualitative(k) => assert_eq!(k.most_common, "Q"),
            other => panic!("expected qualitative kpis, got {other:?}"),
        }
    }

    #[test]
    fn category_summary_counts_view() {
        let view = counts(&[("A", "X", 1), ("B", "X", 2), ("C", "Y", 3)]);
        match compute_kpis(&view, ALL_INDICATORS, "Pendidikan") {
            KpiResult::Summary(s) => {
                assert_eq!(s.total_villages, 3);
                assert_eq!(s.total_districts, 2);
                assert_eq!(s.category, "Pendidikan");
                assert_eq!(s.indicator_count, 4);
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[test]
    fn empty_view_and_unknown_indicator_yield_empty() {
        assert!(compute_kpis(&[], "jumlah_tk", "Pendidikan").is_empty());
        let view = counts(&[("A", "X", 1)]);
        assert!(compute_kpis(&view, "tidak_ada_kolom", "Pendidikan").is_empty());
    }
}
