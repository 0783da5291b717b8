use crate::catalog;
use crate::metrics::numeric_value;
use crate::structures::{IndicatorKind, ListingRow, RankedVillage, RankingResult, Village};

/// Default ranking depth of the dashboard.
pub const DEFAULT_TOP_N: usize = 5;

/// Top-N villages for a quantitative indicator, descending by value with
/// ties kept in dataset order (stable sort). Qualitative indicators return
/// the full filtered set in dataset order instead, for callers to render as
/// a plain listing rather than a ranking.
pub fn top_n(view: &[Village], indicator: &str, n: usize) -> RankingResult {
    if view.is_empty() || !catalog::has_indicator(view, indicator) {
        return RankingResult::Ranked(Vec::new());
    }
    match catalog::classify(view, indicator) {
        IndicatorKind::Quantitative => {
            let mut rows: Vec<RankedVillage> = view
                .iter()
                .map(|v| RankedVillage {
                    name: v.name.clone(),
                    district: v.district.clone(),
                    value: numeric_value(v, indicator),
                })
                .collect();
            rows.sort_by(|a, b| b.value.cmp(&a.value));
            rows.truncate(n);
            RankingResult::Ranked(rows)
        }
        IndicatorKind::Qualitative => RankingResult::Listing(
            view.iter()
                .map(|v| ListingRow {
                    name: v.name.clone(),
                    district: v.district.clone(),
                    value: v.value(indicator).cloned(),
                })
                .collect(),
        ),
    }
}

/// The shared value when every village in the view holds the same one for a
/// quantitative indicator; all villages then tie at rank 1. Presentation
/// layers use this to show a uniform-value notice instead of a pseudo-ranking.
pub fn uniform_value(view: &[Village], indicator: &str) -> Option<i64> {
    if view.is_empty() || catalog::classify(view, indicator) != IndicatorKind::Quantitative {
        return None;
    }
    let first = numeric_value(&view[0], indicator);
    view.iter()
        .all(|v| numeric_value(v, indicator) == first)
        .then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::IndicatorValue;
    use std::collections::HashMap;

    fn counts(rows: &[(&str, &str, i64)]) -> Vec<Village> {
        rows.iter()
            .map(|(name, district, v)| Village {
                id: name.to_string(),
                district: district.to_string(),
                name: name.to_string(),
                values: HashMap::from([(
                    "jumlah_sd".to_string(),
                    IndicatorValue::Count(*v),
                )]),
            })
            .collect()
    }

    fn ranked_names(result: &RankingResult) -> Vec<&str> {
        match result {
            RankingResult::Ranked(rows) => rows.iter().map(|r| r.name.as_str()).collect(),
            RankingResult::Listing(_) => panic!("expected a ranking"),
        }
    }

    #[test]
    fn ranks_descending_and_truncates() {
        let view = counts(&[("A", "X", 2), ("B", "X", 5), ("C", "Y", 3), ("D", "Y", 8)]);
        let result = top_n(&view, "jumlah_sd", 2);
        assert_eq!(ranked_names(&result), ["D", "B"]);
    }

    #[test]
    fn ties_keep_dataset_order() {
        let view = counts(&[("A", "X", 2), ("B", "X", 5), ("C", "Y", 5)]);
        let result = top_n(&view, "jumlah_sd", 2);
        // B precedes C in the input, so B ranks first at equal value.
        assert_eq!(ranked_names(&result), ["B", "C"]);
    }

    #[test]
    fn n_beyond_view_returns_everything_ranked() {
        let view = counts(&[("A", "X", 1), ("B", "X", 3)]);
        let result = top_n(&view, "jumlah_sd", 10);
        assert_eq!(ranked_names(&result), ["B", "A"]);
    }

    #[test]
    fn qualitative_indicator_lists_the_full_view() {
        let ada = IndicatorValue::Status("Ada".into());
        let view = vec![
            Village {
                id: "1".into(),
                district: "X".into(),
                name: "A".into(),
                values: HashMap::from([("status_tps".to_string(), ada.clone())]),
            },
            Village {
                id: "2".into(),
                district: "Y".into(),
                name: "B".into(),
                values: HashMap::from([("status_tps".to_string(), ada)]),
            },
        ];
        match top_n(&view, "status_tps", 1) {
            RankingResult::Listing(rows) => {
                // Full set, dataset order, no truncation to n.
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].name, "A");
                assert_eq!(rows[1].name, "B");
            }
            RankingResult::Ranked(_) => panic!("expected a listing"),
        }
    }

    #[test]
    fn empty_view_and_absent_indicator_rank_empty() {
        assert!(matches!(
            top_n(&[], "jumlah_sd", 5),
            RankingResult::Ranked(rows) if rows.is_empty()
        ));
        let view = counts(&[("A", "X", 1)]);
        assert!(matches!(
            top_n(&view, "tidak_ada", 5),
            RankingResult::Ranked(rows) if rows.is_empty()
        ));
    }

    #[test]
    fn uniform_values_are_detected() {
        let view = counts(&[("A", "X", 4), ("B", "X", 4), ("C", "Y", 4)]);
        assert_eq!(uniform_value(&view, "jumlah_sd"), Some(4));

        let mixed = counts(&[("A", "X", 4), ("B", "X", 5)]);
        assert_eq!(uniform_value(&mixed, "jumlah_sd"), None);
    }
}
