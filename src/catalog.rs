use crate::structures::{IndicatorKind, IndicatorValue, Village};
use std::collections::HashSet;

/// Indicator sentinel meaning "all indicators of the selected category".
pub const ALL_INDICATORS: &str = "Semua";

/// Category shown when no explicit choice has been made yet.
pub const DEFAULT_CATEGORY: &str = "Pendidikan";

/// Numeric-looking string values with at most this many distinct values are
/// treated as categorical codes rather than measurements.
pub const CATEGORICAL_CARDINALITY: usize = 10;

pub struct Category {
    pub name: &'static str,
    /// Ordered (indicator key, display label) pairs.
    pub indicators: &'static [(&'static str, &'static str)],
}

/// Fixed configuration: category -> indicators of the Podes 2024 dashboard.
/// An indicator key belongs to exactly one category.
pub const CATEGORIES: &[Category] = &[
    Category {
        name: "Pendidikan",
        indicators: &[
            ("jumlah_tk", "Jumlah TK"),
            ("jumlah_sd", "Jumlah SD"),
            ("jumlah_smp", "Jumlah SMP"),
            ("jumlah_sma", "Jumlah SMA"),
        ],
    },
    Category {
        name: "Kesehatan",
        indicators: &[
            ("jumlah_rs", "Jumlah Rumah Sakit"),
            ("jumlah_puskesmas", "Jumlah Puskesmas"),
        ],
    },
    Category {
        name: "Infrastruktur & Konektivitas",
        indicators: &[
            ("kekuatan_sinyal", "Kualitas Sinyal Internet"),
            ("jenis_sinyal_internet", "Jenis Sinyal Internet"),
        ],
    },
    Category {
        name: "Lingkungan & Kebencanaan",
        indicators: &[
            ("status_peringatan_dini", "Sistem Peringatan Dini"),
            ("status_alat_keselamatan", "Alat Keselamatan"),
            ("status_rambu_evakuasi", "Rambu Keselamatan"),
            ("status_tps", "Tempat Penampungan Sampah (TPS)"),
            ("status_tps3r", "Tempat Penampungan Sampah 3R (TPS3R)"),
            ("status_dilakukan_pemilahan_sampah", "Pemilahan Sampah"),
            ("kebiasaan_pemilahan_sampah", "Kebiasaan Pemilahan Sampah"),
            ("warga_terlibat_olah_sampah", "Partisipasi Warga Pengolahan Sampah"),
            ("status_buang_sampah_dibakar", "Status Pembakaran Sampah"),
        ],
    },
];

/// Fields the loader coerces to counts, mirroring the source converter.
pub const COUNT_FIELDS: &[&str] = &[
    "jumlah_tk",
    "jumlah_sd",
    "jumlah_smp",
    "jumlah_sma",
    "jumlah_rs",
    "jumlah_puskesmas",
];

pub fn category(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

pub fn category_names() -> Vec<&'static str> {
    CATEGORIES.iter().map(|c| c.name).collect()
}

/// Indicator keys declared for a category, in catalog order.
pub fn category_keys(name: &str) -> Vec<&'static str> {
    category(name)
        .map(|c| c.indicators.iter().map(|(k, _)| *k).collect())
        .unwrap_or_default()
}

/// Display label for an indicator key, via its first matching category.
pub fn indicator_label(key: &str) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .flat_map(|c| c.indicators.iter())
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}

/// Fallback label for keys the catalog does not know: underscores become
/// spaces, each word title-cased.
pub fn generated_label(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn has_indicator(view: &[Village], key: &str) -> bool {
    view.iter().any(|v| v.values.contains_key(key))
}

/// Classifies an indicator from the value distribution of the *current*
/// view. Intrinsically numeric values are quantitative; numeric-looking
/// strings only when their distinct cardinality exceeds
/// [`CATEGORICAL_CARDINALITY`]; everything else is qualitative.
///
/// Classification can differ between the full dataset and a narrowed view,
/// so callers re-classify after filtering instead of caching the result.
pub fn classify(view: &[Village], key: &str) -> IndicatorKind {
    let values: Vec<_> = view.iter().filter_map(|v| v.value(key)).collect();
    if values.is_empty() {
        return IndicatorKind::Qualitative;
    }
    if values.iter().all(|v| matches!(v, IndicatorValue::Count(_))) {
        return IndicatorKind::Quantitative;
    }
    if values.iter().all(|v| v.as_number().is_some()) {
        let distinct: HashSet<String> = values.iter().map(|v| v.to_string()).collect();
        if distinct.len() > CATEGORICAL_CARDINALITY {
            return IndicatorKind::Quantitative;
        }
    }
    IndicatorKind::Qualitative
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn village(name: &str, fields: &[(&str, IndicatorValue)]) -> Village {
        Village {
            id: name.to_string(),
            district: "X".to_string(),
            name: name.to_string(),
            values: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn count_values_are_quantitative() {
        let view = vec![
            village("A", &[("jumlah_tk", IndicatorValue::Count(2))]),
            village("B", &[("jumlah_tk", IndicatorValue::Count(2))]),
        ];
        assert_eq!(classify(&view, "jumlah_tk"), IndicatorKind::Quantitative);
    }

    #[test]
    fn status_values_are_qualitative() {
        let view = vec![
            village("A", &[("status_tps", IndicatorValue::Status("Ada".into()))]),
            village(
                "B",
                &[("status_tps", IndicatorValue::Status("Tidak Ada".into()))],
            ),
        ];
        assert_eq!(classify(&view, "status_tps"), IndicatorKind::Qualitative);
    }

    #[test]
    fn numeric_strings_need_high_cardinality() {
        let low: Vec<Village> = (0..5)
            .map(|i| {
                village(
                    &format!("V{i}"),
                    &[("kode", IndicatorValue::Status(i.to_string()))],
                )
            })
            .collect();
        assert_eq!(classify(&low, "kode"), IndicatorKind::Qualitative);

        let high: Vec<Village> = (0..12)
            .map(|i| {
                village(
                    &format!("V{i}"),
                    &[("kode", IndicatorValue::Status(i.to_string()))],
                )
            })
            .collect();
        assert_eq!(classify(&high, "kode"), IndicatorKind::Quantitative);
    }

    #[test]
    fn absent_indicator_is_qualitative() {
        let view = vec![village("A", &[])];
        assert_eq!(classify(&view, "jumlah_tk"), IndicatorKind::Qualitative);
        assert!(!has_indicator(&view, "jumlah_tk"));
    }

    #[test]
    fn every_key_belongs_to_one_category() {
        let mut seen = HashMap::new();
        for cat in CATEGORIES {
            for (key, _) in cat.indicators {
                assert!(
                    seen.insert(*key, cat.name).is_none(),
                    "indicator {key} declared twice"
                );
            }
        }
    }

    #[test]
    fn label_lookup_and_fallback() {
        assert_eq!(indicator_label("jumlah_tk"), Some("Jumlah TK"));
        assert_eq!(indicator_label("nope"), None);
        assert_eq!(generated_label("jumlah_warung_kopi"), "Jumlah Warung Kopi");
    }
}
