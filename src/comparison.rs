use crate::catalog;
use crate::structures::{ComparisonEntry, Village};
use std::collections::BTreeMap;

/// Builds the per-village, per-indicator projection used for side-by-side
/// tables and grouped charts.
///
/// At least 2 distinct village names are required; fewer yield an empty map
/// (repeats of one name count once). The presentation layer caps the
/// selection at 4 villages for readable charts, but that bound is not
/// enforced here. Values are copied verbatim; a village/indicator pair with
/// no value is omitted from that village's entry, and a requested name not
/// present in the view is skipped entirely. Duplicate names in the view
/// resolve to the first matching row.
pub fn compare(
    view: &[Village],
    names: &[String],
    indicator_keys: &[String],
) -> BTreeMap<String, ComparisonEntry> {
    let mut distinct: Vec<&str> = Vec::new();
    for name in names {
        if !distinct.contains(&name.as_str()) {
            distinct.push(name);
        }
    }
    if distinct.len() < 2 {
        return BTreeMap::new();
    }

    let mut result = BTreeMap::new();
    for name in distinct {
        let Some(village) = view.iter().find(|v| v.name == name) else {
            continue;
        };
        let mut values = Vec::with_capacity(indicator_keys.len());
        for key in indicator_keys {
            if let Some(value) = village.value(key) {
                let label = catalog::indicator_label(key)
                    .map(str::to_string)
                    .unwrap_or_else(|| catalog::generated_label(key));
                values.push((label, value.clone()));
            }
        }
        result.insert(
            name.to_string(),
            ComparisonEntry {
                district: village.district.clone(),
                values,
            },
        );
    }
    result
}
