use crate::structures::{Selection, Village};

/// Narrows a view to the villages matching the selection. District and
/// village predicates are conjunctive and commute; zero matches is a valid
/// empty state, not an error. The input is never mutated.
pub fn apply(villages: &[Village], selection: &Selection) -> Vec<Village> {
    villages
        .iter()
        .filter(|v| selection.matches(v))
        .cloned()
        .collect()
}
