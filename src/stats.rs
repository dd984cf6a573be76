use crate::models::{GroupKey, LabelRow, MISSING_ROUTE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate for one group: the drug names contributing to it and the mean
/// ingredient count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientSummary {
    pub key: GroupKey,
    pub drug_names: Vec<String>,
    pub count: usize,
    pub avg_number_of_ingredients: f64,
}

/// Mean ingredient count per year, ordered by year.
pub fn average_by_year(rows: &[LabelRow]) -> Vec<IngredientSummary> {
    grouped(rows, |_| None)
}

/// Mean ingredient count per (year, route), ordered by key. Records without
/// a route fall under the [`MISSING_ROUTE`] sentinel.
pub fn average_by_year_and_route(rows: &[LabelRow]) -> Vec<IngredientSummary> {
    grouped(rows, |r| {
        Some(
            r.route
                .clone()
                .unwrap_or_else(|| MISSING_ROUTE.to_string()),
        )
    })
}

fn grouped(
    rows: &[LabelRow],
    route_of: impl Fn(&LabelRow) -> Option<String>,
) -> Vec<IngredientSummary> {
    let mut groups: BTreeMap<GroupKey, (Vec<String>, Vec<usize>)> = BTreeMap::new();
    for r in rows {
        let key = GroupKey {
            year: r.year,
            route: route_of(r),
        };
        let entry = groups.entry(key).or_default();
        entry.0.push(r.generic_name.clone());
        entry.1.push(r.num_ingredients);
    }

    groups
        .into_iter()
        .map(|(key, (drug_names, counts))| {
            let count = counts.len();
            let avg = counts.iter().sum::<usize>() as f64 / count as f64;
            IngredientSummary {
                key,
                drug_names,
                count,
                avg_number_of_ingredients: avg,
            }
        })
        .collect()
}
