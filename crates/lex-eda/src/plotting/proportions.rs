//! Within-class category proportions for categorical columns.

use crate::types::ProportionSeries;
use crate::utils::truncate_label;
use polars::prelude::*;
use std::collections::HashMap;

/// Grouped bar data: display categories and one proportion series per class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProportions {
    pub categories: Vec<String>,
    pub series: Vec<ProportionSeries>,
}

/// Normalized value counts of `column` within each target class.
///
/// For every class the non-missing values of the rows in that class are
/// counted and divided by their total, so each class sums to 1 when it has
/// any values. Categories are ordered by first appearance, classes in
/// `classes` order and values by descending frequency within a class.
/// Labels are truncated to `max_label_chars`; categories that collide after
/// truncation are merged.
pub fn class_proportions(
    column: &Series,
    target: &StringChunked,
    classes: &[String],
    max_label_chars: usize,
) -> PolarsResult<ClassProportions> {
    let text = column.cast(&DataType::String)?;

    let mut categories: Vec<String> = Vec::new();
    let mut category_index: HashMap<String, usize> = HashMap::new();
    let mut per_class: Vec<(String, HashMap<usize, f64>)> = Vec::with_capacity(classes.len());

    for class in classes {
        let mask = target.equal(class.as_str());
        let subset = text.filter(&mask)?.drop_nulls();
        let mut shares: HashMap<usize, f64> = HashMap::new();

        if !subset.is_empty() {
            let counts = subset.value_counts(true, false, "proportion".into(), true)?;
            let columns = counts.get_columns();
            let values = columns[0].as_materialized_series().str()?;
            let proportions = columns[1]
                .as_materialized_series()
                .cast(&DataType::Float64)?;
            let proportions = proportions.f64()?;

            for (value, proportion) in values.into_iter().zip(proportions.into_iter()) {
                let (Some(value), Some(proportion)) = (value, proportion) else {
                    continue;
                };
                let label = truncate_label(value, max_label_chars);
                let idx = *category_index.entry(label.clone()).or_insert_with(|| {
                    categories.push(label);
                    categories.len() - 1
                });
                *shares.entry(idx).or_insert(0.0) += proportion;
            }
        }

        per_class.push((class.clone(), shares));
    }

    let series = per_class
        .into_iter()
        .map(|(class, shares)| ProportionSeries {
            class,
            proportions: (0..categories.len())
                .map(|i| shares.get(&i).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    Ok(ClassProportions { categories, series })
}
