use std::collections::BTreeMap;

use serde::Serialize;

use crate::ingest::ValidatedRows;

/// Category label to number of rows carrying it.
pub type TypeDistribution = BTreeMap<String, u64>;

/// Header statistics computed once at ingestion time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
    pub total_count: usize,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    pub type_distribution: TypeDistribution,
}

/// Compute the means of the three readings and the type distribution.
///
/// Means of finite readings are always finite, even when their sum is not.
pub fn summarize(rows: &ValidatedRows) -> DatasetStats {
    let count = rows.len() as f64;

    DatasetStats {
        total_count: rows.len(),
        avg_flowrate: mean(rows.iter().map(|row| row.flowrate), count),
        avg_pressure: mean(rows.iter().map(|row| row.pressure), count),
        avg_temperature: mean(rows.iter().map(|row| row.temperature), count),
        type_distribution: type_distribution(rows.iter().map(|row| row.kind.as_str())),
    }
}

fn mean<I>(values: I, count: f64) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let sum: f64 = values.clone().sum();
    if sum.is_finite() {
        sum / count
    } else {
        // Overflowed; scale first so every partial sum stays in range.
        values.map(|v| v / count).sum()
    }
}

/// Count occurrences of each category label.
pub fn type_distribution<'a, I>(kinds: I) -> TypeDistribution
where
    I: IntoIterator<Item = &'a str>,
{
    let mut distribution = TypeDistribution::new();
    for kind in kinds {
        *distribution.entry(kind.to_string()).or_insert(0) += 1;
    }
    distribution
}
