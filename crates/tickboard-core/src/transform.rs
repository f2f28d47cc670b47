//! Pure series transforms: moving averages, summary statistics, and
//! outer-join alignment of heterogeneous series. No I/O here.

use std::collections::BTreeMap;

use crate::{OhlcSeries, UtcDateTime, ValidationError};

/// Which bar component a transform reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceField {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }

    fn extract(self, series: &OhlcSeries) -> Vec<f64> {
        series
            .bars()
            .iter()
            .map(|bar| match self {
                Self::Open => bar.open,
                Self::High => bar.high,
                Self::Low => bar.low,
                Self::Close => bar.close,
                Self::Volume => bar.volume.unwrap_or(0) as f64,
            })
            .collect()
    }
}

/// One moving-average observation; `None` while the window is still filling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAveragePoint {
    pub ts: UtcDateTime,
    pub value: Option<f64>,
}

/// Simple moving average aligned index-for-index with the input series.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverageSeries {
    pub field: PriceField,
    pub period: usize,
    points: Vec<MovingAveragePoint>,
}

impl MovingAverageSeries {
    pub fn points(&self) -> &[MovingAveragePoint] {
        &self.points
    }
}

/// Simple moving average over `field` with the given window.
///
/// Output has exactly one point per input bar; the first `period - 1`
/// points carry no value. A window longer than the series yields all-`None`
/// points rather than an error.
pub fn moving_average(
    series: &OhlcSeries,
    field: PriceField,
    period: usize,
) -> Result<MovingAverageSeries, ValidationError> {
    if period == 0 {
        return Err(ValidationError::ZeroPeriod);
    }

    let values = field.extract(series);
    let mut window_sum = 0.0;
    let mut points = Vec::with_capacity(values.len());

    for (i, bar) in series.bars().iter().enumerate() {
        window_sum += values[i];
        if i >= period {
            window_sum -= values[i - period];
        }

        let value = if i + 1 >= period {
            Some(window_sum / period as f64)
        } else {
            None
        };

        points.push(MovingAveragePoint { ts: bar.ts, value });
    }

    Ok(MovingAverageSeries {
        field,
        period,
        points,
    })
}

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); zero for one value.
    pub std_dev: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

/// Stats for one named column of a series summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSummary {
    pub name: &'static str,
    pub stats: FieldStats,
}

/// Per-field descriptive statistics over a whole series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub fields: Vec<FieldSummary>,
}

const SUMMARY_FIELDS: [PriceField; 5] = [
    PriceField::Open,
    PriceField::High,
    PriceField::Low,
    PriceField::Close,
    PriceField::Volume,
];

/// Summarize every bar component of a series. An empty series yields a
/// summary with `count == 0` and no field rows.
pub fn describe(series: &OhlcSeries) -> SeriesSummary {
    let count = series.len();
    if count == 0 {
        return SeriesSummary {
            count,
            fields: Vec::new(),
        };
    }

    let fields = SUMMARY_FIELDS
        .into_iter()
        .map(|field| FieldSummary {
            name: field.name(),
            stats: field_stats(&field.extract(series)),
        })
        .collect();

    SeriesSummary { count, fields }
}

fn field_stats(values: &[f64]) -> FieldStats {
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;

    let std_dev = if count > 1 {
        let variance = values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    FieldStats {
        count,
        mean,
        std_dev,
        min: sorted[0],
        p25: percentile(&sorted, 0.25),
        p50: percentile(&sorted, 0.50),
        p75: percentile(&sorted, 0.75),
        max: sorted[count - 1],
    }
}

/// Linear-interpolation percentile over already-sorted values.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// One aligned row: a shared key plus one optional value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow<K> {
    pub key: K,
    pub values: Vec<Option<f64>>,
}

/// Outer join of several keyed series into a single table.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable<K> {
    pub columns: Vec<String>,
    pub rows: Vec<AlignedRow<K>>,
}

/// Outer-join keyed series into one table ordered by key.
///
/// Every key that appears in any input produces a row; columns with no
/// observation at that key carry `None`. Column order follows input order,
/// and the result is the same whichever series is longest.
pub fn align_and_merge<K: Ord + Clone>(series: &[(String, Vec<(K, f64)>)]) -> AlignedTable<K> {
    let columns: Vec<String> = series.iter().map(|(name, _)| name.clone()).collect();

    let mut merged: BTreeMap<K, Vec<Option<f64>>> = BTreeMap::new();
    for (index, (_, points)) in series.iter().enumerate() {
        for (key, value) in points {
            merged
                .entry(key.clone())
                .or_insert_with(|| vec![None; columns.len()])[index] = Some(*value);
        }
    }

    let rows = merged
        .into_iter()
        .map(|(key, values)| AlignedRow { key, values })
        .collect();

    AlignedTable { columns, rows }
}
