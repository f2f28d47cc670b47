//! Behavior-driven tests for series transforms.
//!
//! These tests verify HOW moving averages, descriptive statistics, and
//! series alignment behave at their edges: warm-up windows, empty inputs,
//! and gap-bearing joins.

use tickboard_core::transform::{align_and_merge, describe, moving_average, PriceField};
use tickboard_core::{Interval, OhlcBar, OhlcSeries, Symbol, UtcDateTime, ValidationError};

fn daily_series(closes: &[f64]) -> OhlcSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let ts = UtcDateTime::from_unix_timestamp(1_704_067_200 + i as i64 * 86_400)
                .expect("timestamp");
            OhlcBar::new(ts, close, close + 1.0, close - 1.0, close, Some(1_000 + i as u64))
                .expect("bar is valid")
        })
        .collect();
    OhlcSeries::new(Symbol::parse("AAPL").expect("valid"), Interval::Daily, bars)
}

// =============================================================================
// Moving averages
// =============================================================================

#[test]
fn moving_average_keeps_one_point_per_bar_with_a_warmup_gap() {
    // Given: five bars and a three-bar window
    let series = daily_series(&[1.0, 2.0, 3.0, 4.0, 5.0]);

    // When: the moving average is computed
    let ma = moving_average(&series, PriceField::Close, 3).expect("period is valid");

    // Then: output aligns index-for-index and the warm-up points are empty
    assert_eq!(ma.points().len(), series.len());
    let values: Vec<Option<f64>> = ma.points().iter().map(|p| p.value).collect();
    assert_eq!(values, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);

    for (point, bar) in ma.points().iter().zip(series.bars()) {
        assert_eq!(point.ts, bar.ts);
    }
}

#[test]
fn moving_average_window_longer_than_series_yields_no_values() {
    // Given: a short series and a hundred-bar window
    let series = daily_series(&[1.0, 2.0, 3.0]);

    // When
    let ma = moving_average(&series, PriceField::Close, 100).expect("period is valid");

    // Then: the shape is preserved but no value ever materializes
    assert_eq!(ma.points().len(), 3);
    assert!(ma.points().iter().all(|p| p.value.is_none()));
}

#[test]
fn short_and_long_windows_behave_independently_on_a_fifty_bar_series() {
    // Given: fifty bars, a 20-bar window, and a 100-bar window
    let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
    let series = daily_series(&closes);

    // When
    let short = moving_average(&series, PriceField::Close, 20).expect("valid");
    let long = moving_average(&series, PriceField::Close, 100).expect("valid");

    // Then: the short window produces 31 observations, the long one none
    let short_values = short.points().iter().filter(|p| p.value.is_some()).count();
    assert_eq!(short_values, 31);
    assert!(long.points().iter().all(|p| p.value.is_none()));
}

#[test]
fn moving_average_rejects_a_zero_window() {
    let series = daily_series(&[1.0]);
    let error = moving_average(&series, PriceField::Close, 0).expect_err("must fail");
    assert!(matches!(error, ValidationError::ZeroPeriod));
}

#[test]
fn moving_average_reads_the_requested_field() {
    // Given: highs sit exactly one above closes
    let series = daily_series(&[10.0, 20.0, 30.0]);

    // When
    let close_ma = moving_average(&series, PriceField::Close, 3).expect("valid");
    let high_ma = moving_average(&series, PriceField::High, 3).expect("valid");

    // Then
    assert_eq!(close_ma.points()[2].value, Some(20.0));
    assert_eq!(high_ma.points()[2].value, Some(21.0));
}

// =============================================================================
// Descriptive statistics
// =============================================================================

#[test]
fn describe_covers_every_bar_component() {
    // Given: four bars
    let series = daily_series(&[2.0, 4.0, 6.0, 8.0]);

    // When
    let summary = describe(&series);

    // Then: one stats row per component, each with the full quartile set
    assert_eq!(summary.count, 4);
    let names: Vec<&str> = summary.fields.iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["open", "high", "low", "close", "volume"]);

    let close = summary.fields.iter().find(|f| f.name == "close").expect("present");
    assert_eq!(close.stats.mean, 5.0);
    assert_eq!(close.stats.p50, 5.0);
    assert_eq!(close.stats.min, 2.0);
    assert_eq!(close.stats.max, 8.0);
    assert!(close.stats.std_dev > 0.0);
}

#[test]
fn describe_of_an_empty_series_is_empty_not_an_error() {
    // Given: a series with no bars
    let empty = OhlcSeries::new(
        Symbol::parse("AAPL").expect("valid"),
        Interval::Daily,
        Vec::new(),
    );

    // When
    let summary = describe(&empty);

    // Then
    assert_eq!(summary.count, 0);
    assert!(summary.fields.is_empty());
}

// =============================================================================
// Alignment
// =============================================================================

#[test]
fn align_outer_joins_and_fills_gaps_with_none() {
    // Given: two annual series overlapping on a single year
    let table = align_and_merge(&[
        (String::from("United States"), vec![(2020, 1.0), (2021, 2.0)]),
        (String::from("China"), vec![(2021, 5.0), (2022, 6.0)]),
    ]);

    // Then: the union of keys appears, in order, with per-column gaps
    let keys: Vec<i32> = table.rows.iter().map(|row| row.key).collect();
    assert_eq!(keys, vec![2020, 2021, 2022]);
    assert_eq!(table.rows[0].values, vec![Some(1.0), None]);
    assert_eq!(table.rows[1].values, vec![Some(2.0), Some(5.0)]);
    assert_eq!(table.rows[2].values, vec![None, Some(6.0)]);
}

#[test]
fn align_result_does_not_depend_on_input_order() {
    // Given: the same two series in both orders
    let ab = align_and_merge(&[
        (String::from("a"), vec![(1, 1.0), (3, 3.0)]),
        (String::from("b"), vec![(2, 2.0)]),
    ]);
    let ba = align_and_merge(&[
        (String::from("b"), vec![(2, 2.0)]),
        (String::from("a"), vec![(1, 1.0), (3, 3.0)]),
    ]);

    // Then: the key sets and per-series values match either way
    let keys_ab: Vec<i32> = ab.rows.iter().map(|row| row.key).collect();
    let keys_ba: Vec<i32> = ba.rows.iter().map(|row| row.key).collect();
    assert_eq!(keys_ab, keys_ba);

    let a_in_ab: Vec<Option<f64>> = ab.rows.iter().map(|row| row.values[0]).collect();
    let a_in_ba: Vec<Option<f64>> = ba.rows.iter().map(|row| row.values[1]).collect();
    assert_eq!(a_in_ab, a_in_ba);
}

#[test]
fn align_of_no_series_is_an_empty_table() {
    let table = align_and_merge::<i32>(&[]);
    assert!(table.columns.is_empty());
    assert!(table.rows.is_empty());
}
