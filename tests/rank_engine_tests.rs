use chart_race_rs::core::rank::{MISSING_RANK, RankSmoothing, displayed_ranks, resample_ranks};
use chart_race_rs::core::{FillMethod, RawSeries};
use chrono::NaiveDate;

fn country_series() -> RawSeries {
    RawSeries::builder()
        .timestamps(["1960-01-01", "1961-01-01", "1962-01-01"])
        .numeric_values("Afghanistan", vec![1.0, 2.0, 3.0])
        .numeric_values("Angola", vec![2.0, 3.0, 4.0])
        .numeric_values("Albania", vec![1.0, 2.0, 5.0])
        .numeric_values("USA", vec![5.0, 3.0, 4.0])
        .numeric_values("Argentina", vec![1.0, 4.0, 5.0])
        .build("%Y-%m-%d")
        .expect("raw series")
}

fn quarterly_grid() -> Vec<chrono::NaiveDateTime> {
    let months = [
        (1960, 1),
        (1960, 4),
        (1960, 7),
        (1960, 10),
        (1961, 1),
        (1961, 4),
        (1961, 7),
        (1961, 10),
        (1962, 1),
    ];
    months
        .iter()
        .map(|&(year, month)| {
            NaiveDate::from_ymd_opt(year, month, 1)
                .expect("valid date")
                .and_hms_opt(0, 0, 0)
                .expect("valid time")
        })
        .collect()
}

fn assert_column(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() <= 1e-9, "slot {i}: expected {e}, got {a}");
    }
}

#[test]
fn ties_break_by_column_order() {
    let raw = country_series();
    let ranks = displayed_ranks(&raw, 5);

    // Row 0 values are [1, 2, 1, 5, 1]: the three tied columns keep their
    // original order, so Afghanistan outranks Albania outranks Argentina.
    assert!((ranks["USA"][0] - 5.0).abs() <= 1e-9);
    assert!((ranks["Angola"][0] - 4.0).abs() <= 1e-9);
    assert!((ranks["Afghanistan"][0] - 3.0).abs() <= 1e-9);
    assert!((ranks["Albania"][0] - 2.0).abs() <= 1e-9);
    assert!((ranks["Argentina"][0] - 1.0).abs() <= 1e-9);
}

#[test]
fn raw_ranks_match_the_country_fixture() {
    let raw = country_series();
    let ranks = displayed_ranks(&raw, 5);

    assert_column(&ranks["Afghanistan"], &[3.0, 2.0, 1.0]);
    assert_column(&ranks["Angola"], &[4.0, 4.0, 3.0]);
    assert_column(&ranks["Albania"], &[2.0, 1.0, 5.0]);
    assert_column(&ranks["USA"], &[5.0, 3.0, 2.0]);
    assert_column(&ranks["Argentina"], &[1.0, 5.0, 4.0]);
}

#[test]
fn ranks_past_the_visible_band_collapse_to_zero() {
    let raw = country_series();
    let ranks = displayed_ranks(&raw, 3);

    // Row 0: USA, Angola, Afghanistan fill the band; the rest clip out.
    assert!((ranks["USA"][0] - 3.0).abs() <= 1e-9);
    assert!((ranks["Angola"][0] - 2.0).abs() <= 1e-9);
    assert!((ranks["Afghanistan"][0] - 1.0).abs() <= 1e-9);
    assert!(ranks["Albania"][0].abs() <= 1e-9);
    assert!(ranks["Argentina"][0].abs() <= 1e-9);
}

#[test]
fn missing_cells_rank_as_the_sentinel() {
    let raw = RawSeries::builder()
        .timestamps(["2020-01-01", "2020-01-02"])
        .numeric_column("a", vec![Some(1.0), None])
        .numeric_column("b", vec![Some(2.0), Some(3.0)])
        .build("%Y-%m-%d")
        .expect("raw series");

    let ranks = displayed_ranks(&raw, 2);
    assert!((ranks["a"][1] - MISSING_RANK).abs() <= 1e-9);
    // With one contender the survivor takes the top slot.
    assert!((ranks["b"][1] - 2.0).abs() <= 1e-9);
}

#[test]
fn bounded_backfill_smooths_half_of_each_gap() {
    let raw = country_series();
    let ranks = displayed_ranks(&raw, 5);
    let grid = quarterly_grid();

    let smoothed = resample_ranks(&ranks, raw.times(), &grid, RankSmoothing::default());

    assert_column(
        &smoothed["Afghanistan"],
        &[3.0, 2.5, 2.0, 2.0, 2.0, 1.5, 1.0, 1.0, 1.0],
    );
    assert_column(
        &smoothed["Albania"],
        &[2.0, 1.5, 1.0, 1.0, 1.0, 3.0, 5.0, 5.0, 5.0],
    );
}

#[test]
fn zero_ip_frac_interpolates_the_whole_gap() {
    let raw = country_series();
    let ranks = displayed_ranks(&raw, 5);
    let grid = quarterly_grid();

    let smoothing = RankSmoothing {
        ip_frac: 0.0,
        fill_method: FillMethod::Backward,
    };
    let smoothed = resample_ranks(&ranks, raw.times(), &grid, smoothing);

    // No bounded pass: 3 -> 2 over four quarters in even steps.
    assert_column(
        &smoothed["Afghanistan"],
        &[3.0, 2.75, 2.5, 2.25, 2.0, 1.75, 1.5, 1.25, 1.0],
    );
}

#[test]
fn forward_fill_holds_the_previous_rank() {
    let raw = country_series();
    let ranks = displayed_ranks(&raw, 5);
    let grid = quarterly_grid();

    let smoothing = RankSmoothing {
        ip_frac: 1.0,
        fill_method: FillMethod::Forward,
    };
    let smoothed = resample_ranks(&ranks, raw.times(), &grid, smoothing);

    // gap ratio 3, full fraction: every gap cell holds the previous rank.
    assert_column(
        &smoothed["Afghanistan"],
        &[3.0, 3.0, 3.0, 3.0, 2.0, 2.0, 2.0, 2.0, 1.0],
    );
}

#[test]
fn smoothed_ranks_are_defined_at_every_grid_slot() {
    let raw = country_series();
    let ranks = displayed_ranks(&raw, 5);
    let grid = quarterly_grid();

    let smoothed = resample_ranks(&ranks, raw.times(), &grid, RankSmoothing::default());
    for column in smoothed.values() {
        assert_eq!(column.len(), grid.len());
        assert!(column.iter().all(|r| r.is_finite()));
    }
}

#[test]
fn single_observation_column_step_holds_across_the_grid() {
    let raw = RawSeries::builder()
        .timestamps(["2020-01-01"])
        .numeric_values("a", vec![1.0])
        .build("%Y-%m-%d")
        .expect("raw series");
    let ranks = displayed_ranks(&raw, 1);

    let grid: Vec<chrono::NaiveDateTime> = (1..=5)
        .map(|day| {
            NaiveDate::from_ymd_opt(2020, 1, day)
                .expect("valid date")
                .and_hms_opt(0, 0, 0)
                .expect("valid time")
        })
        .collect();

    let smoothed = resample_ranks(&ranks, raw.times(), &grid, RankSmoothing::default());
    assert_column(&smoothed["a"], &[1.0, 1.0, 1.0, 1.0, 1.0]);
}
