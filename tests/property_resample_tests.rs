use chart_race_rs::core::interpolate::InterpolationMethod;
use chart_race_rs::core::resample::resample;
use chart_race_rs::core::{Frequency, RawSeries};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

fn series_from(values: &[f64]) -> RawSeries {
    let start = NaiveDate::from_ymd_opt(2021, 6, 1).expect("valid date");
    let times: Vec<String> = (0..values.len())
        .map(|i| {
            start
                .checked_add_days(Days::new(2 * i as u64))
                .expect("date in range")
                .format("%Y-%m-%d")
                .to_string()
        })
        .collect();

    RawSeries::builder()
        .timestamps(times)
        .numeric_values("a", values.to_vec())
        .build("%Y-%m-%d")
        .expect("raw series")
}

proptest! {
    #[test]
    fn resampled_grid_covers_every_raw_row(
        values in prop::collection::vec(-1000.0f64..1000.0, 2..12)
    ) {
        let raw = series_from(&values);
        let freq: Frequency = "D".parse().expect("frequency");
        let resampled = resample(&raw, Some(freq), InterpolationMethod::Linear)
            .expect("resample");

        prop_assert_eq!(resampled.len(), 2 * values.len() - 1);
        prop_assert_eq!(
            resampled.observed().iter().filter(|&&o| o).count(),
            values.len()
        );
        prop_assert_eq!(resampled.times().first(), raw.times().first());
        prop_assert_eq!(resampled.times().last(), raw.times().last());
    }

    #[test]
    fn resampled_values_are_finite_and_bounded_by_the_input(
        values in prop::collection::vec(-1000.0f64..1000.0, 2..12)
    ) {
        let raw = series_from(&values);
        let freq: Frequency = "D".parse().expect("frequency");
        let resampled = resample(&raw, Some(freq), InterpolationMethod::Linear)
            .expect("resample");

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for &v in &resampled.values()["a"] {
            prop_assert!(v.is_finite());
            prop_assert!(v >= min - 1e-9 && v <= max + 1e-9);
        }
    }

    #[test]
    fn monotonic_input_stays_monotonic(
        mut values in prop::collection::vec(-1000.0f64..1000.0, 2..12)
    ) {
        values.sort_by(|a, b| a.partial_cmp(b).expect("comparable"));
        let raw = series_from(&values);
        let freq: Frequency = "D".parse().expect("frequency");
        let resampled = resample(&raw, Some(freq), InterpolationMethod::Linear)
            .expect("resample");

        let column = &resampled.values()["a"];
        for pair in column.windows(2) {
            prop_assert!(pair[1] >= pair[0] - 1e-9);
        }
    }

    #[test]
    fn raw_observations_survive_resampling_exactly(
        values in prop::collection::vec(-1000.0f64..1000.0, 2..12)
    ) {
        let raw = series_from(&values);
        let freq: Frequency = "D".parse().expect("frequency");
        let resampled = resample(&raw, Some(freq), InterpolationMethod::Linear)
            .expect("resample");

        let column = &resampled.values()["a"];
        for (i, t) in raw.times().iter().enumerate() {
            let slot = resampled
                .times()
                .binary_search(t)
                .expect("raw time on grid");
            prop_assert!((column[slot] - values[i]).abs() <= 1e-12);
        }
    }
}
