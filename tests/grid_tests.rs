use chart_race_rs::core::{EvenGrid, Frequency, FrequencyUnit};
use chrono::NaiveDate;

fn at(year: i32, month: u32, day: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(0, 0, 0)
        .expect("valid time")
}

#[test]
fn parses_count_prefixed_aliases() {
    let freq: Frequency = "3MS".parse().expect("frequency");
    assert_eq!(freq.count(), 3);
    assert_eq!(freq.unit(), FrequencyUnit::Months);

    let freq: Frequency = "2W".parse().expect("frequency");
    assert_eq!(freq.count(), 2);
    assert_eq!(freq.unit(), FrequencyUnit::Weeks);
}

#[test]
fn bare_aliases_default_to_count_one() {
    for (alias, unit) in [
        ("Y", FrequencyUnit::Years),
        ("YS", FrequencyUnit::Years),
        ("A", FrequencyUnit::Years),
        ("M", FrequencyUnit::Months),
        ("MS", FrequencyUnit::Months),
        ("W", FrequencyUnit::Weeks),
        ("D", FrequencyUnit::Days),
        ("H", FrequencyUnit::Hours),
        ("min", FrequencyUnit::Minutes),
        ("T", FrequencyUnit::Minutes),
        ("S", FrequencyUnit::Seconds),
    ] {
        let freq: Frequency = alias.parse().expect("frequency");
        assert_eq!(freq.count(), 1, "alias {alias}");
        assert_eq!(freq.unit(), unit, "alias {alias}");
    }
}

#[test]
fn unknown_alias_is_rejected() {
    assert!("3XYZ".parse::<Frequency>().is_err());
    assert!("".parse::<Frequency>().is_err());
}

#[test]
fn zero_count_is_rejected() {
    assert!("0D".parse::<Frequency>().is_err());
}

#[test]
fn oversized_year_count_errors_instead_of_overflowing() {
    let freq: Frequency = "400000000Y".parse().expect("frequency");
    assert!(freq.advance(at(2020, 1, 1)).is_err());

    let freq: Frequency = "4294967295W".parse().expect("frequency");
    assert!(freq.advance(at(2020, 1, 1)).is_err());
}

#[test]
fn span_is_inclusive_of_both_bounds_when_aligned() {
    let freq: Frequency = "3MS".parse().expect("frequency");
    let grid = EvenGrid::span(at(1960, 1, 1), at(1961, 1, 1), freq).expect("span");

    assert_eq!(grid.len(), 5);
    assert_eq!(grid.times()[0], at(1960, 1, 1));
    assert_eq!(grid.times()[4], at(1961, 1, 1));
}

#[test]
fn span_stops_before_an_unaligned_end() {
    let freq: Frequency = "MS".parse().expect("frequency");
    let grid = EvenGrid::span(at(2020, 1, 1), at(2020, 3, 15), freq).expect("span");

    assert_eq!(
        grid.times(),
        &[at(2020, 1, 1), at(2020, 2, 1), at(2020, 3, 1)]
    );
}

#[test]
fn span_rejects_reversed_bounds() {
    let freq: Frequency = "D".parse().expect("frequency");
    assert!(EvenGrid::span(at(2020, 1, 2), at(2020, 1, 1), freq).is_err());
}

#[test]
fn monthly_steps_keep_the_anchor_day() {
    let freq: Frequency = "MS".parse().expect("frequency");
    let grid = EvenGrid::span(at(2020, 1, 15), at(2020, 4, 20), freq).expect("span");
    assert_eq!(
        grid.times(),
        &[at(2020, 1, 15), at(2020, 2, 15), at(2020, 3, 15), at(2020, 4, 15)]
    );
}

#[test]
fn union_merges_sorted_and_deduplicated() {
    let freq: Frequency = "MS".parse().expect("frequency");
    let grid = EvenGrid::span(at(2020, 1, 1), at(2020, 3, 1), freq)
        .expect("span")
        .union(&[at(2020, 2, 1), at(2020, 2, 14)]);

    assert_eq!(
        grid.times(),
        &[at(2020, 1, 1), at(2020, 2, 1), at(2020, 2, 14), at(2020, 3, 1)]
    );
}

#[test]
fn position_of_finds_only_exact_grid_points() {
    let freq: Frequency = "D".parse().expect("frequency");
    let grid = EvenGrid::span(at(2020, 1, 1), at(2020, 1, 3), freq).expect("span");

    assert_eq!(grid.position_of(at(2020, 1, 2)), Some(1));
    assert_eq!(grid.position_of(at(2020, 1, 4)), None);
}
