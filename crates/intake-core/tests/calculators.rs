use intake_core::calculators::{age_from_birth_date, pack_years, sleepiness_total};
use intake_core::error::CalcError;
use jiff::civil::date;

#[test]
fn age_before_birthday_this_year() {
    let today = date(2024, 6, 15);
    assert_eq!(age_from_birth_date("2000-06-16", today), Ok(23));
}

#[test]
fn age_after_birthday_this_year() {
    let today = date(2024, 6, 15);
    assert_eq!(age_from_birth_date("2000-06-14", today), Ok(24));
}

#[test]
fn age_on_birthday() {
    let today = date(2024, 6, 15);
    assert_eq!(age_from_birth_date("2000-06-15", today), Ok(24));
}

#[test]
fn age_earlier_month_later_day() {
    let today = date(2024, 6, 15);
    assert_eq!(age_from_birth_date("1990-05-30", today), Ok(34));
}

#[test]
fn age_leap_day_birth() {
    assert_eq!(age_from_birth_date("2000-02-29", date(2023, 2, 28)), Ok(22));
    assert_eq!(age_from_birth_date("2000-02-29", date(2023, 3, 1)), Ok(23));
}

#[test]
fn age_born_today_is_zero() {
    let today = date(2024, 6, 15);
    assert_eq!(age_from_birth_date("2024-06-15", today), Ok(0));
}

#[test]
fn age_rejects_empty_date() {
    let today = date(2024, 6, 15);
    assert_eq!(age_from_birth_date("", today), Err(CalcError::EmptyBirthDate));
    assert_eq!(age_from_birth_date("   ", today), Err(CalcError::EmptyBirthDate));
}

#[test]
fn age_rejects_malformed_date() {
    let today = date(2024, 6, 15);
    assert!(matches!(
        age_from_birth_date("15/06/2000", today),
        Err(CalcError::InvalidBirthDate(_))
    ));
    assert!(matches!(
        age_from_birth_date("2000-13-01", today),
        Err(CalcError::InvalidBirthDate(_))
    ));
}

#[test]
fn age_rejects_future_date() {
    let today = date(2024, 6, 15);
    assert!(matches!(
        age_from_birth_date("2024-06-16", today),
        Err(CalcError::BirthDateInFuture { .. })
    ));
}

#[test]
fn sleepiness_all_zero_and_all_three() {
    assert_eq!(sleepiness_total(&[0; 8]), 0);
    assert_eq!(sleepiness_total(&[3; 8]), 24);
}

#[test]
fn sleepiness_mixed_scores() {
    assert_eq!(sleepiness_total(&[0, 1, 2, 3, 3, 2, 1, 0]), 12);
}

#[test]
fn sleepiness_out_of_range_propagates() {
    assert_eq!(sleepiness_total(&[7, 0, 0, 0, 0, 0, 0, -1]), 6);
}

#[test]
fn pack_years_one_pack_for_thirty_years() {
    assert_eq!(pack_years(15, 45, 20), Some(30));
}

#[test]
fn pack_years_half_pack_for_twenty_years() {
    assert_eq!(pack_years(20, 40, 10), Some(10));
}

#[test]
fn pack_years_rounds_to_nearest() {
    // 7 years * 0.25 packs = 1.75
    assert_eq!(pack_years(18, 25, 5), Some(2));
    // 5 years * 0.5 packs = 2.5
    assert_eq!(pack_years(20, 25, 10), Some(3));
}

#[test]
fn pack_years_requires_all_inputs() {
    assert_eq!(pack_years(0, 45, 20), None);
    assert_eq!(pack_years(15, 0, 20), None);
    assert_eq!(pack_years(15, 45, 0), None);
}

#[test]
fn pack_years_rejects_inverted_interval() {
    assert_eq!(pack_years(30, 25, 20), None);
}
