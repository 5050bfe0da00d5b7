//! Derived value calculators.
//!
//! Pure functions over scalar inputs. Storing a result back into the record
//! is the store's job.

use jiff::civil::Date;

use crate::error::CalcError;

/// Whole years between `birth_date` (ISO 8601) and `today`, one less when
/// today's month/day precedes the birthday.
pub fn age_from_birth_date(birth_date: &str, today: Date) -> Result<i32, CalcError> {
    let trimmed = birth_date.trim();
    if trimmed.is_empty() {
        return Err(CalcError::EmptyBirthDate);
    }
    let birth: Date = trimmed
        .parse()
        .map_err(|_| CalcError::InvalidBirthDate(trimmed.to_string()))?;
    if birth > today {
        return Err(CalcError::BirthDateInFuture { birth, today });
    }

    let mut age = i32::from(today.year()) - i32::from(birth.year());
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Ok(age)
}

/// Sum of the eight Epworth item scores. Out-of-range items are summed as-is.
pub fn sleepiness_total(items: &[i32; 8]) -> i32 {
    items.iter().sum()
}

/// Smoking exposure in pack-years: `round((end_age - start_age) * cigarettes_per_day / 20)`.
///
/// `None` until all three inputs are positive, and for intervals that end
/// before they start.
pub fn pack_years(start_age: i32, end_age: i32, cigarettes_per_day: i32) -> Option<i32> {
    if start_age <= 0 || end_age <= 0 || cigarettes_per_day <= 0 || end_age < start_age {
        return None;
    }
    let years = f64::from(end_age - start_age);
    let packs_per_day = f64::from(cigarettes_per_day) / 20.0;
    Some((years * packs_per_day).round() as i32)
}
