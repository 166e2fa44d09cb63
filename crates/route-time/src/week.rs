//! Week-cyclic second arithmetic.

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
pub const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

/// Fold any second count onto `[0, SECONDS_PER_WEEK)`.
///
/// Stepping forward and backward both go through this one function, so a
/// value pushed past either end of the week comes back in on the other side
/// and a step followed by its inverse lands where it started.
///
/// ```
/// use route_time::week::{wrap_week, SECONDS_PER_WEEK};
///
/// assert_eq!(wrap_week(SECONDS_PER_WEEK + 5), 5);
/// assert_eq!(wrap_week(-5), (SECONDS_PER_WEEK - 5) as u32);
/// ```
pub fn wrap_week(seconds: i64) -> u32 {
    seconds.rem_euclid(SECONDS_PER_WEEK) as u32
}

/// Seconds since the start of the week for a decomposed clock reading.
///
/// `days_into_week` is 0 on the first day of the week.
pub fn second_of_week(days_into_week: i64, hour: u32, minute: u32, second: u32) -> u32 {
    wrap_week(
        days_into_week * SECONDS_PER_DAY
            + hour as i64 * SECONDS_PER_HOUR
            + minute as i64 * SECONDS_PER_MINUTE
            + second as i64,
    )
}
