use chrono::{DateTime, FixedOffset, TimeDelta, Timelike};

/// The first full hour strictly after `now`, in the offset of `now`.
pub fn top_of_next_hour(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let into_hour = TimeDelta::seconds(i64::from(now.minute() * 60 + now.second()))
        + TimeDelta::nanoseconds(i64::from(now.nanosecond()));
    now - into_hour + TimeDelta::hours(1)
}

/// `horizon` timestamps one hour apart, starting at the top of the next hour.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use weather_predict::hourly_axis;
///
/// let now = DateTime::parse_from_rfc3339("2024-03-01T14:37:12+05:30").unwrap();
/// let axis = hourly_axis(now, 2);
/// assert_eq!(axis[0].to_rfc3339(), "2024-03-01T15:00:00+05:30");
/// assert_eq!(axis[1].to_rfc3339(), "2024-03-01T16:00:00+05:30");
/// ```
pub fn hourly_axis(now: DateTime<FixedOffset>, horizon: usize) -> Vec<DateTime<FixedOffset>> {
    let start = top_of_next_hour(now);
    (0..horizon)
        .map(|step| start + TimeDelta::hours(step as i64))
        .collect()
}
