//! Human-readable relative timestamps ("Today at 3:04 PM")

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

const TIME_FORMAT: &str = "%-I:%M %p";
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Describe `at` relative to the calendar day of `now`.
///
/// | day offset | output                    |
/// |------------|---------------------------|
/// | 0          | `Today at 3:04 PM`        |
/// | -1         | `Yesterday at 3:04 PM`    |
/// | -6..=-2    | `Last Monday at 3:04 PM`  |
/// | 1          | `Tomorrow at 3:04 PM`     |
/// | 2..=6      | `Monday at 3:04 PM`       |
/// | otherwise  | `03/14/2024`              |
pub fn calendar<Tz>(at: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let at = at.with_timezone(&now.timezone());
    let days = (at.date_naive() - now.date_naive()).num_days();
    let time = at.format(TIME_FORMAT);

    match days {
        0 => format!("Today at {}", time),
        -1 => format!("Yesterday at {}", time),
        1 => format!("Tomorrow at {}", time),
        -6..=-2 => format!("Last {} at {}", at.format("%A"), time),
        2..=6 => format!("{} at {}", at.format("%A"), time),
        _ => at.format(DATE_FORMAT).to_string(),
    }
}
