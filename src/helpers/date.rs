//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date the way post headers display it (like "January 15, 2024")
pub fn readable_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    // %-d avoids the zero-padded day ("January 05" reads wrong in prose)
    date.format("%B %-d, %Y").to_string()
}

/// Format a date for `datetime` attributes (ISO date, no time portion)
pub fn machine_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%d").to_string()
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

/// Generate a <time> HTML element
pub fn time_tag<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        r#"<time datetime="{}">{}</time>"#,
        machine_date(date),
        readable_date(date)
    )
}
