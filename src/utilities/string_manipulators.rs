use chrono::{DateTime, Local};

/// Formats the given instant as a string. Defaults to the current time and
/// to the compact stamp used in artifact file names.
pub fn date_time_as_string(dt: Option<DateTime<Local>>, format: Option<&str>) -> String {
    dt.unwrap_or_else(Local::now)
        .format(format.unwrap_or("%Y%m%d_%H%M%S"))
        .to_string()
}

/// Capture timestamp recorded on every exported price row.
pub fn fetched_at_timestamp(dt: Option<DateTime<Local>>) -> String {
    date_time_as_string(dt, Some("%Y-%m-%d %H:%M:%S"))
}

/// Lowercases and underscores a name so it can be used in a file name.
pub fn file_name_fragment(input: &str) -> String {
    input.to_lowercase().replace(' ', "_")
}
