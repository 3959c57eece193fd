use chrono::{NaiveDate, NaiveDateTime};

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// "20232024" -> "2023-2024"
pub fn format_season(season: &str) -> String {
    let season = season.trim();
    if season.len() < 4 || !season.is_ascii() {
        return season.to_string();
    }
    let (start, end) = season.split_at(4);
    format!("{}-{}", start, end)
}

/// "2023-10-10" -> "10/10/2023". Anything unparseable is returned unchanged.
pub fn format_game_date(date: &str) -> String {
    let date = date.trim();
    date.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| date.to_string())
}

/// "2023-10-10 19:00:00" -> "19:00"
pub fn format_start_time(timestamp: &str) -> String {
    let timestamp = timestamp.trim();
    // drop fractional seconds and offsets
    let base = timestamp.get(..19).unwrap_or(timestamp);
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(base, format) {
            return dt.format("%H:%M").to_string();
        }
    }
    timestamp
        .get(11..16)
        .unwrap_or(timestamp)
        .to_string()
}

/// Short label for a stored game type code
pub fn game_type_label(code: Option<i64>) -> &'static str {
    match code {
        Some(1) => "Pre.",
        Some(2) => "Reg.",
        Some(3) => "Post.",
        _ => "Unknown",
    }
}
