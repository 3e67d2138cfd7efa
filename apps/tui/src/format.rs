use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// "2025-01-01" or "2025-01-01T00:00:00" → "Jan 1, 2025". Anything else is kept.
pub fn format_date(date: &str) -> String {
    let day = date.get(..10).unwrap_or(date);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_or_else(|_| date.to_string(), |parsed| parsed.format("%b %-d, %Y").to_string())
}

pub fn parse_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(timestamp)
                .ok()
                .map(|parsed| parsed.naive_local())
        })
}

/// Backend timestamps carry no zone, so `now` must be local wall time.
pub fn format_relative_time(timestamp: &str, now: NaiveDateTime) -> String {
    let Some(then) = parse_timestamp(timestamp) else {
        return timestamp.to_string();
    };

    let minutes = (now - then).num_minutes();
    match minutes {
        m if m < 1 => "Just now".to_string(),
        1 => "1 minute ago".to_string(),
        m if m < 60 => format!("{m} minutes ago"),
        m if m < 120 => "1 hour ago".to_string(),
        m if m < 24 * 60 => format!("{} hours ago", m / 60),
        _ => then.format("%b %-d, %Y").to_string(),
    }
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept = text.chars().take(max_chars.saturating_sub(3)).collect::<String>();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> NaiveDateTime {
        parse_timestamp(text).unwrap()
    }

    #[test]
    fn dates_are_shortened() {
        assert_eq!(format_date("2025-01-01"), "Jan 1, 2025");
        assert_eq!(format_date("2025-02-15T00:00:00"), "Feb 15, 2025");
        assert_eq!(format_date("last week"), "last week");
    }

    #[test]
    fn relative_times() {
        let now = at("2025-03-01T12:00:00");
        assert_eq!(format_relative_time("2025-03-01T11:59:40.123456", now), "Just now");
        assert_eq!(format_relative_time("2025-03-01T11:15:00", now), "45 minutes ago");
        assert_eq!(format_relative_time("2025-03-01T09:00:00", now), "3 hours ago");
        assert_eq!(format_relative_time("2025-02-20T09:00:00", now), "Feb 20, 2025");
        assert_eq!(format_relative_time("not a time", now), "not a time");
    }

    #[test]
    fn truncation_keeps_short_text() {
        assert_eq!(truncate_text("climate", 10), "climate");
        assert_eq!(truncate_text("artificial intelligence", 10), "artific...");
    }
}
