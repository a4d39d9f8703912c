use std::fmt::Write;

use chrono::{DateTime, Local, TimeZone};

use crate::document::{Position, Range};

use super::{EditDecision, RuleContext};

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time rendered with `format`.
pub fn now(format: &str) -> String {
    render(&Local::now(), format)
}

/// Renders `time` with a `strftime` style `format`, falling back to
/// [`DEFAULT_TIMESTAMP_FORMAT`] when the format string is invalid.
pub fn render<Tz>(time: &DateTime<Tz>, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    if write!(out, "{}", time.format(format)).is_ok() {
        return out;
    }
    log::warn!("Invalid timestamp format '{format}', using '{DEFAULT_TIMESTAMP_FORMAT}'");
    time.format(DEFAULT_TIMESTAMP_FORMAT).to_string()
}

/// Inserts the invocation's timestamp at the start of the line.
pub(super) fn print_now_date_time(cx: &RuleContext<'_>, line: usize) -> Option<EditDecision> {
    Some(
        EditDecision::new(Range::point(Position::new(line, 0)))
            .with_text(cx.options.timestamp.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleId;
    use crate::tests::{apply_rule_once, decision_for};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_custom_formats() {
        let time = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        assert_eq!(render(&time, DEFAULT_TIMESTAMP_FORMAT), "2024-01-15 09:30:00");
        assert_eq!(render(&time, "%d/%m/%Y"), "15/01/2024");
    }

    #[test]
    fn invalid_format_falls_back_to_default() {
        let time = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        assert_eq!(render(&time, "%Q"), "2024-01-15 09:30:00");
    }

    #[test]
    fn inserts_at_line_start() {
        let decision = decision_for(&["notes"], RuleId::PrintNowDateTime, 0).unwrap();
        assert_eq!(decision.range, Range::point(Position::new(0, 0)));
        assert_eq!(
            apply_rule_once(&["notes"], RuleId::PrintNowDateTime),
            "2024-01-15 09:30:00notes"
        );
    }
}
