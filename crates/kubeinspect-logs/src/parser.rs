use chrono::{DateTime, Utc};
use serde_json::Value;

use kubeinspect_types::{LogLevel, LogLine};

/// JSON fields commonly holding the severity
const LEVEL_FIELDS: &[&str] = &["level", "lvl", "severity", "log.level"];

/// How many leading words of a plain-text line may carry the level
const LEVEL_SCAN_WORDS: usize = 4;

/// Log parser for extracting structure from raw log lines
pub struct LogParser;

impl LogParser {
    /// Parse one line as returned by the API with `timestamps=true`
    pub fn parse(raw: &str, pod: &str, container: &str) -> LogLine {
        let (timestamp, content) = Self::split_timestamp(raw);

        let mut line = LogLine::new(pod.to_string(), container.to_string(), content.to_string());
        line.timestamp = timestamp;
        line.level = Self::json_level(content).unwrap_or_else(|| Self::text_level(content));
        line
    }

    /// Split the RFC 3339 timestamp the API prepends (`2024-01-15T10:30:00.123456789Z msg`)
    fn split_timestamp(raw: &str) -> (Option<DateTime<Utc>>, &str) {
        let Some((head, rest)) = raw.split_once(' ') else {
            return match DateTime::parse_from_rfc3339(raw) {
                Ok(ts) => (Some(ts.with_timezone(&Utc)), ""),
                Err(_) => (None, raw),
            };
        };

        match DateTime::parse_from_rfc3339(head) {
            Ok(ts) => (Some(ts.with_timezone(&Utc)), rest),
            Err(_) => (None, raw),
        }
    }

    fn json_level(content: &str) -> Option<LogLevel> {
        let trimmed = content.trim();
        if !trimmed.starts_with('{') {
            return None;
        }

        let value: Value = serde_json::from_str(trimmed).ok()?;
        let obj = value.as_object()?;

        LEVEL_FIELDS
            .iter()
            .filter_map(|field| obj.get(*field)?.as_str())
            .map(LogLevel::parse)
            .find(|level| *level != LogLevel::Unknown)
    }

    fn text_level(content: &str) -> LogLevel {
        content
            .split_whitespace()
            .take(LEVEL_SCAN_WORDS)
            .map(|word| {
                let word = word.strip_prefix("level=").unwrap_or(word);
                word.trim_matches(|c: char| !c.is_ascii_alphabetic())
            })
            .map(LogLevel::parse)
            .find(|level| *level != LogLevel::Unknown)
            .unwrap_or(LogLevel::Unknown)
    }
}
