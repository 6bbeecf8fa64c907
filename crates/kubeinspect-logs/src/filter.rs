use regex::{Regex, RegexBuilder};

use kubeinspect_types::LogLine;

/// A compiled regex filter over log lines
#[derive(Clone, Debug)]
pub struct LogFilter {
    regex: Regex,
    pattern: String,
}

impl LogFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Self::build(pattern, false)
    }

    pub fn new_case_insensitive(pattern: &str) -> Result<Self, regex::Error> {
        Self::build(pattern, true)
    }

    fn build(pattern: &str, case_insensitive: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()?;

        Ok(Self {
            regex,
            pattern: pattern.to_string(),
        })
    }

    /// Pattern as typed
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Match against the message and the pod it came from
    pub fn matches(&self, line: &LogLine) -> bool {
        self.regex.is_match(&line.message) || self.regex.is_match(&line.pod)
    }

    /// Byte ranges of every match in `text`, for highlighting
    pub fn find_matches(&self, text: &str) -> Vec<(usize, usize)> {
        self.regex
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(pod: &str, message: &str) -> LogLine {
        LogLine::new(pod.to_string(), "app".to_string(), message.to_string())
    }

    #[test]
    fn test_regex_filter() {
        let filter = LogFilter::new("error").unwrap();
        assert!(filter.matches(&line("web-0", "an error occurred")));
        assert!(!filter.matches(&line("web-0", "everything is fine")));
    }

    #[test]
    fn test_matches_pod_name() {
        let filter = LogFilter::new("web-1").unwrap();
        assert!(filter.matches(&line("web-1", "started")));
        assert!(!filter.matches(&line("web-0", "started")));
    }

    #[test]
    fn test_case_insensitive() {
        let filter = LogFilter::new_case_insensitive("ERROR").unwrap();
        assert!(filter.matches(&line("web-0", "an error occurred")));
        assert!(!LogFilter::new("ERROR").unwrap().matches(&line("web-0", "an error occurred")));
    }

    #[test]
    fn test_invalid_regex() {
        assert!(LogFilter::new("(unclosed").is_err());
    }

    #[test]
    fn test_find_matches() {
        let filter = LogFilter::new("error").unwrap();
        let matches = filter.find_matches("an error occurred, another error here");
        assert_eq!(matches, vec![(3, 8), (27, 32)]);
    }
}
