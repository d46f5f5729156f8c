// src/watch/filter.rs

use regex::Regex;

use crate::errors::Result;
use crate::watch::event::ChangeEvent;

/// Compiled filename pattern deciding which changes trigger a run.
#[derive(Debug, Clone)]
pub struct TriggerPattern {
    regex: Regex,
}

impl TriggerPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// True if `name` is non-empty and matches the pattern.
    pub fn matches(&self, name: &str) -> bool {
        !name.is_empty() && self.regex.is_match(name)
    }

    /// Filename of `event` if it should trigger a run.
    pub fn matching_name<'a>(&self, event: &'a ChangeEvent) -> Option<&'a str> {
        event.name.as_deref().filter(|n| self.matches(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DEFAULT_PATTERN;
    use crate::watch::event::ChangeKind;

    #[test]
    fn default_pattern_needs_a_literal_dot() {
        let p = TriggerPattern::new(DEFAULT_PATTERN).unwrap();
        assert!(p.matches("main.v"));
        assert!(p.matches(".v"));
        assert!(p.matches("dir.with.dots.v"));
        assert!(!p.matches("xv"));
        assert!(!p.matches("main.vh"));
        assert!(!p.matches("main.sv.bak"));
    }

    #[test]
    fn wildcard_dot_pattern_also_accepts_xv() {
        let p = TriggerPattern::new("^.*.v$").unwrap();
        assert!(p.matches("xv"));
        assert!(p.matches("main.v"));
        assert!(!p.matches("v"));
    }

    #[test]
    fn empty_and_missing_names_never_match() {
        let p = TriggerPattern::new(".*").unwrap();
        assert!(!p.matches(""));
        assert_eq!(p.matching_name(&ChangeEvent::nameless(ChangeKind::Write)), None);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(TriggerPattern::new("(unclosed").is_err());
    }
}
