//! Structured time estimates for todos.
//!
//! Generated todos historically carried their estimate as free text
//! ("30 minutes", "1 hour"), which cannot be summed or sorted. A
//! [`TimeEstimate`] stores whole minutes, parses the common textual forms and
//! formats itself compactly (`45 min`, `1h 30m`). Persisted estimates are
//! written as a plain number of minutes.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

static ESTIMATE_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(hours|hour|hrs|hr|h|minutes|minute|mins|min|m)?")
        .expect("estimate pattern is valid")
});

/// Filler words allowed between estimate terms ("1 hour and 30 minutes").
const FILLER: &[&str] = &["and", "+", "~", "about", "approx", "approximately"];

/// A duration estimate in whole minutes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(into = "u32", try_from = "EstimateRepr")]
pub struct TimeEstimate(u32);

impl TimeEstimate {
    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }
}

impl From<TimeEstimate> for u32 {
    fn from(estimate: TimeEstimate) -> Self {
        estimate.0
    }
}

impl FromStr for TimeEstimate {
    type Err = String;

    /// Parses `"30"`, `"30 minutes"`, `"45m"`, `"1.5 hours"`, `"1h 30m"`,
    /// `"1 hour and 15 minutes"`. A bare number is read as minutes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err("Empty time estimate".to_string());
        }

        let mut total = 0f64;
        let mut matched = false;
        for caps in ESTIMATE_TERM.captures_iter(text) {
            let value: f64 = caps[1]
                .parse()
                .map_err(|_| format!("Invalid time estimate: {s}"))?;
            let factor = match caps.get(2).map(|m| m.as_str().to_lowercase()) {
                Some(unit) if unit.starts_with('h') => 60.0,
                _ => 1.0,
            };
            total += value * factor;
            matched = true;
        }

        let residue = ESTIMATE_TERM.replace_all(text, " ");
        let leftover = residue
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|word| !word.is_empty())
            .any(|word| !FILLER.contains(&word.to_lowercase().as_str()));

        if !matched || leftover {
            return Err(format!("Invalid time estimate: {s}"));
        }
        if total > f64::from(u32::MAX) {
            return Err(format!("Time estimate out of range: {s}"));
        }

        Ok(Self(total.round() as u32))
    }
}

impl fmt::Display for TimeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes) = (self.0 / 60, self.0 % 60);
        match (hours, minutes) {
            (0, m) => write!(f, "{m} min"),
            (h, 0) => write!(f, "{h}h"),
            (h, m) => write!(f, "{h}h {m}m"),
        }
    }
}

/// Wire forms accepted when reading an estimate.
#[derive(Deserialize)]
#[serde(untagged)]
enum EstimateRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<EstimateRepr> for TimeEstimate {
    type Error = String;

    fn try_from(repr: EstimateRepr) -> Result<Self, Self::Error> {
        match repr {
            EstimateRepr::Number(n) if n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX) => {
                Ok(Self(n.round() as u32))
            }
            EstimateRepr::Number(n) => Err(format!("Time estimate out of range: {n}")),
            EstimateRepr::Text(text) => text.parse(),
        }
    }
}

/// Reads an optional estimate, turning anything unreadable into `None` so one
/// odd value cannot invalidate a whole persisted store.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<TimeEstimate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| TimeEstimate::deserialize(v).ok()))
}

/// Sum of the given estimates in minutes.
pub fn total_minutes<'a>(estimates: impl IntoIterator<Item = &'a TimeEstimate>) -> u64 {
    estimates.into_iter().map(|e| u64::from(e.0)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_forms() {
        let cases = [
            ("30", 30),
            ("30 minutes", 30),
            ("1 minute", 1),
            ("45m", 45),
            ("45 min", 45),
            ("2 hours", 120),
            ("1.5 hours", 90),
            ("1h 30m", 90),
            ("1h30m", 90),
            ("1 hour and 15 minutes", 75),
            ("~ 20 mins", 20),
        ];
        for (input, expected) in cases {
            let parsed: TimeEstimate = input.parse().unwrap_or_else(|e| panic!("{input}: {e}"));
            assert_eq!(parsed.minutes(), expected, "input: {input}");
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<TimeEstimate>().is_err());
        assert!("a while".parse::<TimeEstimate>().is_err());
        assert!("30 monkeys".parse::<TimeEstimate>().is_err());
        assert!("soon 5".parse::<TimeEstimate>().is_err());
    }

    #[test]
    fn test_display_is_parseable() {
        for minutes in [0, 1, 45, 60, 90, 125, 600] {
            let estimate = TimeEstimate::from_minutes(minutes);
            let reparsed: TimeEstimate = estimate.to_string().parse().unwrap();
            assert_eq!(reparsed, estimate);
        }
        assert_eq!(TimeEstimate::from_minutes(45).to_string(), "45 min");
        assert_eq!(TimeEstimate::from_minutes(120).to_string(), "2h");
        assert_eq!(TimeEstimate::from_minutes(95).to_string(), "1h 35m");
    }

    #[test]
    fn test_serde_accepts_number_and_legacy_text() {
        let from_number: TimeEstimate = serde_json::from_str("30").unwrap();
        let from_text: TimeEstimate = serde_json::from_str("\"30 minutes\"").unwrap();
        assert_eq!(from_number, from_text);
        assert_eq!(serde_json::to_string(&from_text).unwrap(), "30");
        assert!(serde_json::from_str::<TimeEstimate>("-5").is_err());
    }

    #[test]
    fn test_total_minutes() {
        let estimates = [
            TimeEstimate::from_minutes(30),
            TimeEstimate::from_minutes(90),
        ];
        assert_eq!(total_minutes(&estimates), 120);
    }
}
