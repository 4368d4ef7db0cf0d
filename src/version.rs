//! Version parsing and comparison.
//!
//! Release tags are dot-separated integers with an optional pre-release
//! suffix (`1.2.3.4`, `1.2.0-beta.1`). The suffix is dropped before
//! comparison and sequences of different lengths are compared as if the
//! shorter one were padded with zeros.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Error returned when a version segment is not a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParseError {
    pub input: String,
    pub segment: String,
}

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid version '{}': segment '{}' is not a number",
            self.input, self.segment
        )
    }
}

impl std::error::Error for VersionParseError {}

/// A parsed version: the numeric components before any `-` suffix.
///
/// Components are kept as decimal digit strings without leading zeros
/// (zero is the empty string), so segments of any length compare exactly.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<String>,
}

impl Version {
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    fn part(&self, index: usize) -> &str {
        self.parts.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Numeric order of two normalized digit strings.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numeric = s.split('-').next().unwrap_or_default();
        let parts = numeric
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(VersionParseError {
                        input: s.to_string(),
                        segment: segment.to_string(),
                    });
                }
                Ok(segment.trim_start_matches('0').to_string())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Version { parts })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self
            .parts
            .iter()
            .map(|p| if p.is_empty() { "0" } else { p.as_str() })
            .collect();
        f.write_str(&joined.join("."))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| cmp_digits(self.part(i), other.part(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// `1.0` and `1.0.0` are the same version.
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

/// Returns true if `candidate` is strictly newer than `baseline`.
///
/// If either string fails to parse the answer is `false`: an unreadable tag
/// never triggers an update.
pub fn is_newer(candidate: &str, baseline: &str) -> bool {
    match (candidate.parse::<Version>(), baseline.parse::<Version>()) {
        (Ok(candidate), Ok(baseline)) => candidate > baseline,
        (Err(e), _) | (_, Err(e)) => {
            log::debug!("Version comparison failed closed: {}", e);
            false
        }
    }
}
