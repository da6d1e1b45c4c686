//! Pattern validation and position matching

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use nanovanity_crypto::encoding::{is_nano_base32_char, NANO_ALPHABET};

/// Longest accepted pattern: a 64-char legacy address minus its 5-char header
pub const MAX_PATTERN_LEN: usize = 64 - 5;

/// Length of the shortest address header, `xrb_1`
pub const MIN_HEADER_LEN: usize = "xrb_1".len();

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern is empty")]
    EmptyPattern,
    #[error("Pattern too long (max {0} characters)")]
    PatternTooLong(usize),
    #[error("Pattern contains invalid character '{0}' (valid: {1})")]
    InvalidCharacter(char, String),
    #[error("Unknown vanity position '{0}' (expected prefix, suffix or anywhere)")]
    UnknownPosition(String),
}

/// Where in the address the pattern must appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Right after the network header (`nano_1`, `xrb_3`, ...)
    #[default]
    Prefix,
    /// At the end of the address
    Suffix,
    /// Anywhere in the address
    Anywhere,
}

impl Position {
    /// Check `address` against an already-lowercased `pattern`, skipping a
    /// header of `header_len` characters for prefix searches.
    #[inline]
    pub fn matches_after_header(self, address: &str, pattern: &str, header_len: usize) -> bool {
        match self {
            Position::Prefix => address
                .get(header_len..)
                .map_or(false, |body| body.starts_with(pattern)),
            Position::Suffix => address.ends_with(pattern),
            Position::Anywhere => address.contains(pattern),
        }
    }

    /// Phrase used when describing a search ("starting with 'cat'")
    pub fn describe(self) -> &'static str {
        match self {
            Position::Prefix => "starting with",
            Position::Suffix => "ending with",
            Position::Anywhere => "containing",
        }
    }
}

impl FromStr for Position {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prefix" | "start" => Ok(Position::Prefix),
            "suffix" | "end" => Ok(Position::Suffix),
            "anywhere" | "contains" | "any" => Ok(Position::Anywhere),
            _ => Err(PatternError::UnknownPosition(s.to_string())),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Prefix => write!(f, "prefix"),
            Position::Suffix => write!(f, "suffix"),
            Position::Anywhere => write!(f, "anywhere"),
        }
    }
}

/// Does `address` satisfy `pattern` at `position`?
///
/// Prefix searches skip the shortest header, [`MIN_HEADER_LEN`].
pub fn matches(address: &str, pattern: &str, position: Position) -> bool {
    position.matches_after_header(address, pattern, MIN_HEADER_LEN)
}

/// Whether `pattern` is 1 to [`MAX_PATTERN_LEN`] characters of the Nano
/// base32 alphabet, ignoring case.
pub fn is_valid_pattern(pattern: &str) -> bool {
    check_pattern(pattern).is_ok()
}

fn check_pattern(pattern: &str) -> Result<(), PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::EmptyPattern);
    }
    if pattern.chars().count() > MAX_PATTERN_LEN {
        return Err(PatternError::PatternTooLong(MAX_PATTERN_LEN));
    }
    for c in pattern.chars() {
        if !is_nano_base32_char(c.to_ascii_lowercase()) {
            return Err(PatternError::InvalidCharacter(c, NANO_ALPHABET.to_string()));
        }
    }
    Ok(())
}

/// What to search for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VanitySpec {
    /// The vanity string
    pub pattern: String,
    /// Where it must appear
    pub position: Position,
}

impl VanitySpec {
    pub fn new(pattern: impl Into<String>, position: Position) -> Self {
        Self {
            pattern: pattern.into(),
            position,
        }
    }

    /// Create a new prefix spec
    pub fn prefix(pattern: impl Into<String>) -> Self {
        Self::new(pattern, Position::Prefix)
    }

    /// Create a new suffix spec
    pub fn suffix(pattern: impl Into<String>) -> Self {
        Self::new(pattern, Position::Suffix)
    }

    /// Create a new anywhere spec
    pub fn anywhere(pattern: impl Into<String>) -> Self {
        Self::new(pattern, Position::Anywhere)
    }

    /// Validate and lowercase the pattern
    pub fn normalize(self) -> Result<Self, PatternError> {
        check_pattern(&self.pattern)?;
        Ok(Self {
            pattern: self.pattern.to_lowercase(),
            position: self.position,
        })
    }

    /// Number of pattern characters
    pub fn len(&self) -> usize {
        self.pattern.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

/// A normalized spec bound to an address header length
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    spec: VanitySpec,
    header_len: usize,
}

impl PatternMatcher {
    /// Build a matcher; `spec` is expected to be normalized already
    pub fn new(spec: VanitySpec, header_len: usize) -> Self {
        Self { spec, header_len }
    }

    #[inline]
    pub fn matches(&self, address: &str) -> bool {
        self.spec
            .position
            .matches_after_header(address, &self.spec.pattern, self.header_len)
    }

    pub fn spec(&self) -> &VanitySpec {
        &self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "xrb_3i1aq1cchnmbn9x5rsbap8b15akfh7wj7pwskuzi7ahz8oq6cobd99d4r3b7";

    #[test]
    fn test_prefix_skips_header() {
        assert!(matches(ADDR, "i1aq", Position::Prefix));
        assert!(!matches(ADDR, "3i1a", Position::Prefix));
        assert!(!matches(ADDR, "1aq", Position::Prefix));
    }

    #[test]
    fn test_suffix_match() {
        assert!(matches(ADDR, "r3b7", Position::Suffix));
        assert!(!matches(ADDR, "r3b", Position::Suffix));
    }

    #[test]
    fn test_anywhere_match() {
        assert!(matches(ADDR, "hz8oq", Position::Anywhere));
        assert!(matches(ADDR, "i1aq", Position::Anywhere));
        assert!(!matches(ADDR, "zzzz", Position::Anywhere));
    }

    #[test]
    fn test_anywhere_includes_header() {
        let nano = format!("nano_{}", &ADDR[4..]);
        assert!(matches(&nano, "nan", Position::Anywhere));
        let matcher = PatternMatcher::new(VanitySpec::anywhere("nan"), "nano_1".len());
        assert!(matcher.matches(&nano));
        assert!(!matches(&nano, "nan", Position::Prefix));
    }

    #[test]
    fn test_short_address_never_prefix_matches() {
        assert!(!matches("xrb", "1", Position::Prefix));
    }

    #[test]
    fn test_matcher_uses_header_len() {
        let nano = format!("nano_{}", &ADDR[4..]);
        let matcher = PatternMatcher::new(VanitySpec::prefix("i1aq"), "nano_1".len());
        assert!(matcher.matches(&nano));
        assert!(!matches(&nano, "i1aq", Position::Prefix));
    }

    #[test]
    fn test_valid_patterns() {
        assert!(is_valid_pattern("cat"));
        assert!(is_valid_pattern("CAT"));
        assert!(is_valid_pattern(&"1".repeat(MAX_PATTERN_LEN)));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(!is_valid_pattern(""));
        assert!(!is_valid_pattern(&"1".repeat(MAX_PATTERN_LEN + 1)));
        for bad in ["0", "2", "l", "v", "nano_", "café", " a"] {
            assert!(!is_valid_pattern(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_validity_matches_rule_for_every_ascii_char() {
        for byte in 0u8..128 {
            let c = byte as char;
            let s = c.to_string();
            let expected = NANO_ALPHABET.contains(c.to_ascii_lowercase());
            assert_eq!(is_valid_pattern(&s), expected, "char {c:?}");
        }
    }

    #[test]
    fn test_normalize_lowercases() {
        let spec = VanitySpec::suffix("CaT").normalize().unwrap();
        assert_eq!(spec.pattern, "cat");
        assert_eq!(spec.position, Position::Suffix);
    }

    #[test]
    fn test_normalize_errors() {
        assert_eq!(VanitySpec::prefix("").normalize(), Err(PatternError::EmptyPattern));
        assert_eq!(
            VanitySpec::prefix("1".repeat(60)).normalize(),
            Err(PatternError::PatternTooLong(59))
        );
        assert!(matches!(
            VanitySpec::prefix("c0t").normalize(),
            Err(PatternError::InvalidCharacter('0', _))
        ));
    }

    #[test]
    fn test_position_parse() {
        assert_eq!("Prefix".parse::<Position>().unwrap(), Position::Prefix);
        assert_eq!("contains".parse::<Position>().unwrap(), Position::Anywhere);
        assert_eq!("suffix".parse::<Position>().unwrap(), Position::Suffix);
        assert_eq!(
            "middle".parse::<Position>(),
            Err(PatternError::UnknownPosition("middle".into()))
        );
    }
}
