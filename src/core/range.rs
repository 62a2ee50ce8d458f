//! `"<min>-<max>"` range strings such as `"10 - 12 years"` or `"20-32"`.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    /// Midpoint, computed exactly as `(min + max) / 2`.
    pub fn avg(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("expected exactly one '-' delimiter, found {0}")]
    Delimiter(usize),

    #[error("non-numeric token '{0}'")]
    NotANumber(String),
}

/// Parses a range string. Missing or blank input is `Ok(None)`; anything that
/// is present but does not follow the grammar is a `RangeError`.
///
/// A single trailing unit word (`years`, `kg`) is tolerated. Numbers are plain
/// non-negative decimals and are not rounded.
pub fn parse_range(text: Option<&str>) -> Result<Option<Range>, RangeError> {
    let text = match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(None),
    };

    let body = strip_unit(text);
    let parts: Vec<&str> = body.split('-').collect();
    if parts.len() != 2 {
        return Err(RangeError::Delimiter(parts.len().saturating_sub(1)));
    }

    let min = parse_number(parts[0])?;
    let max = parse_number(parts[1])?;
    Ok(Some(Range { min, max }))
}

fn strip_unit(text: &str) -> &str {
    let stripped = text.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    // 只有在單位前面有數字或空白時才去掉，避免把 "10-twelve" 變成合法值
    match stripped.chars().last() {
        Some(c) if c.is_ascii_digit() || c.is_whitespace() => stripped.trim_end(),
        _ => text,
    }
}

fn parse_number(token: &str) -> Result<f64, RangeError> {
    let token = token.trim();
    let well_formed = !token.is_empty()
        && token.chars().all(|c| c.is_ascii_digit() || c == '.')
        && token.chars().filter(|c| *c == '.').count() <= 1
        && token.chars().any(|c| c.is_ascii_digit());

    if !well_formed {
        return Err(RangeError::NotANumber(token.to_string()));
    }

    token
        .parse::<f64>()
        .map_err(|_| RangeError::NotANumber(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_range() {
        let range = parse_range(Some("10-14")).unwrap().unwrap();
        assert_eq!(range.min, 10.0);
        assert_eq!(range.max, 14.0);
        assert_eq!(range.avg(), 12.0);
    }

    #[test]
    fn test_parse_range_with_spaces_and_unit() {
        let range = parse_range(Some("10 - 12 years")).unwrap().unwrap();
        assert_eq!(range, Range { min: 10.0, max: 12.0 });

        let range = parse_range(Some(" 3.5 - 6.25 ")).unwrap().unwrap();
        assert_eq!(range.avg(), (3.5 + 6.25) / 2.0);
    }

    #[test]
    fn test_midpoint_is_exact_for_many_pairs() {
        for a in 0..40u32 {
            for b in a..a + 7 {
                let min = a as f64 * 0.5;
                let max = b as f64 * 0.5 + 0.1;
                let text = format!("{}-{}", min, max);
                let range = parse_range(Some(text.as_str())).unwrap().unwrap();
                assert_eq!(range.min, min);
                assert_eq!(range.max, max);
                assert_eq!(range.avg(), (min + max) / 2.0);
            }
        }
    }

    #[test]
    fn test_missing_or_blank_is_none() {
        assert_eq!(parse_range(None).unwrap(), None);
        assert_eq!(parse_range(Some("")).unwrap(), None);
        assert_eq!(parse_range(Some("   ")).unwrap(), None);
    }

    #[test]
    fn test_wrong_delimiter_count() {
        assert_eq!(parse_range(Some("12 years")), Err(RangeError::Delimiter(0)));
        assert_eq!(parse_range(Some("1-2-3")), Err(RangeError::Delimiter(2)));
    }

    #[test]
    fn test_non_numeric_tokens() {
        assert_eq!(
            parse_range(Some("ten-12")),
            Err(RangeError::NotANumber("ten".to_string()))
        );
        assert!(parse_range(Some("10-twelve")).is_err());
        assert!(parse_range(Some("1e3-5")).is_err());
        assert!(parse_range(Some("-5")).is_err());
    }
}
