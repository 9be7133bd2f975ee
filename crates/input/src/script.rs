//! Text format for recorded tilt sessions.
//!
//! One sample per line: `<forward> <turn> [xCOUNT]`. Blank lines and anything
//! after `#` are ignored. `xCOUNT` repeats the sample.
//!
//! ```text
//! # walk forward for a second, then turn
//! 640 0 x20
//! 0 -200 x5
//! ```

use crate::tilt::TiltSample;

/// Errors from parsing a tilt script.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptParseError {
    #[error("line {line}: expected `<forward> <turn> [xCOUNT]`, got {found:?}")]
    Malformed { line: usize, found: String },
    #[error("line {line}: {value:?} is not a 16-bit tilt value")]
    BadValue { line: usize, value: String },
    #[error("line {line}: bad repeat count {value:?}")]
    BadRepeat { line: usize, value: String },
}

/// Parse a tilt script into the flat sample sequence it describes.
pub fn parse_script(text: &str) -> Result<Vec<TiltSample>, ScriptParseError> {
    let mut samples = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let body = raw.split('#').next().unwrap_or("").trim();
        if body.is_empty() {
            continue;
        }

        let fields: Vec<&str> = body.split_whitespace().collect();
        let (forward, turn, repeat) = match fields.as_slice() {
            [f, t] => (*f, *t, None),
            [f, t, r] => (*f, *t, Some(*r)),
            _ => {
                return Err(ScriptParseError::Malformed {
                    line,
                    found: body.to_string(),
                });
            }
        };

        let value = |s: &str| {
            s.parse::<i16>().map_err(|_| ScriptParseError::BadValue {
                line,
                value: s.to_string(),
            })
        };
        let sample = TiltSample::new(value(forward)?, value(turn)?);

        let count = match repeat {
            None => 1,
            Some(r) => r
                .strip_prefix('x')
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .ok_or_else(|| ScriptParseError::BadRepeat {
                    line,
                    value: r.to_string(),
                })?,
        };
        samples.extend(std::iter::repeat_n(sample, count));
    }
    tracing::debug!(samples = samples.len(), "parsed tilt script");
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_samples_comments_and_repeats() {
        let text = "# header\n640 0 x3\n\n  -5 12   # trailing comment\n";
        let samples = parse_script(text).unwrap();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], TiltSample::new(640, 0));
        assert_eq!(samples[2], TiltSample::new(640, 0));
        assert_eq!(samples[3], TiltSample::new(-5, 12));
    }

    #[test]
    fn empty_script_is_empty() {
        assert!(parse_script("").unwrap().is_empty());
        assert!(parse_script("# nothing\n\n").unwrap().is_empty());
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let err = parse_script("1 2\n3\n").unwrap_err();
        assert_eq!(
            err,
            ScriptParseError::Malformed {
                line: 2,
                found: "3".into()
            }
        );
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let err = parse_script("40000 0").unwrap_err();
        assert!(matches!(err, ScriptParseError::BadValue { line: 1, .. }));
    }

    #[test]
    fn zero_or_garbage_repeat_is_rejected() {
        assert!(matches!(
            parse_script("1 1 x0").unwrap_err(),
            ScriptParseError::BadRepeat { .. }
        ));
        assert!(matches!(
            parse_script("1 1 3").unwrap_err(),
            ScriptParseError::BadRepeat { .. }
        ));
    }
}
