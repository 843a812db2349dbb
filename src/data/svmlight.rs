//! Line-oriented sparse text input: `label idx:value idx:value ...`.
//!
//! Tokens are separated by ASCII whitespace. The first token is the label and
//! every following token is an `index:value` pair. A line without pairs is a
//! sample with every feature missing.

use std::io::BufRead;

use super::SparseSample;

/// Errors produced while parsing sparse text input.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Line holds no tokens at all.
    #[error("line {line}: empty line")]
    EmptyLine { line: usize },

    /// Label is not a number.
    #[error("line {line}: invalid label `{token}`")]
    InvalidLabel { line: usize, token: String },

    /// A feature token is not of the form `index:value`.
    #[error("line {line}: invalid feature `{token}`")]
    InvalidFeature { line: usize, token: String },

    /// I/O error while reading lines.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    pub label: f32,
    pub features: SparseSample,
}

/// Parse one line. `line_no` is only used in error messages.
pub fn parse_svmlight_line(line: &str, line_no: usize) -> Result<LabeledSample, ParseError> {
    let mut tokens = line.split_ascii_whitespace();

    let label_token = tokens.next().ok_or(ParseError::EmptyLine { line: line_no })?;
    let label = label_token
        .parse::<f32>()
        .map_err(|_| ParseError::InvalidLabel {
            line: line_no,
            token: label_token.to_string(),
        })?;

    let features = tokens
        .map(|token| {
            parse_pair(token).ok_or_else(|| ParseError::InvalidFeature {
                line: line_no,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LabeledSample {
        label,
        features: SparseSample::from_pairs(features),
    })
}

fn parse_pair(token: &str) -> Option<(u32, f32)> {
    let (idx, value) = token.split_once(':')?;
    Some((idx.parse().ok()?, value.parse().ok()?))
}

/// Parse every non-blank line of a reader. Line numbers start at 1.
pub fn read_svmlight<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<LabeledSample, ParseError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_svmlight_line(&line, i + 1)),
            Err(e) => Some(Err(ParseError::Io(e))),
        })
}
