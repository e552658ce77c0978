//! Annotation document model and document-level field decoding.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::DatasetError;
use crate::filter::render_value;

/// One tracked subject within a document: field name to raw JSON value.
pub type Character = Map<String, Value>;

/// Parsed annotation document.
///
/// All fields are optional; missing document-level fields fall back to an
/// empty description, no hashtags, and a ranking score of zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    /// Per-character field maps in document order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub characters: Vec<Character>,
    /// Description of the whole image, usually free text.
    #[serde(default)]
    pub general_description: Option<Value>,
    /// Hashtags, usually stored as a list literal string such as `"['a', 'b']"`.
    #[serde(default)]
    pub hashtags: Option<Value>,
    /// Ranking score as a number or numeric string.
    #[serde(default)]
    pub image_ranking_score: Option<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Character>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Character>>::deserialize(deserializer)?.unwrap_or_default())
}

impl AnnotationDocument {
    /// Read and decode the JSON document at `path`.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw).map_err(|source| DatasetError::DocumentParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Decode a document from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Description rendered as caption text, empty when absent or null.
    pub fn description(&self) -> String {
        self.general_description
            .as_ref()
            .map(render_value)
            .unwrap_or_default()
    }

    /// Decoded hashtag list, empty when absent.
    pub fn hashtag_list(&self) -> Result<Vec<String>, DatasetError> {
        match &self.hashtags {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(literal)) => parse_string_list_literal(literal),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(tag) => Ok(tag.clone()),
                    other => Err(DatasetError::HashtagFormat {
                        value: Value::Array(items.clone()).to_string(),
                        reason: format!("list item {other} is not a string"),
                    }),
                })
                .collect(),
            Some(other) => Err(DatasetError::HashtagFormat {
                value: other.to_string(),
                reason: "expected a list literal string or an array of strings".to_string(),
            }),
        }
    }

    /// Ranking score as an integer, zero when absent.
    pub fn ranking_score(&self) -> Result<i64, DatasetError> {
        match &self.image_ranking_score {
            None | Some(Value::Null) => Ok(0),
            Some(value) => ranking_score_from_value(value),
        }
    }
}

/// Convert a ranking score value into an integer.
///
/// Numbers truncate toward zero, numeric strings must hold an integer,
/// booleans map to `0`/`1`.
pub fn ranking_score_from_value(value: &Value) -> Result<i64, DatasetError> {
    let invalid = || DatasetError::RankingScoreFormat {
        value: value.to_string(),
    };
    match value {
        Value::Null => Ok(0),
        Value::Bool(flag) => Ok(i64::from(*flag)),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            match number.as_f64() {
                Some(float) if float.is_finite() && float.abs() < i64::MAX as f64 => {
                    Ok(float.trunc() as i64)
                }
                _ => Err(invalid()),
            }
        }
        Value::String(text) => text.trim().parse::<i64>().map_err(|_| invalid()),
        Value::Array(_) | Value::Object(_) => Err(invalid()),
    }
}

/// Parse a list literal of quoted strings, e.g. `['goal', "derby"]`.
///
/// Items use single or double quotes and may be separated by whitespace and
/// a trailing comma. Adjacent quoted strings inside one item concatenate, so
/// `['a' 'b']` yields `["ab"]`. Escapes follow Python string literals:
/// `\\ \' \" \n \t \r \a \b \f \v`, octal `\ooo`, `\xhh`, `\uhhhh`,
/// `\Uhhhhhhhh`, and a backslash-newline continuation; any other escape,
/// `\N{...}` included, keeps its backslash. String prefixes (`r''`, `b''`)
/// and surrogate code points are rejected, as is anything else outside this
/// grammar, with [`DatasetError::HashtagFormat`].
pub fn parse_string_list_literal(literal: &str) -> Result<Vec<String>, DatasetError> {
    let fail = |reason: &str| DatasetError::HashtagFormat {
        value: literal.to_string(),
        reason: reason.to_string(),
    };

    let inner = literal
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| fail("missing surrounding brackets"))?;

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while chars.next_if(|ch| ch.is_whitespace()).is_some() {}
        let Some(quote) = chars.next() else {
            break;
        };
        if !is_quote(quote) {
            return Err(fail("expected a quoted string"));
        }

        let mut item = String::new();
        read_quoted(&mut chars, quote, &mut item).map_err(fail)?;
        loop {
            while chars.next_if(|ch| ch.is_whitespace()).is_some() {}
            match chars.next_if(|ch| is_quote(*ch)) {
                Some(quote) => read_quoted(&mut chars, quote, &mut item).map_err(fail)?,
                None => break,
            }
        }
        items.push(item);

        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return Err(fail("expected ',' between items")),
        }
    }
    Ok(items)
}

fn is_quote(ch: char) -> bool {
    ch == '\'' || ch == '"'
}

type LiteralChars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

/// Append the body of one quoted string to `out`, consuming the closing quote.
fn read_quoted(
    chars: &mut LiteralChars<'_>,
    quote: char,
    out: &mut String,
) -> Result<(), &'static str> {
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => read_escape(chars, out)?,
            ch if ch == quote => return Ok(()),
            ch => out.push(ch),
        }
    }
    Err("unterminated string")
}

fn read_escape(chars: &mut LiteralChars<'_>, out: &mut String) -> Result<(), &'static str> {
    let escaped = chars.next().ok_or("dangling escape")?;
    let decoded = match escaped {
        '\n' => return Ok(()),
        '\\' | '\'' | '"' => escaped,
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'v' => '\u{0B}',
        '0'..='7' => {
            let mut code = escaped.to_digit(8).unwrap_or_default();
            for _ in 0..2 {
                match chars.next_if(|ch| ch.is_digit(8)) {
                    Some(digit) => code = code * 8 + digit.to_digit(8).unwrap_or_default(),
                    None => break,
                }
            }
            char::from_u32(code).ok_or("invalid octal escape")?
        }
        'x' => read_hex(chars, 2)?,
        'u' => read_hex(chars, 4)?,
        'U' => read_hex(chars, 8)?,
        other => {
            out.push('\\');
            other
        }
    };
    out.push(decoded);
    Ok(())
}

fn read_hex(chars: &mut LiteralChars<'_>, digits: usize) -> Result<char, &'static str> {
    let mut code = 0_u32;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|ch| ch.to_digit(16))
            .ok_or("truncated hex escape")?;
        code = code * 16 + digit;
    }
    char::from_u32(code).ok_or("hex escape is not a valid character")
}
