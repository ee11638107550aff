use std::collections::BTreeMap;
use std::fmt;

use winnow::prelude::*;
use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, eof, opt, separated};
use winnow::token::take_while;

/// Value stored under a node attribute.
///
/// Presentation attributes such as `y:Fill` carry a flat mapping that is
/// written as XML attributes; everything else is a plain string written as
/// element text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Scalar(String),
    Map(BTreeMap<String, String>),
}

impl AttrValue {
    /// Builds a mapping value from key/value pairs.
    pub fn map<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        AttrValue::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            AttrValue::Scalar(s) => Some(s),
            AttrValue::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            AttrValue::Scalar(_) => None,
            AttrValue::Map(m) => Some(m),
        }
    }

    /// Reads a flat mapping literal such as `{'color': '#FF9999'}`.
    ///
    /// Text that is not a mapping literal is kept verbatim as a scalar; this
    /// never fails.
    pub fn from_literal(text: &str) -> Self {
        let mut input = text;
        match mapping_literal(&mut input) {
            Ok(map) => AttrValue::Map(map),
            Err(_) => AttrValue::Scalar(text.to_string()),
        }
    }

    /// Inverse of [`AttrValue::from_literal`].
    pub fn to_literal(&self) -> String {
        match self {
            AttrValue::Scalar(s) => s.clone(),
            AttrValue::Map(m) => {
                let entries: Vec<String> = m
                    .iter()
                    .map(|(k, v)| format!("{}: {}", quote(k), quote(v)))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Scalar(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Scalar(s)
    }
}

impl From<BTreeMap<String, String>> for AttrValue {
    fn from(m: BTreeMap<String, String>) -> Self {
        AttrValue::Map(m)
    }
}

fn quote(s: &str) -> String {
    if s.contains('\'') {
        format!("\"{s}\"")
    } else {
        format!("'{s}'")
    }
}

/// GraphML `attr.type` of a declared key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    Boolean,
    Int,
    Long,
    Double,
    String,
}

impl AttrType {
    pub fn as_str(self) -> &'static str {
        match self {
            AttrType::Boolean => "boolean",
            AttrType::Int => "int",
            AttrType::Long => "long",
            AttrType::Double => "double",
            AttrType::String => "string",
        }
    }

    pub fn infer(value: &AttrValue) -> Self {
        match value {
            AttrValue::Scalar(s) => Self::infer_scalar(s),
            AttrValue::Map(_) => AttrType::String,
        }
    }

    /// Narrowest type that can hold `s`, falling back to `string`.
    pub fn infer_scalar(s: &str) -> Self {
        if s == "true" || s == "false" {
            AttrType::Boolean
        } else if s.parse::<i32>().is_ok() {
            AttrType::Int
        } else if s.parse::<i64>().is_ok() {
            AttrType::Long
        } else if s.parse::<f64>().is_ok_and(f64::is_finite) {
            AttrType::Double
        } else {
            AttrType::String
        }
    }
}

impl AttrType {
    /// Narrowest type that holds values of both `self` and `other`.
    ///
    /// Numeric types widen along int, long, double. Any other disagreement
    /// ends up as `string`.
    pub fn widen(self, other: AttrType) -> AttrType {
        use AttrType::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Int, Long) | (Long, Int) => Long,
            (Int | Long | Double, Int | Long | Double) => Double,
            _ => String,
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn mapping_literal(input: &mut &str) -> winnow::Result<BTreeMap<String, String>> {
    multispace0.parse_next(input)?;
    "{".parse_next(input)?;
    multispace0.parse_next(input)?;
    let entries: Vec<(String, String)> =
        separated(0.., entry, (multispace0, ",", multispace0)).parse_next(input)?;
    multispace0.parse_next(input)?;
    opt(",").parse_next(input)?;
    multispace0.parse_next(input)?;
    "}".parse_next(input)?;
    multispace0.parse_next(input)?;
    eof.parse_next(input)?;
    Ok(entries.into_iter().collect())
}

fn entry(input: &mut &str) -> winnow::Result<(String, String)> {
    let key = quoted.parse_next(input)?;
    multispace0.parse_next(input)?;
    ":".parse_next(input)?;
    multispace0.parse_next(input)?;
    let value = alt((quoted, number)).parse_next(input)?;
    Ok((key, value))
}

fn quoted(input: &mut &str) -> winnow::Result<String> {
    alt((
        delimited("'", take_while(0.., |c: char| c != '\''), "'"),
        delimited("\"", take_while(0.., |c: char| c != '"'), "\""),
    ))
    .map(|s: &str| s.to_string())
    .parse_next(input)
}

fn number(input: &mut &str) -> winnow::Result<String> {
    take_while(1.., |c: char| c.is_ascii_digit() || c == '.' || c == '-')
        .map(|s: &str| s.to_string())
        .parse_next(input)
}
