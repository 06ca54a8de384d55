// src/parse/mod.rs
//! Tabular records and the pluggable parser capability.

use crate::error::ParseError;
use serde::Serialize;
use std::collections::BTreeMap;

pub mod delimited;

pub use delimited::DelimitedParser;

/// One cell of a parsed table.
///
/// Without automatic typing every cell is [`Cell::Text`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl Cell {
    /// Infer a typed cell from raw field text.
    pub fn infer(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Cell::Null;
        }
        match s {
            "true" => return Cell::Bool(true),
            "false" => return Cell::Bool(false),
            _ => {}
        }
        match s.parse::<f64>() {
            // "inf" and "NaN" parse as f64 but stay text
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// Column name → cell.
pub type Record = BTreeMap<String, Cell>;

/// The published artifact: ordered records plus the header order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Records {
    /// Header names in the order they appeared, duplicates included.
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl Records {
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Records {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Converts retrieved text into an ordered sequence of records.
pub trait TabularParser: Send + Sync + 'static {
    fn parse(&self, text: &str) -> Result<Records, ParseError>;
}

impl<F> TabularParser for F
where
    F: Fn(&str) -> Result<Records, ParseError> + Send + Sync + 'static,
{
    fn parse(&self, text: &str) -> Result<Records, ParseError> {
        self(text)
    }
}
