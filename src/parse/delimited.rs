// src/parse/delimited.rs
use crate::error::ParseError;
use crate::parse::{Cell, Record, Records, TabularParser};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::trace;

/// Header-first delimited text parser (CSV, TSV, ...).
///
/// Lenient by default: short rows are padded with empty cells, extra cells are
/// dropped. With `strict` set, a row whose field count differs from the header
/// is rejected.
#[derive(Clone, Debug)]
pub struct DelimitedParser {
    delimiter: u8,
    auto_type: bool,
    trim: bool,
    strict: bool,
    max_rows: Option<usize>,
}

impl Default for DelimitedParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            auto_type: false,
            trim: false,
            strict: false,
            max_rows: None,
        }
    }
}

impl DelimitedParser {
    /// Comma-separated parser with string cells.
    pub fn csv() -> Self {
        Self::default()
    }

    /// Tab-separated parser with string cells.
    pub fn tsv() -> Self {
        Self::default().delimiter(b'\t')
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Infer numbers, booleans and nulls instead of keeping every cell text.
    pub fn auto_type(mut self, yes: bool) -> Self {
        self.auto_type = yes;
        self
    }

    /// Strip surrounding whitespace from headers and fields.
    pub fn trim(mut self, yes: bool) -> Self {
        self.trim = yes;
        self
    }

    pub fn strict(mut self, yes: bool) -> Self {
        self.strict = yes;
        self
    }

    pub fn max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    fn cell(&self, raw: &str) -> Cell {
        if self.auto_type {
            Cell::infer(raw)
        } else {
            Cell::Text(raw.to_string())
        }
    }

    fn to_record(&self, columns: &[String], fields: &StringRecord) -> Record {
        // later duplicates overwrite earlier ones
        columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), self.cell(fields.get(i).unwrap_or(""))))
            .collect()
    }
}

impl TabularParser for DelimitedParser {
    fn parse(&self, text: &str) -> Result<Records, ParseError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(!self.strict)
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .from_reader(text.as_bytes());

        let mut records = rdr.records();

        // The reader skips empty lines; each empty line after the header
        // still becomes an all-empty record, so walk the physical lines
        // alongside the reader.
        let mut lines = line_kinds(text.as_bytes(), self.delimiter)
            .into_iter()
            .skip_while(|kind| *kind == Line::Blank);

        // 1) header row
        let columns: Vec<String> = match records.next() {
            Some(header) => header
                .map_err(malformed)?
                .iter()
                .map(str::to_string)
                .collect(),
            None => return Ok(Records::default()),
        };
        lines.next();

        // 2) data rows, in order
        let empty = StringRecord::new();
        let mut rows = Vec::new();
        for kind in lines {
            match kind {
                Line::Blank => self.push_row(&mut rows, &columns, &empty)?,
                Line::Record => match records.next() {
                    Some(result) => {
                        let fields = result.map_err(malformed)?;
                        self.push_row(&mut rows, &columns, &fields)?;
                    }
                    None => break,
                },
            }
        }
        for result in records {
            let fields = result.map_err(malformed)?;
            self.push_row(&mut rows, &columns, &fields)?;
        }

        trace!(columns = columns.len(), rows = rows.len(), "parsed delimited text");
        Ok(Records::new(columns, rows))
    }
}

impl DelimitedParser {
    fn push_row(
        &self,
        rows: &mut Vec<Record>,
        columns: &[String],
        fields: &StringRecord,
    ) -> Result<(), ParseError> {
        if let Some(max_rows) = self.max_rows {
            if rows.len() >= max_rows {
                return Err(ParseError::TooManyRows {
                    rows: rows.len() + 1,
                    max_rows,
                });
            }
        }
        rows.push(self.to_record(columns, fields));
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Line {
    Blank,
    Record,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    StartField,
    InField,
    InQuoted,
    QuoteInQuoted,
}

/// Classify each terminated (or final unterminated) physical record as empty
/// or not. Newlines inside quoted fields do not end a record. `\r\n`, `\r`
/// and `\n` each count as one terminator.
fn line_kinds(bytes: &[u8], delimiter: u8) -> Vec<Line> {
    let mut kinds = Vec::new();
    let mut state = Scan::StartField;
    let mut line_len = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let terminator = (b == b'\n' || b == b'\r') && state != Scan::InQuoted;
        if terminator {
            kinds.push(if line_len == 0 { Line::Blank } else { Line::Record });
            if b == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                i += 1;
            }
            state = Scan::StartField;
            line_len = 0;
            i += 1;
            continue;
        }

        state = match (state, b) {
            (Scan::StartField, b'"') => Scan::InQuoted,
            (Scan::InQuoted, b'"') => Scan::QuoteInQuoted,
            (Scan::InQuoted, _) => Scan::InQuoted,
            (Scan::QuoteInQuoted, b'"') => Scan::InQuoted,
            (_, d) if d == delimiter => Scan::StartField,
            _ => Scan::InField,
        };
        line_len += 1;
        i += 1;
    }
    if line_len > 0 {
        kinds.push(Line::Record);
    }
    kinds
}

fn malformed(err: csv::Error) -> ParseError {
    ParseError::Malformed {
        line: err.position().map(|p| p.line()).unwrap_or(0),
        message: err.to_string(),
    }
}
