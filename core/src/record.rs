//! Typed records parsed from the stops and edges CSV files.
//!
//! Numeric fields are parsed leniently: the longest numeric prefix is used
//! and text with no numeric prefix becomes zero. A malformed coordinate or
//! id therefore degrades to `0` instead of rejecting the row.

use std::io::{self, BufRead};

use crate::tokenizer::{Field, FieldEnd, FieldReader};

/// One row of the stops file, before bounds validation.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One row of the edges file. Consumed by the edge loader, then dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub from: i64,
    pub to: i64,
    pub weight: i64,
}

const STOP_FIELDS: usize = 4;
const EDGE_FIELDS: usize = 3;

/// Pulls whole records out of a CSV byte stream.
pub struct RecordReader<R> {
    fields: FieldReader<R>,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R, max_field_len: usize) -> Self {
        Self {
            fields: FieldReader::new(inner, max_field_len),
        }
    }

    /// Skip the header line. Returns false on empty input.
    pub fn skip_header(&mut self) -> io::Result<bool> {
        self.fields.skip_line()
    }

    /// Next `stop_no,Name,Latitude,Longitude` row.
    ///
    /// A row cut short by a newline gets empty (zero) values for the
    /// missing columns. Empty and whitespace-only lines are skipped.
    /// `Ok(None)` means no further record can be read, either at end of
    /// input or because the stream ended mid-record.
    pub fn next_stop(&mut self) -> io::Result<Option<StopRecord>> {
        let mut fields = loop {
            let Some(fields) = self.read_fields::<STOP_FIELDS>()? else {
                return Ok(None);
            };
            if !is_empty_line(&fields) {
                break fields;
            }
        };
        let text = |f: &mut Option<Field>| f.take().map(|f| f.text).unwrap_or_default();

        Ok(Some(StopRecord {
            id: parse_int_lenient(&text(&mut fields[0])),
            name: text(&mut fields[1]),
            latitude: parse_float_lenient(&text(&mut fields[2])),
            longitude: parse_float_lenient(&text(&mut fields[3])),
        }))
    }

    /// Next `from,to,weight` row.
    ///
    /// Edge rows are stricter than stop rows: a blank or missing column
    /// ends the read just like end of input does.
    pub fn next_edge(&mut self) -> io::Result<Option<EdgeRecord>> {
        let Some(fields) = self.read_fields::<EDGE_FIELDS>()? else {
            return Ok(None);
        };

        let mut values = [0i64; EDGE_FIELDS];
        for (slot, field) in values.iter_mut().zip(fields.iter()) {
            match field {
                Some(f) if !f.is_blank() => *slot = parse_int_lenient(&f.text),
                _ => return Ok(None),
            }
        }

        Ok(Some(EdgeRecord {
            from: values[0],
            to: values[1],
            weight: values[2],
        }))
    }

    /// Read up to `N` fields of one record.
    ///
    /// Columns after a newline are `None`. Surplus columns past `N` are
    /// discarded so the next call starts on a fresh row.
    fn read_fields<const N: usize>(&mut self) -> io::Result<Option<[Option<Field>; N]>> {
        let mut out: [Option<Field>; N] = std::array::from_fn(|_| None);
        let mut last_end = FieldEnd::Comma;

        for slot in out.iter_mut() {
            match last_end {
                FieldEnd::Comma => {}
                FieldEnd::EndOfRecord => break,
                FieldEnd::EndOfStream => return Ok(None),
            }
            let Some(field) = self.fields.next_field()? else {
                return Ok(None);
            };
            last_end = field.end;
            *slot = Some(field);
        }

        if last_end == FieldEnd::Comma {
            self.fields.skip_rest_of_record()?;
        }
        Ok(Some(out))
    }
}

/// A single whitespace-only field that closed its record.
fn is_empty_line(fields: &[Option<Field>]) -> bool {
    match fields {
        [Some(first), rest @ ..] => {
            rest.iter().all(Option::is_none) && first.text.trim().is_empty()
        }
        _ => false,
    }
}

/// Integer prefix parse: optional whitespace, optional sign, digits.
/// Anything else yields 0. Saturates instead of overflowing.
pub fn parse_int_lenient(text: &str) -> i64 {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
    }
    value
}

/// Floating-point prefix parse: the longest leading slice that is a valid
/// float wins. Anything else yields 0.0.
pub fn parse_float_lenient(text: &str) -> f64 {
    let s = text.trim_start();
    let mut ends: Vec<usize> = s.char_indices().map(|(i, _)| i).skip(1).collect();
    ends.push(s.len());

    ends.into_iter()
        .rev()
        .find_map(|end| s[..end].parse::<f64>().ok())
        .unwrap_or(0.0)
}
