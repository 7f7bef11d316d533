use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::config::HeaderPolicy;
use crate::error::{LoadError, RowError};

use super::model::{Reading, RowOutcome, Station, TemperatureKey};
use super::normalize::normalize;

/// Rows of the input after header handling, each tagged with its outcome.
#[derive(Debug, Clone, Default)]
pub struct ParsedRows {
    /// Fields of the skipped header row, if one was detected.
    pub header: Option<Vec<String>>,
    pub outcomes: Vec<RowOutcome>,
}

impl ParsedRows {
    /// No header and no rows: nothing was in the file.
    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.outcomes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a `date,north,northeast` series from a file.
///
/// Only an unreadable or completely empty file is an error; malformed rows
/// come back as [`RowOutcome::Rejected`].
pub fn load_file(path: &Path, header: HeaderPolicy) -> Result<ParsedRows, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = read_rows(file, header).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if rows.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    log::info!(
        "Read {} rows from {} (header: {})",
        rows.outcomes.len(),
        path.display(),
        rows.header.as_ref().map_or("none".to_string(), |h| h.join(","))
    );
    Ok(rows)
}

/// Split every line on `,` and classify it.
///
/// No quoting or escaping is recognised, so a `"` is an ordinary character
/// and a field can never contain a comma. Blank lines are skipped but still
/// counted, so reported line numbers match the file. A trailing `\r` is
/// dropped. Fields past the third are ignored.
pub fn read_rows<R: Read>(input: R, header: HeaderPolicy) -> io::Result<ParsedRows> {
    let mut rows = ParsedRows::default();
    let mut first_row = true;

    for (idx, raw) in BufReader::new(input).split(b'\n').enumerate() {
        let raw = raw?;
        let bytes = raw.strip_suffix(b"\r").unwrap_or(&raw[..]);
        if bytes.is_empty() {
            continue;
        }

        let fields: Vec<String> = bytes.split(|&b| b == b',').map(lossy).collect();
        if std::mem::take(&mut first_row) && header.is_header(first_field(&fields)) {
            rows.header = Some(fields);
            continue;
        }
        rows.outcomes.push(classify(idx as u64 + 1, &fields));
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Row classification
// ---------------------------------------------------------------------------

fn classify(line: u64, fields: &[String]) -> RowOutcome {
    let [date, north, northeast, ..] = fields else {
        return RowOutcome::Rejected(RowError::Shape {
            line,
            fields: fields.len(),
        });
    };

    let north = match parse_field(north, line, Station::North) {
        Ok(key) => key,
        Err(err) => return RowOutcome::Rejected(err),
    };
    let northeast = match parse_field(northeast, line, Station::Northeast) {
        Ok(key) => key,
        Err(err) => return RowOutcome::Rejected(err),
    };

    RowOutcome::Accepted(Reading {
        line,
        date: date.trim().to_string(),
        north,
        northeast,
    })
}

fn parse_field(raw: &str, line: u64, station: Station) -> Result<TemperatureKey, RowError> {
    normalize(raw).map_err(|invalid| RowError::Parse {
        line,
        column: station.column(),
        value: invalid.0,
    })
}

fn first_field(fields: &[String]) -> &str {
    fields.first().map_or("", String::as_str)
}

fn lossy(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
