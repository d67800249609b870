//! Entry file ingestion.
//!
//! Entry files are CSV with a header row and one swimmer per row:
//!
//! ```text
//! first name,last name,age,gender,team,event 1,event 2,event 3,medley relay,free relay
//! ```
//!
//! Every row is validated on the way in; the first bad row aborts the import
//! of the whole file.

use crate::{Error, Gender, Result};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

/// Number of columns in an entry row
pub const ENTRY_COLUMNS: usize = 10;

/// File name of the blank template shipped alongside entry files
pub const TEMPLATE_FILE_NAME: &str = "Entry Template.csv";

/// A validated entry row, not yet given an identity
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub gender: Gender,
    pub team: String,
    pub events: Vec<String>,
    pub medley_relay: bool,
    pub free_relay: bool,
}

/// Read and validate all entries from a CSV file
pub fn read_entries(path: &Path) -> Result<Vec<Entry>> {
    let file = std::fs::File::open(path)?;
    let entries = read_entries_from(file)?;
    tracing::info!("Read {} entries from {:?}", entries.len(), path);
    Ok(entries)
}

/// Read and validate all entries from any CSV source
pub fn read_entries_from<R: Read>(reader: R) -> Result<Vec<Entry>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        entries.push(parse_record(&record, line)?);
    }
    Ok(entries)
}

fn parse_record(record: &StringRecord, line: u64) -> Result<Entry> {
    if record.len() != ENTRY_COLUMNS {
        return Err(Error::import(
            line,
            format!("expected {} columns, found {}", ENTRY_COLUMNS, record.len()),
        ));
    }

    let field = |index: usize| record.get(index).unwrap_or("").trim();

    let age = field(2)
        .parse::<u32>()
        .map_err(|_| Error::import(line, format!("age '{}' is not a whole number", field(2))))?;

    let gender = Gender::from_letter(field(3))
        .ok_or_else(|| Error::import(line, format!("unknown gender '{}'", field(3))))?;

    let team = field(4).to_lowercase();
    if team.is_empty() {
        return Err(Error::import(line, "team code is empty"));
    }

    let events = (5..8)
        .map(|index| field(index).to_lowercase())
        .filter(|code| !code.is_empty())
        .collect();

    Ok(Entry {
        first_name: title_case(field(0)),
        last_name: title_case(field(1)),
        age,
        gender,
        team,
        events,
        medley_relay: parse_flag(field(8), line)?,
        free_relay: parse_flag(field(9), line)?,
    })
}

fn parse_flag(value: &str, line: u64) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" | "" => Ok(false),
        other => Err(Error::import(line, format!("unrecognised relay flag '{}'", other))),
    }
}

/// Capitalize the first letter of every word, lower-case the rest
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
