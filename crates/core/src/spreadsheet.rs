// Spreadsheet decoding for bulk participant import
//
// Reads the first worksheet of an .xlsx workbook held in memory and turns every
// data row into a NewParticipant. Decoding is all-or-nothing: the first bad row
// fails the whole workbook, so callers never persist a partial import.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx, XlsxError};
use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::dates::{parse_date, DateParseError};
use crate::participant::NewParticipant;

/// Extension accepted for uploads.
pub const XLSX_EXTENSION: &str = ".xlsx";

pub const FULL_NAME_COLUMN: &str = "Full name";
pub const BIRTH_DATE_COLUMN: &str = "Birth date";
pub const SEX_COLUMN: &str = "Sex";
pub const EMAIL_COLUMN: &str = "E-mail";
pub const PHONE_COLUMN: &str = "Phone";

// Lowercased header names accepted for each column. The Portuguese names are
// used by the registration sheets this service was built for.
const FULL_NAME_HEADERS: &[&str] = &["full name", "nome completo"];
const BIRTH_DATE_HEADERS: &[&str] = &["birth date", "data de nascimento"];
const SEX_HEADERS: &[&str] = &["sex", "sexo"];
const EMAIL_HEADERS: &[&str] = &["e-mail", "email"];
const PHONE_HEADERS: &[&str] = &["phone", "celular"];

/// Failure to decode a participant spreadsheet.
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("could not read workbook: {0}")]
    Workbook(#[from] XlsxError),
    #[error("workbook has no worksheets")]
    NoWorksheet,
    #[error("worksheet has no header row")]
    MissingHeader,
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: missing value for '{column}'")]
    MissingValue { row: u32, column: &'static str },
    #[error("row {row}: invalid birth date '{value}': {source}")]
    InvalidDate {
        row: u32,
        value: String,
        #[source]
        source: DateParseError,
    },
}

/// Whether an uploaded file name carries the .xlsx extension (case-insensitive).
pub fn is_xlsx_filename(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(XLSX_EXTENSION)
}

/// Decode every data row of the first worksheet.
pub fn read_participants(bytes: &[u8]) -> Result<Vec<NewParticipant>, SpreadsheetError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoWorksheet)??;

    let first_row = range.start().map(|(row, _)| row).unwrap_or(0);
    let mut rows = range
        .rows()
        .enumerate()
        // 1-based row numbers as shown by spreadsheet applications
        .map(|(index, cells)| (first_row + index as u32 + 1, cells))
        .filter(|(_, cells)| !is_blank(cells));

    let (_, header) = rows.next().ok_or(SpreadsheetError::MissingHeader)?;
    let columns = Columns::resolve(header)?;

    let participants = rows
        .map(|(row, cells)| columns.decode(row, cells))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(rows = participants.len(), "decoded participant spreadsheet");
    Ok(participants)
}

/// Positions of the known columns in the header row.
#[derive(Debug)]
struct Columns {
    full_name: usize,
    birth_date: usize,
    sex: usize,
    email: usize,
    phone: Option<usize>,
}

impl Columns {
    fn resolve(header: &[Data]) -> Result<Self, SpreadsheetError> {
        let names: Vec<String> = header
            .iter()
            .map(|cell| cell_text(cell).unwrap_or_default().to_lowercase())
            .collect();
        let find = |aliases: &[&str]| {
            names
                .iter()
                .position(|name| aliases.contains(&name.as_str()))
        };
        let require = |aliases: &[&str], column: &'static str| {
            find(aliases).ok_or(SpreadsheetError::MissingColumn(column))
        };

        Ok(Self {
            full_name: require(FULL_NAME_HEADERS, FULL_NAME_COLUMN)?,
            birth_date: require(BIRTH_DATE_HEADERS, BIRTH_DATE_COLUMN)?,
            sex: require(SEX_HEADERS, SEX_COLUMN)?,
            email: require(EMAIL_HEADERS, EMAIL_COLUMN)?,
            phone: find(PHONE_HEADERS),
        })
    }

    fn decode(&self, row: u32, cells: &[Data]) -> Result<NewParticipant, SpreadsheetError> {
        let text = |index: usize, column: &'static str| {
            cells
                .get(index)
                .and_then(cell_text)
                .ok_or(SpreadsheetError::MissingValue { row, column })
        };

        Ok(NewParticipant {
            full_name: text(self.full_name, FULL_NAME_COLUMN)?,
            birth_date: cell_date(row, cells.get(self.birth_date).unwrap_or(&Data::Empty))?,
            sex: text(self.sex, SEX_COLUMN)?,
            email: text(self.email, EMAIL_COLUMN)?,
            phone: self
                .phone
                .and_then(|index| cells.get(index))
                .and_then(cell_text)
                .unwrap_or_default(),
        })
    }
}

fn is_blank(cells: &[Data]) -> bool {
    cells.iter().all(|cell| cell_text(cell).is_none())
}

/// Render a cell as trimmed text; `None` for empty and error cells.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => dt.as_f64().to_string(),
        },
    };
    (!text.is_empty()).then_some(text)
}

/// Integral numbers lose the trailing `.0` so phone numbers stay intact.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn cell_date(row: u32, cell: &Data) -> Result<NaiveDate, SpreadsheetError> {
    let serial = match cell {
        Data::DateTime(dt) => Some(dt.as_f64()),
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        _ => None,
    };

    if let Some(serial) = serial {
        return excel_serial_to_date(serial).ok_or_else(|| SpreadsheetError::InvalidDate {
            row,
            value: serial.to_string(),
            source: DateParseError::Unrecognized(serial.to_string()),
        });
    }

    let value = cell_text(cell).ok_or(SpreadsheetError::MissingValue {
        row,
        column: BIRTH_DATE_COLUMN,
    })?;
    parse_date(&value).map_err(|source| SpreadsheetError::InvalidDate { row, value, source })
}

/// Convert an Excel serial day number (1900 date system) into a date.
///
/// Excel counts 1900-02-29, a day that never existed, so serials before it
/// are offset by one and serial 60 itself has no date.
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let days = serial.trunc() as u64;
    let epoch = match days {
        60 => return None,
        d if d < 60 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        _ => NaiveDate::from_ymd_opt(1899, 12, 30)?,
    };
    epoch.checked_add_days(Days::new(days))
}
