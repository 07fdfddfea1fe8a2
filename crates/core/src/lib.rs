// Roster core
//
// DB-agnostic participant domain shared by the API server and its tools.
//
// Key design decisions:
// - Participant entities carry no storage concerns; the store assigns ids
// - Date parsing is explicit and typed: ambiguous day/month orders are errors
// - Spreadsheet decoding is all-or-nothing so an import never half-applies
// - Age arithmetic takes "today" as an argument so callers control the clock

pub mod age;
pub mod dates;
pub mod participant;
pub mod spreadsheet;

// Tracing subscriber setup shared by binaries
pub mod telemetry;

pub use age::age_on;
pub use dates::{parse_date, DateParseError};
pub use participant::{NewParticipant, Participant};
pub use spreadsheet::{is_xlsx_filename, read_participants, SpreadsheetError};
