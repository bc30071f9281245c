//! Input CSV reading with encoding auto-detection.
//!
//! Japan Customs publishes its statistics as Shift_JIS or UTF-8 files.
//! Bytes are decoded to UTF-8 first, then split into records with the
//! `csv` crate. The header row is kept; dropping it is the expander's job.

use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

use crate::error::{CsvError, CsvResult, QuoteErrorKind};
use crate::models::InputTable;

/// Input files are always comma separated.
pub const DELIMITER: u8 = b',';

const UTF8_BOM: char = '\u{feff}';

const QUOTE: char = '"';

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is taken as is; anything else is sniffed with chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;
    normalize_charset(&charset)
}

fn normalize_charset(charset: &str) -> String {
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "shift_jis" | "shift-jis" | "sjis" | "cp932" | "windows-31j" => "shift_jis".to_string(),
        "euc-jp" | "eucjp" => "euc-jp".to_string(),
        "iso-2022-jp" => "iso-2022-jp".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            "windows-1252".to_string()
        }
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// Unknown labels fall back to lossy UTF-8. A leading BOM is removed.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        "shift_jis" => encoding_rs::SHIFT_JIS.decode(bytes).0.into_owned(),
        "euc-jp" => encoding_rs::EUC_JP.decode(bytes).0.into_owned(),
        "iso-2022-jp" => encoding_rs::ISO_2022_JP.decode(bytes).0.into_owned(),
        "windows-1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        label => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    match decoded.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

#[derive(Clone, Copy)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Check quoting strictly: a `"` may only open a field, be doubled inside a
/// quoted field, or close it right before a delimiter or line end.
///
/// Returns the 1-based line of the first violation. For an unterminated
/// field that is the line where the field was opened.
pub fn check_quotes(content: &str) -> Result<(), (usize, QuoteErrorKind)> {
    let delimiter = char::from(DELIMITER);
    let mut state = QuoteState::FieldStart;
    let mut line = 1;
    let mut opened_at = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        state = match (state, c) {
            (_, '\n') if !matches!(state, QuoteState::Quoted) => {
                line += 1;
                QuoteState::FieldStart
            }
            (QuoteState::QuoteInQuoted, '\r') if chars.peek() == Some(&'\n') => {
                QuoteState::QuoteInQuoted
            }
            (QuoteState::FieldStart, QUOTE) => {
                opened_at = line;
                QuoteState::Quoted
            }
            (QuoteState::FieldStart | QuoteState::Unquoted, c) if c == delimiter => {
                QuoteState::FieldStart
            }
            (QuoteState::FieldStart | QuoteState::Unquoted, QUOTE) => {
                return Err((line, QuoteErrorKind::Bare));
            }
            (QuoteState::FieldStart | QuoteState::Unquoted, _) => QuoteState::Unquoted,
            (QuoteState::Quoted, QUOTE) => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, c) => {
                if c == '\n' {
                    line += 1;
                }
                QuoteState::Quoted
            }
            (QuoteState::QuoteInQuoted, QUOTE) => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, c) if c == delimiter => QuoteState::FieldStart,
            (QuoteState::QuoteInQuoted, _) => {
                return Err((line, QuoteErrorKind::Extraneous));
            }
        };
    }

    match state {
        QuoteState::Quoted => Err((opened_at, QuoteErrorKind::Unterminated)),
        _ => Ok(()),
    }
}

/// Parse decoded CSV text into records.
///
/// Quoting is checked strictly first; then every row must have as many
/// fields as the first one.
pub fn parse_records(content: &str, name: &str) -> CsvResult<Vec<StringRecord>> {
    check_quotes(content).map_err(|(line, kind)| CsvError::Quote {
        input: name.to_string(),
        line,
        kind,
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(DELIMITER)
        .flexible(false)
        .from_reader(content.as_bytes());

    reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| CsvError::Parse {
            input: name.to_string(),
            error,
        })
}

/// Decode and parse raw bytes into an [`InputTable`].
pub fn read_table_bytes(bytes: &[u8], name: &str) -> CsvResult<InputTable> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let records = parse_records(&content, name)?;

    Ok(InputTable {
        name: name.to_string(),
        encoding,
        records,
    })
}

/// Read a CSV file from disk into an [`InputTable`].
pub fn read_table<P: AsRef<Path>>(path: P) -> CsvResult<InputTable> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|error| CsvError::Io {
        path: path.to_path_buf(),
        error,
    })?;

    read_table_bytes(&bytes, &path.display().to_string())
}
