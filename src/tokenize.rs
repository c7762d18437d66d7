//! Lenient CSV tokenizer for loosely-structured snapshot exports.
//!
//! The exports this tool ingests come from spreadsheet "save as CSV" paths and
//! hand-edited files, so the tokenizer degrades gracefully instead of erroring:
//! an unterminated quote extends to end of input, rows made entirely of blank
//! fields are dropped, and the first surviving row is always the header row.

use log::debug;

/// Splits raw CSV text into rows of field strings.
///
/// Double-quoted fields may contain the separator, `\n`/`\r\n` terminators, and
/// doubled quotes (`""`) as an escaped literal quote. Fields that were never
/// quoted are trimmed of surrounding whitespace; quoted content is preserved
/// verbatim.
pub fn tokenize(text: &str, separator: char) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut field_quoted = false;
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
            field_quoted = true;
        } else if ch == separator {
            finish_field(&mut row, &mut field, &mut field_quoted);
        } else if ch == '\n' || ch == '\r' {
            if ch == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            finish_field(&mut row, &mut field, &mut field_quoted);
            finish_row(&mut rows, &mut row);
        } else {
            field.push(ch);
        }
    }

    // Input ending without a terminator still carries a final row; an open
    // quote at end of input simply closes here.
    if !field.is_empty() || field_quoted || !row.is_empty() {
        finish_field(&mut row, &mut field, &mut field_quoted);
        finish_row(&mut rows, &mut row);
    }

    rows
}

fn finish_field(row: &mut Vec<String>, field: &mut String, quoted: &mut bool) {
    let value = std::mem::take(field);
    if *quoted {
        row.push(value);
    } else {
        row.push(value.trim().to_string());
    }
    *quoted = false;
}

fn finish_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>) {
    let candidate = std::mem::take(row);
    if candidate.iter().all(|field| field.trim().is_empty()) {
        debug!("Dropping blank row of {} field(s)", candidate.len());
        return;
    }
    rows.push(candidate);
}
