//! Query result parsing and rendering.
//!
//! Result objects are CSV text: a header record followed by data records.
//! The parser honors quoted fields (embedded commas, doubled quotes,
//! embedded newlines) and tolerates CRLF line endings.

use crate::error::{OpskitError, Result};

/// A parsed result set: column names plus rows of text values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    /// Column names from the header record.
    pub columns: Vec<String>,
    /// Rows of data, one value per column.
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    /// Parses a CSV body into a table.
    ///
    /// The first record is the header. Every data record must have exactly
    /// as many fields as the header.
    pub fn from_csv(body: &str) -> Result<Self> {
        let mut records = parse_csv(body);

        if records.is_empty() {
            return Err(OpskitError::query("result object is empty"));
        }

        let columns = records.remove(0);
        for (i, row) in records.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(OpskitError::query(format!(
                    "row {} has {} fields, expected {}",
                    i + 1,
                    row.len(),
                    columns.len()
                )));
            }
        }

        Ok(Self {
            columns,
            rows: records,
        })
    }

    /// Returns the number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the table as aligned plain text for display.
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(String::len).collect();
        for row in &self.rows {
            for (i, value) in row.iter().enumerate() {
                if value.len() > widths[i] {
                    widths[i] = value.len();
                }
            }
        }

        let mut out = String::new();
        push_row(&mut out, &self.columns, &widths);
        let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_row(&mut out, &dashes, &widths);
        for row in &self.rows {
            push_row(&mut out, row, &widths);
        }
        out
    }
}

fn push_row(out: &mut String, values: &[String], widths: &[usize]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        if i + 1 == values.len() {
            // No trailing padding on the last column.
            out.push_str(value);
        } else {
            out.push_str(&format!("{value:<width$}", width = widths[i]));
        }
    }
    out.push('\n');
}

/// Splits CSV text into records of fields.
///
/// Quoting follows the usual rules: fields may be wrapped in double quotes,
/// a doubled quote inside a quoted field is a literal quote, and separators
/// and newlines inside quotes are data.
fn parse_csv(body: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => {
                record.push(std::mem::take(&mut field));
            }
            '\r' => {
                // Dropped; the following '\n' terminates the record.
            }
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    // Final record when the body does not end in a newline.
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}
