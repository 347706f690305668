//! Delimited-text parser with lossy row tolerance.

use std::iter::Peekable;
use std::str::Chars;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReviewError, Result};
use super::table::{FieldSchema, Row};

/// Byte-order mark some spreadsheet tools prepend to UTF-8 exports.
pub const BOM: char = '\u{feff}';

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Strip a leading byte-order mark before parsing.
    pub strip_bom: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            strip_bom: true,
        }
    }
}

/// Output of parsing: the header plus every record that matched it.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub schema: FieldSchema,
    pub rows: Vec<Row>,
    /// Records skipped because their field count differed from the header's.
    pub dropped: usize,
}

/// Parses already-decoded delimited text.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse text whose first non-blank record is the header.
    ///
    /// A quote anywhere in a field toggles quoted mode, in which delimiters
    /// and line breaks are literal; a doubled quote inside quotes is a
    /// literal quote. Whitespace around each field is trimmed after
    /// splitting. Records whose field count differs from the header's are
    /// dropped and counted, never reported as errors.
    pub fn parse_str(&self, text: &str) -> Result<ParsedTable> {
        let text = if self.config.strip_bom {
            text.strip_prefix(BOM).unwrap_or(text)
        } else {
            text
        };

        let mut records = Records::new(
            text,
            char::from(self.config.delimiter),
            char::from(self.config.quote),
        )
        .filter(|record| !record.blank);

        let schema = match records.next() {
            Some(header) => FieldSchema::new(header.fields),
            None => return Err(ReviewError::EmptyData("No header line found".to_string())),
        };

        let mut rows = Vec::new();
        let mut dropped = 0;

        for record in records {
            if record.fields.len() != schema.len() {
                dropped += 1;
                debug!(
                    line = record.line,
                    expected = schema.len(),
                    found = record.fields.len(),
                    "dropping record with mismatched field count"
                );
                continue;
            }

            let origin = rows.len();
            rows.push(Row::new(origin, record.fields));
        }

        Ok(ParsedTable {
            schema,
            rows,
            dropped,
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// One record split from the input, before field-count checks.
struct RawRecord {
    /// Trimmed field values.
    fields: Vec<String>,
    /// Line the record starts on (1-based).
    line: usize,
    /// The raw text held nothing but whitespace.
    blank: bool,
}

/// Splits text into records, tracking quoted mode across line breaks.
struct Records<'a> {
    chars: Peekable<Chars<'a>>,
    delimiter: char,
    quote: char,
    line: usize,
}

impl<'a> Records<'a> {
    fn new(text: &'a str, delimiter: char, quote: char) -> Self {
        Self {
            chars: text.chars().peekable(),
            delimiter,
            quote,
            line: 1,
        }
    }
}

impl Iterator for Records<'_> {
    type Item = RawRecord;

    fn next(&mut self) -> Option<RawRecord> {
        self.chars.peek()?;

        let line = self.line;
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut blank = true;

        while let Some(c) = self.chars.next() {
            if c == '\n' {
                self.line += 1;
            }

            if in_quotes {
                if c != self.quote {
                    field.push(c);
                } else if self.chars.next_if_eq(&self.quote).is_some() {
                    field.push(c);
                } else {
                    in_quotes = false;
                }
                continue;
            }

            if c == self.quote {
                in_quotes = true;
                blank = false;
            } else if c == self.delimiter {
                fields.push(trimmed(&mut field));
                blank &= c.is_whitespace();
            } else if c == '\n' {
                break;
            } else if c == '\r' {
                if self.chars.next_if_eq(&'\n').is_some() {
                    self.line += 1;
                }
                break;
            } else {
                blank &= c.is_whitespace();
                field.push(c);
            }
        }
        fields.push(trimmed(&mut field));

        Some(RawRecord {
            fields,
            line,
            blank,
        })
    }
}

fn trimmed(field: &mut String) -> String {
    let value = field.trim().to_string();
    field.clear();
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let table = parser
            .parse_str("name,age,city\nAlice,30,NYC\nBob,25,LA")
            .unwrap();

        assert_eq!(table.schema.names(), &["name", "age", "city"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].value(0), "Alice");
        assert_eq!(table.rows[1].value(1), "25");
        assert_eq!(table.rows[1].origin, 1);
        assert_eq!(table.dropped, 0);
    }

    #[test]
    fn test_quoted_fields_keep_commas_and_newlines() {
        let parser = Parser::new();
        let text = "name,note\n\"Smith, J\",\"line one\nline two\"\nDoe,plain";
        let table = parser.parse_str(text).unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].value(0), "Smith, J");
        assert_eq!(table.rows[0].value(1), "line one\nline two");
        assert_eq!(table.rows[1].value(0), "Doe");
    }

    #[test]
    fn test_doubled_quote_is_literal() {
        let parser = Parser::new();
        let table = parser.parse_str("a,b\n\"say \"\"hi\"\"\",x").unwrap();
        assert_eq!(table.rows[0].value(0), "say \"hi\"");
    }

    #[test]
    fn test_quote_after_leading_space() {
        let parser = Parser::new();
        let text = "name,photo_url,note\nBob,http://x/b.jpg,plain\nAlice,http://x/a.jpg, \"x, y\"\n";
        let table = parser.parse_str(text).unwrap();

        assert_eq!(table.dropped, 0);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].values(), &["Alice", "http://x/a.jpg", "x, y"]);
    }

    #[test]
    fn test_quote_toggles_mid_field() {
        let parser = Parser::new();
        let table = parser.parse_str("a,b\nsize \"3,5\" cm,x\n").unwrap();
        assert_eq!(table.rows[0].values(), &["size 3,5 cm", "x"]);
    }

    #[test]
    fn test_quoted_empty_value_is_a_row() {
        let parser = Parser::new();
        let table = parser.parse_str("photo\na.jpg\n\"\"\nb.jpg\n").unwrap();

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1].value(0), "");
        assert_eq!(table.rows[2].origin, 2);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let parser = Parser::new();
        let table = parser.parse_str(" a , b \n  1 ,2  ").unwrap();
        assert_eq!(table.schema.names(), &["a", "b"]);
        assert_eq!(table.rows[0].values(), &["1", "2"]);
    }

    #[test]
    fn test_mismatched_rows_are_dropped() {
        let parser = Parser::new();
        let table = parser
            .parse_str("a,b,c\n1,2,3\n1,2\n1,2,3,4\n4,5,6\n")
            .unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.dropped, 2);
        assert_eq!(table.rows[1].value(0), "4");
        assert_eq!(table.rows[1].origin, 1);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let parser = Parser::new();
        let table = parser.parse_str("\n  \na,b\n\n1,2\n   \n3,4\n").unwrap();
        assert_eq!(table.schema.len(), 2);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.dropped, 0);
    }

    #[test]
    fn test_crlf_and_bom() {
        let parser = Parser::new();
        let table = parser.parse_str("\u{feff}a,b\r\n1,2\r\n").unwrap();
        assert_eq!(table.schema.names(), &["a", "b"]);
        assert_eq!(table.rows[0].values(), &["1", "2"]);
    }

    #[test]
    fn test_empty_input_is_error() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_str("   \n\n"),
            Err(ReviewError::EmptyData(_))
        ));
    }

    #[test]
    fn test_header_only() {
        let parser = Parser::new();
        let table = parser.parse_str("a,b").unwrap();
        assert_eq!(table.schema.len(), 2);
        assert!(table.rows.is_empty());
    }
}
