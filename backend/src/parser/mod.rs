//! CSV decoding, delimiter detection and tokenization.
//!
//! Turns raw upload bytes into a [`RawTable`]: an ordered list of rows of
//! trimmed string fields. No type or quality logic here.
//!
//! The tokenizer is a single-pass state machine over each line:
//!
//! ```text
//!            '"'                 '"'
//! Unquoted ───────▶ Quoted ───────────▶ QuoteInQuoted
//!    ▲                 ▲  '"' (literal)      │
//!    │                 └─────────────────────┤
//!    └──────── delimiter / other char ───────┘
//! ```
//!
//! Two consecutive quotes inside a quoted field produce one literal quote.
//! Quote characters themselves are never part of the field value.

/// Candidate delimiters, in tie-break order.
pub const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Delimiter used when the first line contains no candidate.
pub const DEFAULT_DELIMITER: char = ',';

/// Rows of string fields, header first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row, used as column names.
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// All rows after the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        if self.rows.is_empty() {
            &[]
        } else {
            &self.rows[1..]
        }
    }

    /// Authoritative column count (the header's field count).
    pub fn column_count(&self) -> usize {
        self.header().len()
    }

    /// Values of one column across all data rows.
    ///
    /// Rows shorter than the header contribute an empty string.
    pub fn column_values(&self, index: usize) -> Vec<&str> {
        self.data_rows()
            .iter()
            .map(|row| row.get(index).map(String::as_str).unwrap_or(""))
            .collect()
    }
}

/// Decode raw bytes as UTF-8, dropping a BOM and replacing malformed sequences.
pub fn decode_content(bytes: &[u8]) -> String {
    let (text, _had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    text.into_owned()
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// The most frequent candidate wins; ties go to the earlier candidate in
/// [`DELIMITERS`]. Falls back to a comma when no candidate occurs.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.split('\n').next().unwrap_or("");

    let mut best_sep = DEFAULT_DELIMITER;
    let mut best_count = 0;

    for &sep in &DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Split one line into trimmed fields.
pub fn tokenize_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut state = QuoteState::Unquoted;

    for ch in line.chars() {
        state = match state {
            QuoteState::Unquoted => {
                if ch == '"' {
                    QuoteState::Quoted
                } else if ch == delimiter {
                    fields.push(current.trim().to_string());
                    current.clear();
                    QuoteState::Unquoted
                } else {
                    current.push(ch);
                    QuoteState::Unquoted
                }
            }
            QuoteState::Quoted => {
                if ch == '"' {
                    QuoteState::QuoteInQuoted
                } else {
                    current.push(ch);
                    QuoteState::Quoted
                }
            }
            QuoteState::QuoteInQuoted => {
                if ch == '"' {
                    current.push('"');
                    QuoteState::Quoted
                } else if ch == delimiter {
                    fields.push(current.trim().to_string());
                    current.clear();
                    QuoteState::Unquoted
                } else {
                    current.push(ch);
                    QuoteState::Unquoted
                }
            }
        };
    }
    fields.push(current.trim().to_string());

    fields
}

/// Tokenize full CSV text. Blank lines are dropped; every other line yields one row.
pub fn tokenize(content: &str, delimiter: char) -> RawTable {
    let rows = content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| tokenize_line(line, delimiter))
        .collect();

    RawTable::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_csv() {
        let table = tokenize("name;age\nAlice;30\nBob;25", ';');

        assert_eq!(table.header(), row(&["name", "age"]).as_slice());
        assert_eq!(table.data_rows().len(), 2);
        assert_eq!(table.data_rows()[0], row(&["Alice", "30"]));
        assert_eq!(table.data_rows()[1], row(&["Bob", "25"]));
    }

    #[test]
    fn test_quoted_values() {
        let table = tokenize("name,value\n\"Alice\",\"Hello, World\"", ',');
        assert_eq!(table.data_rows()[0], row(&["Alice", "Hello, World"]));
    }

    #[test]
    fn test_escaped_quote_is_literal() {
        let fields = tokenize_line("\"say \"\"hi\"\"\",x", ',');
        assert_eq!(fields, row(&["say \"hi\"", "x"]));
    }

    #[test]
    fn test_empty_quoted_field() {
        let fields = tokenize_line("a,\"\",c", ',');
        assert_eq!(fields, row(&["a", "", "c"]));
    }

    #[test]
    fn test_fields_are_trimmed_and_crlf_removed() {
        let table = tokenize("a , b\r\n 1 ,2 \r\n", ',');
        assert_eq!(table.header(), row(&["a", "b"]).as_slice());
        assert_eq!(table.data_rows()[0], row(&["1", "2"]));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let table = tokenize("a;b\n1;2\n\n   \n3;4\n", ';');
        assert_eq!(table.data_rows().len(), 2);
    }

    #[test]
    fn test_ragged_rows_are_kept() {
        let table = tokenize("a,b\n1,2,3\n4", ',');
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.data_rows()[0].len(), 3);
        assert_eq!(table.data_rows()[1].len(), 1);
        assert_eq!(table.column_values(1), vec!["2", ""]);
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_field() {
        assert_eq!(tokenize_line("a,b,", ','), row(&["a", "b", ""]));
    }

    #[test]
    fn test_empty_table() {
        let table = tokenize("\n\n", ',');
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
        assert!(table.data_rows().is_empty());
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_detect_delimiter_pipe() {
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
    }

    #[test]
    fn test_detect_delimiter_only_reads_first_line() {
        assert_eq!(detect_delimiter("a;b\n1,2,3,4,5"), ';');
    }

    #[test]
    fn test_detect_delimiter_defaults_to_comma() {
        assert_eq!(detect_delimiter(""), ',');
        assert_eq!(detect_delimiter("single_column\n1"), ',');
    }

    #[test]
    fn test_detect_delimiter_tie_prefers_comma() {
        assert_eq!(detect_delimiter("a,b;c"), ',');
    }

    #[test]
    fn test_decode_strips_bom() {
        let bytes = b"\xEF\xBB\xBFa,b\n1,2";
        assert_eq!(decode_content(bytes), "a,b\n1,2");
    }

    #[test]
    fn test_decode_replaces_invalid_bytes() {
        let bytes: &[u8] = &[0x61, 0xFF, 0x62];
        let decoded = decode_content(bytes);
        assert!(decoded.starts_with('a'));
        assert!(decoded.ends_with('b'));
        assert!(decoded.contains('\u{FFFD}'));
    }
}
