//! Statement reader
//!
//! Splits an input stream into statements. A statement ends at a newline
//! with no open `[` bracket; bracket-nested statements may span lines, and
//! the embedded newlines are replaced by single spaces so the core always
//! sees a one-line buffer.

use std::io::{self, BufRead};

pub struct StatementReader<R> {
    reader: R,
}

impl<R: BufRead> StatementReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the next complete statement; `None` at end of input
    ///
    /// Blank lines between statements are skipped. A partial statement
    /// still open at end of input is flushed as-is.
    pub fn read_statement(&mut self) -> io::Result<Option<String>> {
        let mut statement = String::new();
        let mut depth: i32 = 0;

        loop {
            let mut line = String::new();
            let read = self.reader.read_line(&mut line)?;
            if read == 0 {
                let trimmed = statement.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(trimmed.to_string()));
            }

            let line = line.trim_end_matches(['\n', '\r']);
            if !statement.is_empty() && !line.trim().is_empty() {
                statement.push(' ');
            }
            statement.push_str(line.trim());
            depth += bracket_balance(line);

            if depth <= 0 {
                if statement.trim().is_empty() {
                    //  blank line between statements
                    statement.clear();
                    depth = 0;
                    continue;
                }
                return Ok(Some(statement.trim().to_string()));
            }
        }
    }
}

fn bracket_balance(line: &str) -> i32 {
    line.chars()
        .map(|c| match c {
            '[' => 1,
            ']' => -1,
            _ => 0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(input: &str) -> StatementReader<Cursor<&str>> {
        StatementReader::new(Cursor::new(input))
    }

    #[test]
    fn test_single_line_statement() {
        let mut r = reader("[=proc f :input :body ()]\n");
        assert_eq!(
            r.read_statement().unwrap().as_deref(),
            Some("[=proc f :input :body ()]")
        );
        assert_eq!(r.read_statement().unwrap(), None);
    }

    #[test]
    fn test_multi_line_statement_joins_without_newlines() {
        let mut r = reader("[=proc f :input\n:body ()]\n");
        assert_eq!(
            r.read_statement().unwrap().as_deref(),
            Some("[=proc f :input :body ()]")
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut r = reader("\n\nexit\n");
        assert_eq!(r.read_statement().unwrap().as_deref(), Some("exit"));
    }

    #[test]
    fn test_two_statements() {
        let mut r = reader("[=proc a :input :body ()]\n[=proc b :input :body ()]\n");
        assert_eq!(
            r.read_statement().unwrap().as_deref(),
            Some("[=proc a :input :body ()]")
        );
        assert_eq!(
            r.read_statement().unwrap().as_deref(),
            Some("[=proc b :input :body ()]")
        );
        assert_eq!(r.read_statement().unwrap(), None);
    }

    #[test]
    fn test_unclosed_statement_flushed_at_eof() {
        let mut r = reader("[=proc f :input\n:body ()");
        assert_eq!(
            r.read_statement().unwrap().as_deref(),
            Some("[=proc f :input :body ()")
        );
        assert_eq!(r.read_statement().unwrap(), None);
    }

    #[test]
    fn test_empty_input() {
        let mut r = reader("");
        assert_eq!(r.read_statement().unwrap(), None);
    }
}
