//! Minimal CSV reading and writing for history exports.
//!
//! Handles the dialect a SQLite export produces: comma separated, fields
//! optionally wrapped in double quotes, `""` for a literal quote, and quoted
//! fields that span line breaks.

/// Splits `content` into records of fields. Blank lines are skipped.
pub fn parse_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }

    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = record.len() == 1 && record[0].trim().is_empty();
    if !blank {
        records.push(record);
    }
}

/// Quotes a field when it contains a separator, quote or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn format_record<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_records() {
        let records = parse_records("url,title\nhttps://a.com,A\n");
        assert_eq!(
            records,
            vec![vec!["url", "title"], vec!["https://a.com", "A"]]
        );
    }

    #[test]
    fn test_parse_quoted_fields() {
        let records = parse_records("\"https://a.com\",\"Hello, \"\"World\"\"\",3,99\n");
        assert_eq!(
            records,
            vec![vec!["https://a.com", "Hello, \"World\"", "3", "99"]]
        );
    }

    #[test]
    fn test_parse_multiline_field_and_crlf() {
        let records = parse_records("a,\"line one\nline two\",c\r\nd,e,f");
        assert_eq!(
            records,
            vec![vec!["a", "line one\nline two", "c"], vec!["d", "e", "f"]]
        );
    }

    #[test]
    fn test_parse_skips_blank_lines_keeps_empty_fields() {
        let records = parse_records("a,,c\n\n   \nx,y,\n");
        assert_eq!(records, vec![vec!["a", "", "c"], vec!["x", "y", ""]]);
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_format_record_reparses() {
        let line = format_record(&["https://a.com/?x=1,2", "T \"q\"", "4"]);
        assert_eq!(
            parse_records(&line),
            vec![vec!["https://a.com/?x=1,2", "T \"q\"", "4"]]
        );
    }
}
