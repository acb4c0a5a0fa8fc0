// ============================================================
// ROW TOKENIZER
// ============================================================
// Split one spreadsheet line into fields, honoring double quotes

/// Split a single line into trimmed fields.
///
/// A `"` opens a quoted section anywhere in a field; inside it commas are literal and
/// `""` yields one `"`. An unterminated quote simply runs to the end of the line.
pub fn tokenize_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if !in_quotes => in_quotes = true,
            '"' if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = false,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields_are_trimmed() {
        assert_eq!(tokenize_row(" a , b,c "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quoted_comma_and_escaped_quote() {
        assert_eq!(
            tokenize_row(r#"1,"Say ""hi"" to 5,000 fans",x"#),
            vec!["1", r#"Say "hi" to 5,000 fans"#, "x"]
        );
    }

    #[test]
    fn test_escaped_quote_outside_quotes_opens_and_closes() {
        // `""` while unquoted is an empty quoted section
        assert_eq!(tokenize_row(r#"a,"",b"#), vec!["a", "", "b"]);
    }

    #[test]
    fn test_unterminated_quote_is_tolerated() {
        assert_eq!(tokenize_row(r#"1,"open, still open"#), vec!["1", "open, still open"]);
    }

    #[test]
    fn test_quote_in_middle_of_field() {
        assert_eq!(tokenize_row(r#"ab"c,d"e,f"#), vec!["abc,de", "f"]);
    }

    #[test]
    fn test_trailing_comma_yields_empty_field() {
        assert_eq!(tokenize_row("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_carriage_return_is_trimmed() {
        assert_eq!(tokenize_row("a,\"b\"\r"), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_line_is_single_empty_field() {
        assert_eq!(tokenize_row(""), vec![""]);
    }
}
