/// Splits `line` on `delimiter`, leaving delimiters that sit inside double
/// quotes alone.
///
/// A delimiter splits only when an even number of `"` follow it on the line.
/// Quotes are kept in the cell text and there is no escaped-quote form.
/// Empty cells, trailing ones included, are preserved.
pub(crate) fn split_quoted(line: &str, delimiter: char) -> Vec<String> {
    let mut quotes_after = line.bytes().filter(|b| *b == b'"').count();
    let mut cells = Vec::new();
    let mut start = 0usize;

    for (i, c) in line.char_indices() {
        if c == '"' {
            quotes_after -= 1;
        } else if c == delimiter && quotes_after % 2 == 0 {
            cells.push(line[start..i].to_string());
            start = i + c.len_utf8();
        }
    }
    cells.push(line[start..].to_string());
    cells
}

/// Blank, whitespace-only and `#` comment lines carry no record.
pub(crate) fn is_skippable(line: &str) -> bool {
    line.starts_with('#') || line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields() {
        assert_eq!(split_quoted("a,b,c", ','), vec!["a", "b", "c"]);
    }

    #[test]
    fn quoted_delimiter_is_protected() {
        assert_eq!(
            split_quoted(r#"Oak,"Quercus, sp.",1"#, ','),
            vec!["Oak", r#""Quercus, sp.""#, "1"]
        );
    }

    #[test]
    fn empty_cells_are_kept() {
        assert_eq!(split_quoted("a,,b,", ','), vec!["a", "", "b", ""]);
        assert_eq!(split_quoted("", ','), vec![""]);
    }

    #[test]
    fn unbalanced_quote_counts_from_the_right() {
        // one quote remains after the first comma, none after the second
        assert_eq!(split_quoted(r#"a,"b,c"#, ','), vec![r#"a,"b"#, "c"]);
    }

    #[test]
    fn other_delimiters() {
        assert_eq!(split_quoted("x\ty\t\"p\tq\"", '\t'), vec!["x", "y", "\"p\tq\""]);
        assert_eq!(split_quoted("1;2,5;3", ';'), vec!["1", "2,5", "3"]);
    }

    #[test]
    fn skippable_lines() {
        assert!(is_skippable(""));
        assert!(is_skippable("   \t"));
        assert!(is_skippable("# comment"));
        assert!(!is_skippable(" # not a comment"));
        assert!(!is_skippable("a,b"));
    }
}
