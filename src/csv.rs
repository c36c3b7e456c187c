//! Minimal CSV handling for roster files.
//!
//! Reading is deliberately simpler than RFC 4180: a `"` only toggles the
//! "inside quotes" flag and is never kept, so a field cannot carry a literal
//! double quote. Writing always wraps every field in quotes, which the reader
//! strips again.

/// Splits raw file text into rows of trimmed fields, one row per line.
///
/// Surrounding blank lines of the whole text are dropped first. Blank lines in
/// the middle are kept and come back as a single empty field.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    text.trim().split('\n').map(tokenize_line).collect()
}

fn tokenize_line(line: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                out.push(buf.trim().to_string());
                buf.clear();
            }
            _ => buf.push(ch),
        }
    }
    // An unbalanced quote just runs to the end of the line.
    out.push(buf.trim().to_string());
    out
}

pub fn quote_field(s: &str) -> String {
    format!("\"{}\"", s)
}

pub fn quoted_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| quote_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders a header plus rows with every field quoted, rows joined by `\n`
/// and no trailing newline.
pub fn write_quoted<S: AsRef<str>>(header: &[&str], rows: &[Vec<S>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(quoted_line(header));
    for row in rows {
        lines.push(quoted_line(row));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_comma_stays_in_field() {
        let rows = tokenize("a,\"b,c\",d");
        assert_eq!(rows, vec![vec!["a", "b,c", "d"]]);
    }

    #[test]
    fn fields_are_trimmed_and_quotes_dropped() {
        let rows = tokenize("  Juan , \" Pérez \" ,100  ");
        assert_eq!(rows, vec![vec!["Juan", "Pérez", "100"]]);
    }

    #[test]
    fn inner_blank_lines_are_kept_outer_ones_dropped() {
        let rows = tokenize("\n\nh1,h2\n\nx,y\n\n");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec![String::new()]);
        assert_eq!(rows[2], vec!["x", "y"]);
    }

    #[test]
    fn empty_text_is_one_empty_row() {
        assert_eq!(tokenize(""), vec![vec![String::new()]]);
    }

    #[test]
    fn unbalanced_quote_swallows_rest_of_line() {
        let rows = tokenize("a,\"b,c\nd,e");
        assert_eq!(rows[0], vec!["a", "b,c"]);
        assert_eq!(rows[1], vec!["d", "e"]);
    }

    #[test]
    fn crlf_line_endings_do_not_leak_into_fields() {
        let rows = tokenize("a,b\r\nc,d\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn write_quoted_quotes_everything() {
        let out = write_quoted(&["ID", "Nombre"], &[vec!["1", "Ana, María"]]);
        assert_eq!(out, "\"ID\",\"Nombre\"\n\"1\",\"Ana, María\"");
        assert_eq!(
            tokenize(&out),
            vec![vec!["ID", "Nombre"], vec!["1", "Ana, María"]]
        );
    }
}
