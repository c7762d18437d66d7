//! Fixed-width table rendering for terminal output.

use std::fmt::Write as _;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let separator = widths
        .iter()
        .map(|w| "-".repeat((*w).max(3)))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        if idx >= widths.len() {
            break;
        }
        // Embedded newlines would break the row grid; show them as spaces.
        let mut cell = value.replace(['\r', '\n'], " ");
        let padding = widths[idx].saturating_sub(cell.chars().count());
        cell.push_str(&" ".repeat(padding));
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let headers = vec!["id".to_string(), "name".to_string()];
        let rows = vec![
            vec!["1".to_string(), "Splendor Plus".to_string()],
            vec!["2".to_string(), "Alto".to_string()],
        ];
        let rendered = render_table(&headers, &rows);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "id  name");
        assert!(lines[1].starts_with("---"));
        assert_eq!(lines[2], "1   Splendor Plus");
        assert_eq!(lines[3], "2   Alto");
    }

    #[test]
    fn embedded_newlines_stay_on_one_line() {
        let headers = vec!["address".to_string()];
        let rows = vec![vec!["line one\nline two".to_string()]];
        let rendered = render_table(&headers, &rows);
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn extra_cells_beyond_headers_are_ignored() {
        let headers = vec!["a".to_string()];
        let rows = vec![vec!["1".to_string(), "stray".to_string()]];
        let rendered = render_table(&headers, &rows);
        assert!(!rendered.contains("stray"));
    }
}
