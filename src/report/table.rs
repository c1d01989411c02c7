//! Fixed-width table rendering.
//!
//! Layout follows the classic dpkg-style listing:
//! - a header row
//! - an underline of `=` per column, columns joined by `-`
//! - one row per record, every column but the last padded to its width
//!
//! Values wider than their column are never cut; package names must stay
//! intact for copy and paste.

pub fn format_table(headers: &[&str], rows: &[Vec<String>], widths: &[usize]) -> String {
    let mut output = String::new();

    push_row(&mut output, headers.iter().copied(), widths);

    let underline: Vec<String> = widths
        .iter()
        .take(headers.len())
        .map(|w| "=".repeat(*w))
        .collect();
    output.push_str(&underline.join("-"));
    output.push('\n');

    for row in rows {
        push_row(&mut output, row.iter().map(String::as_str), widths);
    }

    output
}

fn push_row<'a>(output: &mut String, cells: impl ExactSizeIterator<Item = &'a str>, widths: &[usize]) {
    let last = cells.len().saturating_sub(1);
    let mut line = String::new();

    for (i, cell) in cells.enumerate() {
        if i > 0 {
            line.push(' ');
        }
        match widths.get(i) {
            Some(width) if i < last => line.push_str(&format!("{cell:<width$}")),
            _ => line.push_str(cell),
        }
    }

    output.push_str(line.trim_end());
    output.push('\n');
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
