pub mod json;
pub mod table;

use crate::config::Config;

/// Prints rows as a fixed-width table, or as JSON with `--json`.
pub fn print_table(config: &Config, headers: &[&str], rows: &[Vec<String>], widths: &[usize]) {
    if config.json_output {
        println!("{}", json::render(headers, rows));
    } else {
        print!("{}", table::format_table(headers, rows, widths));
    }
}

/// Centered section banner, e.g. `===== README =====`, 72 columns wide.
pub fn banner(title: &str) -> String {
    format!("{:=^72}", format!(" {title} "))
}

/// 1234567 -> "1,234,567"
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
