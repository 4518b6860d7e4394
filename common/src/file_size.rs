/// Units used by the formatter, base 1024.
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count as a human readable size, e.g. `"1.5 MB"`.
///
/// The unit is the largest one whose magnitude fits (capped at TB). The
/// value is rounded to 0, 1 or 2 decimals for sizes of at least 100, at
/// least 10, and below 10 respectively. Trailing zeros are not printed,
/// so 1024 bytes is `"1 KB"`.
pub fn format_file_size(bytes: Option<u64>) -> String {
    let bytes = match bytes {
        None | Some(0) => return "0 B".to_string(),
        Some(b) => b,
    };

    let mut exponent = 0usize;
    while exponent < UNITS.len() - 1 && bytes >= 1024u64.pow(exponent as u32 + 1) {
        exponent += 1;
    }

    let size = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = if size >= 100.0 {
        size.round()
    } else if size >= 10.0 {
        (size * 10.0).round() / 10.0
    } else {
        (size * 100.0).round() / 100.0
    };

    format!("{} {}", rounded, UNITS[exponent])
}
