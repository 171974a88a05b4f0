//! Number formatting shared by the CLI reports and the TUI

/// Format number with thousand separators (e.g., 1234567 -> "1,234,567")
pub fn format_number(n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Rupee amount rounded to whole units (e.g., 6000.4 -> "₹6,000")
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    if rounded <= 0.0 {
        return "₹0".to_string();
    }
    format!("₹{}", format_number(rounded as u64))
}

/// Compact form for narrow cells (e.g., 1_250_000 -> "1.2M")
pub fn format_compact(n: f64) -> String {
    if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        format!("{:.0}", n)
    }
}

/// Cut to `max` characters, marking the cut with '…'
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
