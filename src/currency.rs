/// Renders money amounts inside generated text.
pub trait CurrencyFormatter {
    fn format(&self, amount: f64) -> String;
}

/// Rupee sign, comma thousands separators, no decimals (`₹125,000`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RupeeFormatter;

impl CurrencyFormatter for RupeeFormatter {
    fn format(&self, amount: f64) -> String {
        format!("₹{}", group_thousands(amount, 0))
    }
}

/// A symbol prefix with a configurable number of decimals, e.g. `$1,234.50`.
#[derive(Debug, Clone)]
pub struct SymbolFormatter {
    pub symbol: String,
    pub decimals: usize,
}

impl CurrencyFormatter for SymbolFormatter {
    fn format(&self, amount: f64) -> String {
        format!("{}{}", self.symbol, group_thousands(amount, self.decimals))
    }
}

/// Fixed-point rendering with commas between groups of three integer digits.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0, 0), "0");
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(1000.0, 0), "1,000");
        assert_eq!(group_thousands(420000.0, 0), "420,000");
        assert_eq!(group_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(group_thousands(999.6, 0), "1,000");
        assert_eq!(group_thousands(-12500.0, 0), "-12,500");
        assert_eq!(group_thousands(-0.2, 0), "0");
    }

    #[test]
    fn test_formatters() {
        assert_eq!(RupeeFormatter.format(70000.0), "₹70,000");

        let dollars = SymbolFormatter {
            symbol: "$".to_string(),
            decimals: 2,
        };
        assert_eq!(dollars.format(1234.5), "$1,234.50");
    }
}
