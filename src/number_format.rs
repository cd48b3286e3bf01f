/// How numbers are turned into text, for the display and for the
/// description tokens. Passed around explicitly; there is no global
/// formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub max_fraction_digits: usize,
    pub decimal_separator: char,
    pub grouping_separator: Option<char>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            max_fraction_digits: 6,
            decimal_separator: '.',
            grouping_separator: None,
        }
    }
}

impl NumberFormat {
    /// Display format for a BCP-47 style tag (`en`, `is-IS`, `fr_FR`).
    /// Unsupported languages get the English layout.
    pub fn for_locale(tag: &str) -> Self {
        let lower = tag.trim().to_ascii_lowercase().replace('_', "-");
        let lang = lower.split('-').next().unwrap_or("en");
        let (decimal_separator, grouping) = match lang {
            "is" => (',', '.'),
            // narrow no-break space
            "fr" => (',', '\u{202f}'),
            _ => ('.', ','),
        };
        Self {
            max_fraction_digits: 6,
            decimal_separator,
            grouping_separator: Some(grouping),
        }
    }

    pub fn without_grouping(mut self) -> Self {
        self.grouping_separator = None;
        self
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞" } else { "-∞" }.to_string();
        }

        let fixed = format!("{:.*}", self.max_fraction_digits, value.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((int_part, frac)) => (int_part, frac.trim_end_matches('0')),
            None => (fixed.as_str(), ""),
        };
        // Values that round to zero print without a sign.
        let negative =
            value < 0.0 && (int_part.bytes().any(|b| b != b'0') || !frac_part.is_empty());

        let mut out = String::with_capacity(fixed.len() + 4);
        if negative {
            out.push('-');
        }
        out.push_str(&self.group(int_part));
        if !frac_part.is_empty() {
            out.push(self.decimal_separator);
            out.push_str(frac_part);
        }
        out
    }

    /// Reads text written in this format back into a number.
    pub fn parse(&self, text: &str) -> Option<f64> {
        let mut normalized = String::with_capacity(text.len());
        for ch in text.trim().chars() {
            if Some(ch) == self.grouping_separator {
                continue;
            }
            if ch == self.decimal_separator {
                normalized.push('.');
            } else {
                normalized.push(ch);
            }
        }
        normalized.parse::<f64>().ok()
    }

    fn group(&self, digits: &str) -> String {
        let Some(sep) = self.grouping_separator else {
            return digits.to_string();
        };
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (len - idx) % 3 == 0 {
                out.push(sep);
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_compact() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.format(7.0), "7");
        assert_eq!(fmt.format(0.5), "0.5");
        assert_eq!(fmt.format(-3.25), "-3.25");
        assert_eq!(fmt.format(1234567.0), "1234567");
        assert_eq!(fmt.format(std::f64::consts::PI), "3.141593");
    }

    #[test]
    fn tiny_negative_values_lose_their_sign() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.format(-0.0), "0");
        assert_eq!(fmt.format(-0.0000001), "0");
    }

    #[test]
    fn non_finite_values_have_symbols() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.format(f64::INFINITY), "∞");
        assert_eq!(fmt.format(f64::NEG_INFINITY), "-∞");
        assert_eq!(fmt.format(f64::NAN), "NaN");
    }

    #[test]
    fn locale_formats_group_thousands() {
        assert_eq!(NumberFormat::for_locale("en-US").format(1234567.5), "1,234,567.5");
        assert_eq!(NumberFormat::for_locale("is").format(1234.5), "1.234,5");
        assert_eq!(NumberFormat::for_locale("fr_FR").format(-1234.5), "-1\u{202f}234,5");
        assert_eq!(NumberFormat::for_locale("xx").format(999.0), "999");
        assert_eq!(NumberFormat::for_locale("en").format(100000.0), "100,000");
    }

    #[test]
    fn parse_reads_back_formatted_text() {
        let is = NumberFormat::for_locale("is");
        assert_eq!(is.parse("1.234,5"), Some(1234.5));
        let en = NumberFormat::for_locale("en");
        assert_eq!(en.parse(" 12,000.25 "), Some(12000.25));
        assert_eq!(en.parse("abc"), None);
    }

    #[test]
    fn fraction_digits_are_configurable() {
        let fmt = NumberFormat {
            max_fraction_digits: 2,
            ..NumberFormat::default()
        };
        assert_eq!(fmt.format(2.0 / 3.0), "0.67");
        assert_eq!(fmt.format(1.999), "2");
    }
}
