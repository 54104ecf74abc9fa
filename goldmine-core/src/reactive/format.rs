//! Value Formatting
//!
//! Turns the numbers held by observable values into display text. Each value
//! carries a [`Formatter`]; the default one floors to a single decimal and
//! groups thousands with commas.

use std::fmt;
use std::rc::Rc;

/// Text shown for a time span that cannot be represented.
pub const INVALID_TIME_SPAN: &str = "??:??:??";

/// Text shown when a non-finite number reaches the default formatter.
pub const INVALID_NUMBER: &str = "Invalid number";

/// How the day segment of a time span is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeSpanStyle {
    /// Always `D days, HH:MM:SS`.
    #[default]
    Full,
    /// `HH:MM:SS`, with `D days, ` prepended only when at least one day has
    /// passed.
    Compact,
}

/// Formatting strategy for an observable value.
#[derive(Clone, Default)]
pub enum Formatter {
    /// Floor to one decimal and comma-group the integer digits.
    #[default]
    Commify,
    /// Treat the value as milliseconds and render a duration.
    TimeSpan(TimeSpanStyle),
    /// Caller-supplied formatting.
    Custom(Rc<dyn Fn(f64) -> String>),
}

impl Formatter {
    /// Wrap a closure as a custom formatter.
    pub fn custom<F>(format: F) -> Self
    where
        F: Fn(f64) -> String + 'static,
    {
        Self::Custom(Rc::new(format))
    }

    /// Format a number with this strategy.
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Commify => commify(value),
            Self::TimeSpan(style) => time_span(value, *style),
            Self::Custom(format) => format(value),
        }
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commify => f.write_str("Commify"),
            Self::TimeSpan(style) => f.debug_tuple("TimeSpan").field(style).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Floor a number to one decimal and add thousands separators.
///
/// `1234567.89` becomes `"1,234,567.8"`; whole numbers carry no decimal.
pub fn commify(value: f64) -> String {
    if !value.is_finite() {
        return INVALID_NUMBER.to_string();
    }

    // Past ~1.8e307 the scaled value overflows; such numbers are integral.
    let scaled = value * 10.0;
    let truncated = if scaled.is_finite() {
        scaled.floor() / 10.0
    } else {
        value
    };
    let raw = if truncated.fract() == 0.0 {
        format!("{:.0}", truncated)
    } else {
        format!("{:.1}", truncated)
    };
    group_thousands(&raw)
}

fn group_thousands(raw: &str) -> String {
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };
    let (digits, decimals) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(raw.len() + digits.len() / 3);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(decimals) = decimals {
        out.push('.');
        out.push_str(decimals);
    }
    out
}

/// Render a span of milliseconds as `D days, HH:MM:SS`.
///
/// Negative and non-finite input yields [`INVALID_TIME_SPAN`]. Partial
/// seconds are dropped.
pub fn time_span(ms: f64, style: TimeSpanStyle) -> String {
    if !ms.is_finite() || ms < 0.0 {
        return INVALID_TIME_SPAN.to_string();
    }

    let total_seconds = (ms / 1000.0).floor() as u64;
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = (total_seconds / 3600) % 24;
    let days = total_seconds / 86_400;

    match style {
        TimeSpanStyle::Compact if days == 0 => {
            format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
        }
        _ => format!("{} days, {:02}:{:02}:{:02}", days, hours, minutes, seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commify_small_numbers() {
        assert_eq!(commify(0.0), "0");
        assert_eq!(commify(7.0), "7");
        assert_eq!(commify(999.0), "999");
    }

    #[test]
    fn commify_groups_thousands() {
        assert_eq!(commify(1000.0), "1,000");
        assert_eq!(commify(1_234_567.0), "1,234,567");
        assert_eq!(commify(100_000.0), "100,000");
    }

    #[test]
    fn commify_truncates_to_one_decimal() {
        assert_eq!(commify(1.99), "1.9");
        assert_eq!(commify(0.1 + 0.2), "0.3");
        assert_eq!(commify(1234.56), "1,234.5");
        assert_eq!(commify(12.04), "12");
    }

    #[test]
    fn commify_rejects_non_finite() {
        assert_eq!(commify(f64::NAN), INVALID_NUMBER);
        assert_eq!(commify(f64::INFINITY), INVALID_NUMBER);
    }

    #[test]
    fn commify_handles_largest_values() {
        let max = commify(f64::MAX);
        assert!(max.starts_with("179,769,313"));
        assert!(!max.contains('.'));
        assert!(commify(1e308).starts_with("100,000"));
        assert!(!commify(1e308).contains("inf"));
    }

    #[test]
    fn commify_keeps_sign() {
        assert_eq!(commify(-1234.5), "-1,234.5");
    }

    #[test]
    fn time_span_full_style() {
        assert_eq!(time_span(0.0, TimeSpanStyle::Full), "0 days, 00:00:00");
        assert_eq!(
            time_span(5.0 * 3600.0 * 1000.0 + 1000.0, TimeSpanStyle::Full),
            "0 days, 05:00:01"
        );
    }

    #[test]
    fn time_span_compact_style_omits_zero_days() {
        assert_eq!(time_span(0.0, TimeSpanStyle::Compact), "00:00:00");
        assert_eq!(
            time_span(5.0 * 3600.0 * 1000.0 + 1000.0, TimeSpanStyle::Compact),
            "05:00:01"
        );
        assert_eq!(
            time_span(26.0 * 3600.0 * 1000.0 + 61_500.0, TimeSpanStyle::Compact),
            "1 days, 02:01:01"
        );
    }

    #[test]
    fn time_span_counts_days_past_a_month() {
        let forty_days = 40.0 * 86_400.0 * 1000.0;
        assert_eq!(time_span(forty_days, TimeSpanStyle::Full), "40 days, 00:00:00");
    }

    #[test]
    fn time_span_rejects_invalid_input() {
        assert_eq!(time_span(-1.0, TimeSpanStyle::Full), INVALID_TIME_SPAN);
        assert_eq!(time_span(f64::NAN, TimeSpanStyle::Full), INVALID_TIME_SPAN);
        assert_eq!(time_span(f64::INFINITY, TimeSpanStyle::Compact), INVALID_TIME_SPAN);
    }

    #[test]
    fn formatter_dispatch() {
        assert_eq!(Formatter::default().format(1500.0), "1,500");
        assert_eq!(
            Formatter::TimeSpan(TimeSpanStyle::Full).format(61_000.0),
            "0 days, 00:01:01"
        );
        let percent = Formatter::custom(|v| format!("{:.0}%", v * 100.0));
        assert_eq!(percent.format(0.25), "25%");
    }
}
