//! Numeric literal minification.
//!
//! Given a finite value, print the shortest of: plain decimal with leading
//! and trailing zeros stripped, scientific notation once at least three
//! zeros can be folded into the exponent, or hexadecimal when its form is
//! strictly shorter. Literals whose conversion was lossy never come here;
//! the printer re-emits their original lexeme.

/// Largest integer magnitude exactly representable in an f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Render `value` as its shortest JavaScript literal.
pub fn minify_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        };
    }
    if value == 0.0 {
        return if value.is_sign_negative() {
            "-0".to_owned()
        } else {
            "0".to_owned()
        };
    }

    let negative = value < 0.0;
    let magnitude = value.abs();
    let body = shortest_form(magnitude);
    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

fn shortest_form(value: f64) -> String {
    // Rust's shortest round-trip formatting, never exponent style
    let decimal = format!("{}", value);
    let mut best = strip_zeros(&decimal);

    if let Some(scientific) = scientific_form(&decimal) {
        if scientific.len() < best.len() {
            best = scientific;
        }
    }

    if value.fract() == 0.0 && value <= MAX_EXACT_INTEGER {
        let hex = format!("0x{:x}", value as u64);
        if hex.len() < best.len() {
            best = hex;
        }
    }

    best
}

/// `0.5` becomes `.5`; a bare integer is left alone.
fn strip_zeros(decimal: &str) -> String {
    if let Some(rest) = decimal.strip_prefix("0.") {
        format!(".{}", rest)
    } else {
        decimal.to_owned()
    }
}

/// Fold runs of zeros into an exponent: `120000` to `12e4`,
/// `0.00012` to `12e-5`. Only profitable with three or more zeros.
fn scientific_form(decimal: &str) -> Option<String> {
    if let Some(fraction) = decimal.strip_prefix("0.") {
        // leading zeros of a pure fraction move into a negative exponent
        let digits = fraction.trim_start_matches('0');
        if digits.is_empty() || digits.contains('.') {
            return None;
        }
        let leading = fraction.len() - digits.len();
        if leading < 2 {
            return None;
        }
        let exponent = -((leading + digits.len()) as i32);
        return Some(format!("{}e{}", digits, exponent));
    }

    if decimal.contains('.') {
        return None;
    }
    let digits = decimal.trim_end_matches('0');
    let zeros = decimal.len() - digits.len();
    if zeros < 3 || digits.is_empty() {
        return None;
    }
    Some(format!("{}e{}", digits, zeros))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specials() {
        assert_eq!(minify_number(f64::NAN), "NaN");
        assert_eq!(minify_number(f64::INFINITY), "Infinity");
        assert_eq!(minify_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(minify_number(0.0), "0");
        assert_eq!(minify_number(-0.0), "-0");
    }

    #[test]
    fn test_plain_integers() {
        assert_eq!(minify_number(50.0), "50");
        assert_eq!(minify_number(66.0), "66");
        assert_eq!(minify_number(-17.0), "-17");
    }

    #[test]
    fn test_fraction_strips_leading_zero() {
        assert_eq!(minify_number(0.5), ".5");
        assert_eq!(minify_number(-0.25), "-.25");
    }

    #[test]
    fn test_scientific_when_three_zeros() {
        assert_eq!(minify_number(50000.0), "5e4");
        assert_eq!(minify_number(120000.0), "12e4");
        // two zeros are not worth an exponent
        assert_eq!(minify_number(1200.0), "1200");
    }

    #[test]
    fn test_small_fractions() {
        assert_eq!(minify_number(0.00012), "12e-5");
        assert_eq!(minify_number(0.0001), "1e-4");
    }

    #[test]
    fn test_round_trip_shortest() {
        for &v in &[1.5, 123.456, 0.1, 33554432.0, 1e21, 7e-7] {
            let text = minify_number(v);
            let reparsed: f64 = text.parse().expect("minified form must parse");
            assert_eq!(reparsed, v, "{} -> {}", v, text);
        }
    }
}
