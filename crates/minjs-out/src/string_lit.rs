//! String literal minification: delimiter selection and escaping.

/// Escaping policy toggles, a subset of the output settings.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringPolicy {
    /// Neutralize `</` and `]]>` so output can sit inline in HTML/XML
    pub inline_safe: bool,
    /// Escape every character above 0x7F
    pub always_escape_non_ascii: bool,
}

/// Render `value` as a quoted JavaScript string literal.
///
/// The delimiter is whichever quote occurs less often in the value; ties
/// favor double quotes.
pub fn minify_string(value: &str, policy: StringPolicy) -> String {
    let singles = value.matches('\'').count();
    let doubles = value.matches('"').count();
    let delimiter = if singles < doubles { '\'' } else { '"' };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(delimiter);
    for c in value.chars() {
        match c {
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{000C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if policy.always_escape_non_ascii && (c as u32) > 0x7F => {
                if (c as u32) <= 0xFFFF {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                } else {
                    // encode astral characters as a surrogate pair
                    let v = c as u32 - 0x10000;
                    out.push_str(&format!(
                        "\\u{:04x}\\u{:04x}",
                        0xD800 + (v >> 10),
                        0xDC00 + (v & 0x3FF)
                    ));
                }
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);

    if policy.inline_safe {
        out = neutralize_inline(&out);
    }
    out
}

/// Break up `</` and `]]>` sequences that would terminate an enclosing
/// HTML script element or XML CDATA section.
fn neutralize_inline(text: &str) -> String {
    let mut out = text.replace("</", "<\\/");
    if out.contains("]]>") {
        out = out.replace("]]>", "]\\]>");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(value: &str) -> String {
        minify_string(value, StringPolicy::default())
    }

    #[test]
    fn test_delimiter_choice() {
        assert_eq!(plain("plain"), "\"plain\"");
        assert_eq!(plain("it's"), "\"it's\"");
        assert_eq!(plain("say \"hi\""), "'say \"hi\"'");
        // tie favors double quotes
        assert_eq!(plain("'\""), "\"'\\\"\"");
    }

    #[test]
    fn test_named_escapes() {
        assert_eq!(plain("a\tb\nc"), "\"a\\tb\\nc\"");
        assert_eq!(plain("back\\slash"), "\"back\\\\slash\"");
    }

    #[test]
    fn test_control_chars_hex() {
        assert_eq!(plain("\u{000B}"), "\"\\x0b\"");
        assert_eq!(plain("\u{0001}"), "\"\\x01\"");
    }

    #[test]
    fn test_line_separators_escaped() {
        assert_eq!(plain("a\u{2028}b"), "\"a\\u2028b\"");
        assert_eq!(plain("a\u{2029}b"), "\"a\\u2029b\"");
    }

    #[test]
    fn test_inline_safe() {
        let policy = StringPolicy {
            inline_safe: true,
            ..Default::default()
        };
        assert_eq!(minify_string("</script>", policy), "\"<\\/script>\"");
        assert_eq!(minify_string("a]]>b", policy), "\"a]\\]>b\"");
    }

    #[test]
    fn test_escape_non_ascii() {
        let policy = StringPolicy {
            always_escape_non_ascii: true,
            ..Default::default()
        };
        assert_eq!(minify_string("caf\u{00e9}", policy), "\"caf\\u00e9\"");
        assert_eq!(minify_string("\u{1F600}", policy), "\"\\ud83d\\ude00\"");
    }
}
