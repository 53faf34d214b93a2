//! Display formatting for prices, percentages and large counts.
//!
//! Every function accepts either a plain `f64` or an `Option<f64>` and never
//! panics: missing, `NaN` and infinite inputs render as a placeholder.

/// Placeholder for a missing currency value.
pub const CURRENCY_PLACEHOLDER: &str = "$--";

/// Placeholder for any other missing value.
pub const PLACEHOLDER: &str = "--";

/// Magnitude suffixes, largest first.
const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

fn finite(value: impl Into<Option<f64>>) -> Option<f64> {
    value.into().filter(|v| v.is_finite())
}

/// Round half away from zero to `decimals` places.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Insert `,` every three digits of a string of decimal digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `|value|` as `$1,234.50`, without a sign.
fn unsigned_currency(abs: f64) -> (String, bool) {
    let cents = (abs * 100.0).round();
    if !cents.is_finite() {
        return (format!("${}.00", group_thousands(&format!("{abs:.0}"))), false);
    }
    let whole = format!("{:.0}", (cents / 100.0).trunc());
    let frac = (cents % 100.0) as u8;
    (format!("${}.{frac:02}", group_thousands(&whole)), cents == 0.0)
}

/// USD with two decimals: `1234.5` → `"$1,234.50"`, `-3.2` → `"-$3.20"`.
pub fn format_currency(value: impl Into<Option<f64>>) -> String {
    let Some(v) = finite(value) else {
        return CURRENCY_PLACEHOLDER.to_string();
    };
    let (body, is_zero) = unsigned_currency(v.abs());
    if v < 0.0 && !is_zero {
        format!("-{body}")
    } else {
        body
    }
}

/// USD with an explicit sign, for profit/loss cells: `"+$12.00"`, `"-$3.50"`.
/// Values that round to zero render as `"+$0.00"`.
pub fn format_signed_currency(value: impl Into<Option<f64>>) -> String {
    let Some(v) = finite(value) else {
        return CURRENCY_PLACEHOLDER.to_string();
    };
    let (body, is_zero) = unsigned_currency(v.abs());
    if v < 0.0 && !is_zero {
        format!("-{body}")
    } else {
        format!("+{body}")
    }
}

/// One decimal with an explicit sign: `7.5` → `"+7.5%"`, `-3.2` → `"-3.2%"`.
///
/// Rounds half away from zero; anything that rounds to zero is `"+0.0%"`,
/// so `-0.04` never shows up as `"-0.0%"`.
pub fn format_percent(value: impl Into<Option<f64>>) -> String {
    let Some(v) = finite(value) else {
        return PLACEHOLDER.to_string();
    };
    let rounded = round_to(v, 1);
    if rounded == 0.0 {
        "+0.0%".to_string()
    } else if rounded > 0.0 {
        format!("+{rounded:.1}%")
    } else {
        format!("{rounded:.1}%")
    }
}

/// Abbreviate with `K`/`M`/`B`/`T` and one decimal: `1500` → `"1.5K"`.
///
/// Below 1,000 the value is shown with up to two decimals and trailing zeros
/// trimmed (`999` → `"999"`). If rounding reaches the next threshold the
/// larger suffix is used (`999_960` → `"1.0M"`).
pub fn format_large_number(value: impl Into<Option<f64>>) -> String {
    let Some(v) = finite(value) else {
        return PLACEHOLDER.to_string();
    };
    let abs = v.abs();
    let sign = if v < 0.0 { "-" } else { "" };

    for (i, (threshold, suffix)) in SUFFIXES.iter().enumerate() {
        if abs < *threshold {
            continue;
        }
        let scaled = round_to(abs / threshold, 1);
        if scaled >= 1000.0 && i > 0 {
            let (bigger, bigger_suffix) = SUFFIXES[i - 1];
            return format!("{sign}{:.1}{bigger_suffix}", round_to(abs / bigger, 1));
        }
        return format!("{sign}{scaled:.1}{suffix}");
    }

    let rounded = round_to(abs, 2);
    if rounded >= 1000.0 {
        return format!("{sign}1.0K");
    }
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{sign}{text}")
}

