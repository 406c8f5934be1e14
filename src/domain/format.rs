// Number formatting helpers for labels and titles

const SUFFIXES: [(f64, &str); 4] = [
    (1e12, "T"),
    (1e9, "B"),
    (1e6, "M"),
    (1e3, "K"),
];

/// Short form of an integer: `950`, `1.5K`, `2M`, `-3.2B`.
pub fn abbreviate(value: i64) -> String {
    let magnitude = (value as f64).abs();
    for (scale, suffix) in SUFFIXES {
        if magnitude >= scale {
            let scaled = format!("{:.1}", magnitude / scale);
            let scaled = scaled.strip_suffix(".0").unwrap_or(&scaled);
            let sign = if value < 0 { "-" } else { "" };
            return format!("{}{}{}", sign, scaled, suffix);
        }
    }
    value.to_string()
}

/// Prepends a currency symbol, keeping a leading minus sign in front.
pub fn currency_prefix(symbol: &str, formatted: &str) -> String {
    match formatted.strip_prefix('-') {
        Some(rest) => format!("-{}{}", symbol, rest),
        None => format!("{}{}", symbol, formatted),
    }
}

/// True when `name` contains `word` as a whole word, ignoring ASCII case.
/// Underscores count as word characters.
pub fn contains_word(name: &str, word: &str) -> bool {
    name.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|token| token.eq_ignore_ascii_case(word))
}
