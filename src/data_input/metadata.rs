// src/data_input/metadata.rs

/// Splits a metadata value like `"1.23 cm^2"` into number and unit.
///
/// Free-text log metadata is handled forgivingly: anything that does not
/// start with a parseable number yields `(NaN, "")` instead of an error.
pub fn extract_value_unit(s: &str) -> (f64, String) {
    let mut parts = s.split_whitespace();
    let value = parts
        .next()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(f64::NAN);
    let unit = if value.is_nan() {
        String::new()
    } else {
        parts.next().unwrap_or("").to_string()
    };
    (value, unit)
}
