//! Phone number normalization
//!
//! Turns the free-form contact strings found in result sheets into dialable
//! E.164-style numbers for the Indian (+91) calling region.

/// Default country calling code applied to national numbers.
const COUNTRY_CODE: &str = "91";

/// Length of a national subscriber number in the +91 region.
const NATIONAL_DIGITS: usize = 10;

/// Normalize a free-form contact string into a dialable number.
///
/// Separators (spaces and dashes) are removed everywhere. A number that
/// already carries a `+` prefix is returned as-is after separator removal;
/// anything else gets the default country code prepended, stripping a bare
/// leading "91" first when the remainder is a full national number.
///
/// Total function: malformed input passes through best-effort stripping and
/// is never rejected.
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    if cleaned.starts_with('+') {
        return cleaned;
    }

    let national = match cleaned.strip_prefix(COUNTRY_CODE) {
        Some(rest) if rest.len() == NATIONAL_DIGITS => rest,
        _ => cleaned.as_str(),
    };

    format!("+{}{}", COUNTRY_CODE, national)
}
