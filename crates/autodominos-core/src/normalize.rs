//! Text normalization shared by address lookups, expiry parsing, and report
//! file naming.
//!
//! Only vowel diacritics are stripped. `ñ`/`Ñ` is a distinct letter in the
//! site's city names and is kept as-is.

/// Replaces accented vowels with their plain ASCII counterpart.
///
/// `"Cádiz"` becomes `"Cadiz"`, `"PINGÜINO"` becomes `"PINGUINO"`.
#[must_use]
pub fn remove_accents(input: &str) -> String {
    input.chars().map(strip_diacritic).collect()
}

fn strip_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Á' | 'À' | 'Â' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        other => other,
    }
}

/// Lookup key for a province: accents stripped, lower-cased.
#[must_use]
pub fn province_key(province: &str) -> String {
    remove_accents(province.trim()).to_lowercase()
}

/// Lookup key for a city: accents stripped, upper-cased.
#[must_use]
pub fn city_key(city: &str) -> String {
    remove_accents(city.trim()).to_uppercase()
}

/// Street names are sent to the store search in the same form as city keys.
#[must_use]
pub fn street_key(street: &str) -> String {
    city_key(street)
}

/// File-system friendly alias for a store name.
///
/// Accents are stripped, the result is lower-cased, and every run of
/// non-alphanumeric characters collapses into a single `-`.
#[must_use]
pub fn store_alias(name: &str) -> String {
    remove_accents(name)
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
