const DIAL_CODES: [(&str, &str); 26] = [
    ("FR", "33"),
    ("BE", "32"),
    ("CH", "41"),
    ("LU", "352"),
    ("MC", "377"),
    ("CA", "1"),
    ("GB", "44"),
    ("IE", "353"),
    ("US", "1"),
    ("ES", "34"),
    ("PT", "351"),
    ("IT", "39"),
    ("DE", "49"),
    ("NL", "31"),
    ("AT", "43"),
    ("PL", "48"),
    ("RO", "40"),
    ("BR", "55"),
    ("AR", "54"),
    ("MX", "52"),
    ("CO", "57"),
    ("MA", "212"),
    ("DZ", "213"),
    ("TN", "216"),
    ("SN", "221"),
    ("CI", "225"),
];

/// Returns the international dialing prefix of an ISO country code.
pub fn dial_code(country: &str) -> Option<&'static str> {
    DIAL_CODES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(country))
        .map(|(_, dial)| *dial)
}

/// Rewrites typed input in international `+<digits>` form.
///
/// Numbers already starting with `+` or `00` keep their own prefix; national
/// numbers lose their trunk `0` and get the default country's prefix.
/// Formatting characters are dropped. Whatever comes out is still checked by
/// the field rule.
pub fn to_international(input: &str, default_country: Option<&str>) -> String {
    let compact: String = input
        .chars()
        .filter(|character| !matches!(character, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    if compact.is_empty() || compact.starts_with('+') {
        return compact;
    }
    if let Some(rest) = compact.strip_prefix("00") {
        return format!("+{rest}");
    }

    match default_country.and_then(dial_code) {
        Some(dial) => format!("+{dial}{}", compact.trim_start_matches('0')),
        None => compact,
    }
}

#[cfg(test)]
mod tests {
    use super::{dial_code, to_international};

    #[test]
    fn national_numbers_get_the_default_prefix() {
        assert_eq!(to_international("06 12 34 56 78", Some("FR")), "+33612345678");
        assert_eq!(to_international("612-345-678", Some("es")), "+34612345678");
    }

    #[test]
    fn international_numbers_keep_their_prefix() {
        assert_eq!(to_international("+44 7700 900123", Some("FR")), "+447700900123");
        assert_eq!(to_international("0034612345678", Some("FR")), "+34612345678");
    }

    #[test]
    fn unknown_country_leaves_digits_alone() {
        assert_eq!(dial_code("ZZ"), None);
        assert_eq!(to_international("0612", Some("ZZ")), "0612");
        assert_eq!(to_international("0612", None), "0612");
        assert_eq!(to_international("  ", Some("FR")), "");
    }
}
