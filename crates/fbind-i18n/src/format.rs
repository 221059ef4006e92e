//! Per-locale presentation conventions used by text datatypes.

/// Number, date and boolean conventions for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    /// Separator between integer and fractional digits.
    pub decimal_separator: char,
    /// Thousands separator accepted on input; never emitted on output.
    pub grouping_separator: Option<char>,
    /// `chrono` format string for dates.
    pub date_pattern: String,
    /// Word shown for `true`.
    pub true_word: String,
    /// Word shown for `false`.
    pub false_word: String,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: Some(','),
            date_pattern: "%Y-%m-%d".to_owned(),
            true_word: "true".to_owned(),
            false_word: "false".to_owned(),
        }
    }
}

impl FormatSpec {
    /// Derive conventions from a locale tag such as `"de-AT"` or `"en-US"`.
    ///
    /// Unknown languages get the neutral defaults (ISO dates, `.` decimals).
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let mut parts = locale.split(['-', '_']);
        let language = parts.next().unwrap_or_default().to_ascii_lowercase();
        let region = parts.next().unwrap_or_default().to_ascii_uppercase();

        match language.as_str() {
            "en" if region == "US" => Self {
                date_pattern: "%m/%d/%Y".to_owned(),
                ..Self::default()
            },
            "de" => Self {
                decimal_separator: ',',
                grouping_separator: Some('.'),
                date_pattern: "%d.%m.%Y".to_owned(),
                true_word: "ja".to_owned(),
                false_word: "nein".to_owned(),
            },
            "ru" => Self {
                decimal_separator: ',',
                grouping_separator: Some(' '),
                date_pattern: "%d.%m.%Y".to_owned(),
                ..Self::default()
            },
            "fr" | "es" | "it" | "pt" => Self {
                decimal_separator: ',',
                grouping_separator: Some(' '),
                date_pattern: "%d/%m/%Y".to_owned(),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }
}
