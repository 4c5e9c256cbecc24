use crate::key::BundleKey;
use std::fmt;

/// A language with an optional country and variant.
///
/// The language is stored lower-case and the country upper-case. A variant
/// is only ever present together with a country.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    country: Option<String>,
    variant: Option<String>,
}

impl Locale {
    pub fn new(language: &str) -> Self {
        Locale {
            language: language.to_ascii_lowercase(),
            country: None,
            variant: None,
        }
    }

    pub fn with_country(language: &str, country: &str) -> Self {
        Locale {
            country: Some(country.to_ascii_uppercase()),
            ..Locale::new(language)
        }
    }

    pub fn with_variant(language: &str, country: &str, variant: &str) -> Self {
        Locale {
            variant: Some(variant.to_string()),
            ..Locale::with_country(language, country)
        }
    }

    /// Combines whichever parts are present. Nothing is built without a
    /// language, and a variant is dropped unless a country is present too.
    pub fn from_parts(
        language: Option<&str>,
        country: Option<&str>,
        variant: Option<&str>,
    ) -> Option<Self> {
        match (language, country, variant) {
            (Some(language), Some(country), Some(variant)) => {
                Some(Locale::with_variant(language, country, variant))
            }
            (Some(language), Some(country), None) => Some(Locale::with_country(language, country)),
            (Some(language), None, _) => Some(Locale::new(language)),
            (None, _, _) => None,
        }
    }

    /// Parses `language[-country[-variant]]`, accepting `_` as well as `-`.
    pub fn parse_tag(tag: &str) -> Option<Self> {
        let [language, country, variant] = split_locale_tokens(tag);
        Locale::from_parts(language, country, variant)
    }

    /// Picks the preferred locale from an `Accept-Language` header value.
    ///
    /// Entries are ordered by quality; ties keep header order. Wildcards,
    /// entries with `q=0` and qualities outside `(0, 1]` are ignored. Only the language and a two-letter or
    /// three-digit region are kept.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut best: Option<(f32, Locale)> = None;

        for entry in header.split(',') {
            let mut parts = entry.split(';');
            let tag = parts.next().unwrap_or_default().trim();
            if tag.is_empty() || tag == "*" {
                continue;
            }

            let quality = parts
                .filter_map(|param| param.trim().strip_prefix("q="))
                .next()
                .map_or(Some(1.0), |q| q.trim().parse::<f32>().ok());
            let Some(quality) = quality.filter(|q| *q > 0.0 && *q <= 1.0) else {
                continue;
            };

            let mut subtags = tag.split(['-', '_']);
            let language = subtags.next().unwrap_or_default();
            if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
                continue;
            }
            let region = subtags.find(|s| {
                (s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()))
                    || (s.len() == 3 && s.chars().all(|c| c.is_ascii_digit()))
            });
            let locale = match region {
                Some(region) => Locale::with_country(language, region),
                None => Locale::new(language),
            };

            if best.as_ref().is_none_or(|(q, _)| quality > *q) {
                best = Some((quality, locale));
            }
        }

        best.map(|(_, locale)| locale)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Resource file suffixes from most to least specific, ending with the
    /// base bundle: `_fr_CA_x`, `_fr_CA`, `_fr`, ``.
    pub fn candidate_suffixes(&self) -> Vec<String> {
        let mut suffixes = Vec::with_capacity(4);
        let language = format!("_{}", self.language);
        if let Some(country) = &self.country {
            let country = format!("{language}_{country}");
            if let Some(variant) = &self.variant {
                suffixes.push(format!("{country}_{variant}"));
            }
            suffixes.push(country);
        }
        suffixes.push(language);
        suffixes.push(String::new());
        suffixes
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(country) = &self.country {
            write!(f, "_{country}")?;
            if let Some(variant) = &self.variant {
                write!(f, "_{variant}")?;
            }
        }
        Ok(())
    }
}

/// Splits a locale segment on `-` or `_` into up to three tokens, filled
/// left to right. Filling stops at the first empty token, so a later token
/// is never set while an earlier one is missing.
pub(crate) fn split_locale_tokens(segment: &str) -> [Option<&str>; 3] {
    let mut tokens = [None; 3];
    for (slot, token) in tokens.iter_mut().zip(segment.split(['-', '_'])) {
        if token.is_empty() {
            break;
        }
        *slot = Some(token);
    }
    tokens
}

/// Chooses the locale a lookup runs with: the one carried by the key when it
/// has a language, the request's default otherwise.
pub struct LocaleResolution;

impl LocaleResolution {
    pub fn resolve(key: &BundleKey, request_default: &Locale) -> Locale {
        key.locale().unwrap_or_else(|| request_default.clone())
    }
}
