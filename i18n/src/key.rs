use crate::errors::I18nError;
use crate::locale::{Locale, split_locale_tokens};
use std::fmt;
use std::str::FromStr;

/// Identity of a resource bundle request:
/// `plugin/version/bundle[/language[-country[-variant]]]`.
///
/// Equality and hashing cover all six fields. An absent locale field is
/// distinct from an empty one, though the parser never produces the latter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BundleKey {
    plugin_name: String,
    plugin_version: String,
    bundle_name: String,
    language: Option<String>,
    country: Option<String>,
    variant: Option<String>,
}

impl BundleKey {
    pub fn new(plugin_name: &str, plugin_version: &str, bundle_name: &str) -> Self {
        BundleKey {
            plugin_name: plugin_name.to_string(),
            plugin_version: plugin_version.to_string(),
            bundle_name: bundle_name.to_string(),
            language: None,
            country: None,
            variant: None,
        }
    }

    /// Attaches locale fields from a `fr-CA` / `ja_JP_JP` style segment.
    pub fn with_locale_segment(mut self, segment: &str) -> Self {
        let [language, country, variant] = split_locale_tokens(segment);
        self.language = language.map(str::to_string);
        self.country = country.map(str::to_string);
        self.variant = variant.map(str::to_string);
        self
    }

    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    pub fn plugin_version(&self) -> &str {
        &self.plugin_version
    }

    pub fn bundle_name(&self) -> &str {
        &self.bundle_name
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// The locale named by the key, if it names a language.
    pub fn locale(&self) -> Option<Locale> {
        Locale::from_parts(self.language(), self.country(), self.variant())
    }

    /// Versions made only of digits, dots and slashes are published
    /// releases whose bundles never change. Snapshots and other builds
    /// carry letters.
    pub fn is_release_version(&self) -> bool {
        self.plugin_version.len() >= 3
            && self
                .plugin_version
                .chars()
                .all(|c| c.is_ascii_digit() || c == '.' || c == '/')
    }
}

impl FromStr for BundleKey {
    type Err = I18nError;

    /// Empty segments from leading, trailing or doubled slashes are ignored.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [plugin, version, bundle] => Ok(BundleKey::new(plugin, version, bundle)),
            [plugin, version, bundle, locale] => {
                Ok(BundleKey::new(plugin, version, bundle).with_locale_segment(locale))
            }
            _ => Err(I18nError::MalformedIdentity),
        }
    }
}

impl fmt::Display for BundleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.plugin_name, self.plugin_version, self.bundle_name
        )?;
        if let Some(locale) = self.locale() {
            write!(f, "/{locale}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_four_segments_with_locale() {
        let key: BundleKey = "myplugin/1.0/messages/fr-CA".parse().unwrap();
        assert_eq!(key.plugin_name(), "myplugin");
        assert_eq!(key.plugin_version(), "1.0");
        assert_eq!(key.bundle_name(), "messages");
        assert_eq!(key.language(), Some("fr"));
        assert_eq!(key.country(), Some("CA"));
        assert_eq!(key.variant(), None);
    }

    #[test]
    fn test_three_segments_have_no_locale() {
        for path in ["myplugin/1.0/messages", "/myplugin//1.0/messages/", "//a/b/c//"] {
            let key: BundleKey = path.parse().unwrap();
            assert_eq!(key.language(), None, "{path}");
            assert_eq!(key.country(), None, "{path}");
            assert_eq!(key.variant(), None, "{path}");
            assert_eq!(key.locale(), None, "{path}");
        }
    }

    #[test]
    fn test_locale_fields_fill_left_to_right() {
        let key: BundleKey = "p/1/b/ja_JP_JP".parse().unwrap();
        assert_eq!(
            (key.language(), key.country(), key.variant()),
            (Some("ja"), Some("JP"), Some("JP"))
        );

        for path in ["p/1/b/-CA", "p/1/b/_-x", "p/1/b/--"] {
            let key: BundleKey = path.parse().unwrap();
            assert_eq!(key.language(), None, "{path}");
            assert_eq!(key.country(), None, "{path}");
            assert_eq!(key.variant(), None, "{path}");
        }

        let key: BundleKey = "p/1/b/de--x".parse().unwrap();
        assert_eq!((key.language(), key.country()), (Some("de"), None));
        assert_eq!(key.variant(), None);
    }

    #[test]
    fn test_malformed_segment_counts() {
        for path in ["", "/", "a", "a/b", "//a//b//", "a/b/c/d/e", "a/b/c/d/e/f"] {
            assert!(
                matches!(path.parse::<BundleKey>(), Err(I18nError::MalformedIdentity)),
                "{path}"
            );
        }
    }

    #[test]
    fn test_structural_equality() {
        let a: BundleKey = "p/1.0/messages/fr-CA".parse().unwrap();
        let b: BundleKey = "/p/1.0/messages/fr_CA/".parse().unwrap();
        let c: BundleKey = "p/1.0/messages/fr".parse().unwrap();
        let d: BundleKey = "p/1.0/messages".parse().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(c, d);

        let set: HashSet<_> = [a, b, c, d].into_iter().collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_display() {
        let key: BundleKey = "p/1.0/jenkins.Messages/fr-CA-x".parse().unwrap();
        assert_eq!(key.to_string(), "p/1.0/jenkins.Messages/fr_CA_x");
        let key: BundleKey = "p/1.0/jenkins.Messages".parse().unwrap();
        assert_eq!(key.to_string(), "p/1.0/jenkins.Messages");
    }

    #[test]
    fn test_release_versions() {
        let release = |version: &str| BundleKey::new("p", version, "b").is_release_version();
        assert!(release("1.0"));
        assert!(release("2.14.1"));
        assert!(release("1/2"));
        assert!(!release("1."));
        assert!(!release("1.0-SNAPSHOT"));
        assert!(!release("1.0-rc1"));
        assert!(!release(""));
    }
}
