//! Host collaborators behind the resolution cache: finding a plugin and
//! loading one of its bundles for a locale.
//!
//! The filesystem implementations expect one directory per plugin under a
//! common root, with bundles stored as `.properties` files at the path
//! given by their dotted name.

use crate::errors::LoadError;
use crate::locale::Locale;
use crate::properties;
use indexmap::IndexMap;
use std::io;
use std::path::{Path, PathBuf};

/// Resolved messages, in file order.
pub type TranslationTable = IndexMap<String, String>;

/// A plugin the host knows about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluginHandle {
    pub name: String,
    pub location: PathBuf,
}

pub trait PluginResolver: Send + Sync {
    /// `None` when no such plugin is installed.
    fn resolve(&self, name: &str, version: &str) -> Option<PluginHandle>;
}

pub trait BundleLoader: Send + Sync {
    /// `Ok(None)` when the plugin has no bundle by that name for the locale
    /// or any of its parents.
    fn load(
        &self,
        plugin: &PluginHandle,
        bundle_name: &str,
        locale: &Locale,
    ) -> Result<Option<TranslationTable>, LoadError>;
}

pub struct FilesystemPluginResolver {
    root: PathBuf,
}

impl FilesystemPluginResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FilesystemPluginResolver { root: root.into() }
    }
}

impl PluginResolver for FilesystemPluginResolver {
    // Only the name locates a plugin; a host serves one installed version.
    fn resolve(&self, name: &str, _version: &str) -> Option<PluginHandle> {
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return None;
        }

        let location = self.root.join(name);
        location.is_dir().then(|| PluginHandle {
            name: name.to_string(),
            location,
        })
    }
}

#[derive(Default)]
pub struct PropertiesBundleLoader;

impl PropertiesBundleLoader {
    /// `a.b.Messages` becomes `a/b/Messages`. Names with empty components
    /// do not map to a file.
    fn bundle_path(root: &Path, bundle_name: &str) -> Option<PathBuf> {
        let mut path = root.to_path_buf();
        for part in bundle_name.split('.') {
            if part.is_empty() || part.contains(['/', '\\']) {
                return None;
            }
            path.push(part);
        }
        Some(path)
    }

    fn read_candidate(path: &Path) -> Result<Option<TranslationTable>, LoadError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        properties::parse(&properties::decode(&bytes))
            .map(Some)
            .map_err(|source| LoadError::Properties {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl BundleLoader for PropertiesBundleLoader {
    fn load(
        &self,
        plugin: &PluginHandle,
        bundle_name: &str,
        locale: &Locale,
    ) -> Result<Option<TranslationTable>, LoadError> {
        let Some(base) = Self::bundle_path(&plugin.location, bundle_name) else {
            return Ok(None);
        };

        // Least specific first so that each more specific file overrides.
        let mut merged: Option<TranslationTable> = None;
        for suffix in locale.candidate_suffixes().iter().rev() {
            let mut file_name = base.file_name().unwrap_or_default().to_os_string();
            file_name.push(format!("{suffix}.properties"));
            let path = base.with_file_name(file_name);

            if let Some(table) = Self::read_candidate(&path)? {
                tracing::debug!(path = %path.display(), entries = table.len(), "read bundle file");
                merged.get_or_insert_with(TranslationTable::new).extend(table);
            }
        }

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn plugin_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let bundle_dir = dir.path().join("blueocean").join("io").join("jenkins");
        fs::create_dir_all(&bundle_dir).unwrap();
        fs::write(
            bundle_dir.join("Messages.properties"),
            "title=Pipelines\nrun=Run\nstop=Stop\n",
        )
        .unwrap();
        fs::write(bundle_dir.join("Messages_fr.properties"), "title=Pipelines FR\nrun=Lancer\n").unwrap();
        fs::write(bundle_dir.join("Messages_fr_CA.properties"), "run=Partir\n").unwrap();
        dir
    }

    #[test]
    fn test_resolve_plugin_directory() {
        let dir = plugin_tree();
        let resolver = FilesystemPluginResolver::new(dir.path());

        let handle = resolver.resolve("blueocean", "1.0").unwrap();
        assert_eq!(handle.name, "blueocean");
        assert_eq!(handle.location, dir.path().join("blueocean"));

        assert_eq!(resolver.resolve("missing", "1.0"), None);
        assert_eq!(resolver.resolve("..", "1.0"), None);
        assert_eq!(resolver.resolve("blueocean/io", "1.0"), None);
    }

    #[test]
    fn test_more_specific_files_override() {
        let dir = plugin_tree();
        let plugin = FilesystemPluginResolver::new(dir.path())
            .resolve("blueocean", "1.0")
            .unwrap();
        let loader = PropertiesBundleLoader;

        let table = loader
            .load(&plugin, "io.jenkins.Messages", &Locale::with_country("fr", "CA"))
            .unwrap()
            .unwrap();
        assert_eq!(table["title"], "Pipelines FR");
        assert_eq!(table["run"], "Partir");
        assert_eq!(table["stop"], "Stop");

        let table = loader
            .load(&plugin, "io.jenkins.Messages", &Locale::new("de"))
            .unwrap()
            .unwrap();
        assert_eq!(table["run"], "Run");
    }

    #[test]
    fn test_missing_bundle_is_not_an_error() {
        let dir = plugin_tree();
        let plugin = FilesystemPluginResolver::new(dir.path())
            .resolve("blueocean", "1.0")
            .unwrap();
        let loader = PropertiesBundleLoader;

        for name in ["io.jenkins.Missing", "io..Messages", "Messages", ""] {
            assert_eq!(loader.load(&plugin, name, &Locale::new("en")).unwrap(), None, "{name}");
        }
    }

    #[test]
    fn test_unparsable_file_is_an_error() {
        let dir = plugin_tree();
        let bundle_dir = dir.path().join("blueocean").join("io").join("jenkins");
        fs::write(bundle_dir.join("Broken.properties"), "x=\\uZZZZ\n").unwrap();
        let plugin = FilesystemPluginResolver::new(dir.path())
            .resolve("blueocean", "1.0")
            .unwrap();

        let err = PropertiesBundleLoader
            .load(&plugin, "io.jenkins.Broken", &Locale::new("en"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Properties { .. }));
    }
}
