//! Context configuration file I/O

use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::config::context as context_config;
use crate::error::{Result, SbError};

use super::legacy;
use super::models::ConfigDocument;

/// Handles reading and writing the context configuration file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Create a store at `$SB_CONFIG`, or `~/.config/sb.json` by default
    pub fn new() -> Self {
        let config_path = std::env::var_os(context_config::CONFIG_ENV_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_config_path);
        Self { config_path }
    }

    /// Create a store with a custom config path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(context_config::DIR_NAME)
            .join(context_config::FILE_NAME)
    }

    /// Load the configuration document from disk.
    ///
    /// A missing file is created with an empty document. Corrupt JSON is an
    /// error and the file is left untouched. Legacy layouts are migrated and
    /// written back once.
    pub fn load(&self) -> Result<ConfigDocument> {
        if !self.config_path.exists() {
            debug!(
                "Config file {} not found, creating an empty one",
                self.config_path.display()
            );
            let doc = ConfigDocument::default();
            self.save(&doc)?;
            return Ok(doc);
        }

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            SbError::ConfigRead(format!("{}: {}", self.config_path.display(), e))
        })?;

        let (doc, migrated) = self.parse(&content)?;
        if migrated {
            self.save(&doc)?;
            info!(
                "Migrated legacy config layout in {}",
                self.config_path.display()
            );
        }
        Ok(doc)
    }

    fn parse(&self, content: &str) -> Result<(ConfigDocument, bool)> {
        let value: Value = serde_json::from_str(content).map_err(|e| {
            SbError::ConfigParse(format!("{}: {}", self.config_path.display(), e))
        })?;

        if !value.is_object() {
            return Err(SbError::ConfigParse(format!(
                "{}: expected a JSON object at the top level",
                self.config_path.display()
            )));
        }

        if legacy::is_legacy(&value) {
            return Ok((legacy::migrate(value)?, true));
        }

        let mut doc: ConfigDocument = serde_json::from_value(value).map_err(|e| {
            SbError::ConfigParse(format!("{}: {}", self.config_path.display(), e))
        })?;
        self.validate(&mut doc)?;
        Ok((doc, false))
    }

    fn validate(&self, doc: &mut ConfigDocument) -> Result<()> {
        if let Some((key, _)) = doc.contexts.iter().find(|(_, c)| c.endpoint.is_empty()) {
            return Err(SbError::ConfigParse(format!(
                "{}: context '{}' has no endpoint",
                self.config_path.display(),
                key
            )));
        }

        if !doc.current_context.is_empty() && !doc.contexts.contains_key(&doc.current_context) {
            warn!(
                "current-context '{}' does not name a known context, ignoring it",
                doc.current_context
            );
            doc.current_context.clear();
        }
        Ok(())
    }

    /// Save the configuration document to disk.
    ///
    /// Writes to a uniquely named temp file (mode 0600) next to the config
    /// and renames it over the target, so concurrent saves never share a
    /// temp file and readers never see a partial document.
    pub fn save(&self, doc: &ConfigDocument) -> Result<()> {
        let dir = match self.config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| {
            SbError::ConfigWrite(format!(
                "failed to create config directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let json = serde_json::to_string_pretty(doc)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| {
            SbError::ConfigWrite(format!(
                "failed to create temp file in {}: {}",
                dir.display(),
                e
            ))
        })?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| SbError::ConfigWrite(format!("{}: {}", tmp.path().display(), e)))?;

        tmp.persist(&self.config_path).map_err(|e| {
            SbError::ConfigWrite(format!(
                "failed to replace {}: {}",
                self.config_path.display(),
                e.error
            ))
        })?;

        debug!("Saved config to {}", self.config_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::models::{Context, Edition};
    use chrono::Utc;
    use tempfile::TempDir;

    fn test_store(dir: &TempDir) -> ConfigStore {
        ConfigStore::with_path(dir.path().join("sb.json"))
    }

    fn sample_doc() -> ConfigDocument {
        let mut doc = ConfigDocument {
            current_context: "https://a.test".to_string(),
            ..Default::default()
        };
        doc.contexts.insert(
            "https://a.test".to_string(),
            Context {
                endpoint: "https://a.test".to_string(),
                edition: Edition::Oss,
                token: "T1".to_string(),
                refresh_token: None,
                issued_at: Some(Utc::now()),
                expires_at: None,
                scope: None,
            },
        );
        doc
    }

    #[test]
    fn test_load_missing_file_creates_empty() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let doc = store.load().unwrap();

        assert_eq!(doc, ConfigDocument::default());
        assert!(store.path().exists());
    }

    #[test]
    fn test_load_corrupt_json_errors_and_keeps_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sb.json");
        fs::write(&path, "not valid json!!!").unwrap();
        let store = ConfigStore::with_path(path.clone());

        let result = store.load();

        assert!(matches!(result, Err(SbError::ConfigParse(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "not valid json!!!");
    }

    #[test]
    fn test_load_non_object_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sb.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let store = ConfigStore::with_path(path);
        assert!(matches!(store.load(), Err(SbError::ConfigParse(_))));
    }

    #[test]
    fn test_load_rejects_context_without_endpoint() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sb.json");
        fs::write(&path, r#"{"contexts": {"x": {"endpoint": "", "token": "t"}}}"#).unwrap();
        let store = ConfigStore::with_path(path);
        assert!(matches!(store.load(), Err(SbError::ConfigParse(_))));
    }

    #[test]
    fn test_load_drops_dangling_current_context() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sb.json");
        fs::write(&path, r#"{"current-context": "https://gone.test", "contexts": {}}"#).unwrap();
        let store = ConfigStore::with_path(path);
        assert!(store.load().unwrap().current_context.is_empty());
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subdir").join("sb.json");
        let store = ConfigStore::with_path(path.clone());
        store.save(&ConfigDocument::default()).unwrap();
        assert!(path.exists());

        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_concurrent_saves_all_succeed() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.save(&sample_doc()).unwrap();

        let writers: Vec<_> = (0..2)
            .map(|n| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let mut doc = sample_doc();
                    let mut failures = 0;
                    for i in 0..200 {
                        doc.contexts.get_mut("https://a.test").unwrap().token =
                            format!("T{}-{}", n, i);
                        if store.save(&doc).is_err() {
                            failures += 1;
                        }
                    }
                    failures
                })
            })
            .collect();

        let reader = {
            let path = store.path().to_path_buf();
            std::thread::spawn(move || {
                let mut torn = 0;
                for _ in 0..200 {
                    let text = fs::read_to_string(&path).unwrap();
                    if serde_json::from_str::<ConfigDocument>(&text).is_err() {
                        torn += 1;
                    }
                }
                torn
            })
        };

        let failures: usize = writers.into_iter().map(|w| w.join().unwrap()).sum();
        assert_eq!(failures, 0);
        assert_eq!(reader.join().unwrap(), 0);
        assert_eq!(store.load().unwrap().contexts.len(), 1);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_into_unwritable_location_errors() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let store = ConfigStore::with_path(blocker.join("sb.json"));

        let result = store.save(&sample_doc());

        assert!(matches!(result, Err(SbError::ConfigWrite(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_into_read_only_dir_errors() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o500)).unwrap();

        // Permission bits do not bind a privileged user
        let writable = fs::write(locked.join("check"), "").is_ok();
        let result = ConfigStore::with_path(locked.join("sb.json")).save(&sample_doc());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();
        if writable {
            return;
        }

        assert!(matches!(result, Err(SbError::ConfigWrite(_))));
        assert!(!locked.join("sb.json").exists());
    }

    #[test]
    fn test_save_load_roundtrip_is_stable() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let doc = sample_doc();

        store.save(&doc).unwrap();
        let first = fs::read_to_string(store.path()).unwrap();

        let loaded = store.load().unwrap();
        store.save(&loaded).unwrap();
        let second = fs::read_to_string(store.path()).unwrap();

        assert_eq!(loaded, doc);
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_migrates_legacy_and_writes_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sb.json");
        fs::write(
            &path,
            r#"{"endpoint": "https://a.test", "token": "old", "current-context": "", "contexts": []}"#,
        )
        .unwrap();
        let store = ConfigStore::with_path(path.clone());

        let doc = store.load().unwrap();
        assert_eq!(doc.current_context, "https://a.test");
        assert_eq!(doc.contexts["https://a.test"].token, "old");

        let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(on_disk["contexts"].is_object());
        assert!(on_disk.get("endpoint").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.save(&ConfigDocument::default()).unwrap();

        let metadata = fs::metadata(store.path()).unwrap();
        let mode = metadata.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn test_default_config_path() {
        let path = ConfigStore::default_config_path();
        assert!(path.to_string_lossy().contains(context_config::DIR_NAME));
        assert!(path.to_string_lossy().ends_with(context_config::FILE_NAME));
    }
}
