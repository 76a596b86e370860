//! In-memory context operations over a loaded config document

use crate::error::{Result, SbError};

use super::models::{normalize_server_url, ConfigDocument, Context, Scope};

/// One row of a context listing
#[derive(Debug, Clone, PartialEq)]
pub struct ContextEntry {
    pub key: String,
    pub context: Context,
    pub is_current: bool,
}

/// Typed view over a [`ConfigDocument`] that keeps the current-context
/// pointer valid across mutations. Performs no I/O.
#[derive(Debug, Clone, Default)]
pub struct ContextRegistry {
    doc: ConfigDocument,
}

impl ContextRegistry {
    pub fn new(doc: ConfigDocument) -> Self {
        Self { doc }
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.doc
    }

    pub fn into_document(self) -> ConfigDocument {
        self.doc
    }

    pub fn len(&self) -> usize {
        self.doc.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.contexts.is_empty()
    }

    /// Insert or overwrite a context. The first context added becomes current.
    pub fn upsert(&mut self, key: &str, context: Context) -> Result<()> {
        if context.endpoint.is_empty() {
            return Err(SbError::InvalidInput(format!(
                "context '{}' has no endpoint",
                key
            )));
        }

        self.doc.contexts.insert(key.to_string(), context);
        if self.doc.current_context.is_empty() && self.doc.contexts.len() == 1 {
            self.doc.current_context = key.to_string();
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<&Context> {
        self.doc
            .contexts
            .get(key)
            .ok_or_else(|| self.not_found(key))
    }

    /// Delete a context, clearing the current pointer if it referenced it
    pub fn remove(&mut self, key: &str) -> Result<Context> {
        let removed = self
            .doc
            .contexts
            .remove(key)
            .ok_or_else(|| self.not_found(key))?;

        if self.doc.current_context == key {
            self.doc.current_context.clear();
        }
        Ok(removed)
    }

    /// Point current-context at an existing key; unchanged on error
    pub fn set_current(&mut self, key: &str) -> Result<()> {
        if !self.doc.contexts.contains_key(key) {
            return Err(self.not_found(key));
        }
        self.doc.current_context = key.to_string();
        Ok(())
    }

    pub fn clear_current(&mut self) {
        self.doc.current_context.clear();
    }

    /// Drop every context (logout of the last server)
    pub fn clear(&mut self) {
        self.doc = ConfigDocument::default();
    }

    pub fn current_name(&self) -> Option<&str> {
        if self.doc.current_context.is_empty() {
            None
        } else {
            Some(&self.doc.current_context)
        }
    }

    /// Key for `name`: the exact key when present, else the key that `name`
    /// normalizes to. Unknown names are returned unchanged.
    pub fn resolve_key(&self, name: &str) -> String {
        if self.doc.contexts.contains_key(name) {
            return name.to_string();
        }
        match normalize_server_url(name) {
            Ok(normalized) if self.doc.contexts.contains_key(&normalized) => normalized,
            _ => name.to_string(),
        }
    }

    pub fn current(&self) -> Option<(&str, &Context)> {
        let name = self.current_name()?;
        self.doc
            .contexts
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Replace the cluster/project scope of a context
    pub fn set_scope(&mut self, key: &str, scope: Option<Scope>) -> Result<()> {
        if !self.doc.contexts.contains_key(key) {
            return Err(self.not_found(key));
        }
        if let Some(ctx) = self.doc.contexts.get_mut(key) {
            ctx.scope = scope.filter(|s| !s.is_empty());
        }
        Ok(())
    }

    /// All contexts in stable key order, current one flagged
    pub fn list(&self) -> Vec<ContextEntry> {
        self.doc
            .contexts
            .iter()
            .map(|(key, context)| ContextEntry {
                key: key.clone(),
                context: context.clone(),
                is_current: *key == self.doc.current_context,
            })
            .collect()
    }

    fn not_found(&self, key: &str) -> SbError {
        let available = self
            .doc
            .contexts
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if available.is_empty() {
            SbError::NotFound(format!(
                "Context '{}' not found. No contexts configured, run 'sb login' first.",
                key
            ))
        } else {
            SbError::NotFound(format!(
                "Context '{}' not found. Available contexts: {}",
                key, available
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::models::Edition;

    fn ctx(endpoint: &str, token: &str) -> Context {
        Context {
            endpoint: endpoint.to_string(),
            edition: Edition::Oss,
            token: token.to_string(),
            refresh_token: None,
            issued_at: None,
            expires_at: None,
            scope: None,
        }
    }

    fn pointer_is_valid(registry: &ContextRegistry) -> bool {
        let doc = registry.document();
        doc.current_context.is_empty() || doc.contexts.contains_key(&doc.current_context)
    }

    #[test]
    fn test_resolve_key_accepts_short_address() {
        let mut registry = ContextRegistry::default();
        registry.upsert("https://a.test", ctx("https://a.test", "T1")).unwrap();

        assert_eq!(registry.resolve_key("https://a.test"), "https://a.test");
        assert_eq!(registry.resolve_key("a.test/"), "https://a.test");
        assert_eq!(registry.resolve_key("other"), "other");
    }

    #[test]
    fn test_first_upsert_becomes_current() {
        let mut registry = ContextRegistry::default();
        registry.upsert("https://a.test", ctx("https://a.test", "T1")).unwrap();
        assert_eq!(registry.current_name(), Some("https://a.test"));

        registry.upsert("https://b.test", ctx("https://b.test", "T2")).unwrap();
        assert_eq!(registry.current_name(), Some("https://a.test"));
        assert!(pointer_is_valid(&registry));
    }

    #[test]
    fn test_upsert_overwrites_same_key() {
        let mut registry = ContextRegistry::default();
        registry.upsert("https://a.test", ctx("https://a.test", "old")).unwrap();
        registry.upsert("https://a.test", ctx("https://a.test", "new")).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("https://a.test").unwrap().token, "new");
    }

    #[test]
    fn test_upsert_rejects_empty_endpoint() {
        let mut registry = ContextRegistry::default();
        let result = registry.upsert("https://a.test", ctx("", "T1"));
        assert!(matches!(result, Err(SbError::InvalidInput(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get_missing_lists_available() {
        let mut registry = ContextRegistry::default();
        registry.upsert("https://a.test", ctx("https://a.test", "T1")).unwrap();
        let err = registry.get("https://zzz.test").unwrap_err().to_string();
        assert!(err.contains("not found"));
        assert!(err.contains("https://a.test"));
    }

    #[test]
    fn test_remove_current_clears_pointer() {
        let mut registry = ContextRegistry::default();
        registry.upsert("https://a.test", ctx("https://a.test", "T1")).unwrap();
        registry.upsert("https://b.test", ctx("https://b.test", "T2")).unwrap();

        registry.remove("https://a.test").unwrap();

        assert!(registry.current_name().is_none());
        assert_eq!(registry.len(), 1);
        assert!(pointer_is_valid(&registry));
    }

    #[test]
    fn test_remove_other_keeps_pointer() {
        let mut registry = ContextRegistry::default();
        registry.upsert("https://a.test", ctx("https://a.test", "T1")).unwrap();
        registry.upsert("https://b.test", ctx("https://b.test", "T2")).unwrap();

        registry.remove("https://b.test").unwrap();
        assert_eq!(registry.current_name(), Some("https://a.test"));
    }

    #[test]
    fn test_remove_missing_errors() {
        let mut registry = ContextRegistry::default();
        assert!(matches!(
            registry.remove("https://a.test"),
            Err(SbError::NotFound(_))
        ));
    }

    #[test]
    fn test_set_current_missing_leaves_pointer() {
        let mut registry = ContextRegistry::default();
        registry.upsert("https://a.test", ctx("https://a.test", "T1")).unwrap();

        assert!(registry.set_current("https://nope.test").is_err());
        assert_eq!(registry.current_name(), Some("https://a.test"));
    }

    #[test]
    fn test_set_scope_drops_empty() {
        let mut registry = ContextRegistry::default();
        registry.upsert("https://a.test", ctx("https://a.test", "T1")).unwrap();

        let scope = Scope {
            project_name: Some("shop".to_string()),
            ..Default::default()
        };
        registry.set_scope("https://a.test", Some(scope.clone())).unwrap();
        assert_eq!(registry.get("https://a.test").unwrap().scope, Some(scope));

        registry.set_scope("https://a.test", Some(Scope::default())).unwrap();
        assert!(registry.get("https://a.test").unwrap().scope.is_none());
    }

    #[test]
    fn test_list_flags_current_in_stable_order() {
        let mut registry = ContextRegistry::default();
        registry.upsert("https://b.test", ctx("https://b.test", "T2")).unwrap();
        registry.upsert("https://a.test", ctx("https://a.test", "T1")).unwrap();

        let entries = registry.list();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["https://a.test", "https://b.test"]);
        assert!(!entries[0].is_current);
        assert!(entries[1].is_current);
        assert_eq!(entries, registry.list());
    }

    #[test]
    fn test_clear_resets_document() {
        let mut registry = ContextRegistry::default();
        registry.upsert("https://a.test", ctx("https://a.test", "T1")).unwrap();
        registry.clear();
        assert_eq!(registry.into_document(), ConfigDocument::default());
    }
}
