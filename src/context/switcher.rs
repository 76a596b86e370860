//! Listing, selecting and removing persisted contexts

use log::debug;

use crate::error::{Result, SbError};

use super::models::{Context, Scope};
use super::registry::{ContextEntry, ContextRegistry};
use super::store::ConfigStore;

/// Result of [`ContextSwitcher::switch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched,
    AlreadyCurrent,
}

/// Result of [`ContextSwitcher::unset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsetOutcome {
    /// The removed context was the active one; no context is active now
    pub was_current: bool,
}

/// Load-mutate-save operations on the context registry
pub struct ContextSwitcher<'a> {
    store: &'a ConfigStore,
}

impl<'a> ContextSwitcher<'a> {
    pub fn new(store: &'a ConfigStore) -> Self {
        Self { store }
    }

    fn registry(&self) -> Result<ContextRegistry> {
        Ok(ContextRegistry::new(self.store.load()?))
    }

    pub fn list(&self) -> Result<Vec<ContextEntry>> {
        Ok(self.registry()?.list())
    }

    /// Context key for a name typed by the user (exact key or short address)
    pub fn resolve(&self, name: &str) -> Result<String> {
        Ok(self.registry()?.resolve_key(name))
    }

    /// Current context key and record, if one is set
    pub fn current(&self) -> Result<Option<(String, Context)>> {
        let registry = self.registry()?;
        Ok(registry
            .current()
            .map(|(key, ctx)| (key.to_string(), ctx.clone())))
    }

    /// Make `name` the current context. Unknown names leave the file untouched.
    pub fn switch(&self, name: &str) -> Result<SwitchOutcome> {
        let mut registry = self.registry()?;

        if registry.current_name() == Some(name) {
            registry.get(name)?;
            debug!("Context '{}' is already current", name);
            return Ok(SwitchOutcome::AlreadyCurrent);
        }

        registry.set_current(name)?;
        self.store.save(registry.document())?;
        debug!("Switched current context to '{}'", name);
        Ok(SwitchOutcome::Switched)
    }

    /// Remove `name`; clears the current pointer when it was active
    pub fn unset(&self, name: &str) -> Result<UnsetOutcome> {
        let mut registry = self.registry()?;
        let was_current = registry.current_name() == Some(name);

        registry.remove(name)?;
        self.store.save(registry.document())?;
        debug!("Removed context '{}' (was_current={})", name, was_current);
        Ok(UnsetOutcome { was_current })
    }

    /// Replace the scope of `name`, or of the current context when `None`.
    /// Returns the key that was updated.
    pub fn set_scope(&self, name: Option<&str>, scope: Scope) -> Result<String> {
        let mut registry = self.registry()?;
        let key = match name {
            Some(name) => name.to_string(),
            None => registry
                .current_name()
                .map(str::to_string)
                .ok_or_else(|| {
                    SbError::LoginRequired(
                        "no current context; run 'sb login' or pass a context name".to_string(),
                    )
                })?,
        };

        registry.set_scope(&key, Some(scope))?;
        self.store.save(registry.document())?;
        Ok(key)
    }
}
