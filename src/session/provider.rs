//! Resolution of working credentials for API commands

use log::{debug, info, warn};

use crate::context::{Context, ContextRegistry, Edition, Scope};
use crate::error::{Result, SbError};

use super::manager::SessionManager;
use super::models::LoginRequest;

/// Source of interactive login credentials.
///
/// Decides nothing; it only gathers server/username/password when the
/// provider has determined that a login is required.
pub trait LoginPrompt {
    fn prompt_login(&self, default_server: Option<&str>) -> Result<LoginRequest>;
}

/// Credentials handed to API commands
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveCredentials {
    /// Context key (server URL)
    pub key: String,
    pub endpoint: String,
    pub token: String,
    pub edition: Edition,
    pub scope: Option<Scope>,
}

impl ActiveCredentials {
    fn from_context(key: String, context: Context) -> Self {
        Self {
            key,
            endpoint: context.endpoint,
            token: context.token,
            edition: context.edition,
            scope: context.scope,
        }
    }

    /// `Authorization` header value: `Token <t>` for OSS, `Bearer <t>` for SaaS
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.edition.auth_scheme(), self.token)
    }
}

/// Supplies every command with a currently valid access token, logging in
/// or refreshing as needed
pub struct CredentialProvider<'a, P: LoginPrompt> {
    session: SessionManager<'a>,
    prompt: P,
    context_override: Option<String>,
}

impl<'a, P: LoginPrompt> CredentialProvider<'a, P> {
    pub fn new(session: SessionManager<'a>, prompt: P) -> Self {
        Self {
            session,
            prompt,
            context_override: None,
        }
    }

    /// Use `name` instead of the current context (`--context` / `SB_CONTEXT`)
    pub fn with_context_override(mut self, name: Option<String>) -> Self {
        self.context_override = name.filter(|n| !n.is_empty());
        self
    }

    /// Credentials of the active context.
    ///
    /// - no current context: prompt and log in
    /// - expired token: refresh; if that needs a login, prompt and log in
    ///
    /// A context override never changes the current context, including when
    /// it ends in a fresh login.
    pub async fn get_active(&self) -> Result<ActiveCredentials> {
        let registry = ContextRegistry::new(self.session.store().load()?);
        let previous = registry.current_name().map(str::to_string);

        let name = match &self.context_override {
            Some(name) => {
                let key = registry.resolve_key(name);
                debug!("Using context override '{}'", key);
                Some(key)
            }
            None => previous.clone(),
        };

        let Some(name) = name else {
            info!("No current context set, login required");
            return self.interactive_login(None).await;
        };

        let context = registry.get(&name)?.clone();
        match self.session.refresh(&name, &context).await {
            Ok(context) => Ok(ActiveCredentials::from_context(name, context)),
            Err(SbError::LoginRequired(reason)) => {
                warn!("{}", reason);
                let creds = self.interactive_login(Some(&context.endpoint)).await?;
                if self.context_override.is_some() {
                    self.restore_current(previous.as_deref())?;
                }
                Ok(creds)
            }
            Err(e) => Err(e),
        }
    }

    async fn interactive_login(&self, default_server: Option<&str>) -> Result<ActiveCredentials> {
        let request = self.prompt.prompt_login(default_server)?;
        let (key, context) = self.session.login(&request).await?;
        Ok(ActiveCredentials::from_context(key, context))
    }

    fn restore_current(&self, previous: Option<&str>) -> Result<()> {
        let store = self.session.store();
        let mut registry = ContextRegistry::new(store.load()?);
        if registry.current_name() == previous {
            return Ok(());
        }
        match previous {
            Some(key) if registry.get(key).is_ok() => registry.set_current(key)?,
            _ => registry.clear_current(),
        }
        store.save(registry.document())?;
        debug!("Restored current context to {:?}", previous);
        Ok(())
    }
}
