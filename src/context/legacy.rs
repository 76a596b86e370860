//! Migration of the old nested user/cluster/project config layout

use chrono::Utc;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SbError};

use super::models::{normalize_server_url, ConfigDocument, Context, Edition, Scope};

#[derive(Deserialize, Debug, Default)]
struct LegacyDocument {
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(rename = "current-context", default)]
    current_context: Option<String>,
    #[serde(default)]
    contexts: Option<Vec<LegacyUserContext>>,
}

#[derive(Deserialize, Debug)]
struct LegacyUserContext {
    #[serde(rename = "Context", alias = "context", default)]
    context: LegacyContextData,
}

#[derive(Deserialize, Debug, Default)]
struct LegacyContextData {
    #[serde(rename = "Cluster", alias = "cluster", default)]
    clusters: Vec<LegacyCluster>,
}

#[derive(Deserialize, Debug)]
struct LegacyCluster {
    #[serde(rename = "Name", alias = "name", default)]
    name: String,
    #[serde(rename = "ID", alias = "id", default)]
    id: String,
    #[serde(rename = "Projects", alias = "projects", default)]
    projects: Vec<LegacyProject>,
}

#[derive(Deserialize, Debug)]
struct LegacyProject {
    #[serde(rename = "Name", alias = "name", default)]
    name: String,
    #[serde(rename = "UUID", alias = "uuid", default)]
    uuid: String,
}

/// Whether a raw config value uses the legacy layout: `contexts` as an
/// array, or a bare top-level `endpoint` with no `contexts` map.
pub fn is_legacy(value: &Value) -> bool {
    match value.get("contexts") {
        Some(Value::Array(_)) => true,
        None | Some(Value::Null) => value.get("endpoint").is_some_and(Value::is_string),
        _ => false,
    }
}

/// Convert a legacy document into the flat layout.
///
/// The top-level endpoint/token pair becomes a single OSS context; its scope
/// is the legacy project named by `current-context`, else the first one.
pub fn migrate(value: Value) -> Result<ConfigDocument> {
    let legacy: LegacyDocument = serde_json::from_value(value)
        .map_err(|e| SbError::ConfigParse(format!("unrecognized legacy layout: {}", e)))?;

    let projects: Vec<Scope> = legacy
        .contexts
        .unwrap_or_default()
        .into_iter()
        .flat_map(|user| user.context.clusters)
        .flat_map(|cluster| {
            let LegacyCluster { name, id, projects } = cluster;
            projects.into_iter().map(move |project| Scope {
                cluster_id: non_empty(id.clone()),
                cluster_name: non_empty(name.clone()),
                project_id: non_empty(project.uuid),
                project_name: non_empty(project.name),
            })
        })
        .collect();

    let mut doc = ConfigDocument::default();

    let (endpoint, token) = match (legacy.endpoint, legacy.token) {
        (Some(endpoint), Some(token)) if !endpoint.trim().is_empty() => (endpoint, token),
        _ => {
            if !projects.is_empty() {
                warn!(
                    "Dropping {} legacy project selection(s): no server endpoint to attach them to",
                    projects.len()
                );
            }
            return Ok(doc);
        }
    };

    let key = normalize_server_url(&endpoint)?;
    let wanted = legacy.current_context.unwrap_or_default();
    let scope = projects
        .iter()
        .find(|s| !wanted.is_empty() && s.project_name.as_deref() == Some(wanted.as_str()))
        .or_else(|| projects.first())
        .cloned();

    debug!(
        "Migrating legacy config: endpoint={}, scope={:?}",
        key,
        scope.as_ref().map(Scope::label)
    );

    doc.contexts.insert(
        key.clone(),
        Context {
            endpoint: key.clone(),
            edition: Edition::Oss,
            token,
            refresh_token: None,
            issued_at: Some(Utc::now()),
            expires_at: None,
            scope,
        },
    );
    doc.current_context = key;
    Ok(doc)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
