//! Context command handlers

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};

use crate::cli::{ContextAction, SetContextArgs, SwitchContextArgs, UnsetContextArgs};
use crate::error::SbError;
use crate::ui::{confirm_action, select_context};

use super::models::{Context, Scope};
use super::store::ConfigStore;
use super::switcher::{ContextSwitcher, SwitchOutcome};

/// Dispatch context subcommands
pub fn run_context_command(
    action: &ContextAction,
    store: &ConfigStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let switcher = ContextSwitcher::new(store);
    match action {
        ContextAction::List => run_context_list(&switcher),
        ContextAction::Set(args) => run_context_set(&switcher, args),
        ContextAction::Switch(args) => run_context_switch(&switcher, args),
        ContextAction::Unset(args) => run_context_unset(&switcher, args),
        ContextAction::Current => run_context_current(&switcher),
        ContextAction::View => run_config_view(store),
    }
}

/// List all contexts
fn run_context_list(switcher: &ContextSwitcher) -> Result<(), Box<dyn std::error::Error>> {
    let entries = switcher.list()?;

    if entries.is_empty() {
        println!("No contexts configured.");
        println!("\nUse 'sb login' to create one.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("CURRENT"),
            Cell::new("NAME"),
            Cell::new("EDITION"),
            Cell::new("SCOPE"),
            Cell::new("TOKEN"),
            Cell::new("EXPIRES"),
        ]);

    for entry in &entries {
        let ctx = &entry.context;
        let current_marker = if entry.is_current { "*" } else { "" };

        table.add_row(vec![
            Cell::new(current_marker),
            Cell::new(&entry.key),
            Cell::new(ctx.edition),
            Cell::new(scope_display(ctx.scope.as_ref())),
            Cell::new(mask_token(Some(&ctx.token))),
            Cell::new(expiry_display(ctx)),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Show the current context details
fn run_context_current(switcher: &ContextSwitcher) -> Result<(), Box<dyn std::error::Error>> {
    let Some((name, ctx)) = switcher.current()? else {
        return Err(SbError::LoginRequired(
            "No current context set. Use 'sb login' or 'sb context switch <name>'.".to_string(),
        )
        .into());
    };

    println!("Current context: {}", name);
    println!("  Endpoint: {}", ctx.endpoint);
    println!("  Edition:  {}", ctx.edition);
    println!("  Token:    {}", mask_token(Some(&ctx.token)));
    println!("  Expires:  {}", expiry_display(&ctx));
    println!("  Scope:    {}", scope_display(ctx.scope.as_ref()));

    Ok(())
}

/// Update or clear the cluster/project scope of a context
fn run_context_set(
    switcher: &ContextSwitcher,
    args: &SetContextArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = switcher.list()?;
    let name = match &args.name {
        Some(name) => Some(switcher.resolve(name)?),
        None => None,
    };

    if args.clear {
        let key = switcher.set_scope(name.as_deref(), Scope::default())?;
        println!("✓ Cleared scope of context '{}'", key);
        return Ok(());
    }

    let update = Scope {
        cluster_id: args.cluster_id.clone(),
        cluster_name: args.cluster.clone(),
        project_id: args.project_id.clone(),
        project_name: args.project.clone(),
    };
    if update.is_empty() {
        return Err(SbError::InvalidInput(
            "Nothing to set. Pass --cluster-id, --cluster, --project-id or --project \
             (or --clear to remove the scope)."
                .to_string(),
        )
        .into());
    }

    // Merge with the existing scope so fields not given are kept
    let existing = entries
        .iter()
        .find(|e| match &name {
            Some(name) => &e.key == name,
            None => e.is_current,
        })
        .and_then(|e| e.context.scope.clone())
        .unwrap_or_default();
    let scope = merge_scope(existing, update);

    let key = switcher.set_scope(name.as_deref(), scope.clone())?;
    println!("✓ Updated context '{}' scope to {}", key, scope.label());
    Ok(())
}

/// Switch the active context
fn run_context_switch(
    switcher: &ContextSwitcher,
    args: &SwitchContextArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = match &args.name {
        Some(name) => switcher.resolve(name)?,
        None => select_context(&switcher.list()?)?,
    };

    match switcher.switch(&name)? {
        SwitchOutcome::Switched => println!("✓ Switched to context '{}'", name),
        SwitchOutcome::AlreadyCurrent => println!("Context '{}' is already current", name),
    }
    Ok(())
}

/// Delete a named context
fn run_context_unset(
    switcher: &ContextSwitcher,
    args: &UnsetContextArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = switcher.resolve(&args.name)?;

    if !confirm_action(&format!("Remove context '{}'?", name), args.yes)? {
        println!("Aborted.");
        return Ok(());
    }

    let outcome = switcher.unset(&name)?;
    println!("✓ Removed context '{}'", name);
    if outcome.was_current {
        println!("No context is active now. Use 'sb context switch' or 'sb login'.");
    }
    Ok(())
}

/// Display the config file contents with tokens masked
fn run_config_view(store: &ConfigStore) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = store.load()?;
    for ctx in doc.contexts.values_mut() {
        ctx.token = mask_token(Some(&ctx.token));
        if let Some(refresh) = ctx.refresh_token.as_mut() {
            *refresh = mask_token(Some(refresh));
        }
    }

    println!("# {}", store.path().display());
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn merge_scope(existing: Scope, update: Scope) -> Scope {
    Scope {
        cluster_id: update.cluster_id.or(existing.cluster_id),
        cluster_name: update.cluster_name.or(existing.cluster_name),
        project_id: update.project_id.or(existing.project_id),
        project_name: update.project_name.or(existing.project_name),
    }
}

fn scope_display(scope: Option<&Scope>) -> String {
    match scope {
        Some(scope) if !scope.is_empty() => scope.label(),
        _ => "<not set>".to_string(),
    }
}

fn expiry_display(ctx: &Context) -> String {
    let when = match ctx.expires_at {
        Some(at) => at.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "<unknown>".to_string(),
    };
    if ctx.is_expired() {
        format!("{} (expired)", when)
    } else {
        when
    }
}

/// Mask a token for display: show last 4 chars or "<not set>"
fn mask_token(token: Option<&str>) -> String {
    match token {
        Some("") | None => "<not set>".to_string(),
        Some(t) if t.chars().count() >= 4 => {
            let tail: String = t.chars().skip(t.chars().count() - 4).collect();
            format!("****{}", tail)
        }
        Some(_) => "****".to_string(),
    }
}
