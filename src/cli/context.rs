//! Context management CLI arguments

use clap::{Parser, Subcommand};

/// Context subcommands
#[derive(Subcommand, Debug)]
pub enum ContextAction {
    /// List all contexts
    #[command(visible_alias = "ls")]
    List,

    /// Set the cluster/project scope of a context
    Set(SetContextArgs),

    /// Make another context current
    Switch(SwitchContextArgs),

    /// Remove a context
    Unset(UnsetContextArgs),

    /// Display the current context
    Current,

    /// Display config file contents (tokens masked)
    View,
}

/// Arguments for 'context set' subcommand
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
        sb context set --cluster-id c-12 --cluster prod --project-id p-7 --project shop\n  \
        sb context set https://dashboard.example.com --project shop\n  \
        sb context set --clear")]
pub struct SetContextArgs {
    /// Context name (server URL); defaults to the current context
    pub name: Option<String>,
    /// Cluster id
    #[arg(long)]
    pub cluster_id: Option<String>,
    /// Cluster name
    #[arg(long)]
    pub cluster: Option<String>,
    /// Project id
    #[arg(long)]
    pub project_id: Option<String>,
    /// Project name
    #[arg(long)]
    pub project: Option<String>,
    /// Remove the scope instead of setting it
    #[arg(long, conflicts_with_all = ["cluster_id", "cluster", "project_id", "project"])]
    pub clear: bool,
}

/// Arguments for 'context switch' subcommand
#[derive(Parser, Debug)]
pub struct SwitchContextArgs {
    /// Context name to activate; prompts when omitted
    pub name: Option<String>,
}

/// Arguments for 'context unset' subcommand
#[derive(Parser, Debug)]
pub struct UnsetContextArgs {
    /// Context name to remove
    pub name: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}
