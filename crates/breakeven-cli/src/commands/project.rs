use clap::{Args, Subcommand};
use serde_json::Value;
use tracing::debug;

use breakeven_core::worksheet::{Edit, Worksheet};

use crate::commands::open_repository;
use crate::input;

#[derive(Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Save a worksheet document under a name (overwrites)
    Save {
        name: String,
        /// Path to a JSON/YAML worksheet document
        #[arg(long)]
        input: Option<String>,
    },
    /// Apply a list of edits to a saved project and save the result
    Edit {
        name: String,
        /// Path to a JSON/YAML list of edits, e.g. [{"field": "price", "value": "15000"}]
        #[arg(long)]
        input: Option<String>,
    },
    /// Show a saved project
    Load { name: String },
    /// List saved project names
    List,
    /// Delete a saved project
    Delete { name: String },
}

pub fn run_project(args: ProjectArgs, store: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let repo = open_repository(store)?;

    match args.action {
        ProjectAction::Save { name, input } => {
            let mut worksheet: Worksheet = input::load(input.as_deref(), "project save")?;
            worksheet.reconcile();
            Ok(serde_json::to_value(repo.save(&name, &worksheet)?)?)
        }
        ProjectAction::Edit { name, input } => {
            let edits: Vec<Edit> = input::load(input.as_deref(), "project edit")?;
            let mut worksheet = repo.load(&name)?.worksheet;
            worksheet.reconcile();
            debug!(project = %name, edits = edits.len(), "applying edits");
            for edit in edits {
                worksheet.apply(edit);
            }
            worksheet.evaluate();
            Ok(serde_json::to_value(repo.save(&name, &worksheet)?)?)
        }
        ProjectAction::Load { name } => Ok(serde_json::to_value(repo.load(&name)?)?),
        ProjectAction::List => Ok(serde_json::to_value(repo.list()?)?),
        ProjectAction::Delete { name } => {
            repo.delete(&name)?;
            Ok(serde_json::json!({ "deleted": name }))
        }
    }
}
