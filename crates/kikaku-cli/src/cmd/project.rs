use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use kikaku_core::project::Project;
use kikaku_core::summary;
use std::path::Path;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Create a new project
    Create {
        /// Project name
        name: String,
        /// Owner's user id
        #[arg(long)]
        user: String,
    },
    /// List projects visible to a user
    List {
        #[arg(long)]
        user: String,
    },
    /// Show project detail
    Show { id: String },
    /// Soft-delete a project (owner only)
    Delete {
        id: String,
        #[arg(long)]
        user: String,
    },
    /// Print the step a user would resume at
    Resume { id: String },
    /// Print the plan summary as Markdown
    Summary { id: String },
}

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::Create { name, user } => create(root, &user, &name, json),
        ProjectSubcommand::List { user } => list(root, &user, json),
        ProjectSubcommand::Show { id } => show(root, &id, json),
        ProjectSubcommand::Delete { id, user } => delete(root, &id, &user, json),
        ProjectSubcommand::Resume { id } => resume(root, &id, json),
        ProjectSubcommand::Summary { id } => print_summary(root, &id),
    }
}

fn create(root: &Path, user: &str, name: &str, json: bool) -> anyhow::Result<()> {
    let project = Project::create(root, user, name)
        .with_context(|| format!("failed to create project '{name}'"))?;

    if json {
        print_json(&project)?;
    } else {
        println!("Created project: {} — {}", project.id, project.name);
    }
    Ok(())
}

fn list(root: &Path, user: &str, json: bool) -> anyhow::Result<()> {
    let projects = Project::list_for_user(root, user).context("failed to list projects")?;

    if json {
        let summaries: Vec<_> = projects
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "name": p.name,
                    "owner": p.user_id,
                    "current_step": p.status.current_step.to_string(),
                    "progress_percent": p.status.progress_percent(),
                })
            })
            .collect();
        print_json(&summaries)?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.name.clone(),
                p.user_id.clone(),
                p.status.current_step.to_string(),
                format!("{}%", p.status.progress_percent()),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "OWNER", "STEP", "PROGRESS"], rows);
    Ok(())
}

fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let project =
        Project::load(root, id).with_context(|| format!("failed to load project '{id}'"))?;

    if json {
        print_json(&project)?;
        return Ok(());
    }

    println!("{} — {}", project.id, project.name);
    println!("owner: {}", project.user_id);
    if !project.shared_with.is_empty() {
        let members: Vec<&str> = project.shared_with.iter().map(String::as_str).collect();
        println!("shared with: {}", members.join(", "));
    }
    println!("current step: {}", project.status.current_step);
    println!("progress: {}%", project.status.progress_percent());
    if let Some(deleted) = project.deleted_at {
        println!("deleted at: {deleted}");
    }
    Ok(())
}

fn delete(root: &Path, id: &str, user: &str, json: bool) -> anyhow::Result<()> {
    let mut project =
        Project::load(root, id).with_context(|| format!("failed to load project '{id}'"))?;
    project.ensure_owner(user)?;
    project.soft_delete();
    project.save(root)?;

    if json {
        print_json(&serde_json::json!({
            "id": project.id,
            "deleted_at": project.deleted_at,
        }))?;
    } else {
        println!("Deleted project: {}", project.id);
    }
    Ok(())
}

fn resume(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let project =
        Project::load(root, id).with_context(|| format!("failed to load project '{id}'"))?;
    let step = project.state.resume_step();

    if json {
        print_json(&serde_json::json!({ "step": step }))?;
    } else {
        println!("{step}");
    }
    Ok(())
}

fn print_summary(root: &Path, id: &str) -> anyhow::Result<()> {
    let project =
        Project::load(root, id).with_context(|| format!("failed to load project '{id}'"))?;
    println!("{}", summary::render_markdown(&project.state));
    Ok(())
}
