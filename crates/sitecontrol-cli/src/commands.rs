//! Command handlers for CLI subcommands.

use serde::Serialize;
use sitecontrol_models::{EntryStatus, ProjectId, ReviewDecision, Role};
use sitecontrol_workflow::{
    entries_matching, work_item_views, Action, Dashboard, EntryFilter, Session,
};
use tracing::info;

use crate::cli::{Commands, OutputFormat};
use crate::config::Config;
use crate::context::{Outcome, SiteContext};
use crate::render;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI command.
pub fn execute(command: Commands, config: &Config) -> Result<()> {
    let mut ctx = SiteContext::open(config)?;

    match command {
        Commands::Projects { format } => cmd_projects(&ctx, format),
        Commands::Work { project, format } => cmd_work(&ctx, project.as_deref(), format),
        Commands::Journal {
            project,
            status,
            mine,
            format,
        } => cmd_journal(&ctx, config, project.as_deref(), status, mine, format),
        Commands::Submit {
            project,
            work_item,
            text,
        } => cmd_submit(&mut ctx, config, &project, &work_item, &text.join(" ")),
        Commands::Review {
            entry,
            decision,
            comment,
        } => cmd_review(&mut ctx, config, &entry, decision, comment),
        Commands::Inspections { format } => cmd_inspections(&ctx, format),
        Commands::Stats { format } => cmd_stats(&ctx, format),
        Commands::Repl => {
            // REPL is handled separately in main
            Ok(())
        }
    }
}

/// Session for a one-shot command: the configured role, or the role the
/// action needs when none was picked.
fn session_for(config: &Config, action: Action) -> Session {
    config.session(config.role.unwrap_or_else(|| action.required_role()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the notice for a refused action.
pub(crate) fn report_ignored(reason: &str) {
    println!("Ignored: {}", reason);
}

fn cmd_projects(ctx: &SiteContext, format: OutputFormat) -> Result<()> {
    let projects = ctx.store().projects();
    match format {
        OutputFormat::Json => print_json(projects),
        OutputFormat::Table => {
            print!("{}", render::projects_table(projects));
            Ok(())
        }
    }
}

fn cmd_work(ctx: &SiteContext, project: Option<&str>, format: OutputFormat) -> Result<()> {
    let project_id = project.map(ProjectId::from);
    if let Some(id) = &project_id {
        if ctx.store().project(id).is_none() {
            return Err(format!("Project not found: {}", id).into());
        }
    }

    let views = work_item_views(ctx.store(), project_id.as_ref(), ctx.today());
    match format {
        OutputFormat::Json => print_json(&views),
        OutputFormat::Table => {
            print!("{}", render::work_items_table(&views));
            Ok(())
        }
    }
}

fn cmd_journal(
    ctx: &SiteContext,
    config: &Config,
    project: Option<&str>,
    status: Option<EntryStatus>,
    mine: bool,
    format: OutputFormat,
) -> Result<()> {
    let filter = journal_filter(config, project, status, mine);
    let entries = entries_matching(ctx.store(), &filter);

    match format {
        OutputFormat::Json => print_json(&entries),
        OutputFormat::Table => {
            print!("{}", render::journal_table(&entries));
            Ok(())
        }
    }
}

fn journal_filter(
    config: &Config,
    project: Option<&str>,
    status: Option<EntryStatus>,
    mine: bool,
) -> EntryFilter {
    let mut filter = EntryFilter::new();
    if let Some(project) = project {
        filter = filter.with_project_id(project.into());
    }
    if let Some(status) = status {
        filter = filter.with_status(status);
    }
    if mine {
        let role = config.role.unwrap_or(Role::Contractor);
        filter = filter.with_contractor(config.session(role).name);
    }
    filter
}

fn cmd_submit(
    ctx: &mut SiteContext,
    config: &Config,
    project: &str,
    work_item: &str,
    text: &str,
) -> Result<()> {
    let session = session_for(config, Action::SubmitEntry);
    let today = ctx.today();
    let contractor = session.name.clone();

    let outcome = ctx.apply(&session, Action::SubmitEntry, |store| {
        store.submit_entry(text, &project.into(), &work_item.into(), &contractor, today)
    })?;

    match outcome {
        Outcome::Applied(id) => {
            info!(entry_id = %id, contractor = %contractor, "Entry submitted");
            println!("Submitted entry {} (pending review)", id);
            report_persistence(ctx);
        }
        Outcome::Ignored(reason) => report_ignored(&reason),
    }
    Ok(())
}

fn cmd_review(
    ctx: &mut SiteContext,
    config: &Config,
    entry: &str,
    decision: ReviewDecision,
    comment: Option<String>,
) -> Result<()> {
    let session = session_for(config, Action::ReviewEntry);

    let outcome = ctx.apply(&session, Action::ReviewEntry, |store| {
        store.review_entry(&entry.into(), decision, comment)
    })?;

    match outcome {
        Outcome::Applied(status) => {
            println!("Entry {}: {}", entry, status.label());
            if let Some(comment) = ctx
                .store()
                .entry(&entry.into())
                .and_then(|e| e.comment.as_deref())
            {
                println!("Comment: {}", comment);
            }
            report_persistence(ctx);
        }
        Outcome::Ignored(reason) => report_ignored(&reason),
    }
    Ok(())
}

fn report_persistence(ctx: &SiteContext) {
    match ctx.snapshot_path() {
        Some(path) => println!("Saved to {}", path.display()),
        None => println!("(in-memory only; pass --snapshot FILE to keep changes)"),
    }
}

fn cmd_inspections(ctx: &SiteContext, format: OutputFormat) -> Result<()> {
    let store = ctx.store();

    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct InspectionsOutput<'a> {
                inspections: &'a [sitecontrol_models::Inspection],
                active: Option<&'a sitecontrol_models::Inspection>,
            }
            print_json(&InspectionsOutput {
                inspections: store.inspections(),
                active: store.active_inspection(),
            })
        }
        OutputFormat::Table => {
            print!(
                "{}",
                render::inspections_table(store.inspections(), store.active_inspection())
            );
            if let Some(active) = store.active_inspection() {
                println!();
                print!("{}", render::inspection_detail(active));
            }
            Ok(())
        }
    }
}

fn cmd_stats(ctx: &SiteContext, format: OutputFormat) -> Result<()> {
    let stats = Dashboard::compute(ctx.store(), ctx.today());
    match format {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Table => {
            print!("{}", render::dashboard(&stats));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecontrol_models::DayDate;
    use sitecontrol_persistence::SnapshotStore;
    use sitecontrol_workflow::SiteStore;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn config(snapshot: Option<PathBuf>, role: Option<Role>) -> Config {
        Config {
            state_dir: PathBuf::from("."),
            snapshot,
            role,
            name: None,
            today: DayDate::parse("20.08.2024").unwrap(),
        }
    }

    fn load(path: &std::path::Path) -> SiteStore {
        SiteStore::load_or_seed(&SnapshotStore::new(path)).unwrap()
    }

    #[test]
    fn test_execute_read_only_commands() {
        let config = config(None, None);

        execute(Commands::Projects { format: OutputFormat::Json }, &config).unwrap();
        execute(
            Commands::Work {
                project: Some("p1".to_string()),
                format: OutputFormat::Table,
            },
            &config,
        )
        .unwrap();
        execute(Commands::Inspections { format: OutputFormat::Table }, &config).unwrap();
        execute(Commands::Stats { format: OutputFormat::Json }, &config).unwrap();
    }

    #[test]
    fn test_work_unknown_project_is_error() {
        let config = config(None, None);
        let result = execute(
            Commands::Work {
                project: Some("p404".to_string()),
                format: OutputFormat::Table,
            },
            &config,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_submit_persists_to_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site.json");
        let config = config(Some(path.clone()), None);

        execute(
            Commands::Submit {
                project: "p1".to_string(),
                work_item: "w1".to_string(),
                text: vec!["Смонтирован".to_string(), "воздуховод".to_string()],
            },
            &config,
        )
        .unwrap();

        let store = load(&path);
        assert_eq!(store.journal().len(), 3);
        let front = &store.journal()[0];
        assert_eq!(front.description, "Смонтирован воздуховод");
        assert_eq!(front.contractor, "Иван Петров");
        assert_eq!(front.status, EntryStatus::Pending);
    }

    #[test]
    fn test_submit_as_supervisor_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site.json");
        let config = config(Some(path.clone()), Some(Role::Supervisor));

        execute(
            Commands::Submit {
                project: "p1".to_string(),
                work_item: "w1".to_string(),
                text: vec!["Готово".to_string()],
            },
            &config,
        )
        .unwrap();

        // Nothing applied, nothing written.
        assert!(!path.exists());
    }

    #[test]
    fn test_review_reject_with_placeholder() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site.json");
        let config = config(Some(path.clone()), None);

        execute(
            Commands::Review {
                entry: "e1".to_string(),
                decision: ReviewDecision::Reject,
                comment: None,
            },
            &config,
        )
        .unwrap();

        let store = load(&path);
        let entry = store.entry(&"e1".into()).unwrap();
        assert_eq!(entry.status, EntryStatus::Rejected);
        assert_eq!(
            entry.comment.as_deref(),
            Some(sitecontrol_workflow::REJECT_PLACEHOLDER_COMMENT)
        );
    }

    #[test]
    fn test_review_of_reviewed_entry_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site.json");
        let config = config(Some(path.clone()), None);

        execute(
            Commands::Review {
                entry: "e2".to_string(),
                decision: ReviewDecision::Reject,
                comment: Some("Нет".to_string()),
            },
            &config,
        )
        .unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_journal_filter_mine_uses_actor_name() {
        let mut config = config(None, None);
        let filter = journal_filter(&config, Some("p1"), Some(EntryStatus::Pending), true);

        assert_eq!(filter.contractor.as_deref(), Some("Иван Петров"));
        assert_eq!(filter.project_id.as_ref().map(|p| p.as_str()), Some("p1"));
        assert_eq!(filter.status, Some(EntryStatus::Pending));

        config.name = Some("Андрей Смирнов".to_string());
        let filter = journal_filter(&config, None, None, true);
        assert_eq!(filter.contractor.as_deref(), Some("Андрей Смирнов"));
    }

    #[test]
    fn test_session_for_defaults_to_required_role() {
        let config = config(None, None);
        assert_eq!(session_for(&config, Action::SubmitEntry).role, Role::Contractor);
        assert_eq!(session_for(&config, Action::ReviewEntry).role, Role::Supervisor);

        let pinned = self::config(None, Some(Role::Contractor));
        assert_eq!(session_for(&pinned, Action::ReviewEntry).role, Role::Contractor);
    }
}
