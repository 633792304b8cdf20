//! Plain-text tables for terminal output.
//!
//! Every function returns the rendered text so commands and the REPL can
//! print it and tests can inspect it. Column widths count characters, not
//! bytes, so Cyrillic text lines up.

use std::fmt::Write as _;

use sitecontrol_models::{Inspection, JournalEntry, Project};
use sitecontrol_workflow::{Dashboard, WorkItemView};

const DESCRIPTION_WIDTH: usize = 48;
const TITLE_WIDTH: usize = 28;

/// Truncates to `max_len` characters, marking the cut with "...".
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn id_width<'a>(ids: impl Iterator<Item = &'a str>) -> usize {
    ids.map(|id| id.chars().count()).max().unwrap_or(0).max(2)
}

pub fn projects_table(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects.\n".to_string();
    }

    let w = id_width(projects.iter().map(|p| p.id.as_str()));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w$}  {:<20}  {:<12}  {:<23}  {:>5}  STATUS",
        "ID", "NAME", "LOCATION", "PERIOD", "DONE"
    );
    for p in projects {
        let _ = writeln!(
            out,
            "{:<w$}  {:<20}  {:<12}  {:<23}  {:>4}%  {}",
            p.id.as_str(),
            truncate(&p.name, 20),
            truncate(&p.location, 12),
            format!("{} - {}", p.start_date, p.end_date),
            p.progress,
            p.status.label(),
        );
    }
    out
}

pub fn work_items_table(items: &[WorkItemView<'_>]) -> String {
    if items.is_empty() {
        return "No work items.\n".to_string();
    }

    let w = id_width(items.iter().map(|v| v.item.id.as_str()));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w$}  {:<8}  {:<TITLE_WIDTH$}  {:<10}  {:>5}  {:<12}  ASSIGNEE",
        "ID", "PROJECT", "TITLE", "DEADLINE", "DONE", "STATUS"
    );
    for view in items {
        let item = view.item;
        let _ = writeln!(
            out,
            "{:<w$}  {:<8}  {:<TITLE_WIDTH$}  {:<10}  {:>4}%  {:<12}  {}",
            item.id.as_str(),
            item.project_id.as_str(),
            truncate(&item.title, TITLE_WIDTH),
            item.deadline.to_string(),
            item.progress,
            view.effective_status.label(),
            item.assignee.as_deref().unwrap_or("-"),
        );
    }
    out
}

pub fn journal_table(entries: &[&JournalEntry]) -> String {
    if entries.is_empty() {
        return "No journal entries.\n".to_string();
    }

    let w = id_width(entries.iter().map(|e| e.id.as_str()));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w$}  {:<10}  {:<8}  {:<8}  {:<16}  {:<11}  DESCRIPTION",
        "ID", "DATE", "PROJECT", "WORK", "CONTRACTOR", "STATUS"
    );
    for e in entries {
        let _ = writeln!(
            out,
            "{:<w$}  {:<10}  {:<8}  {:<8}  {:<16}  {:<11}  {}",
            e.id.as_str(),
            e.submitted_on.to_string(),
            e.project_id.as_str(),
            e.work_item_id.as_str(),
            truncate(&e.contractor, 16),
            e.status.label(),
            truncate(&e.description, DESCRIPTION_WIDTH),
        );
        if let Some(comment) = &e.comment {
            let _ = writeln!(out, "{:<w$}  > {}", "", comment);
        }
    }
    out
}

/// Summary line per inspection; the active one is marked with `*`.
pub fn inspections_table(completed: &[Inspection], active: Option<&Inspection>) -> String {
    if completed.is_empty() && active.is_none() {
        return "No inspections.\n".to_string();
    }

    let all: Vec<(&Inspection, bool)> = completed
        .iter()
        .map(|i| (i, false))
        .chain(active.map(|i| (i, true)))
        .collect();

    let w = id_width(all.iter().map(|(i, _)| i.id.as_str()));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<w$}  {:<10}  {:<TITLE_WIDTH$}  {:>7}  {:>7}  STATUS",
        "ID", "DATE", "TITLE", "CHECKED", "DEFECTS"
    );
    for (inspection, is_active) in all {
        let _ = writeln!(
            out,
            "{} {:<w$}  {:<10}  {:<TITLE_WIDTH$}  {:>7}  {:>7}  {}",
            if is_active { "*" } else { " " },
            inspection.id.as_str(),
            inspection.date.to_string(),
            truncate(&inspection.title, TITLE_WIDTH),
            format!("{}/{}", inspection.checked_count(), inspection.checklist.len()),
            inspection.open_defect_count(),
            inspection.status,
        );
    }
    out
}

/// Full view of one inspection: numbered checklist and defects.
pub fn inspection_detail(inspection: &Inspection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", inspection.title, inspection.id);
    let _ = writeln!(
        out,
        "Inspector: {}, {}, {}",
        inspection.inspector, inspection.date, inspection.status
    );
    let _ = writeln!(out, "Checklist:");
    for (n, item) in inspection.checklist.iter().enumerate() {
        let mark = if item.completed { "x" } else { " " };
        match &item.notes {
            Some(notes) => {
                let _ = writeln!(out, "  [{}] {}. {} ({})", mark, n + 1, item.title, notes);
            }
            None => {
                let _ = writeln!(out, "  [{}] {}. {}", mark, n + 1, item.title);
            }
        }
    }
    if inspection.defects.is_empty() {
        let _ = writeln!(out, "Defects: none");
    } else {
        let _ = writeln!(out, "Defects:");
        for defect in &inspection.defects {
            let _ = writeln!(
                out,
                "  - {} [{}, {}]: {}",
                defect.title, defect.severity, defect.status, defect.description
            );
        }
    }
    out
}

pub fn dashboard(stats: &Dashboard) -> String {
    let rows = [
        ("Active projects", stats.active_projects),
        ("Completed work items", stats.completed_work_items),
        ("Open defects", stats.open_defects),
        ("Pending entries", stats.pending_entries),
        ("Overdue work items", stats.overdue_work_items),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{:<22} {:>4}", label, value);
    }
    out
}
