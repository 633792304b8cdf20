//! Interactive REPL (Read-Eval-Print Loop) for SiteControl.
//!
//! The store lives in memory for the whole session. The user picks a role
//! with `/role`; mutating commands are then gated by that role.

use std::path::PathBuf;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper, Result as RlResult};
use sitecontrol_models::{EntryId, EntryStatus, ProjectId, ReviewDecision, Role};
use sitecontrol_workflow::{
    entries_matching, work_item_views, Action, Dashboard, EntryFilter, Session, SiteStore,
};
use tracing::{debug, info, warn};

use crate::commands::report_ignored;
use crate::config::{self, Config};
use crate::context::{Outcome, SiteContext};
use crate::render;

type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

const ROLE_HINT: &str = "Pick a role first: /role contractor | /role supervisor";

/// Help information for a command.
pub struct CommandHelp {
    /// Command name (e.g., "submit").
    pub name: &'static str,
    /// Command aliases (e.g., ["j"]).
    pub aliases: &'static [&'static str],
    /// Brief one-line description.
    pub brief: &'static str,
    /// Usage syntax.
    pub usage: &'static str,
    /// Role required to run it, if any.
    pub role: Option<Role>,
}

/// Static help entries for all commands.
static COMMAND_HELP: &[CommandHelp] = &[
    CommandHelp {
        name: "role",
        aliases: &[],
        brief: "Show or switch the acting role",
        usage: "/role [contractor|supervisor]",
        role: None,
    },
    CommandHelp {
        name: "projects",
        aliases: &["p"],
        brief: "List projects",
        usage: "/projects",
        role: None,
    },
    CommandHelp {
        name: "work",
        aliases: &["w"],
        brief: "List work items with today's status",
        usage: "/work [project]",
        role: None,
    },
    CommandHelp {
        name: "journal",
        aliases: &["j"],
        brief: "Show the work journal, newest first",
        usage: "/journal [pending|accepted|rejected] [mine]",
        role: None,
    },
    CommandHelp {
        name: "submit",
        aliases: &[],
        brief: "Report work performed",
        usage: "/submit <project> <work-item> <text>",
        role: Some(Role::Contractor),
    },
    CommandHelp {
        name: "accept",
        aliases: &[],
        brief: "Accept a pending journal entry",
        usage: "/accept <entry> [comment]",
        role: Some(Role::Supervisor),
    },
    CommandHelp {
        name: "reject",
        aliases: &[],
        brief: "Reject a pending journal entry",
        usage: "/reject <entry> [comment]",
        role: Some(Role::Supervisor),
    },
    CommandHelp {
        name: "inspect",
        aliases: &[],
        brief: "Start an inspection of a work item",
        usage: "/inspect <project> <work-item>",
        role: Some(Role::Supervisor),
    },
    CommandHelp {
        name: "check",
        aliases: &[],
        brief: "Tick or untick checklist item n (from 1)",
        usage: "/check <n>",
        role: Some(Role::Supervisor),
    },
    CommandHelp {
        name: "note",
        aliases: &[],
        brief: "Set notes on checklist item n; empty text clears",
        usage: "/note <n> [text]",
        role: Some(Role::Supervisor),
    },
    CommandHelp {
        name: "defect",
        aliases: &[],
        brief: "Record a defect on the active inspection",
        usage: "/defect",
        role: Some(Role::Supervisor),
    },
    CommandHelp {
        name: "complete",
        aliases: &[],
        brief: "Complete the active inspection",
        usage: "/complete",
        role: Some(Role::Supervisor),
    },
    CommandHelp {
        name: "inspections",
        aliases: &["i"],
        brief: "List inspections and show the active one",
        usage: "/inspections",
        role: None,
    },
    CommandHelp {
        name: "stats",
        aliases: &[],
        brief: "Show dashboard counters",
        usage: "/stats",
        role: None,
    },
    CommandHelp {
        name: "save",
        aliases: &[],
        brief: "Write a snapshot (configured file, or the given path)",
        usage: "/save [file]",
        role: None,
    },
    CommandHelp {
        name: "help",
        aliases: &["h", "?"],
        brief: "Show help",
        usage: "/help [command]",
        role: None,
    },
    CommandHelp {
        name: "quit",
        aliases: &["q", "exit"],
        brief: "Exit the REPL",
        usage: "/quit",
        role: None,
    },
];

/// Tab completion for slash commands.
struct CommandCompleter;

impl CommandCompleter {
    const COMMANDS: &'static [&'static str] = &[
        "/accept", "/check", "/complete", "/defect", "/help", "/inspect",
        "/inspections", "/journal", "/note", "/projects", "/quit", "/reject",
        "/role", "/save", "/stats", "/submit", "/work",
    ];
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let prefix = &line[..pos];
        let matches: Vec<Pair> = Self::COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Journal listing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JournalQuery {
    pub status: Option<EntryStatus>,
    pub mine: bool,
}

/// Slash commands available in the REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Show (None) or switch the acting role
    Role(Option<Role>),
    Projects,
    /// Work items, optionally of one project
    Work(Option<String>),
    Journal(JournalQuery),
    Submit {
        project: String,
        work_item: String,
        text: String,
    },
    Review {
        entry: String,
        decision: ReviewDecision,
        comment: Option<String>,
    },
    Inspect {
        project: String,
        work_item: String,
    },
    /// Toggle checklist item (zero-based)
    Check(usize),
    /// Set notes on checklist item (zero-based)
    Note { index: usize, text: String },
    Defect,
    Complete,
    Inspections,
    Stats,
    /// Write a snapshot, optionally to a given path
    Save(Option<String>),
    /// Show help (optionally for a specific command)
    Help(Option<String>),
    Quit,
    /// Unknown command or bad arguments
    Unknown(String),
    /// Plain text (not a command)
    Text(String),
}

/// Splits `arg` into at most `n` whitespace-separated parts; the last part
/// keeps the rest of the line.
fn split_words(arg: &str, n: usize) -> Vec<&str> {
    let mut parts = Vec::with_capacity(n);
    let mut rest = arg.trim();

    while parts.len() + 1 < n {
        match rest.split_once(char::is_whitespace) {
            Some((head, tail)) => {
                parts.push(head);
                rest = tail.trim_start();
            }
            None => break,
        }
    }
    if !rest.is_empty() {
        parts.push(rest);
    }
    parts
}

/// Parses a 1-based checklist number into a zero-based index.
fn parse_position(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok()?.checked_sub(1)
}

fn usage(name: &str) -> ReplCommand {
    let usage = find_command_help(name).map(|h| h.usage).unwrap_or(name);
    ReplCommand::Unknown(format!("usage: {}", usage))
}

impl ReplCommand {
    /// Parses input into a REPL command.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if input.is_empty() {
            return ReplCommand::Text(String::new());
        }

        let Some(stripped) = input.strip_prefix('/') else {
            return ReplCommand::Text(input.to_string());
        };

        let parts: Vec<&str> = stripped.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let arg = parts
            .get(1)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty());

        match cmd.as_str() {
            "role" => match arg {
                None => ReplCommand::Role(None),
                Some(raw) => match raw.parse::<Role>() {
                    Ok(role) => ReplCommand::Role(Some(role)),
                    Err(_) => ReplCommand::Unknown(format!("unknown role: {}", raw)),
                },
            },
            "projects" | "p" => ReplCommand::Projects,
            "work" | "w" => ReplCommand::Work(arg.map(String::from)),
            "journal" | "j" => Self::parse_journal(arg),
            "submit" => match arg.map(|a| split_words(a, 3)).as_deref() {
                Some([project, work_item, text]) => ReplCommand::Submit {
                    project: project.to_string(),
                    work_item: work_item.to_string(),
                    text: text.to_string(),
                },
                _ => usage("submit"),
            },
            "accept" => Self::parse_review(arg, ReviewDecision::Accept, "accept"),
            "reject" => Self::parse_review(arg, ReviewDecision::Reject, "reject"),
            "inspect" => match arg.map(|a| split_words(a, 2)).as_deref() {
                Some([project, work_item]) => ReplCommand::Inspect {
                    project: project.to_string(),
                    work_item: work_item.to_string(),
                },
                _ => usage("inspect"),
            },
            "check" => match arg.and_then(parse_position) {
                Some(index) => ReplCommand::Check(index),
                None => usage("check"),
            },
            "note" => match arg.map(|a| split_words(a, 2)).as_deref() {
                Some([n, text]) => match parse_position(n) {
                    Some(index) => ReplCommand::Note {
                        index,
                        text: text.to_string(),
                    },
                    None => usage("note"),
                },
                Some([n]) => match parse_position(n) {
                    Some(index) => ReplCommand::Note {
                        index,
                        text: String::new(),
                    },
                    None => usage("note"),
                },
                _ => usage("note"),
            },
            "defect" => ReplCommand::Defect,
            "complete" => ReplCommand::Complete,
            "inspections" | "i" => ReplCommand::Inspections,
            "stats" => ReplCommand::Stats,
            "save" => ReplCommand::Save(arg.map(String::from)),
            "help" | "h" | "?" => ReplCommand::Help(arg.map(String::from)),
            "quit" | "q" | "exit" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(cmd),
        }
    }

    fn parse_journal(arg: Option<&str>) -> Self {
        let mut query = JournalQuery::default();
        for word in arg.unwrap_or_default().split_whitespace() {
            if word.eq_ignore_ascii_case("mine") {
                query.mine = true;
            } else {
                match word.parse::<EntryStatus>() {
                    Ok(status) => query.status = Some(status),
                    Err(_) => return usage("journal"),
                }
            }
        }
        ReplCommand::Journal(query)
    }

    fn parse_review(arg: Option<&str>, decision: ReviewDecision, name: &str) -> Self {
        match arg.map(|a| split_words(a, 2)).as_deref() {
            Some([entry]) => ReplCommand::Review {
                entry: entry.to_string(),
                decision,
                comment: None,
            },
            Some([entry, comment]) => ReplCommand::Review {
                entry: entry.to_string(),
                decision,
                comment: Some(comment.to_string()),
            },
            _ => usage(name),
        }
    }
}

/// Everything a command can touch, independent of the line editor.
pub struct ReplState {
    ctx: SiteContext,
    config: Config,
    session: Option<Session>,
}

impl ReplState {
    pub fn new(ctx: SiteContext, config: Config) -> Self {
        let session = config.role.map(|role| config.session(role));
        Self {
            ctx,
            config,
            session,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &SiteStore {
        self.ctx.store()
    }

    /// Runs a transition under the current session and prints the notice
    /// if it was refused.
    fn apply<T>(
        &mut self,
        action: Action,
        transition: impl FnOnce(&mut SiteStore, &Session) -> sitecontrol_workflow::Result<T>,
    ) -> CommandResult<Option<T>> {
        let Some(session) = self.session.clone() else {
            println!("{}", ROLE_HINT);
            return Ok(None);
        };

        match self
            .ctx
            .apply(&session, action, |store| transition(store, &session))?
        {
            Outcome::Applied(value) => Ok(Some(value)),
            Outcome::Ignored(reason) => {
                report_ignored(&reason);
                Ok(None)
            }
        }
    }

    fn show_active_inspection(&self) {
        if let Some(active) = self.store().active_inspection() {
            print!("{}", render::inspection_detail(active));
        }
    }

    /// Handles a REPL command. Returns Ok(true) if should quit.
    pub fn handle_command(&mut self, cmd: ReplCommand) -> CommandResult<bool> {
        match cmd {
            ReplCommand::Role(None) => match &self.session {
                Some(session) => println!("Acting as {} ({})", session.name, session.role),
                None => println!("{}", ROLE_HINT),
            },
            ReplCommand::Role(Some(role)) => {
                let session = self.config.session(role);
                info!(role = %role, name = %session.name, "Role selected");
                println!("Acting as {} ({})", session.name, session.role);
                self.session = Some(session);
            }
            ReplCommand::Projects => {
                print!("{}", render::projects_table(self.store().projects()));
            }
            ReplCommand::Work(project) => {
                let project_id = project.map(ProjectId::from);
                let views = work_item_views(self.store(), project_id.as_ref(), self.ctx.today());
                print!("{}", render::work_items_table(&views));
            }
            ReplCommand::Journal(query) => {
                let mut filter = EntryFilter::new();
                if let Some(status) = query.status {
                    filter = filter.with_status(status);
                }
                if query.mine {
                    match &self.session {
                        Some(session) => filter = filter.with_contractor(session.name.clone()),
                        None => {
                            println!("{}", ROLE_HINT);
                            return Ok(false);
                        }
                    }
                }
                let entries = entries_matching(self.store(), &filter);
                print!("{}", render::journal_table(&entries));
            }
            ReplCommand::Submit {
                project,
                work_item,
                text,
            } => {
                let today = self.ctx.today();
                let submitted = self.apply(Action::SubmitEntry, |store, session| {
                    store.submit_entry(
                        &text,
                        &project.as_str().into(),
                        &work_item.as_str().into(),
                        &session.name,
                        today,
                    )
                })?;
                if let Some(id) = submitted {
                    println!("Submitted entry {} (pending review)", id);
                }
            }
            ReplCommand::Review {
                entry,
                decision,
                comment,
            } => {
                let entry_id = EntryId::from(entry.as_str());
                let reviewed = self.apply(Action::ReviewEntry, |store, _| {
                    store.review_entry(&entry_id, decision, comment)
                })?;
                if let Some(status) = reviewed {
                    println!("Entry {}: {}", entry, status.label());
                }
            }
            ReplCommand::Inspect { project, work_item } => {
                let today = self.ctx.today();
                let started = self.apply(Action::StartInspection, |store, session| {
                    store.start_inspection(
                        &project.as_str().into(),
                        &work_item.as_str().into(),
                        &session.name,
                        today,
                    )
                })?;
                if started.is_some() {
                    self.show_active_inspection();
                }
            }
            ReplCommand::Check(index) => {
                let toggled = self.apply(Action::EditChecklist, |store, _| {
                    store.toggle_checklist_item(index)
                })?;
                if toggled.is_some() {
                    self.show_active_inspection();
                }
            }
            ReplCommand::Note { index, text } => {
                let noted = self.apply(Action::EditChecklist, |store, _| {
                    store.set_checklist_notes(index, &text)
                })?;
                if noted.is_some() {
                    self.show_active_inspection();
                }
            }
            ReplCommand::Defect => {
                let added = self.apply(Action::AddDefect, |store, _| store.add_defect())?;
                if added.is_some() {
                    self.show_active_inspection();
                }
            }
            ReplCommand::Complete => {
                let completed =
                    self.apply(Action::CompleteInspection, |store, _| store.complete_inspection())?;
                if let Some(id) = completed {
                    println!("Inspection {} completed", id);
                }
            }
            ReplCommand::Inspections => {
                let store = self.store();
                print!(
                    "{}",
                    render::inspections_table(store.inspections(), store.active_inspection())
                );
                self.show_active_inspection();
            }
            ReplCommand::Stats => {
                let stats = Dashboard::compute(self.store(), self.ctx.today());
                print!("{}", render::dashboard(&stats));
            }
            ReplCommand::Save(target) => self.save(target.as_deref())?,
            ReplCommand::Help(topic) => print_help(topic.as_deref()),
            ReplCommand::Quit => return Ok(true),
            ReplCommand::Unknown(what) => {
                println!("Unknown command or arguments: {}. Type /help.", what);
            }
            ReplCommand::Text(text) => {
                if !text.is_empty() {
                    println!("Commands start with '/'. Type /help.");
                }
            }
        }
        Ok(false)
    }

    fn save(&self, target: Option<&str>) -> CommandResult<()> {
        match target {
            Some(raw) => {
                let path = config::expand_path(raw);
                self.ctx.export(&path)?;
                println!("Saved to {}", path.display());
            }
            None => match self.ctx.snapshot_path() {
                Some(path) => {
                    self.ctx.save()?;
                    println!("Saved to {}", path.display());
                }
                None => {
                    self.config.ensure_state_dir()?;
                    let path = self.config.state_dir.join("snapshot.json");
                    self.ctx.export(&path)?;
                    println!("Saved to {}", path.display());
                }
            },
        }
        Ok(())
    }
}

/// REPL state
pub struct Repl {
    editor: Editor<CommandCompleter, DefaultHistory>,
    state: ReplState,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Creates a new REPL instance.
    pub fn new(ctx: SiteContext, config: Config) -> RlResult<Self> {
        let rl_config = rustyline::Config::builder()
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut editor = Editor::with_config(rl_config)?;
        editor.set_helper(Some(CommandCompleter));

        // History is optional; without a writable state dir we just skip it.
        let history_path = match config.ensure_state_dir() {
            Ok(()) => Some(config.history_file()),
            Err(e) => {
                warn!(error = %e, "REPL history disabled");
                None
            }
        };
        if let Some(path) = history_path.as_ref().filter(|p| p.exists()) {
            if let Err(e) = editor.load_history(path) {
                warn!(path = %path.display(), error = %e, "Failed to load REPL history");
            }
        }

        Ok(Self {
            editor,
            state: ReplState::new(ctx, config),
            history_path,
        })
    }

    /// Runs the REPL loop.
    pub fn run(&mut self) -> RlResult<()> {
        println!("SiteControl REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type /help for commands, /quit to exit");
        match self.state.session() {
            Some(session) => println!("Acting as {} ({})", session.name, session.role),
            None => println!("{}", ROLE_HINT),
        }
        println!();

        loop {
            let prompt = self.prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    self.editor.add_history_entry(&line)?;

                    let cmd = ReplCommand::parse(&line);
                    debug!(?cmd, "Parsed command");

                    match self.state.handle_command(cmd) {
                        Ok(true) => break, // Quit requested
                        Ok(false) => {}
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(path) = &self.history_path {
            if let Err(e) = self.editor.save_history(path) {
                warn!(path = %path.display(), error = %e, "Failed to save REPL history");
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Returns the prompt string.
    fn prompt(&self) -> String {
        match self.state.session() {
            Some(session) => format!("sitecontrol [{}]> ", session.role),
            None => "sitecontrol> ".to_string(),
        }
    }
}

/// Finds help for a command by name or alias.
fn find_command_help(name: &str) -> Option<&'static CommandHelp> {
    let name_lower = name.trim_start_matches('/').to_lowercase();
    COMMAND_HELP
        .iter()
        .find(|h| h.name == name_lower || h.aliases.contains(&name_lower.as_str()))
}

/// Prints help information.
fn print_help(topic: Option<&str>) {
    match topic {
        Some(cmd) => match find_command_help(cmd) {
            Some(help) => {
                println!("/{} - {}", help.name, help.brief);
                if !help.aliases.is_empty() {
                    println!("Aliases: {}", help.aliases.join(", "));
                }
                if let Some(role) = help.role {
                    println!("Role: {}", role);
                }
                println!("Usage: {}", help.usage);
            }
            None => println!(
                "Unknown command: {}. Type /help for available commands.",
                cmd
            ),
        },
        None => {
            println!("SiteControl REPL - construction quality control");
            println!();
            for help in COMMAND_HELP {
                let role = help
                    .role
                    .map(|r| format!("  [{}]", r))
                    .unwrap_or_default();
                println!("  {:<46} {}{}", help.usage, help.brief, role);
            }
            println!();
            println!("Type /help <command> for detailed help on a specific command.");
        }
    }
}
