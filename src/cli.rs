//! Terminal front end: a stdin/stdout REPL over the job board.

use std::fmt::Write as _;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::board::{BulkSaveOutcome, JobBoard, RowState, RowView, SaveOutcome};
use crate::error::BoardError;
use crate::jobs::{Job, JobField, JobFilter, JobId, JobPriority, NewJob};

const HELP: &str = "\
Commands:
  list [all|submitted|in-progress|completed]   reload the job list
  show <id>                                    fetch one job from the backend
  create <description> | <location> | <low|medium|high>
  edit <id>                                    start editing a row
  set <id> <description|location|priority|status> <value>
  save <id>                                    save a row's changes
  cancel <id>                                  discard a row's changes
  bulk                                         save every row being edited
  delete <id>
  archive <id>
  help
  quit";

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `None` reloads with the current filter.
    List(Option<JobFilter>),
    Show(JobId),
    Create(NewJob),
    Edit(JobId),
    Set { id: JobId, field: JobField },
    Save(JobId),
    Cancel(JobId),
    Bulk,
    Delete(JobId),
    Archive(JobId),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));

        match word {
            "list" | "ls" => {
                if rest.is_empty() {
                    Ok(Self::List(None))
                } else {
                    rest.parse().map(|f| Self::List(Some(f)))
                }
            }
            "show" => single_id(rest).map(Self::Show),
            "create" | "new" => parse_create(rest).map(Self::Create),
            "edit" => single_id(rest).map(Self::Edit),
            "set" => parse_set(rest),
            "save" => single_id(rest).map(Self::Save),
            "cancel" => single_id(rest).map(Self::Cancel),
            "bulk" => Ok(Self::Bulk),
            "delete" | "rm" => single_id(rest).map(Self::Delete),
            "archive" => single_id(rest).map(Self::Archive),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "/quit" => Ok(Self::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("Unknown command: {} (try 'help')", other)),
        }
    }
}

fn single_id(rest: &str) -> Result<JobId, String> {
    match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
        [id] => Ok(JobId::new(*id)),
        [] => Err("missing job id".to_string()),
        _ => Err("expected a single job id".to_string()),
    }
}

fn parse_create(rest: &str) -> Result<NewJob, String> {
    let parts: Vec<&str> = rest.split('|').map(str::trim).collect();
    let [description, location, priority] = parts.as_slice() else {
        return Err("usage: create <description> | <location> | <priority>".to_string());
    };
    let priority: JobPriority = priority.parse()?;
    Ok(NewJob::new(*description, *location, priority))
}

fn parse_set(rest: &str) -> Result<Command, String> {
    let mut parts = rest.splitn(3, char::is_whitespace);
    let (Some(id), Some(name)) = (parts.next(), parts.next()) else {
        return Err("usage: set <id> <field> <value>".to_string());
    };
    if id.is_empty() || name.is_empty() {
        return Err("usage: set <id> <field> <value>".to_string());
    }
    let value = parts.next().unwrap_or("").trim();
    let field = JobField::parse(name, value)?;
    Ok(Command::Set {
        id: JobId::new(id),
        field,
    })
}

/// Whether the REPL should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one command against the board, printing its result.
pub async fn execute(board: &JobBoard, command: Command) -> Result<Flow, BoardError> {
    match command {
        Command::List(filter) => {
            match filter {
                Some(filter) => board.load(filter).await?,
                None => board.reload().await?,
            };
            print_board(board).await;
        }
        Command::Show(id) => {
            let job = board.fetch_one(&id).await?;
            println!("{}", describe(&job));
        }
        Command::Create(new_job) => {
            board.create(new_job).await?;
            print_board(board).await;
        }
        Command::Edit(id) => {
            board.start_edit(&id).await?;
            print_board(board).await;
        }
        Command::Set { id, field } => {
            let draft = board.change_field(&id, field).await?;
            println!("{}", describe(&draft));
        }
        Command::Save(id) => {
            if board.save(&id).await? == SaveOutcome::Unchanged {
                println!("No changes to save for {}", id);
            }
            print_board(board).await;
        }
        Command::Cancel(id) => {
            board.cancel_edit(&id).await?;
            print_board(board).await;
        }
        Command::Bulk => {
            match board.bulk_save().await? {
                BulkSaveOutcome::NotOffered => {
                    println!("Bulk save needs at least two rows being edited")
                }
                BulkSaveOutcome::InFlight => println!("A bulk save is already in progress"),
                BulkSaveOutcome::Saved { .. } => {}
            }
            print_board(board).await;
        }
        Command::Delete(id) => {
            board.delete(&id).await?;
            print_board(board).await;
        }
        Command::Archive(id) => {
            board.archive(&id).await?;
            print_board(board).await;
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Read commands from stdin until EOF or `quit`.
pub async fn run(board: Arc<JobBoard>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_board(&board).await;
    eprint!("> ");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            eprint!("> ");
            continue;
        }

        match Command::parse(&line) {
            Ok(command) => match execute(&board, command).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => eprintln!("Error: {}", e),
            },
            Err(e) => eprintln!("{}", e),
        }
        eprint!("> ");
    }

    Ok(())
}

async fn print_board(board: &JobBoard) {
    let rows = board.rows().await;
    let filter = board.filter().await;
    let bulk = board.can_bulk_save().await;
    println!("{}", render_table(&rows, filter, bulk));
    if let Some(error) = board.page_error().await {
        println!("Last error: {}", error);
    }
}

fn describe(job: &Job) -> String {
    format!(
        "{} | {} | {} | {} | {} | submitted {}{}",
        job.id.as_ref().map(JobId::as_str).unwrap_or("-"),
        job.description,
        job.location,
        job.priority,
        job.status,
        job.submitted_date.format("%Y-%m-%d %H:%M"),
        job.last_updated_date
            .map(|d| format!(", updated {}", d.format("%Y-%m-%d %H:%M")))
            .unwrap_or_default(),
    )
}

/// Render the job list as a fixed-width table.
pub fn render_table(rows: &[RowView], filter: JobFilter, bulk_available: bool) -> String {
    let mut out = String::new();
    let banner = if bulk_available {
        "  [Bulk Save available]"
    } else {
        ""
    };
    let _ = writeln!(out, "Jobs ({filter}){banner}");
    let _ = writeln!(
        out,
        "  {:<12} {:<28} {:<16} {:<8} {:<12}",
        "ID", "DESCRIPTION", "LOCATION", "PRIORITY", "STATUS"
    );

    if rows.is_empty() {
        let _ = writeln!(out, "  (no jobs)");
    }

    for row in rows {
        let job = row.shown();
        let marker = match row.state {
            RowState::Editing => '*',
            RowState::Display => ' ',
        };
        let _ = write!(
            out,
            "{marker} {:<12} {:<28} {:<16} {:<8} {:<12}",
            job.id.as_ref().map(JobId::as_str).unwrap_or("-"),
            truncate(&job.description, 28),
            truncate(&job.location, 16),
            job.priority.to_string(),
            job.status.to_string(),
        );
        if let Some(error) = &row.error {
            let _ = write!(out, "  ! {error}");
        }
        out.push('\n');
    }

    out.trim_end().to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
