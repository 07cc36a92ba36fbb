/// Export driver
///
/// Two ways to drive a session:
/// - `run_once`: build one request, submit it, show the preview, save the file
/// - `Interactive`: a command loop where submissions run on worker threads
///   and their outcomes are applied through the session's ticket guard
use crate::api::Transport;
use crate::columns::{self, CATALOG, ColumnSelection};
use crate::console_format::TableWriter;
use crate::error::ExportError;
use crate::fetch::ReportFetcher;
use crate::preview::{self, Preview};
use crate::request::ExportRequest;
use crate::session::{CompletedExport, ExportSession, SessionStatus, SubmissionTicket};
use crate::tabular::TabularResult;
use log::debug;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Settings shared by both modes
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub name: String,
    pub columns: Vec<String>,
    pub output_dir: PathBuf,
    pub download: bool,
    pub json: bool,
    pub console_width: usize,
}

/// A CSV written by `run_once`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedExport {
    pub path: PathBuf,
    pub rows: usize,
}

/// Show a completed export, as JSON or as a table
fn write_export<W: Write>(out: &mut W, export: &CompletedExport, opts: &RunOptions) -> io::Result<()> {
    let preview = Preview::new(&export.result);
    if opts.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&preview.to_json(&export.display_name))?)
    } else {
        TableWriter::new(&mut *out, false).write_preview(&preview, opts.console_width)
    }
}

/// Submit a single export and report it.
///
/// Returns the saved file (if any), or the user-facing error message.
pub fn run_once<T: Transport, W: Write>(
    fetcher: &ReportFetcher<T>,
    opts: &RunOptions,
    out: &mut W,
) -> Result<Option<SavedExport>, String> {
    let mut session = ExportSession::new();
    let request = ExportRequest::build(&opts.name, &opts.columns);
    let ticket = session.begin(&request.name);

    let outcome = fetcher.submit(&request);
    session.complete(ticket, outcome);

    let export = match session.visible_result() {
        Some(export) => export,
        None => return Err(session.error_message().unwrap_or("Export failed").to_string()),
    };

    write_export(out, export, opts).map_err(|e| format!("Failed to print preview: {}", e))?;

    if !opts.download {
        return Ok(None);
    }
    preview::save_csv(export, &opts.output_dir)
        .map(|path| Some(SavedExport { path, rows: export.result.row_count() }))
        .map_err(|e| format!("Failed to save {}: {}", preview::file_name(&export.display_name), e))
}

//
// Interactive mode
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Name(String),
    Toggle(String),
    Columns,
    Submit,
    Wait,
    Status,
    Preview,
    Download,
    Reset,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  name <text>   set the export name (blank for \"unknown\")
  toggle <id>   select or deselect a column
  columns       list columns and the current selection
  submit        request the export
  wait          block until the current submission finishes
  status        show the session state
  preview       show the current result
  download      save the current result as <name>.csv
  reset         clear the session
  help          show this list
  quit          leave";

/// Parse one input line; `Ok(None)` for blank lines
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "name" => Command::Name(rest.to_string()),
        "toggle" if !rest.is_empty() => Command::Toggle(rest.to_string()),
        "toggle" => return Err("usage: toggle <table:field>".to_string()),
        "columns" => Command::Columns,
        "submit" => Command::Submit,
        "wait" => Command::Wait,
        "status" => Command::Status,
        "preview" => Command::Preview,
        "download" => Command::Download,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };
    Ok(Some(command))
}

type Outcome = (SubmissionTicket, Result<TabularResult, ExportError>);

pub struct Interactive<T: Transport + Send + Sync + 'static> {
    fetcher: Arc<ReportFetcher<T>>,
    opts: RunOptions,
    session: ExportSession,
    selection: ColumnSelection,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
}

impl<T: Transport + Send + Sync + 'static> Interactive<T> {
    pub fn new(fetcher: Arc<ReportFetcher<T>>, opts: RunOptions) -> Self {
        let mut selection = ColumnSelection::new();
        for id in &opts.columns {
            selection.toggle(id);
        }
        let (tx, rx) = mpsc::channel();
        Self { fetcher, opts, session: ExportSession::new(), selection, tx, rx }
    }

    pub fn session(&self) -> &ExportSession {
        &self.session
    }

    /// Read commands until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        writeln!(out, "Type 'help' for commands.")?;
        for line in input.lines() {
            let line = line?;
            self.drain(out)?;
            match parse_command(&line) {
                Ok(Some(command)) => {
                    if !self.execute(command, out)? {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => writeln!(out, "{}", e)?,
            }
        }
        Ok(())
    }

    /// Apply any finished submissions without blocking
    fn drain<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        while let Ok((ticket, outcome)) = self.rx.try_recv() {
            self.apply(ticket, outcome, out)?;
        }
        Ok(())
    }

    fn apply<W: Write>(&mut self, ticket: SubmissionTicket, outcome: Result<TabularResult, ExportError>, out: &mut W) -> io::Result<()> {
        let (seq, name) = (ticket.seq(), ticket.display_name().to_string());
        let retryable = outcome.as_ref().err().is_some_and(ExportError::is_retryable);
        if !self.session.complete(ticket, outcome) {
            debug!("dropped outcome of submission #{} ('{}')", seq, name);
            return Ok(());
        }
        match self.session.status() {
            SessionStatus::Success => {
                let rows = self.session.visible_result().map(|e| e.result.row_count()).unwrap_or(0);
                writeln!(out, "export ready: {} rows ('preview' or 'download')", rows)
            }
            _ => {
                writeln!(out, "Error: {}", self.session.error_message().unwrap_or("export failed"))?;
                if retryable {
                    writeln!(out, "('submit' to try again)")?;
                }
                Ok(())
            }
        }
    }

    /// Block until the latest submission has been applied
    fn wait<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        while self.session.status() == SessionStatus::Loading {
            // tx is held by self, so recv only fails if that invariant breaks
            let Ok((ticket, outcome)) = self.rx.recv() else { break };
            self.apply(ticket, outcome, out)?;
        }
        Ok(())
    }

    fn submit<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if !self.session.can_submit() {
            return writeln!(out, "a submission is already in progress ('wait' for it)");
        }

        let request = ExportRequest::from_selection(&self.opts.name, &self.selection);
        let ticket = self.session.begin(&request.name);
        writeln!(out, "generating '{}' ({})...", request.name, self.selection.summary())?;

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = fetcher.submit(&request);
            // The receiver only goes away when the session ends
            let _ = tx.send((ticket, outcome));
        });
        Ok(())
    }

    /// Run one command; returns false when the loop should stop
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<bool> {
        match command {
            Command::Name(name) => {
                self.opts.name = name;
                let shown = if self.opts.name.is_empty() { "(unnamed)" } else { self.opts.name.as_str() };
                writeln!(out, "name: {}", shown)?;
            }
            Command::Toggle(id) => match columns::find(&id) {
                Some(column) => {
                    let on = self.selection.toggle(column.id);
                    writeln!(out, "{} {} ({})", if on { "selected" } else { "removed" }, column.label, self.selection.summary())?;
                }
                None => writeln!(out, "unknown column '{}' (see 'columns')", id)?,
            },
            Command::Columns => {
                let selection = &self.selection;
                TableWriter::new(&mut *out, false).write_catalog(CATALOG, |id| selection.contains(id), self.opts.console_width)?;
                writeln!(out, "{}", selection.summary())?;
            }
            Command::Submit => self.submit(out)?,
            Command::Wait => self.wait(out)?,
            Command::Status => {
                writeln!(out, "status: {}", self.session.status().as_str())?;
                if let Some(message) = self.session.error_message() {
                    writeln!(out, "error: {}", message)?;
                }
                if self.session.visible_result().is_none()
                    && let Some(previous) = self.session.last_result()
                {
                    writeln!(out, "last export: '{}' ({} rows)", previous.display_name, previous.result.row_count())?;
                }
            }
            Command::Preview => match self.session.visible_result() {
                Some(export) => {
                    if self.session.status() == SessionStatus::Loading {
                        writeln!(out, "(a new export is loading; showing '{}')", export.display_name)?;
                    }
                    write_export(out, export, &self.opts)?
                }
                None => writeln!(out, "nothing to preview (status: {})", self.session.status().as_str())?,
            },
            Command::Download => match self.session.visible_result() {
                Some(export) => match preview::save_csv(export, &self.opts.output_dir) {
                    Ok(path) => writeln!(out, "saved {}", path.display())?,
                    Err(e) => writeln!(out, "Error: failed to save: {}", e)?,
                },
                None => writeln!(out, "nothing to download (status: {})", self.session.status().as_str())?,
            },
            Command::Reset => {
                self.session.reset();
                writeln!(out, "session reset")?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod runner_test;
