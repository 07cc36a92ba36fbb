mod api;
mod cli;
mod columns;
mod console_format;
mod error;
mod fetch;
mod preview;
mod request;
mod runner;
mod session;
mod tabular;
mod ui;

use log::debug;
use std::io;
use std::sync::Arc;

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Set console width override if specified (for testing)
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    if args.list_columns {
        console_format::print_catalog(columns::CATALOG, |id| args.columns.iter().any(|c| c == id));
        return;
    }

    let opts = runner::RunOptions {
        name: args.name.clone(),
        columns: args.columns.clone(),
        output_dir: args.get_output_dir(),
        download: !args.no_download,
        json: args.json,
        console_width: console_format::console_width(),
    };
    let fetcher = fetch::ReportFetcher::from_config(args.api_config());

    if args.interactive {
        let mut app = runner::Interactive::new(Arc::new(fetcher), opts);
        let stdin = io::stdin();
        if let Err(e) = app.run(stdin.lock(), &mut io::stdout()) {
            ui::print_error(&format!("Session ended: {}", e));
            std::process::exit(1);
        }
        debug!("session ended in state {}", app.session().status().as_str());
        return;
    }

    if !args.json {
        ui::status(&format!(
            "generating '{}' ({})",
            if args.name.trim().is_empty() { request::UNNAMED } else { args.name.as_str() },
            if args.columns.is_empty() { "all columns".to_string() } else { format!("{} columns", args.columns.len()) }
        ));
    }

    match runner::run_once(&fetcher, &opts, &mut io::stdout()) {
        Ok(Some(saved)) => ui::print_saved(&saved.path, saved.rows),
        Ok(None) => {}
        Err(e) => {
            ui::print_error(&e);
            std::process::exit(1);
        }
    }
}
