/// One-shot console messages printed by `main`
///
/// Progress, the saved file and fatal errors each get a single line on
/// stdout. Writes hold a lock so a line is never interleaved with another.

use lazy_static::lazy_static;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Execute a function with exclusive access to console output
fn status_lock<F>(f: F)
where
    F: FnOnce(),
{
    lazy_static! {
        static ref LOCK: Mutex<()> = Mutex::new(());
    }
    let _guard = LOCK.lock();
    f();
}

/// Print the "export: " prefix for status messages
fn print_status_header() {
    print!("export: ");
}

/// Print colored text to terminal, with fallback to plain text
fn print_color(s: &str, fg: term::color::Color) {
    if !really_print_color(s, fg) {
        print!("{}", s);
    }

    fn really_print_color(s: &str, fg: term::color::Color) -> bool {
        match term::stdout() {
            Some(mut t) => {
                if t.fg(fg).is_err() {
                    return false;
                }
                let _ = t.attr(term::Attr::Bold);
                if write!(t, "{}", s).is_err() {
                    return false;
                }
                let _ = t.reset();
                true
            }
            None => false,
        }
    }
}

/// Print a status message with "export: " prefix (thread-safe)
pub fn status(s: &str) {
    status_lock(|| {
        print_status_header();
        println!("{}", s);
    });
}

/// Report where the CSV was written, with its row count
pub fn print_saved(path: &Path, rows: usize) {
    status_lock(|| {
        print_status_header();
        print_color("saved", term::color::BRIGHT_GREEN);
        println!(" {} ({} rows)", path.display(), rows);
    });
}

/// Print a fatal error as "Error: <message>"
pub fn print_error(msg: &str) {
    status_lock(|| {
        print_color("Error", term::color::BRIGHT_RED);
        println!(": {}", msg);
    });
}
