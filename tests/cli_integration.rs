/// Integration tests for the weather-export binary
///
/// These run the built binary end to end. Network tests talk to a
/// throwaway HTTP server on localhost, so no external service is needed.
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

// Helper to run the binary without any ambient endpoint configuration
fn run_export(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_weather-export"))
        .args(args)
        .env_remove("WEATHER_EXPORT_API_URL")
        .env_remove("WEATHER_EXPORT_API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run weather-export {}: {}", args.join(" "), e))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Answer `count` requests: POST gets a link to /report.csv, GET gets `csv`
fn serve_export(count: usize, csv: &'static str) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let base = format!("http://{}", listener.local_addr().unwrap());
    let link = format!("{}/report.csv", base);

    let handle = thread::spawn(move || {
        for _ in 0..count {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();

            let reply = if request_line.starts_with("POST") {
                format!(r#"{{"download_link":"{}"}}"#, link)
            } else {
                csv.to_string()
            };
            write!(stream, "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}", reply.len(), reply)
                .unwrap();
        }
    });

    (base, handle)
}

#[test]
fn test_list_columns() {
    let output = run_export(&["--list-columns", "--console-width", "120"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("weather_readings:date"));
    assert!(text.contains("City Name"));
    assert!(text.contains("countries:subregion"));
}

#[test]
fn test_unknown_column_is_rejected() {
    let output = run_export(&["--column", "cities:population"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Unknown column 'cities:population'"));
}

#[test]
fn test_missing_configuration_fails_at_submit() {
    let output = run_export(&["--no-download"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("not configured"));
}

#[test]
fn test_help_mentions_environment() {
    let output = run_export(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("WEATHER_EXPORT_API_URL"));
}

#[test]
fn test_export_end_to_end() {
    let (base, server) = serve_export(2, "City Name,Date\nOslo,2025-01-01\nBergen,2025-01-01\n");
    let dir = tempfile::tempdir().unwrap();
    let endpoint = format!("{}/generate", base);
    let out_dir = dir.path().to_str().unwrap();

    let output = run_export(&[
        "--api-url",
        &endpoint,
        "--api-key",
        "secret",
        "--name",
        "nordic",
        "-c",
        "cities:name,weather_readings:date",
        "--output-dir",
        out_dir,
    ]);
    server.join().unwrap();

    assert!(output.status.success(), "stdout: {}", stdout(&output));
    assert!(stdout(&output).contains("Previewing 2 Records"));

    let saved = Path::new(out_dir).join("nordic.csv");
    assert_eq!(std::fs::read_to_string(saved).unwrap(), "City Name,Date\nOslo,2025-01-01\nBergen,2025-01-01");
}
