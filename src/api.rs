/// HTTP access to the export service
///
/// This module provides:
/// - The endpoint/credential configuration
/// - A `Transport` seam so the fetch pipeline can run against a fake
/// - The real ureq-backed transport
use log::debug;
use std::io::Read;
use std::time::Duration;

const USER_AGENT: &str = concat!("weather-export/", env!("CARGO_PKG_VERSION"));

/// Default request timeout, applied to both calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how to reach the generation endpoint
///
/// Missing values are not an error here; the fetcher reports them when a
/// submission is actually made.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(endpoint: Option<String>, api_key: Option<String>, timeout: Duration) -> Self {
        // Blank environment variables count as unset
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self { endpoint: non_blank(endpoint), api_key: non_blank(api_key), timeout }
    }
}

/// Status and body of an HTTP exchange, whatever the status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The two network calls the pipeline makes
///
/// `Err` is reserved for transport failures (DNS, refused connection,
/// timeout). Any HTTP status, including 4xx/5xx, comes back as `Ok`.
pub trait Transport {
    fn post_json(&self, url: &str, api_key: &str, body: &str) -> Result<HttpReply, String>;
    fn get_text(&self, url: &str) -> Result<HttpReply, String>;
}

/// Transport over a ureq agent
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).user_agent(USER_AGENT).build();
        Self { agent }
    }
}

/// Read the whole body; ureq's `into_string` caps bodies at 10MB
fn read_body(resp: ureq::Response) -> Result<String, String> {
    let len = resp.header("Content-Length").and_then(|s| s.parse::<usize>().ok()).unwrap_or(0);
    let mut body = String::with_capacity(len);
    resp.into_reader().read_to_string(&mut body).map_err(|e| format!("Failed to read response body: {}", e))?;
    Ok(body)
}

fn into_reply(result: Result<ureq::Response, ureq::Error>) -> Result<HttpReply, String> {
    match result {
        Ok(resp) => {
            let status = resp.status();
            Ok(HttpReply::new(status, read_body(resp)?))
        }
        Err(ureq::Error::Status(status, resp)) => {
            debug!("server answered with status {}", status);
            // A failure body we cannot read is still a failure status
            Ok(HttpReply::new(status, read_body(resp).unwrap_or_default()))
        }
        Err(ureq::Error::Transport(t)) => Err(t.to_string()),
    }
}

impl Transport for UreqTransport {
    fn post_json(&self, url: &str, api_key: &str, body: &str) -> Result<HttpReply, String> {
        debug!("POST {} ({} bytes)", url, body.len());
        into_reply(
            self.agent.post(url).set("Content-Type", "application/json").set("x-api-key", api_key).send_string(body),
        )
    }

    fn get_text(&self, url: &str) -> Result<HttpReply, String> {
        debug!("GET {}", url);
        into_reply(self.agent.get(url).call())
    }
}
