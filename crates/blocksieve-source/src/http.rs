use crate::source::BlocklistSource;
use crate::Result;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpBlocklistSource {
    url: String,
    timeout: Duration,
    user_agent: String,
}

impl HttpBlocklistSource {
    pub fn new(url: impl Into<String>, timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout,
            user_agent: user_agent.into(),
        }
    }
}

impl BlocklistSource for HttpBlocklistSource {
    fn source_name(&self) -> &'static str {
        "http"
    }

    fn fetch_entries(&self) -> Result<Vec<String>> {
        imp::fetch_entries(&self.url, self.timeout, &self.user_agent)
    }
}

#[cfg(feature = "http-fetch")]
mod imp {
    use crate::payload::parse_payload;
    use crate::Result;
    use reqwest::blocking::Client;
    use reqwest::header::ACCEPT;
    use std::time::{Duration, Instant};
    use tracing::debug;
    use url::Url;

    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn fetch_entries(url: &str, timeout: Duration, user_agent: &str) -> Result<Vec<String>> {
        let url = Url::parse(url)?;
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()?;

        let started = Instant::now();
        let response = client
            .get(url)
            .header(ACCEPT, "application/json, text/plain;q=0.9")
            .send()?
            .error_for_status()?;
        let body = response.text()?;
        debug!(
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "blocklist response received"
        );
        parse_payload(&body)
    }
}

#[cfg(not(feature = "http-fetch"))]
mod imp {
    use crate::{Result, SourceError};
    use std::time::Duration;

    pub fn fetch_entries(_url: &str, _timeout: Duration, _user_agent: &str) -> Result<Vec<String>> {
        Err(SourceError::Unavailable(
            "http-fetch feature is disabled".to_string(),
        ))
    }
}
