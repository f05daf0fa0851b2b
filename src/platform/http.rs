// Blocking HTTP for the slow, hour-scale probes

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{DashError, Result};

pub trait HttpClient {
    /// GET `url` and return the body as text. Non-2xx statuses are errors.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String>;
}

#[derive(Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| DashError::config(format!("invalid header name: {}", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| DashError::config(format!("invalid header value: {}", value)))?;
            map.insert(name, value);
        }

        let response = self.client.get(url).headers(map).send()?.error_for_status()?;
        Ok(response.text()?)
    }
}
