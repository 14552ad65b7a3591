//! Thin blocking client for the search-index sink.
//!
//! Wraps the handful of Elasticsearch operations the loaders need: index
//! lifecycle, refresh control, buffered bulk submission, and search.

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;

/// Documents per bulk request.
const LOAD_FACTOR: usize = 5000;

pub struct EsClient {
    client: Client,
    base_url: String,
    auth: Option<(String, String)>,
}

impl EsClient {
    pub fn new(
        host: &str,
        port: u16,
        use_ssl: bool,
        auth: Option<(String, String)>,
    ) -> Result<Self> {
        let scheme = if use_ssl { "https" } else { "http" };
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("building http client")?;

        Ok(EsClient {
            client,
            base_url: format!("{scheme}://{host}:{port}"),
            auth,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}/{path}", self.base_url));
        match &self.auth {
            Some((user, password)) => builder.basic_auth(user, Some(password)),
            None => builder,
        }
    }

    pub fn exists_index(&self, index: &str) -> Result<bool> {
        let response = self
            .request(Method::HEAD, index)
            .send()
            .with_context(|| format!("checking index '{index}'"))?;
        Ok(response.status().is_success())
    }

    pub fn create_index(&self, index: &str, mappings: &Value) -> Result<()> {
        info!("creating index '{index}'");
        let response = self
            .request(Method::PUT, index)
            .json(mappings)
            .send()
            .with_context(|| format!("creating index '{index}'"))?;
        ensure_success(response, &format!("create index '{index}'"))
    }

    pub fn delete_index(&self, index: &str) -> Result<()> {
        info!("deleting index '{index}'");
        let response = self
            .request(Method::DELETE, index)
            .send()
            .with_context(|| format!("deleting index '{index}'"))?;
        ensure_success(response, &format!("delete index '{index}'"))
    }

    pub fn refresh_index(&self, index: &str) -> Result<()> {
        let response = self
            .request(Method::POST, &format!("{index}/_refresh"))
            .send()
            .with_context(|| format!("refreshing index '{index}'"))?;
        ensure_success(response, &format!("refresh index '{index}'"))
    }

    /// Bulk loads run faster with refresh disabled ("-1"); "1s" restores
    /// the default behavior afterwards.
    pub fn set_refresh_interval(&self, index: &str, interval: &str) -> Result<()> {
        debug!("setting refresh_interval={interval} on '{index}'");
        let body = serde_json::json!({ "index": { "refresh_interval": interval } });
        let response = self
            .request(Method::PUT, &format!("{index}/_settings"))
            .json(&body)
            .send()
            .with_context(|| format!("updating settings of index '{index}'"))?;
        ensure_success(response, &format!("update settings of index '{index}'"))
    }

    pub fn disable_refresh(&self, index: &str) -> Result<()> {
        self.set_refresh_interval(index, "-1")
    }

    pub fn enable_refresh(&self, index: &str) -> Result<()> {
        self.set_refresh_interval(index, "1s")
    }

    pub fn search(&self, index: &str, body: &Value) -> Result<Value> {
        let response = self
            .request(Method::POST, &format!("{index}/_search"))
            .json(body)
            .send()
            .with_context(|| format!("searching index '{index}'"))?;
        if !response.status().is_success() {
            bail!(
                "search on index '{index}' failed with status {}",
                response.status()
            );
        }
        response.json().context("parsing search response")
    }

    pub fn delete_doc(&self, index: &str, id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("{index}/_doc/{id}"))
            .send()
            .with_context(|| format!("deleting document '{id}' from '{index}'"))?;
        ensure_success(response, &format!("delete document '{id}' from '{index}'"))
    }

    pub fn submit_doc(&self, index: &str, doc: &Value) -> Result<()> {
        let response = self
            .request(Method::POST, &format!("{index}/_doc"))
            .json(doc)
            .send()
            .with_context(|| format!("submitting document to '{index}'"))?;
        ensure_success(response, &format!("submit document to '{index}'"))
    }

    /// Submits documents through the bulk API in `LOAD_FACTOR`-sized
    /// requests, failing on the first chunk the index rejects.
    pub fn submit_bulk(&self, index: &str, docs: &[Value]) -> Result<()> {
        for chunk in docs.chunks(LOAD_FACTOR) {
            let mut body = String::new();
            for doc in chunk {
                body.push_str("{\"index\":{}}\n");
                body.push_str(&serde_json::to_string(doc).context("serializing bulk document")?);
                body.push('\n');
            }

            let response = self
                .request(Method::POST, &format!("{index}/_bulk"))
                .header("Content-Type", "application/x-ndjson")
                .body(body)
                .send()
                .with_context(|| format!("bulk submitting to '{index}'"))?;

            if !response.status().is_success() {
                bail!(
                    "bulk submit to '{index}' failed with status {}",
                    response.status()
                );
            }

            let result: Value = response.json().context("parsing bulk response")?;
            if result["errors"].as_bool().unwrap_or(false) {
                let reason = first_bulk_error(&result)
                    .unwrap_or_else(|| "unknown item failure".to_string());
                bail!("bulk submit to '{index}' rejected items: {reason}");
            }
            debug!("submitted {} documents to '{index}'", chunk.len());
        }
        Ok(())
    }
}

fn ensure_success(response: reqwest::blocking::Response, action: &str) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(anyhow!("{action} failed with status {status}"))
    }
}

fn first_bulk_error(result: &Value) -> Option<String> {
    result["items"]
        .as_array()?
        .iter()
        .filter_map(|item| item["index"]["error"]["reason"].as_str())
        .next()
        .map(str::to_string)
}
