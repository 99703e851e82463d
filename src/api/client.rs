use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ChangeType;

use super::payload::{BlastRadiusData, FileList, FunctionList, GraphData, GraphPayload};

/// What a view asks the backend for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphRequest {
    FileGraph,
    FunctionGraph,
    CallChain(String),
    BlastRadius { file: String, change_type: ChangeType },
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base: Url,
    http: Client,
}

impl ApiClient {
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid API base URL: {base}"))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("API base URL cannot carry paths: {base}"));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    pub fn fetch_graph(&self, request: &GraphRequest) -> Result<GraphPayload> {
        match request {
            GraphRequest::FileGraph => {
                let data: GraphData = self.get_json(&["graph", "data"], &[])?;
                reject_backend_error(data.error.as_deref())?;
                Ok(GraphPayload::FileGraph(data))
            }
            GraphRequest::FunctionGraph => {
                let data: GraphData = self.get_json(&["graph", "functions"], &[])?;
                reject_backend_error(data.error.as_deref())?;
                Ok(GraphPayload::FunctionGraph(data))
            }
            GraphRequest::CallChain(name) => {
                let data: GraphData = self.get_json(&["graph", "function", name.as_str()], &[])?;
                reject_backend_error(data.error.as_deref())?;
                Ok(GraphPayload::FunctionGraph(data))
            }
            GraphRequest::BlastRadius { file, change_type } => {
                let data: BlastRadiusData = self.get_json(
                    &["blast-radius", file.as_str()],
                    &[("change_type", change_type.as_str())],
                )?;
                reject_backend_error(data.error.as_deref())?;
                Ok(GraphPayload::BlastRadius(data))
            }
        }
    }

    pub fn functions(&self) -> Result<FunctionList> {
        self.get_json(&["functions"], &[])
    }

    pub fn files(&self) -> Result<Vec<String>> {
        let list: FileList = self.get_json(&["debug", "files"], &[])?;
        Ok(list
            .files
            .into_iter()
            .flatten()
            .filter(|file| !file.is_empty())
            .collect())
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("API base URL cannot carry paths: {}", self.base))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.endpoint(segments, query)?;
        debug!(%url, "GET");

        let response = self
            .http
            .get(url.clone())
            .send()
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("backend rejected {url}"))?;

        response
            .json::<T>()
            .with_context(|| format!("unexpected JSON from {url}"))
    }
}

fn reject_backend_error(error: Option<&str>) -> Result<()> {
    match error {
        Some(message) => Err(anyhow!("backend reported: {message}")),
        None => Ok(()),
    }
}
