//! CONSTRUCT queries against a remote SPARQL endpoint
//!
//! The query is sent with the SPARQL 1.1 protocol (POST, `application/sparql-query`
//! body) and the endpoint is asked for Turtle. The answer is parsed like any
//! other Turtle document, so a reply that does not parse is a syntax error
//! naming the endpoint.

use crate::loader::{parse_graph, GraphFormat};
use crate::writer::TurtleWriter;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::path::Path;
use std::time::Duration;
use tessera_core::{Graph, TesseraError, TesseraResult};
use tracing::{debug, info};

const SPARQL_QUERY: &str = "application/sparql-query";
const TURTLE: &str = "text/turtle";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Blocking client for one SPARQL endpoint
#[derive(Debug, Clone)]
pub struct SparqlEndpoint {
    url: String,
    timeout: Duration,
}

impl SparqlEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run a CONSTRUCT (or DESCRIBE) query and parse the returned graph
    pub fn construct(&self, query: &str) -> TesseraResult<Graph> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TesseraError::remote(&self.url, e))?;

        debug!(endpoint = %self.url, bytes = query.len(), "sending query");
        let response = client
            .post(&self.url)
            .header(CONTENT_TYPE, SPARQL_QUERY)
            .header(ACCEPT, TURTLE)
            .body(query.to_string())
            .send()
            .map_err(|e| TesseraError::remote(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            let detail = detail.trim();
            return Err(TesseraError::remote(
                &self.url,
                if detail.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {detail}")
                },
            ));
        }

        let body = response
            .text()
            .map_err(|e| TesseraError::remote(&self.url, e))?;
        let graph = parse_graph(&body, GraphFormat::Turtle, &self.url)?;
        info!(triples = graph.len(), "received graph from {}", self.url);
        Ok(graph)
    }

    /// Run a CONSTRUCT query and write the result to `output` as Turtle
    ///
    /// Returns the number of triples written. Nothing is written when the
    /// request fails.
    pub fn construct_to_path(&self, query: &str, output: &Path) -> TesseraResult<usize> {
        let graph = self.construct(query)?;
        TurtleWriter::new(&graph).write_to_path(output)
    }
}
