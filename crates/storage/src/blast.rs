//! NCBI BLAST integration for NuVs analyses

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{doc, to_bson, Bson, Document};
use mongodb::results::UpdateResult;
use regex::Regex;
use serde_json::Value;
use tracing::{info, instrument};

use virion_core::utils::timestamp;

use crate::analyses;
use crate::error::{Result, StorageError};
use crate::mongo::Db;

/// The NCBI BLAST URL all requests go to.
pub const BLAST_URL: &str = "https://blast.ncbi.nlm.nih.gov/Blast.cgi";

/// The HTTP transport BLAST requests go through.
///
/// Injected so tests can run against canned responses.
#[async_trait]
pub trait BlastTransport: Send + Sync {
    async fn get(&self, params: &[(&str, &str)]) -> Result<String>;

    async fn post(&self, params: &[(&str, &str)], form: &[(&str, &str)]) -> Result<String>;
}

/// The reqwest-backed transport used outside of tests.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_base_url(BLAST_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlastTransport for HttpTransport {
    async fn get(&self, params: &[(&str, &str)]) -> Result<String> {
        let response = self.client.get(&self.base_url).query(params).send().await?;

        Ok(response.error_for_status()?.text().await?)
    }

    async fn post(&self, params: &[(&str, &str)], form: &[(&str, &str)]) -> Result<String> {
        let response = self
            .client
            .post(&self.base_url)
            .query(params)
            .form(form)
            .send()
            .await?;

        Ok(response.error_for_status()?.text().await?)
    }
}

/// A client for the NCBI BLAST HTTP interface.
#[derive(Clone)]
pub struct BlastClient {
    transport: Arc<dyn BlastTransport>,
}

impl BlastClient {
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(transport: Arc<dyn BlastTransport>) -> Self {
        Self { transport }
    }

    /// Submits `sequence` as a new megablast search against `nr`.
    ///
    /// Returns the request id and the estimated time to completion in
    /// seconds.
    #[instrument(skip_all)]
    pub async fn initialize(&self, sequence: &str) -> Result<(String, i64)> {
        let body = self
            .transport
            .post(
                &[
                    ("CMD", "Put"),
                    ("DATABASE", "nr"),
                    ("PROGRAM", "blastn"),
                    ("MEGABLAST", "on"),
                    ("HITLIST_SIZE", "5"),
                    ("FILTER", "mL"),
                    ("FORMAT_TYPE", "JSON2"),
                ],
                &[("QUERY", sequence)],
            )
            .await?;

        let (rid, rtoe) = extract_blast_info(&body)?;

        info!(rid = %rid, rtoe, "Submitted BLAST request");

        Ok((rid, rtoe))
    }

    /// True when the search identified by `rid` has finished.
    pub async fn check_rid(&self, rid: &str) -> Result<bool> {
        let body = self
            .transport
            .get(&[("CMD", "Get"), ("FORMAT_OBJECT", "SearchInfo"), ("RID", rid)])
            .await?;

        Ok(!body.contains("Status=WAITING"))
    }

    /// Fetches and formats the finished result for `rid`.
    pub async fn fetch_result(&self, rid: &str) -> Result<Value> {
        let body = self
            .transport
            .get(&[("CMD", "Get"), ("FORMAT_TYPE", "JSON2"), ("RID", rid)])
            .await?;

        let result: Value = serde_json::from_str(&body)?;

        format_blast_content(&result)
    }
}

impl Default for BlastClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Pulls the request id and time estimate out of a BLAST submission page.
pub fn extract_blast_info(body: &str) -> Result<(String, i64)> {
    let block = body
        .split("QBlastInfoBegin")
        .nth(1)
        .and_then(|rest| rest.split("QBlastInfoEnd").next())
        .ok_or_else(|| malformed("no QBlastInfo block"))?;

    let rid = capture(rid_pattern(), block)?;

    let rtoe = capture(rtoe_pattern(), block)?
        .trim()
        .parse()
        .map_err(|_| malformed("RTOE is not a number"))?;

    Ok((rid.trim().to_string(), rtoe))
}

fn rid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"RID = (.+)").expect("pattern compiles"))
}

fn rtoe_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"RTOE = (.+)").expect("pattern compiles"))
}

fn capture(pattern: &Regex, block: &str) -> Result<String> {
    pattern
        .captures(block)
        .and_then(|captures| captures.get(1))
        .map(|matched| matched.as_str().to_string())
        .ok_or_else(|| malformed(format!("no match for {pattern}")))
}

/// Normalizes a raw JSON2 result payload.
///
/// The `BlastOutput2` wrapper is stripped, report keys are lowercased, and
/// the hit list is reduced to the fields the client renders.
pub fn format_blast_content(result: &Value) -> Result<Value> {
    let report = result
        .get("BlastOutput2")
        .and_then(unwrap_single)
        .and_then(|output| output.get("report"))
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("no BlastOutput2 report"))?;

    let mut output = serde_json::Map::new();

    for (key, value) in report {
        if key == "results" {
            let hits = value
                .pointer("/search/hits")
                .and_then(Value::as_array)
                .ok_or_else(|| malformed("no hits in results"))?;

            let formatted = hits
                .iter()
                .map(format_blast_hit)
                .collect::<Result<Vec<Value>>>()?;

            output.insert("hits".to_string(), Value::Array(formatted));
        } else {
            output.insert(key.to_lowercase(), value.clone());
        }
    }

    Ok(Value::Object(output))
}

/// Reduces one hit to its description fields and top-hsp statistics.
pub fn format_blast_hit(hit: &Value) -> Result<Value> {
    let description = hit
        .get("description")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .cloned()
        .unwrap_or(Value::Null);

    let hsp = hit
        .get("hsps")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .ok_or_else(|| malformed("hit without hsps"))?;

    let mut formatted = serde_json::Map::new();

    formatted.insert(
        "accession".to_string(),
        description.get("accession").cloned().unwrap_or(Value::Null),
    );

    formatted.insert(
        "len".to_string(),
        hit.get("len").cloned().unwrap_or(Value::Null),
    );

    formatted.insert(
        "name".to_string(),
        description
            .get("sciname")
            .cloned()
            .unwrap_or_else(|| Value::String("No name".to_string())),
    );

    formatted.insert(
        "title".to_string(),
        description.get("title").cloned().unwrap_or(Value::Null),
    );

    for key in ["identity", "evalue", "align_len", "score", "bit_score", "gaps"] {
        formatted.insert(key.to_string(), hsp.get(key).cloned().unwrap_or(Value::Null));
    }

    Ok(Value::Object(formatted))
}

fn unwrap_single(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) if items.len() == 1 => Some(&items[0]),
        Value::Array(_) => None,
        other => Some(other),
    }
}

fn malformed(reason: impl Into<String>) -> StorageError {
    StorageError::MalformedBlastResponse(reason.into())
}

/// A poller tracking one BLAST search bound to one NuVs sequence.
pub struct NuvsBlast {
    client: BlastClient,
    db: Db,
    analysis_id: String,
    sequence_index: i64,
    rid: String,
    interval: u64,
    ready: bool,
    result: Option<Value>,
}

impl NuvsBlast {
    pub fn new(
        client: BlastClient,
        db: Db,
        analysis_id: impl Into<String>,
        sequence_index: i64,
        rid: impl Into<String>,
    ) -> Self {
        Self {
            client,
            db,
            analysis_id: analysis_id.into(),
            sequence_index,
            rid: rid.into(),
            interval: 3,
            ready: false,
            result: None,
        }
    }

    pub fn rid(&self) -> &str {
        &self.rid
    }

    pub fn ready(&self) -> bool {
        self.ready
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Sleeps for the current interval, then backs the interval off by 5 s.
    pub async fn sleep(&mut self) {
        tokio::time::sleep(Duration::from_secs(self.interval)).await;
        self.interval += 5;
    }

    /// Writes the current BLAST state onto the bound analysis sequence.
    ///
    /// When `ready` is `None` the server is asked. Returns the written
    /// record and the updated analysis document, if one matched.
    pub async fn update(
        &mut self,
        ready: Option<bool>,
        result: Option<Value>,
        error: Option<Value>,
    ) -> Result<(Document, Option<Document>)> {
        self.result = result;

        self.ready = match ready {
            Some(ready) => ready,
            None => self.client.check_rid(&self.rid).await?,
        };

        let error = match &error {
            Some(value) => to_bson(value)?,
            None => Bson::Null,
        };

        let result = match &self.result {
            Some(value) => to_bson(value)?,
            None => Bson::Null,
        };

        let data = doc! {
            "error": error,
            "interval": self.interval as i64,
            "last_checked_at": timestamp(),
            "rid": self.rid.as_str(),
            "ready": self.ready,
            "result": result,
        };

        let document = self
            .db
            .analyses
            .find_one_and_update(
                doc! {
                    "_id": self.analysis_id.as_str(),
                    "results.index": self.sequence_index,
                },
                doc! {
                    "$set": {
                        "results.$.blast": data.clone(),
                        "updated_at": timestamp(),
                    },
                },
                None,
                false,
                false,
            )
            .await?;

        Ok((data, document))
    }

    /// Clears the BLAST record from the bound analysis sequence.
    pub async fn remove(&self) -> Result<UpdateResult> {
        analyses::remove_nuvs_blast(&self.db, &self.analysis_id, self.sequence_index).await
    }
}
