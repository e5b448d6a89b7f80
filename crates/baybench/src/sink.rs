//! Metrics sink client
//!
//! Documents land in an Elasticsearch-style sink under a daily
//! `logstash-YYYY.MM.DD` index, one POST per reading. Every document
//! carries the configured extra-info fields plus the reading itself and
//! a UTC `@timestamp`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::bench::BenchSample;
use crate::config::Config;

/// Index name pattern, one index per UTC day
const INDEX_FORMAT: &str = "logstash-%Y.%m.%d";

/// `@timestamp` format: UTC with six microsecond digits
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f+00:00";

/// Client for one configured sink.
#[derive(Debug)]
pub struct Sink {
    client: reqwest::Client,
    base_url: String,
    extra: Map<String, Value>,
}

impl Sink {
    /// Builds a sink client carrying `extra` into every document.
    pub fn new(config: &Config, extra: Map<String, Value>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.url.clone(),
            extra,
        }
    }

    /// The index documents for instant `now` belong in.
    pub fn index_name(now: DateTime<Utc>) -> String {
        now.format(INDEX_FORMAT).to_string()
    }

    /// Builds the document for one reading.
    ///
    /// Extra-info fields go in first; the fixed fields win on collision.
    pub fn document(&self, sample: &BenchSample, now: DateTime<Utc>) -> Value {
        let mut doc = self.extra.clone();
        doc.insert("app".to_string(), Value::from("swift-bench"));
        doc.insert("method".to_string(), Value::from(sample.method.as_str()));
        doc.insert("items".to_string(), Value::from(sample.items));
        doc.insert("rate".to_string(), Value::from(sample.rate));
        doc.insert(
            "@timestamp".to_string(),
            Value::from(now.format(TIMESTAMP_FORMAT).to_string()),
        );
        Value::Object(doc)
    }

    /// Posts one reading, stamped with the current UTC instant.
    pub async fn post(&self, sample: &BenchSample) -> Result<(), reqwest::Error> {
        let now = Utc::now();
        let url = format!("{}/{}/doc", self.base_url, Self::index_name(now));
        let document = self.document(sample, now);

        self.client
            .post(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .json(&document)
            .send()
            .await?
            .error_for_status()?;

        debug!(url = %url, method = sample.method.as_str(), "posted metric document");
        Ok(())
    }
}
