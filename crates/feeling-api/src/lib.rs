// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod demo;
mod memory;
mod router;

pub use demo::AdminFaker;
pub use memory::MemoryBackend;
pub use router::Router;

use anyhow::{Context, Result, anyhow, bail};
use feeling_app::{
    Backend, FieldValue, Fields, Page, PageRequest, PaginationMeta, Record, RecordId,
    RecordRequest, Resource, Stats,
};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Blocking REST client for the admin backend.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("api.base_url must not be empty");
        }
        let base_url = Url::parse(trimmed)
            .with_context(|| format!("api.base_url {trimmed:?} is not a valid URL"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "api.base_url must use http or https, got {:?}",
                base_url.scheme()
            );
        }
        if base_url.cannot_be_a_base() {
            bail!("api.base_url {trimmed:?} cannot carry resource paths");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Checks that the backend answers at all.
    pub fn ping(&self, resource: Resource) -> Result<()> {
        self.fetch_stats(resource).map(|_| ())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("api.base_url {} cannot carry paths", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(&self, request: RequestBuilder, what: &str) -> Result<reqwest::blocking::Response> {
        let response = request
            .send()
            .map_err(|error| connection_error(self.base_url(), error))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body)).context(what.to_owned());
        }
        Ok(response)
    }
}

impl Backend for Client {
    fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        let mut url = self.endpoint(&[request.resource.as_str()])?;
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(size) = request.size {
            pairs.push(("page", request.page.to_string()));
            pairs.push(("size", size.to_string()));
        }
        if !request.search.is_empty() {
            pairs.push(("search", request.search.clone()));
        }
        if let Some(status) = request.status {
            pairs.push(("status", status.to_owned()));
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(&pairs);
        }
        log::debug!(
            "op=fetch resource={} url={url}",
            request.resource.as_str()
        );

        let what = format!("list {}", request.resource.as_str());
        let response = self.send(self.http.get(url), &what)?;
        let body: ListResponse = response
            .json()
            .with_context(|| format!("decode {} list", request.resource.as_str()))?;
        body.into_page()
    }

    fn fetch_stats(&self, resource: Resource) -> Result<Stats> {
        let url = self.endpoint(&[resource.as_str(), "stats"])?;
        log::debug!("op=stats resource={} url={url}", resource.as_str());
        let what = format!("{} stats", resource.as_str());
        let response = self.send(self.http.get(url), &what)?;
        let body: Map<String, Value> = response
            .json()
            .with_context(|| format!("decode {} stats", resource.as_str()))?;
        Ok(stats_from_json(body))
    }

    fn execute(&self, request: &RecordRequest) -> Result<()> {
        let resource = request.resource().as_str();
        let builder = match request {
            RecordRequest::Create { fields, .. } => self
                .http
                .post(self.endpoint(&[resource])?)
                .json(&fields_to_json(fields)),
            RecordRequest::Update { id, fields, .. } => self
                .http
                .put(self.endpoint(&[resource, id.as_str()])?)
                .json(&fields_to_json(fields)),
            RecordRequest::Delete { id, .. } => {
                self.http.delete(self.endpoint(&[resource, id.as_str()])?)
            }
            RecordRequest::Action { id, action, .. } => self
                .http
                .patch(self.endpoint(&[resource, id.as_str(), action.as_str()])?),
        };
        log::debug!("op={} resource={resource}", request.op());
        let what = match request.id() {
            Some(id) => format!("{} {resource} {id}", request.op()),
            None => format!("{} {resource}", request.op()),
        };
        self.send(builder, &what)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse {
    Paged(PageEnvelope),
    Bare(Vec<Value>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageEnvelope {
    content: Vec<Value>,
    total_pages: Option<usize>,
    total_elements: Option<usize>,
}

impl ListResponse {
    fn into_page(self) -> Result<Page> {
        let (content, total_pages, total_elements) = match self {
            Self::Paged(envelope) => (
                envelope.content,
                envelope.total_pages,
                envelope.total_elements,
            ),
            Self::Bare(content) => (content, None, None),
        };
        let items = content
            .into_iter()
            .map(record_from_json)
            .collect::<Result<Vec<_>>>()?;
        let total_elements = total_elements.unwrap_or(items.len());
        let total_pages = total_pages.unwrap_or(usize::from(total_elements > 0));
        Ok(Page {
            items,
            pagination: PaginationMeta {
                total_pages,
                total_elements,
            },
        })
    }
}

/// Converts one backend object. `id` may be a string or a number; a missing
/// id leaves the record with a blank identifier.
pub fn record_from_json(value: Value) -> Result<Record> {
    let object = match value {
        Value::Object(object) => object,
        other => bail!("expected a JSON object, got {other}"),
    };
    let mut record = Record::default();
    for (name, value) in object {
        if name == "id" {
            record.id = match value {
                Value::String(text) => RecordId::new(text),
                Value::Number(number) => RecordId::new(number.to_string()),
                Value::Null => RecordId::default(),
                other => bail!("unsupported id {other}"),
            };
            continue;
        }
        record.fields.insert(name, field_from_json(value));
    }
    Ok(record)
}

fn field_from_json(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(flag) => FieldValue::Bool(flag),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => FieldValue::Integer(integer),
            None => FieldValue::Float(number.as_f64().unwrap_or_default()),
        },
        Value::String(text) => FieldValue::Text(text),
        nested => FieldValue::Text(nested.to_string()),
    }
}

pub fn fields_to_json(fields: &Fields) -> Value {
    let object: Map<String, Value> = fields
        .iter()
        .map(|(name, value)| {
            let value = match value {
                FieldValue::Null => Value::Null,
                FieldValue::Bool(flag) => Value::Bool(*flag),
                FieldValue::Integer(integer) => Value::from(*integer),
                FieldValue::Float(float) => Value::from(*float),
                FieldValue::Text(text) => Value::String(text.clone()),
            };
            (name.clone(), value)
        })
        .collect();
    Value::Object(object)
}

fn stats_from_json(body: Map<String, Value>) -> Stats {
    let counts: BTreeMap<String, u64> = body
        .into_iter()
        .filter_map(|(name, value)| value.as_u64().map(|count| (name, count)))
        .collect();
    Stats { counts }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {base_url} -- check api.base_url or start the backend ({error})"
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(message) = parsed.message.filter(|message| !message.is_empty()) {
            return anyhow!("server error ({}): {}", status.as_u16(), message);
        }
        if let Some(error) = parsed.error.filter(|error| !error.is_empty()) {
            return anyhow!("server error ({}): {}", status.as_u16(), error);
        }
    }

    let body = body.trim();
    if !body.is_empty() && body.len() < 100 && !body.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), body);
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{
        Client, ListResponse, clean_error_response, fields_to_json, record_from_json,
        stats_from_json,
    };
    use feeling_app::{FieldValue, Record};
    use reqwest::StatusCode;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn numeric_and_string_ids_both_parse() {
        let numeric = record_from_json(json!({"id": 12, "title": "Gala"})).expect("object");
        assert_eq!(numeric.id.as_str(), "12");
        assert_eq!(numeric.text("title"), "Gala");

        let text = record_from_json(json!({"id": "a-7"})).expect("object");
        assert_eq!(text.id.as_str(), "a-7");

        let missing = record_from_json(json!({"title": "x"})).expect("object");
        assert!(missing.id.is_blank());

        assert!(record_from_json(json!([1, 2])).is_err());
    }

    #[test]
    fn numbers_keep_their_kind() {
        let record =
            record_from_json(json!({"id": 1, "capacity": 40, "price": 12.5, "open": true}))
                .expect("object");
        assert_eq!(record.field("capacity"), &FieldValue::Integer(40));
        assert_eq!(record.field("price"), &FieldValue::Float(12.5));
        assert_eq!(record.field("open"), &FieldValue::Bool(true));
    }

    #[test]
    fn fields_serialize_flat() {
        let record = Record::new("1").with("name", "Karaoke").with("price", 10);
        assert_eq!(
            fields_to_json(&record.fields),
            json!({"name": "Karaoke", "price": 10})
        );
    }

    #[test]
    fn paged_and_bare_lists_decode() {
        let paged: ListResponse = serde_json::from_value(json!({
            "content": [{"id": 1}, {"id": 2}],
            "totalPages": 4,
            "totalElements": 38
        }))
        .expect("paged envelope");
        let page = paged.into_page().expect("page");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total_pages, 4);
        assert_eq!(page.pagination.total_elements, 38);

        let bare: ListResponse = serde_json::from_value(json!([{"id": 1}])).expect("bare list");
        let page = bare.into_page().expect("page");
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(page.pagination.total_elements, 1);
    }

    #[test]
    fn stats_skip_non_numeric_values() {
        let stats = stats_from_json(
            json!({"total": 10, "ACTIVO": 7, "updatedAt": "hoy"})
                .as_object()
                .cloned()
                .unwrap_or_default(),
        );
        assert_eq!(stats.get("total"), 10);
        assert_eq!(stats.get("ACTIVO"), 7);
        assert_eq!(stats.counts.len(), 2);
    }

    #[test]
    fn error_body_prefers_message() {
        let error = clean_error_response(
            StatusCode::CONFLICT,
            r#"{"message":"email already registered","error":"Conflict"}"#,
        );
        assert_eq!(
            error.to_string(),
            "server error (409): email already registered"
        );

        let error = clean_error_response(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(error.to_string(), "server error (502): <html>oops</html>");

        let long = "x".repeat(200);
        let error = clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, &long);
        assert_eq!(error.to_string(), "server returned 500");
    }

    #[test]
    fn base_url_is_validated() {
        assert!(Client::new("", Duration::from_secs(1)).is_err());
        assert!(Client::new("ftp://feeling.app", Duration::from_secs(1)).is_err());
        assert!(Client::new("not a url", Duration::from_secs(1)).is_err());
        let client =
            Client::new("http://localhost:8080/api/", Duration::from_secs(1)).expect("valid");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }
}
