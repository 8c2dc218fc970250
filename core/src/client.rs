//! Stateless HTTP request builder and response parser for the data-pool API.
//!
//! # Design
//! `DataPoolClient` holds only the parsed base URL. Each operation is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`. Method, URL template and response
//! handling come from the operation's `OperationDescriptor`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::resource::{Operation, OperationDescriptor, ResponseShape, ResponseTransform};
use crate::types::{CsvDocument, DataPool, GenerateDataPool, QueryParams};

/// Synchronous, stateless client for the data-pool API.
#[derive(Debug, Clone)]
pub struct DataPoolClient {
    base_url: Url,
}

impl DataPoolClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self::from_url(Url::parse(base_url)?))
    }

    pub fn from_url(base_url: Url) -> Self {
        Self { base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn build_query(&self, params: &QueryParams) -> Result<HttpRequest, ApiError> {
        let mut url = self.resolve(Operation::Query, None)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(bodyless(Operation::Query, url))
    }

    pub fn build_get(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let url = self.resolve(Operation::Get, Some(id))?;
        Ok(bodyless(Operation::Get, url))
    }

    pub fn build_create(&self, pool: &DataPool) -> Result<HttpRequest, ApiError> {
        let url = self.resolve(Operation::Create, None)?;
        with_json_body(Operation::Create, url, pool)
    }

    pub fn build_generate(&self, input: &GenerateDataPool) -> Result<HttpRequest, ApiError> {
        let url = self.resolve(Operation::Generate, None)?;
        with_json_body(Operation::Generate, url, input)
    }

    pub fn build_update(&self, id: &str, pool: &DataPool) -> Result<HttpRequest, ApiError> {
        let url = self.resolve(Operation::Update, Some(id))?;
        with_json_body(Operation::Update, url, pool)
    }

    pub fn build_delete(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let url = self.resolve(Operation::Delete, Some(id))?;
        Ok(bodyless(Operation::Delete, url))
    }

    pub fn build_download(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let url = self.resolve(Operation::Download, Some(id))?;
        let mut req = bodyless(Operation::Download, url);
        req.headers.push(("accept".to_string(), "text/csv".to_string()));
        Ok(req)
    }

    pub fn parse_query(&self, response: HttpResponse) -> Result<Vec<DataPool>, ApiError> {
        check_status(&response)?;
        require(
            Operation::Query,
            decode(Operation::Query.descriptor(), &response.body)?,
        )
    }

    /// `Ok(None)` when the server answered with an empty or `null` body.
    pub fn parse_get(&self, response: HttpResponse) -> Result<Option<DataPool>, ApiError> {
        check_status(&response)?;
        decode(Operation::Get.descriptor(), &response.body)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<DataPool, ApiError> {
        check_status(&response)?;
        require(Operation::Create, decode(Operation::Create.descriptor(), &response.body)?)
    }

    pub fn parse_generate(&self, response: HttpResponse) -> Result<DataPool, ApiError> {
        check_status(&response)?;
        require(
            Operation::Generate,
            decode(Operation::Generate.descriptor(), &response.body)?,
        )
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Option<DataPool>, ApiError> {
        check_status(&response)?;
        decode(Operation::Update.descriptor(), &response.body)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_download(&self, response: HttpResponse) -> Result<CsvDocument, ApiError> {
        check_status(&response)?;
        Ok(CsvDocument::new(response.body))
    }

    fn resolve(&self, operation: Operation, id: Option<&str>) -> Result<Url, ApiError> {
        let descriptor = operation.descriptor();
        let id = match id {
            Some(id) if descriptor.requires_id && id.is_empty() => return Err(ApiError::MissingId),
            Some(id) => Some(id),
            None if descriptor.requires_id => return Err(ApiError::MissingId),
            None => None,
        };
        descriptor.url_template.resolve(&self.base_url, id)
    }
}

fn bodyless(operation: Operation, url: Url) -> HttpRequest {
    HttpRequest {
        method: operation.descriptor().method,
        url: url.into(),
        headers: Vec::new(),
        body: None,
    }
}

fn with_json_body<T: Serialize>(
    operation: Operation,
    url: Url,
    payload: &T,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method: operation.descriptor().method,
        url: url.into(),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Decode a JSON body according to the descriptor's shape.
///
/// Bodies the descriptor allows to be empty short-circuit to `None` without
/// touching the parser; for those operations a JSON `null` is `None` too.
/// Everything else must match the shape exactly, so a `null` or an object
/// where an array is expected fails to decode.
fn decode<T: DeserializeOwned>(
    descriptor: &OperationDescriptor,
    body: &str,
) -> Result<Option<T>, ApiError> {
    let text = match descriptor.transform {
        ResponseTransform::DecodeJsonText => body.trim(),
        ResponseTransform::None => body,
    };
    let nullable = descriptor.accepts_empty_body();
    if text.trim().is_empty() {
        if nullable {
            return Ok(None);
        }
        return Err(ApiError::DeserializationError(format!(
            "{}: empty response body",
            descriptor.name
        )));
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    if value.is_null() && nullable {
        return Ok(None);
    }
    let matches_shape = match descriptor.shape {
        ResponseShape::Array => value.is_array(),
        ResponseShape::Object | ResponseShape::OptionalObject => value.is_object(),
        ResponseShape::Raw | ResponseShape::Empty => false,
    };
    if !matches_shape {
        return Err(ApiError::DeserializationError(format!(
            "{}: expected {:?} body, got {}",
            descriptor.name,
            descriptor.shape,
            json_kind(&value)
        )));
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn require<T>(operation: Operation, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| {
        ApiError::DeserializationError(format!("{}: null response body", operation.descriptor().name))
    })
}
