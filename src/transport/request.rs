use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;

/// Outgoing request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// `application/x-www-form-urlencoded` fields, in insertion order
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
}

/// A request relative to the dispatcher's base URL.
///
/// Interceptors receive it mutably before every attempt, so it stays a plain
/// value type rather than a reqwest builder.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path joined onto the base URL (`"api/account/login"`). A leading `/`
    /// resolves from the host root.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a form field. Replaces a non-form body.
    pub fn form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self.body {
            RequestBody::Form(fields) => fields.push((key.into(), value.into())),
            _ => self.body = RequestBody::Form(vec![(key.into(), value.into())]),
        }
        self
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    pub fn try_header(mut self, name: &str, value: &str) -> Result<Self> {
        self.insert_header(name, value)?;
        Ok(self)
    }

    /// Insert (or overwrite) a header, validating name and value.
    pub fn insert_header(&mut self, name: &str, value: &str) -> Result<()> {
        let (name, value) = parse_header(name, value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Add a parameter wherever this request carries its parameters.
    ///
    /// Form bodies get a field, JSON object bodies get a key, everything else
    /// gets a query pair. An existing parameter with the same name is kept.
    pub fn add_param(&mut self, key: &str, value: &str) {
        match &mut self.body {
            RequestBody::Form(fields) => {
                if !fields.iter().any(|(k, _)| k == key) {
                    fields.push((key.to_string(), value.to_string()));
                }
            }
            RequestBody::Json(serde_json::Value::Object(map)) => {
                map.entry(key.to_string())
                    .or_insert_with(|| serde_json::Value::String(value.to_string()));
            }
            _ => {
                if !self.query.iter().any(|(k, _)| k == key) {
                    self.query.push((key.to_string(), value.to_string()));
                }
            }
        }
    }
}

pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid header name '{}'", name),
            ErrorContext::new()
                .with_field_path(format!("headers.{}", name))
                .with_details(e.to_string()),
        )
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid value for header '{}'", name),
            ErrorContext::new()
                .with_field_path(format!("headers.{}", name))
                .with_details(e.to_string()),
        )
    })?;
    Ok((header_name, header_value))
}

/// A fully received response with a 2xx status.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
