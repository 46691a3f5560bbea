//! Stateless HTTP request builder and response parser for the courier API.
//!
//! # Design
//! `CourierClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of network dependencies.

use std::fs::File;
use std::path::Path;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::types::{Person, User};

/// Form field carrying the JSON-encoded [`Person`].
pub const PERSON_FIELD: &str = "Person";
/// Form field carrying the attached file.
pub const FILE_FIELD: &str = "file";

/// Synchronous, stateless client for the courier API.
#[derive(Debug, Clone)]
pub struct CourierClient {
    base_url: String,
}

impl CourierClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lightweight request used to check that the server is up.
    pub fn build_probe(&self) -> HttpRequest {
        self.build_get_message()
    }

    pub fn build_get_message(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Multipart upload of `person` as JSON plus the file at `file_path`.
    ///
    /// The file is attached under its base name. Fails with `ApiError::Io`
    /// when the file cannot be opened or read.
    pub fn build_send_file(&self, person: &Person, file_path: &Path) -> Result<HttpRequest, ApiError> {
        let json = serde_json::to_string(person).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());

        let mut form = MultipartForm::new();
        form.text(PERSON_FIELD, &json);
        let mut file = File::open(file_path)?;
        form.file_from_reader(FILE_FIELD, &file_name, &mut file)?;
        let (content_type, body) = form.finish();

        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/sendFile", self.base_url),
            headers: vec![("content-type".to_string(), content_type)],
            body: Some(body),
        })
    }

    pub fn build_create_user(&self, input: &User) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_vec(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/user", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_get_message(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, 200)?;
        Ok(response.body)
    }

    pub fn parse_send_file(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, 200)?;
        Ok(response.body)
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 202)?;
        Ok(())
    }
}

/// Map unexpected status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 405 {
        return Err(ApiError::MethodNotAllowed);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
