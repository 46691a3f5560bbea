//! Decoding of the `POST /sendFile` multipart body.

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::Person;

pub const PERSON_FIELD: &str = "Person";
pub const FILE_FIELD: &str = "file";

/// A fully decoded upload: the JSON record plus the attached file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub person: Person,
    pub file_name: String,
    pub content: Bytes,
}

/// Why a request body was rejected. Every variant answers with a fixed
/// plaintext body; the detail only goes to the log.
#[derive(Debug)]
pub enum DecodeError {
    /// Not a multipart request, or the stream broke mid-part.
    Multipart(String, StatusCode),
    MissingField(&'static str),
    Json(serde_json::Error),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Multipart(msg, _) => write!(f, "multipart: {msg}"),
            DecodeError::MissingField(name) => write!(f, "missing form field {name:?}"),
            DecodeError::Json(err) => write!(f, "invalid JSON: {err}"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<MultipartError> for DecodeError {
    fn from(err: MultipartError) -> Self {
        DecodeError::Multipart(err.body_text(), err.status())
    }
}

impl From<MultipartRejection> for DecodeError {
    fn from(rejection: MultipartRejection) -> Self {
        DecodeError::Multipart(rejection.body_text(), rejection.status())
    }
}

impl IntoResponse for DecodeError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "rejecting request");
        match self {
            DecodeError::Multipart(_, status) if status == StatusCode::PAYLOAD_TOO_LARGE => {
                (status, "Payload too large").into_response()
            }
            _ => (StatusCode::BAD_REQUEST, "Bad request").into_response(),
        }
    }
}

/// Pull the `Person` JSON field and the `file` part out of the form.
///
/// Other fields are skipped. When a field appears twice the last one wins.
pub async fn decode_upload(mut multipart: Multipart) -> Result<Upload, DecodeError> {
    let mut person = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(PERSON_FIELD) => {
                let text = field.text().await?;
                person = Some(Person::from_json(text.as_bytes()).map_err(DecodeError::Json)?);
            }
            Some(FILE_FIELD) => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await?;
                file = Some((file_name, content));
            }
            _ => {}
        }
    }

    let person = person.ok_or(DecodeError::MissingField(PERSON_FIELD))?;
    let (file_name, content) = file.ok_or(DecodeError::MissingField(FILE_FIELD))?;
    Ok(Upload {
        person,
        file_name,
        content,
    })
}
