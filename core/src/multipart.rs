//! `multipart/form-data` body encoder.
//!
//! Produces the exact byte layout the server-side decoder reads: each part is
//! introduced by `--boundary`, carries a `Content-Disposition` header and is
//! separated from the next by CRLF; the body ends with `--boundary--`.

use std::io::{self, Read};

use uuid::Uuid;

/// In-memory multipart body under construction.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
    parts: usize,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    /// Start a form with a random boundary.
    pub fn new() -> Self {
        Self::with_boundary(format!("courier-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
            parts: 0,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Append a plain form field.
    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.open_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n",
            escape_quotes(name)
        ));
        self.body.extend_from_slice(value.as_bytes());
        self
    }

    /// Append a file part whose content is already in memory.
    pub fn file(&mut self, name: &str, file_name: &str, content: &[u8]) -> &mut Self {
        self.open_file_part(name, file_name);
        self.body.extend_from_slice(content);
        self
    }

    /// Append a file part, copying its content from `reader`.
    pub fn file_from_reader<R: Read>(
        &mut self,
        name: &str,
        file_name: &str,
        reader: &mut R,
    ) -> io::Result<&mut Self> {
        self.open_file_part(name, file_name);
        io::copy(reader, &mut self.body)?;
        Ok(self)
    }

    /// Close the final boundary and return `(content_type, body)`.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        if self.parts > 0 {
            self.body.extend_from_slice(b"\r\n");
        }
        self.body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        let content_type = self.content_type();
        (content_type, self.body)
    }

    fn open_file_part(&mut self, name: &str, file_name: &str) {
        self.open_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n",
            escape_quotes(name),
            escape_quotes(file_name)
        ));
    }

    fn open_part(&mut self, headers: &str) {
        if self.parts > 0 {
            self.body.extend_from_slice(b"\r\n");
        }
        self.body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(headers.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self.parts += 1;
    }
}

fn escape_quotes(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            other => out.push(other),
        }
    }
    out
}
