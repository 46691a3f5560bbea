//! Executes core `HttpRequest`s over the network with ureq.

use std::sync::Arc;
use std::time::Duration;

use courier_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, TrustPool};
use ureq::tls::{Certificate, RootCerts, TlsConfig};
use ureq::Agent;

/// Blocking HTTP(S) transport that trusts exactly the given pool.
///
/// 4xx/5xx responses are returned as data rather than `Err`, so status
/// interpretation stays with `CourierClient::parse_*`.
#[derive(Debug, Clone)]
pub struct Transport {
    agent: Agent,
}

impl Transport {
    pub fn new(pool: &TrustPool, timeout: Duration) -> Self {
        let roots: Vec<Certificate<'static>> = pool
            .certificates()
            .iter()
            .map(|der| Certificate::from_der(der.as_ref()).to_owned())
            .collect();
        let tls = TlsConfig::builder()
            .root_certs(RootCerts::Specific(Arc::new(roots)))
            .build();
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .tls_config(tls)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = match req.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&req.path);
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&req.path);
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &req.body {
                    Some(body) => builder.send(body.as_slice()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!(method = req.method.as_str(), path = %req.path, status, "request complete");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
