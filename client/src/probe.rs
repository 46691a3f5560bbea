//! Handshake inspection.
//!
//! ureq does not expose the negotiated session, so the "TLS details" command
//! opens its own rustls connection to the same origin, issues `GET /`, and
//! snapshots the connection state once the exchange is over.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use courier_core::{ApiError, ConnectionState, TrustPool};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection};
use ureq::http::Uri;

/// Connect to `url` and capture the TLS session parameters.
///
/// Returns `Ok(None)` for `http://` URLs: there is no session to report.
pub fn inspect(url: &str, pool: &TrustPool, timeout: Duration) -> Result<Option<ConnectionState>, ApiError> {
    let uri: Uri = url
        .parse()
        .map_err(|e| ApiError::Transport(format!("invalid url {url}: {e}")))?;
    match uri.scheme_str() {
        Some("https") => {}
        Some("http") => return Ok(None),
        other => {
            return Err(ApiError::Transport(format!(
                "unsupported scheme {:?}",
                other.unwrap_or_default()
            )))
        }
    }
    let host = uri
        .host()
        .ok_or_else(|| ApiError::Transport(format!("no host in {url}")))?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();
    let port = uri.port_u16().unwrap_or(443);

    let config = ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(tls_error)?
        .with_root_certificates(pool.root_store()?)
        .with_no_client_auth();
    let server_name =
        ServerName::try_from(host.clone()).map_err(|e| ApiError::Transport(format!("{host}: {e}")))?;
    let mut conn = ClientConnection::new(Arc::new(config), server_name).map_err(tls_error)?;

    let mut sock = TcpStream::connect((host.as_str(), port)).map_err(transport_error)?;
    sock.set_read_timeout(Some(timeout))?;
    sock.set_write_timeout(Some(timeout))?;

    {
        let mut tls = rustls::Stream::new(&mut conn, &mut sock);
        let request = format!("GET / HTTP/1.1\r\nHost: {host}:{port}\r\nConnection: close\r\n\r\n");
        tls.write_all(request.as_bytes()).map_err(transport_error)?;

        let mut response = Vec::new();
        match tls.read_to_end(&mut response) {
            Ok(_) => {}
            // peers may close without close_notify once the response is out
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {}
            Err(err) => return Err(transport_error(err)),
        }
        let status_line = response.split(|b| *b == b'\r').next().unwrap_or_default();
        tracing::debug!(status = %String::from_utf8_lossy(status_line), "probe response");
    }

    Ok(Some(ConnectionState {
        protocol_version: conn.protocol_version().map(u16::from),
        cipher_suite: conn.negotiated_cipher_suite().map(|suite| u16::from(suite.suite())),
        peer_certificates: conn.peer_certificates().map(<[_]>::to_vec).unwrap_or_default(),
    }))
}

fn tls_error(err: rustls::Error) -> ApiError {
    ApiError::Transport(format!("tls: {err}"))
}

fn transport_error(err: io::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}
