use std::path::PathBuf;
use std::time::Duration;

use courier_core::{
    wait_until_available, ApiError, Availability, Backoff, CourierClient, Person, TlsReport, TrustPool, User,
};

use crate::menu::Session;
use crate::probe;
use crate::transport::Transport;

/// A [`Session`] backed by a real server.
pub struct LiveSession {
    client: CourierClient,
    transport: Transport,
    pool: TrustPool,
    file: PathBuf,
    timeout: Duration,
}

impl LiveSession {
    pub fn new(url: &str, pool: TrustPool, file: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            client: CourierClient::new(url),
            transport: Transport::new(&pool, timeout),
            pool,
            file: file.into(),
            timeout,
        }
    }

    /// Poll the server until it answers 200 or `max_wait` runs out.
    pub fn wait_for_server(&self, max_wait: Duration, backoff: &Backoff) -> Availability {
        let probe = self.client.build_probe();
        wait_until_available(
            || self.transport.execute(&probe).map(|response| response.status),
            max_wait,
            backoff,
        )
    }
}

impl Session for LiveSession {
    fn get_message(&mut self) -> Result<String, ApiError> {
        let req = self.client.build_get_message();
        self.client.parse_get_message(self.transport.execute(&req)?)
    }

    fn send_file(&mut self, person: &Person) -> Result<String, ApiError> {
        let req = self.client.build_send_file(person, &self.file)?;
        self.client.parse_send_file(self.transport.execute(&req)?)
    }

    fn send_user(&mut self, user: &User) -> Result<(), ApiError> {
        let req = self.client.build_create_user(user)?;
        self.client.parse_create_user(self.transport.execute(&req)?)
    }

    fn tls_report(&mut self) -> Result<TlsReport, ApiError> {
        let state = probe::inspect(self.client.base_url(), &self.pool, self.timeout)?;
        Ok(TlsReport::from_state(state.as_ref()))
    }
}
