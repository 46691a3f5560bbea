use std::io;
use std::process::ExitCode;

use courier_client::config::DEFAULT_LOG_FILTER;
use courier_client::{run_menu, ClientSettings, LiveSession};
use courier_core::{Backoff, TrustPool};
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with_writer(io::stderr)
        .init();

    let settings = ClientSettings::from_env()?;
    let pool = TrustPool::load(&settings.cert)?;
    let mut session = LiveSession::new(&settings.url, pool, settings.file.clone(), settings.timeout);

    if session.wait_for_server(settings.wait, &Backoff::default()).timed_out() {
        println!("Server not found");
        return Ok(ExitCode::FAILURE);
    }
    tracing::info!(url = %settings.url, "server available");

    run_menu(&mut session, &mut io::stdin().lock(), &mut io::stdout().lock())?;
    Ok(ExitCode::SUCCESS)
}
