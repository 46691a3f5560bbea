use courier_server::{build_app, config::Settings, load_server_config, AppOptions};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_env()?;
    let app = build_app(AppOptions {
        inbox: None,
        max_upload: settings.max_upload,
    });
    let listener = TcpListener::bind(&settings.addr).await?;
    let addr = listener.local_addr()?;

    match &settings.tls {
        Some(paths) => {
            let tls = load_server_config(&paths.cert, &paths.key)?;
            tracing::info!(%addr, "listening on https");
            courier_server::serve_tls(listener, tls, app).await?;
        }
        None => {
            tracing::info!(%addr, "listening on http");
            courier_server::serve(listener, app).await?;
        }
    }
    Ok(())
}
