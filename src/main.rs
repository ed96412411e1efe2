//! tokenbooth: stateless bearer-token issuance and verification.
//! Used by: binary entrypoint.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;
pub mod telemetry;
pub mod token;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env()?;
    let authenticator = auth::StaticAuthenticator::from_env();
    let addr = config.bind_addr.clone();
    let state = state::build_state(config, Box::new(authenticator));
    tracing::info!("starting tokenbooth on {}", addr);

    server::run(state, &addr).await?;
    Ok(())
}
