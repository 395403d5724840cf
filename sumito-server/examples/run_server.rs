//! Example to run the Sumito relay standalone
//!
//! Run with: cargo run -p sumito-server --example run_server

use sumito_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServerConfig { port: 8002 };

    println!("Starting Sumito relay on port {}", config.port);
    println!("API at http://localhost:{}/api/status", config.port);

    run_server(config).await
}
