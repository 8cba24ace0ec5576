//! Typeduel server binary.

use tracing_subscriber::EnvFilter;
use typeduel::{TypeduelError, TypeduelServer};

#[tokio::main]
async fn main() -> Result<(), TypeduelError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr =
        std::env::var("TYPEDUEL_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let server = TypeduelServer::builder().bind(&addr).build().await?;
    server.run().await
}
