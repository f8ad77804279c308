//! MBTI Match Server - binary entry point
//!
//! Loads configuration from `match-server.*` files and `MATCH_SERVER__*`
//! environment variables, then serves the match API until shutdown.

use mbti_match::MatchServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env in development
    dotenvy::dotenv().ok();

    // Load configuration
    let config = MatchServerConfig::load()?;

    // Start server
    mbti_match::start_server(config).await?;

    Ok(())
}
