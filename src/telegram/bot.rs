//! Bot instance construction.

use reqwest::ClientBuilder;
use teloxide::prelude::*;

use crate::core::config;

/// Creates a Bot instance with custom or default API URL.
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Failed to create bot (invalid URL, client build failure)
pub fn create_bot(token: &str) -> anyhow::Result<Bot> {
    let client = ClientBuilder::new()
        .timeout(config::network::timeout())
        .build()?;

    let bot = match config::BOT_API_URL.as_deref() {
        Some(api_url) => {
            log::info!("Using custom Bot API URL: {}", api_url);
            let url = url::Url::parse(api_url)
                .map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
            Bot::with_client(token, client).set_api_url(url)
        }
        None => Bot::with_client(token, client),
    };

    Ok(bot)
}
