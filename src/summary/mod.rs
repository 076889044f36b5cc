pub mod client;
pub mod prompt;
pub mod enrich;

use std::sync::Arc;
use log::warn;
use crate::config::Config;
use crate::error::SummaryError;

pub use client::{GeminiClient, ProxyClient, TextGenerator};
pub use enrich::{Enricher, NO_DATA_SUMMARY, SUMMARY_UNAVAILABLE};
pub use prompt::build_prompt;

/// Wires the proxy (and, if enabled, the direct fallback) from configuration
pub fn enricher_from_config(config: &Config) -> Result<Enricher, SummaryError> {
    let http = client::http_client(config.summary_timeout)?;
    let enricher = Enricher::new(Arc::new(ProxyClient::new(config.summary_proxy_url.clone(), http.clone())));

    Ok(match &config.direct_summary {
        Some(direct) => {
            warn!("Direct summarizer fallback is enabled; the API key is used from this process");
            enricher.with_fallback(Arc::new(GeminiClient::new(
                direct.api_key.clone(),
                direct.model.clone(),
                direct.api_url.clone(),
                http,
            )))
        }
        None => enricher,
    })
}
