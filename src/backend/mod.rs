// src/backend/mod.rs

//! Catalog backends.
//!
//! One aggregator interface with two implementations, selected by
//! configuration:
//! - `RestCatalog` walks the admin REST API
//! - `SolrCatalog` queries the search index
//!
//! Both report the same ordered stream of discovery events; the sitemap
//! builder does not know which backend produced them.

mod rest;
mod solr;

pub use rest::RestCatalog;
pub use solr::SolrCatalog;

use async_trait::async_trait;

use crate::config::{BackendConfig, Config};
use crate::error::Result;
use crate::models::CatalogEvent;

/// A source of catalog discovery events.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// Walk the backend and report every published collection and media
    /// object, in discovery order.
    async fn discover(&self) -> Result<Vec<CatalogEvent>>;
}

/// Construct the backend selected by the configuration.
pub fn from_config(config: &Config) -> Result<Box<dyn CatalogSource>> {
    Ok(match &config.backend {
        BackendConfig::Rest { api_url, token } => Box::new(RestCatalog::new(
            api_url.clone(),
            token.clone(),
            &config.http,
        )?),
        BackendConfig::Solr { solr_url } => {
            Box::new(SolrCatalog::new(solr_url.clone(), &config.http)?)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let map: std::collections::HashMap<&str, &str> = vars.iter().copied().collect();
        Config::from_lookup(|key| map.get(key).map(|v| v.to_string())).unwrap()
    }

    #[test]
    fn selects_rest_backend() {
        let config = config_from(&[
            (crate::config::PUBLIC_URL_ENV, "https://av.example.edu"),
            (crate::config::API_URL_ENV, "https://av.example.edu/api"),
            (crate::config::API_TOKEN_ENV, "sekrit"),
        ]);

        assert_eq!(from_config(&config).unwrap().name(), "rest");
    }

    #[test]
    fn selects_solr_backend() {
        let config = config_from(&[
            (crate::config::PUBLIC_URL_ENV, "https://av.example.edu"),
            (crate::config::SOLR_URL_ENV, "http://solr.internal:8983"),
        ]);

        assert_eq!(from_config(&config).unwrap().name(), "solr");
    }
}
