// src/backend/solr.rs

//! Solr search-index catalog backend.
//!
//! Selects every visible media object document sorted by creation time,
//! paging with an explicit offset until the index-reported total is
//! consumed. Collections are derived from document membership and
//! deduplicated on first sight.

use std::collections::HashSet;

use async_trait::async_trait;
use url::Url;

use crate::backend::CatalogSource;
use crate::config::HttpConfig;
use crate::error::Result;
use crate::models::{CatalogEvent, SolrDocument, SolrResultSet, SolrSelectResponse};
use crate::utils::{ApiClient, join_segments};

/// Fixed row count per select request.
const ROWS: u64 = 100;

/// Published media objects: the document is a media object, carries a
/// publisher, and is not hidden.
const QUERY: &str = "has_model_ssim:MediaObject AND publisher_ssim:* AND NOT hidden_bsi:true";

const FIELDS: &str = "id,title_tesi,collection_ssim";

const SORT: &str = "system_create_dtsi asc";

/// Catalog source backed by the Avalon Solr index.
pub struct SolrCatalog {
    solr_url: Url,
    client: ApiClient,
}

impl SolrCatalog {
    /// Create a new Solr catalog source.
    pub fn new(solr_url: Url, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            solr_url,
            client: ApiClient::new(http)?,
        })
    }

    /// Fetch one result window starting at the given offset.
    async fn fetch_page(&self, start: u64) -> Result<SolrResultSet> {
        let url = join_segments(&self.solr_url, &["solr", "avalon", "select"]);

        let response: SolrSelectResponse = self
            .client
            .get_json("solr/avalon/select", |client| {
                client
                    .get(url.clone())
                    .query(&[("q", QUERY), ("fl", FIELDS), ("sort", SORT), ("wt", "json")])
                    .query(&[("start", start.to_string()), ("rows", ROWS.to_string())])
            })
            .await?;

        Ok(response.response)
    }
}

#[async_trait]
impl CatalogSource for SolrCatalog {
    fn name(&self) -> &'static str {
        "solr"
    }

    async fn discover(&self) -> Result<Vec<CatalogEvent>> {
        let mut events = Vec::new();
        let mut seen = HashSet::new();
        let mut consumed: u64 = 0;

        loop {
            let result = self.fetch_page(consumed).await?;
            let returned = result.docs.len() as u64;
            fold_documents(result.docs, &mut seen, &mut events);
            consumed += returned;

            if returned == 0 {
                // Stop even if the index claims more results; an empty
                // window can otherwise never advance the offset.
                if consumed < result.num_found {
                    log::warn!(
                        "Index returned an empty window after {consumed} of {} documents",
                        result.num_found
                    );
                }
                break;
            }

            if next_start(consumed, result.num_found).is_none() {
                break;
            }
        }

        log::info!("Consumed {consumed} media object documents from the index");
        Ok(events)
    }
}

/// Offset of the next window, or `None` once the reported total is
/// consumed.
fn next_start(consumed: u64, num_found: u64) -> Option<u64> {
    (consumed < num_found).then_some(consumed)
}

/// Fold one window of documents into events.
///
/// Every unseen collection membership emits a `Collection` event at the
/// position of its first occurrence, followed by the document's own
/// `MediaObject` event.
fn fold_documents(
    docs: Vec<SolrDocument>,
    seen: &mut HashSet<String>,
    events: &mut Vec<CatalogEvent>,
) {
    for doc in docs {
        for collection_id in &doc.collections {
            if seen.insert(collection_id.clone()) {
                log::debug!("Adding collection {collection_id}");
                events.push(CatalogEvent::collection(collection_id.clone()));
            }
        }

        log::debug!(
            "Adding media object {} ({})",
            doc.id,
            doc.title.as_deref().unwrap_or("")
        );
        events.push(CatalogEvent::media_object(doc.id));
    }
}
