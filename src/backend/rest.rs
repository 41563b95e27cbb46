// src/backend/rest.rs

//! Admin REST API catalog backend.
//!
//! Walks `admin/collections.json` and each listed collection's
//! `items.json` in fixed-size pages, authenticated with a static API
//! key header. A page shorter than the page size is the last page.

use async_trait::async_trait;
use url::Url;

use crate::backend::CatalogSource;
use crate::config::HttpConfig;
use crate::error::Result;
use crate::models::{CatalogEvent, CollectionRecord, ItemRecord, ItemsPage};
use crate::utils::{ApiClient, join_segments};

/// Fixed page size for both collections and items requests.
const PAGE_SIZE: usize = 100;

/// Request header carrying the static API key.
const API_KEY_HEADER: &str = "Avalon-Api-Key";

/// Catalog source backed by the Avalon admin REST API.
pub struct RestCatalog {
    api_url: Url,
    token: String,
    client: ApiClient,
}

impl RestCatalog {
    /// Create a new REST catalog source.
    pub fn new(api_url: Url, token: String, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            api_url,
            token,
            client: ApiClient::new(http)?,
        })
    }

    /// Fetch every collection record, page by page.
    async fn fetch_collections(&self) -> Result<Vec<CollectionRecord>> {
        let url = join_segments(&self.api_url, &["admin", "collections.json"]);
        let mut collections = Vec::new();
        let mut page: u32 = 1;

        loop {
            let batch: Vec<CollectionRecord> = self
                .client
                .get_json("admin/collections.json", |client| {
                    client
                        .get(url.clone())
                        .header(API_KEY_HEADER, self.token.as_str())
                        .query(&[
                            ("per_page", PAGE_SIZE.to_string()),
                            ("page", page.to_string()),
                        ])
                })
                .await?;

            let returned = batch.len();
            collections.extend(batch);

            if !has_next_page(returned) {
                break;
            }
            page += 1;
        }

        Ok(collections)
    }

    /// Fetch one page of a collection's items.
    async fn fetch_items_page(&self, collection_id: &str, page: u32) -> Result<ItemsPage> {
        let url = join_segments(
            &self.api_url,
            &["admin", "collections", collection_id, "items.json"],
        );
        let context = format!("admin/collections/{collection_id}/items.json");

        self.client
            .get_json(&context, |client| {
                client
                    .get(url.clone())
                    .header(API_KEY_HEADER, self.token.as_str())
                    .query(&[
                        ("per_page", PAGE_SIZE.to_string()),
                        ("page", page.to_string()),
                    ])
            })
            .await
    }
}

#[async_trait]
impl CatalogSource for RestCatalog {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn discover(&self) -> Result<Vec<CatalogEvent>> {
        let collections = self.fetch_collections().await?;
        log::info!("Fetched {} collections", collections.len());

        let mut events = Vec::new();
        for collection in collections {
            // Collections without published objects are skipped entirely;
            // no item pages are requested for them.
            if !collection.has_published_objects() {
                continue;
            }

            log::debug!("Adding collection {} ({})", collection.id, collection.name);
            events.push(CatalogEvent::collection(collection.id.clone()));

            let mut page: u32 = 1;
            loop {
                let items = self.fetch_items_page(&collection.id, page).await?;
                let returned = items.len();
                append_published(&items, &mut events)?;

                if !has_next_page(returned) {
                    break;
                }
                page += 1;
            }
        }

        Ok(events)
    }
}

/// Pagination continues only while pages come back full.
fn has_next_page(returned: usize) -> bool {
    returned >= PAGE_SIZE
}

/// Append events for the published objects of one items page.
///
/// The page maps object id to record; iteration follows wire order.
fn append_published(page: &ItemsPage, events: &mut Vec<CatalogEvent>) -> Result<()> {
    for (id, value) in page {
        let record: ItemRecord = serde_json::from_value(value.clone())?;
        if record.published {
            log::debug!("Adding media object {} ({})", id, record.title);
            events.push(CatalogEvent::media_object(id.clone()));
        }
    }
    Ok(())
}
