// src/pipeline.rs

//! Sitemap build pipeline.
//!
//! Runs exactly once at startup, before the HTTP server binds: walk the
//! configured backend, fold the discovery events into a sitemap, and
//! serialize it. Any failure here aborts startup; a partial sitemap is
//! never served.

use chrono::{DateTime, Utc};
use url::Url;

use crate::backend::{self, CatalogSource};
use crate::config::Config;
use crate::error::Result;
use crate::models::CatalogEvent;
use crate::sitemap::Sitemap;

/// Statistics of one sitemap build.
#[derive(Debug, Clone)]
pub struct BuildStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub collection_count: usize,
    pub media_object_count: usize,
    /// Total url entries, homepage included
    pub entry_count: usize,
}

/// Result of a completed build.
#[derive(Debug)]
pub struct BuildOutcome {
    /// The serialized sitemap document
    pub xml: String,
    pub stats: BuildStats,
}

/// Build the sitemap from the configured backend.
pub async fn run_build(config: &Config) -> Result<BuildOutcome> {
    let source = backend::from_config(config)?;
    build_with_source(&config.public_url, source.as_ref()).await
}

/// Build the sitemap from an explicit source.
pub async fn build_with_source(
    public_url: &Url,
    source: &dyn CatalogSource,
) -> Result<BuildOutcome> {
    let start_time = Utc::now();
    log::info!("Begin generating sitemap.xml from {} backend", source.name());

    let events = source.discover().await?;
    let (collection_count, media_object_count) = count_events(&events);

    let sitemap = Sitemap::build(public_url, &events);
    let entry_count = sitemap.entry_count();
    let xml = sitemap.into_xml();

    let end_time = Utc::now();
    log::info!(
        "sitemap.xml generation complete: {} collections, {} media objects, {} entries ({} ms)",
        collection_count,
        media_object_count,
        entry_count,
        (end_time - start_time).num_milliseconds()
    );

    Ok(BuildOutcome {
        xml,
        stats: BuildStats {
            start_time,
            end_time,
            collection_count,
            media_object_count,
            entry_count,
        },
    })
}

fn count_events(events: &[CatalogEvent]) -> (usize, usize) {
    let collections = events
        .iter()
        .filter(|e| matches!(e, CatalogEvent::Collection { .. }))
        .count();
    (collections, events.len() - collections)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct FixedSource(Vec<CatalogEvent>);

    #[async_trait]
    impl CatalogSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn discover(&self) -> Result<Vec<CatalogEvent>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_count_events() {
        let events = vec![
            CatalogEvent::collection("c1"),
            CatalogEvent::media_object("o1"),
            CatalogEvent::media_object("o2"),
        ];
        assert_eq!(count_events(&events), (1, 2));
        assert_eq!(count_events(&[]), (0, 0));
    }

    #[tokio::test]
    async fn test_build_produces_expected_document() {
        let public_url = Url::parse("https://av.example.edu/").unwrap();
        let source = FixedSource(vec![
            CatalogEvent::collection("c1"),
            CatalogEvent::media_object("o1"),
            CatalogEvent::media_object("o2"),
        ]);

        let outcome = build_with_source(&public_url, &source).await.unwrap();

        assert_eq!(outcome.stats.collection_count, 1);
        assert_eq!(outcome.stats.media_object_count, 2);
        assert_eq!(outcome.stats.entry_count, 4);
        assert!(outcome.xml.contains("<loc>https://av.example.edu/</loc>"));
        assert!(
            outcome
                .xml
                .contains("<loc>https://av.example.edu/collections/c1</loc>")
        );
        assert!(outcome.stats.end_time >= outcome.stats.start_time);
    }

    #[tokio::test]
    async fn test_empty_catalog_builds_homepage_only() {
        let public_url = Url::parse("https://av.example.edu/").unwrap();
        let outcome = build_with_source(&public_url, &FixedSource(Vec::new()))
            .await
            .unwrap();

        assert_eq!(outcome.stats.entry_count, 1);
        assert_eq!(outcome.xml.matches("<url>").count(), 1);
    }
}
