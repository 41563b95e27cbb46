// src/sitemap.rs

//! Sitemap document construction.
//!
//! Accumulates catalog discovery events into an ordered list of public
//! URLs and serializes them once into a `sitemap.xml` document:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://av.example.edu/</loc>
//!   </url>
//! </urlset>
//! ```
//!
//! The homepage entry is always present and always first; the remaining
//! entries follow discovery order. The document is immutable once built.

use std::borrow::Cow;

use url::Url;

use crate::models::CatalogEvent;
use crate::utils::join_segments;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Public path segment of collection pages.
const COLLECTIONS_SEGMENT: &str = "collections";

/// Public path segment of media object pages.
const MEDIA_OBJECTS_SEGMENT: &str = "media_objects";

/// An ordered sitemap ready for serialization.
#[derive(Debug)]
pub struct Sitemap {
    entries: Vec<UrlEntry>,
}

#[derive(Debug)]
struct UrlEntry {
    loc: String,
}

impl Sitemap {
    /// Build a sitemap from discovery events.
    ///
    /// The first entry is the public homepage; every event then maps to
    /// one entry in event order.
    pub fn build(public_url: &Url, events: &[CatalogEvent]) -> Self {
        let mut entries = Vec::with_capacity(events.len() + 1);
        entries.push(UrlEntry {
            loc: public_url.as_str().to_string(),
        });

        for event in events {
            let loc = match event {
                CatalogEvent::Collection { id } => {
                    join_segments(public_url, &[COLLECTIONS_SEGMENT, id])
                }
                CatalogEvent::MediaObject { id } => {
                    join_segments(public_url, &[MEDIA_OBJECTS_SEGMENT, id])
                }
            };
            entries.push(UrlEntry {
                loc: loc.into(),
            });
        }

        Self { entries }
    }

    /// Number of url entries, homepage included.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Serialize into the final XML document.
    pub fn into_xml(self) -> String {
        let mut xml = String::with_capacity(64 + self.entries.len() * 96);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.entries {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>\n  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    // Common case: nothing to escape
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
