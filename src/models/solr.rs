// src/models/solr.rs

//! Response shapes for the Solr `select` endpoint.

use serde::Deserialize;

/// Envelope of a Solr select response (`wt=json`).
#[derive(Debug, Clone, Deserialize)]
pub struct SolrSelectResponse {
    pub response: SolrResultSet,
}

/// The result window of a select response.
#[derive(Debug, Clone, Deserialize)]
pub struct SolrResultSet {
    /// Total number of matching documents across all pages
    #[serde(rename = "numFound")]
    pub num_found: u64,

    #[serde(default)]
    pub docs: Vec<SolrDocument>,
}

/// One indexed media object document.
///
/// Field names follow the Avalon Solr schema; only the fields requested
/// via `fl` are present.
#[derive(Debug, Clone, Deserialize)]
pub struct SolrDocument {
    pub id: String,

    /// Display title, used for debug logging only
    #[serde(default, rename = "title_tesi")]
    pub title: Option<String>,

    /// Identifiers of the collections this object belongs to
    #[serde(default, rename = "collection_ssim")]
    pub collections: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_select_response() {
        let body = r#"{
            "responseHeader": {"status": 0, "QTime": 3},
            "response": {
                "numFound": 2,
                "start": 0,
                "docs": [
                    {"id": "av:1", "title_tesi": "One", "collection_ssim": ["c1"]},
                    {"id": "av:2"}
                ]
            }
        }"#;

        let parsed: SolrSelectResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response.num_found, 2);
        assert_eq!(parsed.response.docs.len(), 2);
        assert_eq!(parsed.response.docs[0].collections, vec!["c1"]);
        assert!(parsed.response.docs[1].title.is_none());
        assert!(parsed.response.docs[1].collections.is_empty());
    }
}
