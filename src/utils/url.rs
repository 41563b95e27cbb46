// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Append path segments to a base URL.
///
/// Segments are percent-encoded as needed; query and fragment of the
/// base are left untouched. A trailing slash on the base does not
/// produce an empty segment.
///
/// # Examples
/// ```
/// use url::Url;
/// use avalon_sitemap::utils::url::join_segments;
///
/// let base = Url::parse("https://av.example.edu/").unwrap();
/// assert_eq!(
///     join_segments(&base, &["collections", "c1"]).as_str(),
///     "https://av.example.edu/collections/c1"
/// );
/// ```
pub fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .expect("base URL is validated as http(s) and therefore cannot be opaque");
        path.pop_if_empty();
        path.extend(segments);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn test_join_with_trailing_slash() {
        assert_eq!(
            join_segments(&base("https://av.example.edu/"), &["media_objects", "o1"]).as_str(),
            "https://av.example.edu/media_objects/o1"
        );
    }

    #[test]
    fn test_join_without_trailing_slash() {
        assert_eq!(
            join_segments(&base("https://av.example.edu"), &["collections", "c1"]).as_str(),
            "https://av.example.edu/collections/c1"
        );
    }

    #[test]
    fn test_join_preserves_base_path() {
        assert_eq!(
            join_segments(&base("https://example.edu/avalon/"), &["collections", "c1"]).as_str(),
            "https://example.edu/avalon/collections/c1"
        );
    }

    #[test]
    fn test_join_encodes_segments() {
        assert_eq!(
            join_segments(&base("https://av.example.edu"), &["media_objects", "av 1"]).as_str(),
            "https://av.example.edu/media_objects/av%201"
        );
    }
}
