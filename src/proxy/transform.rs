/// Upstream URL derivation.
/// Keeps the inbound path, swaps scheme + host for the configured upstream,
/// and re-appends every query pair in its original order.
use axum::http::Uri;
use url::Url;

pub fn rewrite_url(upstream_base: &str, uri: &Uri) -> anyhow::Result<Url> {
    let mut target = Url::parse(upstream_base.trim_end_matches('/'))?;
    target.set_path(uri.path());
    target.set_query(None);

    if let Some(query) = uri.query() {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        if !pairs.is_empty() {
            target.query_pairs_mut().extend_pairs(pairs);
        }
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_replaces_host_and_keeps_path() {
        let url = rewrite_url("https://api.x.ai", &uri("/v1/models")).unwrap();
        assert_eq!(url.as_str(), "https://api.x.ai/v1/models");
    }

    #[test]
    fn test_query_pairs_keep_order_and_duplicates() {
        let url = rewrite_url("https://api.x.ai", &uri("/v1/models?b=2&a=1&b=3")).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_query_means_no_question_mark() {
        let url = rewrite_url("https://api.x.ai/", &uri("/v1/chat/completions?")).unwrap();
        assert_eq!(url.as_str(), "https://api.x.ai/v1/chat/completions");
    }

    #[test]
    fn test_dot_segments_are_resolved() {
        let url = rewrite_url("https://api.x.ai", &uri("/v1/../admin/secret")).unwrap();
        assert_eq!(url.path(), "/admin/secret");
        let url = rewrite_url("https://api.x.ai", &uri("/v1/%2e%2e/admin")).unwrap();
        assert_eq!(url.path(), "/admin");
        let url = rewrite_url("https://api.x.ai", &uri("/v1/images/./generations")).unwrap();
        assert_eq!(url.path(), "/v1/images/generations");
    }

    #[test]
    fn test_encoded_values_survive() {
        let url = rewrite_url("http://127.0.0.1:9999", &uri("/v1/x?q=a%20b&k=%26")).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("q".to_string(), "a b".to_string()));
        assert_eq!(pairs[1], ("k".to_string(), "&".to_string()));
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(9999));
    }
}
