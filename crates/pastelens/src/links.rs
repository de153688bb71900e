//! URL and domain-name literals.

use std::sync::LazyLock;

use pastelens_crypto::Encoding;
use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::error::{PastelensError, Result};

static HIERARCHICAL_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+\S*$").expect("static URL pattern"));
static OPAQUE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:mailto|tel|sms|urn|data|magnet|geo):\S+$").expect("static URL pattern"));

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

fn has_url_shape(text: &str) -> bool { HIERARCHICAL_URL.is_match(text) || OPAQUE_URL.is_match(text) }

/// Percent-decodes `text` when it contains escapes and the result is UTF-8.
fn percent_decoded(text: &str) -> Option<String> {
    if !text.contains('%') {
        return None;
    }
    let bytes = Encoding::Url.decode(text).ok()?;
    String::from_utf8(bytes).ok()
}

/// A `scheme://…` or `mailto:`-style literal, directly or after percent-decoding.
pub fn looks_like_url(text: &str) -> bool {
    has_url_shape(text) || percent_decoded(text).is_some_and(|decoded| has_url_shape(decoded.trim()))
}

/// Components of a URL literal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UrlDetail {
    /// Input after percent-decoding, when it was encoded as a whole
    pub decoded:  String,
    pub scheme:   String,
    pub host:     Option<String>,
    pub port:     Option<u16>,
    pub path:     String,
    pub query:    Vec<(String, String)>,
    pub fragment: Option<String>,
}

/// Parses a URL literal, percent-decoding it first when the raw text is not
/// already URL-shaped.
pub fn url_detail(text: &str) -> Result<UrlDetail> {
    let decoded = if has_url_shape(text) {
        text.to_owned()
    }
    else {
        percent_decoded(text)
            .map(|decoded| decoded.trim().to_owned())
            .unwrap_or_else(|| text.to_owned())
    };
    let url = Url::parse(&decoded).map_err(|e| {
        PastelensError::InvalidUrl {
            input:  text.to_owned(),
            reason: e.to_string(),
        }
    })?;
    Ok(UrlDetail {
        scheme:   url.scheme().to_owned(),
        host:     url.host_str().map(str::to_owned),
        port:     url.port_or_known_default(),
        path:     url.path().to_owned(),
        query:    url.query_pairs().into_owned().collect(),
        fragment: url.fragment().map(str::to_owned),
        decoded,
    })
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// LDH labels separated by dots, at least two of them, an alphabetic TLD of
/// 2 to 63 letters and at most 253 characters overall. A trailing root dot
/// is allowed.
pub fn looks_like_domain(text: &str) -> bool {
    let name = text.strip_suffix('.').unwrap_or(text);
    if name.is_empty() || name.len() > MAX_DOMAIN_LEN {
        return false;
    }
    let labels: Vec<&str> = name.split('.').collect();
    let Some(tld) = labels.last()
    else {
        return false;
    };
    labels.len() >= 2
        && labels.iter().all(|label| is_valid_label(label))
        && (2 ..= MAX_LABEL_LEN).contains(&tld.len())
        && tld.bytes().all(|b| b.is_ascii_alphabetic())
}

/// A domain split into its labels. Nothing is resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DomainDetail {
    pub name:   String,
    pub labels: Vec<String>,
    pub tld:    String,
}

pub fn domain_detail(text: &str) -> Option<DomainDetail> {
    if !looks_like_domain(text) {
        return None;
    }
    let name = text.strip_suffix('.').unwrap_or(text).to_ascii_lowercase();
    let labels: Vec<String> = name.split('.').map(str::to_owned).collect();
    let tld = labels.last().cloned().unwrap_or_default();
    Some(DomainDetail {
        name,
        labels,
        tld,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_shapes() {
        assert!(looks_like_url("https://example.com/path?q=1"));
        assert!(looks_like_url("ftp://files.example.org"));
        assert!(looks_like_url("mailto:someone@example.com"));
        assert!(looks_like_url("https%3A%2F%2Fexample.com%2Fpath"));
        assert!(!looks_like_url("example.com"));
        assert!(!looks_like_url("https://"));
        assert!(!looks_like_url("just some words"));
        assert!(!looks_like_url("100%"));
    }

    #[test]
    fn test_url_detail() {
        let detail = url_detail("https://user@example.com:8443/a/b?x=1&y=two%20words#frag").unwrap();
        assert_eq!(detail.scheme, "https");
        assert_eq!(detail.host.as_deref(), Some("example.com"));
        assert_eq!(detail.port, Some(8443));
        assert_eq!(detail.path, "/a/b");
        assert_eq!(
            detail.query,
            vec![("x".to_owned(), "1".to_owned()), ("y".to_owned(), "two words".to_owned())]
        );
        assert_eq!(detail.fragment.as_deref(), Some("frag"));
    }

    #[test]
    fn test_url_detail_decodes_encoded_input() {
        let detail = url_detail("http%3A%2F%2Fexample.com%2Fsearch%3Fq%3Drust").unwrap();
        assert_eq!(detail.decoded, "http://example.com/search?q=rust");
        assert_eq!(detail.port, Some(80));
        assert_eq!(detail.query, vec![("q".to_owned(), "rust".to_owned())]);
    }

    #[test]
    fn test_url_detail_rejects_garbage() {
        assert!(matches!(url_detail("not a url"), Err(PastelensError::InvalidUrl { .. })));
    }

    #[test]
    fn test_domains() {
        assert!(looks_like_domain("example.com"));
        assert!(looks_like_domain("sub.example.co.uk"));
        assert!(looks_like_domain("xn--bcher-kva.example."));
        assert!(!looks_like_domain("localhost"));
        assert!(!looks_like_domain("-bad.example.com"));
        assert!(!looks_like_domain("example.c0m"));
        assert!(!looks_like_domain("example.c"));
        assert!(!looks_like_domain("exa mple.com"));
        assert!(!looks_like_domain("192.168.1.1"));
        assert!(!looks_like_domain(&format!("{}.com", "a".repeat(64))));
    }

    #[test]
    fn test_domain_detail() {
        let detail = domain_detail("WWW.Example.COM").unwrap();
        assert_eq!(detail.name, "www.example.com");
        assert_eq!(detail.labels, vec!["www", "example", "com"]);
        assert_eq!(detail.tld, "com");
        assert!(domain_detail("nope").is_none());
    }
}
