use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Split an absolute URL into the endpoint used for signing (scheme, host, port, path)
/// and its decoded query pairs. Fragments are dropped.
///
/// A key repeated in the query is an `Error::InvalidParameter`: the map keeps
/// one value per key, so the other would go unsigned.
pub fn url_to_endpoint_and_queries(url: &url::Url) -> Result<(String, BTreeMap<String, String>)> {
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(Error::InvalidParameter(format!(
            "{} is not an absolute http(s) URL",
            url
        )));
    }
    let mut endpoint = url.clone();
    endpoint.set_query(None);
    endpoint.set_fragment(None);

    // queries save into map.
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (k, v) in url.query_pairs() {
        if map.contains_key(&*k) {
            return Err(Error::InvalidParameter(format!(
                "query parameter {} is repeated",
                k
            )));
        }
        map.insert(k.into_owned(), v.into_owned());
    }
    Ok((endpoint.to_string(), map))
}

pub fn parse_url(raw: &str) -> Result<url::Url> {
    url::Url::parse(raw).map_err(|e| Error::InvalidParameter(format!("{}: {}", raw, e)))
}

#[test]
fn test_url_to_endpoint_and_queries() {
    let s = "https://api.twitter.com/2/users/252099921/tweets?max_results=5&tweet.fields=created_at,public_metrics,text#frag";
    let u = url::Url::parse(s).unwrap();
    let (core, map) = url_to_endpoint_and_queries(&u).unwrap();
    assert_eq!(core, "https://api.twitter.com/2/users/252099921/tweets");
    assert_eq!(map.len(), 2);
    assert_eq!(map["max_results"], "5");
    assert_eq!(map["tweet.fields"], "created_at,public_metrics,text");

    let s = "http://example.com/example.html?status=Hello%20World%21&q=%E3%83%91";
    let u = url::Url::parse(s).unwrap();
    let (core, map) = url_to_endpoint_and_queries(&u).unwrap();
    assert_eq!(core, "http://example.com/example.html");
    assert_eq!(map["status"], "Hello World!");
    assert_eq!(map["q"], "パ");

    let n = "https://example.com/";
    let nu = url::Url::parse(n).unwrap();
    let (core, map2) = url_to_endpoint_and_queries(&nu).unwrap();
    assert_eq!(core, n);
    assert_eq!(map2.len(), 0);
}

#[test]
fn test_url_rejects_non_base() {
    let u = url::Url::parse("mailto:someone@example.com").unwrap();
    assert!(url_to_endpoint_and_queries(&u).is_err());
    assert!(parse_url("not a url").is_err());
}

#[test]
fn test_url_rejects_repeated_query_key() {
    let u = url::Url::parse("https://api.example.com/search?a=1&b=2&a=3").unwrap();
    match url_to_endpoint_and_queries(&u) {
        Err(Error::InvalidParameter(msg)) => assert!(msg.contains("a is repeated")),
        other => panic!("unexpected: {:?}", other),
    }
}
