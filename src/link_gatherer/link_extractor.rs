use std::fmt::Display;

use futures::{Stream, StreamExt};
use html_escape::decode_html_entities;
use lol_html::{element, HtmlRewriter, OutputSink, Settings};
use tracing::debug;
use url::{Position, Url};

use super::url_validator::validate;

/// The rewriter is only used as a tokenizer, so its output is dropped.
struct Discard;

impl OutputSink for Discard {
    fn handle_chunk(&mut self, _: &[u8]) {}
}

/// Root-relative hrefs are anchored on the source's scheme, host and port.
fn resolve_root_relative(source: &Url, href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", &source[..Position::BeforePath], href)
    } else {
        href.to_string()
    }
}

fn collect_href(source: &Url, href: &str, links: &mut Vec<Url>) {
    let candidate = resolve_root_relative(source, href);
    match validate(&candidate) {
        Ok(found) => {
            debug!(found = %found, "accepted link");
            links.push(found);
        }
        Err(err) => debug!(candidate = %candidate, error = %err, "rejected link"),
    }
}

/// Reads `body` chunk by chunk and returns every valid http(s) link found in
/// the `href` attributes of its anchor tags, in document order.
///
/// Tokenizer and stream failures end the scan early but are only logged; the
/// links gathered up to that point are still returned.
#[tracing::instrument(skip_all, fields(url = %source))]
pub async fn extract_links<S, B, E>(source: &Url, body: S) -> Vec<Url>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut links = Vec::new();
    {
        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![
                    element!("*", |el| {
                        debug!(tag = %el.tag_name(), "start tag");
                        Ok(())
                    }),
                    element!("a", |el| {
                        for attr in el.attributes().iter().filter(|a| a.name() == "href") {
                            let raw = attr.value();
                            let href = decode_html_entities(&raw);
                            if href.is_empty() {
                                continue;
                            }
                            collect_href(source, &href, &mut links);
                        }
                        Ok(())
                    }),
                ],
                strict: false,
                ..Settings::new()
            },
            Discard,
        );

        let mut body = std::pin::pin!(body);
        let mut healthy = true;
        while let Some(chunk) = body.next().await {
            let written = match chunk {
                Ok(bytes) => rewriter.write(bytes.as_ref()).map_err(|e| e.to_string()),
                Err(err) => Err(err.to_string()),
            };
            if let Err(err) = written {
                debug!(error = %err, "stopped reading body");
                healthy = false;
                break;
            }
        }
        if healthy {
            if let Err(err) = rewriter.end() {
                debug!(error = %err, "stopped reading body");
            }
        }
    }
    tracing::info!("Found {} links", links.len());
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    type Chunk = Result<&'static str, String>;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    async fn extract(source: &str, chunks: Vec<Chunk>) -> Vec<Url> {
        extract_links(&url(source), stream::iter(chunks)).await
    }

    #[tokio::test]
    async fn no_links_in_empty_body() {
        assert_eq!(extract("http://www.example.com", vec![]).await, vec![]);
        assert_eq!(extract("http://www.example.com", vec![Ok("")]).await, vec![]);
    }

    #[tokio::test]
    async fn single_link() {
        let links = extract(
            "http://www.example.com",
            vec![Ok(r#"<a href="http://www.example.com">Example</a>"#)],
        )
        .await;
        assert_eq!(links, vec![url("http://www.example.com")]);
        assert_eq!(links[0].scheme(), "http");
        assert_eq!(links[0].host_str(), Some("www.example.com"));
    }

    #[tokio::test]
    async fn multiple_links_keep_document_order() {
        let links = extract(
            "http://www.example.com",
            vec![Ok(concat!(
                r#"<a href="http://www.example.com">Example</a>"#,
                r#"<a href="https://www.example.com">Example</a>"#
            ))],
        )
        .await;
        assert_eq!(
            links,
            vec![url("http://www.example.com"), url("https://www.example.com")]
        );
    }

    #[tokio::test]
    async fn invalid_link_is_skipped() {
        let links = extract(
            "http://www.example.com",
            vec![Ok(r#"<a href="mailto:test@example.com">Example</a>"#)],
        )
        .await;
        assert_eq!(links, vec![]);
    }

    #[tokio::test]
    async fn invalid_link_does_not_stop_later_links() {
        let links = extract(
            "http://www.example.com",
            vec![Ok(concat!(
                r#"<a href="mailto:test@example.com">mail</a>"#,
                r#"<a href="two">relative</a>"#,
                r#"<a>no href</a>"#,
                r#"<a href="">empty</a>"#,
                r#"<a href="https://www.example.com/three">three</a>"#
            ))],
        )
        .await;
        assert_eq!(links, vec![url("https://www.example.com/three")]);
    }

    #[tokio::test]
    async fn root_relative_link() {
        let links = extract(
            "http://www.example.com",
            vec![Ok(r#"<a href="/">Example</a>"#)],
        )
        .await;
        assert_eq!(links, vec![url("http://www.example.com/")]);
        assert_eq!(links[0].path(), "/");
    }

    #[tokio::test]
    async fn root_relative_link_ignores_source_path() {
        let links = extract(
            "http://www.example.com:8080/hello/",
            vec![Ok(r#"<a href="/three/four?hello=there">x</a>"#)],
        )
        .await;
        assert_eq!(
            links,
            vec![url("http://www.example.com:8080/three/four?hello=there")]
        );
    }

    #[tokio::test]
    async fn link_with_path() {
        let links = extract(
            "http://www.example.com/hello",
            vec![Ok(r#"<a href="http://www.example.com/hello">Example</a>"#)],
        )
        .await;
        assert_eq!(links, vec![url("http://www.example.com/hello")]);
        assert_eq!(links[0].path(), "/hello");
    }

    #[tokio::test]
    async fn only_anchor_tags_are_scanned() {
        let links = extract(
            "http://www.example.com",
            vec![Ok(concat!(
                r#"<html><head><link href="http://www.example.com/style.css"></head>"#,
                r#"<body><area href="http://www.example.com/area">"#,
                r#"<A HREF="http://www.example.com/upper">upper</A></body></html>"#
            ))],
        )
        .await;
        assert_eq!(links, vec![url("http://www.example.com/upper")]);
    }

    #[tokio::test]
    async fn href_entities_are_decoded() {
        let links = extract(
            "http://www.example.com",
            vec![Ok(concat!(
                r#"<a href="&#47;foo">x</a>"#,
                r#"<a href="/a&amp;b">y</a>"#,
                r#"<a href="http&#58;//c.com/x">z</a>"#
            ))],
        )
        .await;
        assert_eq!(
            links,
            vec![
                url("http://www.example.com/foo"),
                url("http://www.example.com/a&b"),
                url("http://c.com/x")
            ]
        );
        assert_eq!(links[1].path(), "/a&b");
    }

    #[tokio::test]
    async fn ambiguous_markup_does_not_stop_the_scan() {
        let links = extract(
            "http://www.example.com",
            vec![Ok(concat!(
                r#"<a href="http://a.com/1">1</a>"#,
                r#"<select><xmp><script>"use strict";</script></select>"#,
                r#"<a href="http://a.com/2">2</a>"#
            ))],
        )
        .await;
        assert_eq!(links, vec![url("http://a.com/1"), url("http://a.com/2")]);
    }

    #[tokio::test]
    async fn duplicate_href_attributes_are_all_processed() {
        let links = extract(
            "http://www.example.com",
            vec![Ok(r#"<a href="http://a.com/1" href="http://b.com/2">x</a>"#)],
        )
        .await;
        assert_eq!(links, vec![url("http://a.com/1"), url("http://b.com/2")]);
    }

    #[tokio::test]
    async fn tags_split_across_chunks() {
        let links = extract(
            "http://www.example.com",
            vec![
                Ok(r#"<html><body><a hr"#),
                Ok(r#"ef="http://www.exa"#),
                Ok(r#"mple.com/one">one</a><a href="/tw"#),
                Ok(r#"o">two</a></body></html>"#),
            ],
        )
        .await;
        assert_eq!(
            links,
            vec![
                url("http://www.example.com/one"),
                url("http://www.example.com/two")
            ]
        );
    }

    #[tokio::test]
    async fn stream_error_keeps_links_found_so_far() {
        let links = extract(
            "http://www.example.com",
            vec![
                Ok(r#"<a href="http://www.example.com/one">one</a><p>"#),
                Err("connection reset".to_string()),
                Ok(r#"<a href="http://www.example.com/two">two</a>"#),
            ],
        )
        .await;
        assert_eq!(links, vec![url("http://www.example.com/one")]);
    }

    #[test]
    fn resolve_root_relative_only_rewrites_leading_slash() {
        let source = url("https://www.example.com/a/b");
        assert_eq!(
            resolve_root_relative(&source, "/c"),
            "https://www.example.com/c"
        );
        assert_eq!(resolve_root_relative(&source, "c"), "c");
        assert_eq!(
            resolve_root_relative(&source, "http://other.example.com/"),
            "http://other.example.com/"
        );
    }
}
