use crate::link_gatherer::{extract_links, Body, TargetUrls, URLContentGetter};
use crate::link_map::LinkMap;

/// Fetches each target in turn and groups the links found in its body.
pub struct Harvester<T: URLContentGetter> {
    pub link_getter: T,
}

impl<T: URLContentGetter> Harvester<T> {
    #[tracing::instrument(skip_all, fields(targets = targets.len()))]
    pub async fn harvest(&self, targets: &TargetUrls) -> LinkMap {
        let mut link_map = LinkMap::new();
        for target in targets.iter() {
            let body: Body = match self.link_getter.get_http_response_body(target).await {
                Ok(body) => body,
                Err(err) => {
                    println!("{}", err);
                    continue;
                }
            };
            // The body is consumed here, releasing the connection before the next target.
            for link in extract_links(target, body).await {
                link_map.add(&link);
            }
        }
        link_map
    }
}
