mod link_extractor;
mod target_urls;
mod url_content_getter;
mod url_validator;

pub use link_extractor::extract_links;
pub use target_urls::TargetUrls;
pub use url_content_getter::{client, Body, URLContentGetter, URLContentGetterError};
