use indexmap::IndexMap;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("{0}")]
    Serialization(#[from] serde_json::Error),
}

/// `scheme://host`, with the port only when it differs from the scheme default.
pub fn base_domain(link: &Url) -> String {
    let host = link.host_str().unwrap_or_default();
    match link.port() {
        Some(port) => format!("{}://{}:{}", link.scheme(), host, port),
        None => format!("{}://{}", link.scheme(), host),
    }
}

/// Paths of discovered links grouped by base domain. Domains and paths both
/// keep the order in which they were first added; repeated paths are kept.
#[derive(Debug, Default, PartialEq)]
pub struct LinkMap {
    pub map: IndexMap<String, Vec<String>>,
}

impl LinkMap {
    pub fn new() -> Self {
        LinkMap {
            map: IndexMap::new(),
        }
    }

    pub fn add(&mut self, link: &Url) {
        self.map
            .entry(base_domain(link))
            .or_default()
            .push(link.path().to_string());
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.map.iter().flat_map(|(domain, paths)| {
            paths
                .iter()
                .map(move |path| format!("{}{}", domain, path))
        })
    }

    pub fn to_json(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string(&self.map)?)
    }
}
