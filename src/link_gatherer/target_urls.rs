use std::fmt::{Display, Formatter, Result};

use url::{Position, Url};

use super::url_validator::{validate, UrlError};

#[derive(Debug, Clone, PartialEq)]
struct Target {
    url: Url,
    typed_root_slash: bool,
}

impl Target {
    // A bare origin prints without the root slash the parser adds, unless it was typed.
    fn display_form(&self) -> &str {
        let url = &self.url;
        let bare = url.path() == "/" && url.query().is_none() && url.fragment().is_none();
        if bare && !self.typed_root_slash {
            &url[..Position::BeforePath]
        } else {
            url.as_str()
        }
    }
}

/// Target URLs collected from repeated `-u` flags, in the order given.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TargetUrls(Vec<Target>);

impl TargetUrls {
    pub fn new() -> Self {
        TargetUrls(Vec::new())
    }

    pub fn add(&mut self, raw: &str) -> std::result::Result<(), UrlError> {
        let url = validate(raw)?;
        self.0.push(Target {
            url,
            typed_root_slash: raw.ends_with('/'),
        });
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Url> {
        self.0.iter().map(|target| &target.url)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Display for TargetUrls {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let urls = self
            .0
            .iter()
            .map(Target::display_form)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "URLs: [{}]", urls)
    }
}
