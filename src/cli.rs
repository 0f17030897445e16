use std::ffi::OsString;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};

use crate::link_gatherer::TargetUrls;
use crate::link_map::{LinkMap, OutputError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One absolute URL per line
    Line,
    /// A JSON object mapping each base domain to its paths
    Json,
}

impl OutputFormat {
    pub fn render(&self, link_map: &LinkMap) -> Result<Vec<String>, OutputError> {
        match self {
            OutputFormat::Line => Ok(link_map.lines().collect()),
            OutputFormat::Json => Ok(vec![link_map.to_json()?]),
        }
    }
}

/// Fetch HTTP URLs and list the links found in them
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// HTTP URL to fetch, may be repeated
    #[arg(short = 'u', value_name = "URL", required = true)]
    urls: Vec<String>,
    /// Output format
    #[arg(short = 'o', value_enum, default_value_t = OutputFormat::Line)]
    output: OutputFormat,
    /// Enable debug logging
    #[arg(short = 'd')]
    debug: bool,
}

#[derive(Debug)]
pub struct Config {
    pub targets: TargetUrls,
    pub output: OutputFormat,
    pub debug: bool,
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Cli::try_parse_from(args)?.try_into()
    }
}

impl TryFrom<Cli> for Config {
    type Error = clap::Error;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let mut targets = TargetUrls::new();
        for raw in &cli.urls {
            targets.add(raw).map_err(|err| {
                Cli::command().error(
                    ErrorKind::InvalidValue,
                    format!("invalid value '{}' for '-u <URL>': {}", raw, err),
                )
            })?;
        }
        Ok(Config {
            targets,
            output: cli.output,
            debug: cli.debug,
        })
    }
}
