mod cli;
mod harvester;
mod link_gatherer;
mod link_map;

use cli::Config;
use harvester::Harvester;

#[tokio::main]
async fn main() {
    let config = match Config::from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(e) => e.exit(),
    };

    let log_level = if config.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("link_harvest={}", log_level))
        .with_writer(std::io::stderr)
        .compact()
        .init();
    tracing::debug!("{}", config.targets);

    let link_getter = match link_gatherer::client() {
        Ok(client) => client,
        Err(err) => {
            println!("{}", err);
            std::process::exit(1);
        }
    };

    let link_map = Harvester { link_getter }.harvest(&config.targets).await;
    match config.output.render(&link_map) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(err) => {
            println!("{}", err);
            std::process::exit(1);
        }
    }
}
