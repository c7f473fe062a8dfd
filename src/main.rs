use std::env;

use titlescout::models::config;
use titlescout::processing::lookup::{default_providers, lookup_title, provider_by_name};
use titlescout::providers::ProviderAdapter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let mut args = env::args().skip(1);
    let query = match args.next() {
        Some(query) => query,
        None => {
            eprintln!("usage: titlescout <title> [provider ...]");
            std::process::exit(2);
        }
    };
    let selectors: Vec<String> = args.collect();

    let config = match config::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let providers = if selectors.is_empty() {
        default_providers(&config)
    } else {
        selectors
            .iter()
            .map(|selector| provider_by_name(selector, &config))
            .collect::<Result<Vec<Box<dyn ProviderAdapter>>, _>>()
    };
    let providers = match providers {
        Ok(providers) => providers,
        Err(e) => {
            log::error!("Failed to build providers: {e}");
            std::process::exit(1);
        }
    };

    let report = lookup_title(&query, &providers).await;

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize report: {e}");
            std::process::exit(1);
        }
    }
}
