use std::process;

use chrono::Local;
use log::info;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use crate::setup::{setup_app_state, Settings};

mod aggregate;
mod domain;
mod fields;
mod hvakosterstrommen;
mod pipeline;
mod setup;
mod webflow;

const APP_NAME: &str = "stromzoner";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting {}", APP_NAME);

    let state = Settings::from_env()
        .and_then(setup_app_state)
        .unwrap_or_else(|e| {
            error!("{}", e);
            process::exit(1);
        });

    let today = Local::now().date_naive();
    let Some(yesterday) = today.pred_opt() else {
        error!("there is no calendar day before {}", today);
        process::exit(1);
    };

    let report = pipeline::run(&state, today, yesterday).await;

    if !report.published {
        warn!("the Webflow item was not updated");
    }

    println!("Updated Webflow item with the following data:");
    match serde_json::to_string_pretty(&report.fields) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("failed to render the payload: {}", e),
    }

    info!("Finished {}", APP_NAME);
}
