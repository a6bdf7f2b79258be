use std::fs;
use std::sync::Arc;

use log::debug;
use thiserror::Error;
use url::Url;

use crate::{
    domain::{ContentPublisher, ElectricityPriceProvider},
    fields::FieldSchema,
    hvakosterstrommen::HvaKosterStrommen,
    webflow::WebflowPublisher,
};

const DEFAULT_PRICE_API_BASE_URL: &str = "https://www.hvakosterstrommen.no/api";
const DEFAULT_WEBFLOW_API_BASE_URL: &str = "https://api.webflow.com";
const DEFAULT_WEBFLOW_COLLECTION_ID: &str = "66a893a3183d43c3d13be876";
const DEFAULT_WEBFLOW_ITEM_ID: &str = "66a893d8f13ec38e2f6f853f";

#[derive(Debug, Clone, Error)]
pub(crate) enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not a valid url: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
    #[error("the field schema at {path} could not be loaded: {reason}")]
    Schema { path: String, reason: String },
}

/// Everything a run needs from the environment. Read once at startup.
#[derive(Clone)]
pub(crate) struct Settings {
    pub(crate) price_api_base_url: Url,
    pub(crate) webflow_api_base_url: Url,
    pub(crate) webflow_collection_id: String,
    pub(crate) webflow_item_id: String,
    pub(crate) webflow_bearer_token: String,
    pub(crate) field_schema_path: Option<String>,
}

impl Settings {
    /// Read the settings from the process environment, including a `.env` file if present.
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let or_default =
            |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Ok(Self {
            price_api_base_url: parse_url(
                "PRICE_API_BASE_URL",
                &or_default("PRICE_API_BASE_URL", DEFAULT_PRICE_API_BASE_URL),
            )?,
            webflow_api_base_url: parse_url(
                "WEBFLOW_API_BASE_URL",
                &or_default("WEBFLOW_API_BASE_URL", DEFAULT_WEBFLOW_API_BASE_URL),
            )?,
            webflow_collection_id: or_default(
                "WEBFLOW_COLLECTION_ID",
                DEFAULT_WEBFLOW_COLLECTION_ID,
            ),
            webflow_item_id: or_default("WEBFLOW_ITEM_ID", DEFAULT_WEBFLOW_ITEM_ID),
            webflow_bearer_token: lookup("WEBFLOW_BEARER_TOKEN")
                .filter(|token| !token.is_empty())
                .ok_or(ConfigError::Missing("WEBFLOW_BEARER_TOKEN"))?,
            field_schema_path: lookup("FIELD_SCHEMA_PATH"),
        })
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })
}

/// The collaborators of a run, built from the settings.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) electricity_provider: Arc<dyn ElectricityPriceProvider>,
    pub(crate) publisher: Arc<dyn ContentPublisher>,
    pub(crate) field_schema: FieldSchema,
}

impl AppState {
    pub(crate) fn new(
        electricity_provider: Arc<dyn ElectricityPriceProvider>,
        publisher: Arc<dyn ContentPublisher>,
        field_schema: FieldSchema,
    ) -> Self {
        Self {
            electricity_provider,
            publisher,
            field_schema,
        }
    }
}

/// Set up the price provider, the publisher and the field schema.
/// The bearer token is handed to the publisher here and not read again.
pub(crate) fn setup_app_state(settings: Settings) -> Result<AppState, ConfigError> {
    let field_schema = resolve_field_schema(settings.field_schema_path.as_deref())?;

    let electricity_provider = HvaKosterStrommen::new(settings.price_api_base_url.as_str());

    let publisher = WebflowPublisher::new(
        settings.webflow_api_base_url.as_str(),
        &settings.webflow_collection_id,
        &settings.webflow_item_id,
        settings.webflow_bearer_token,
    );

    Ok(AppState::new(
        Arc::new(electricity_provider),
        Arc::new(publisher),
        field_schema,
    ))
}

fn resolve_field_schema(path: Option<&str>) -> Result<FieldSchema, ConfigError> {
    let Some(path) = path else {
        return Ok(FieldSchema::default());
    };

    debug!("loading field schema overrides from \"{}\"", path);

    let schema_error = |reason: String| ConfigError::Schema {
        path: path.to_string(),
        reason,
    };

    let contents = fs::read_to_string(path).map_err(|e| schema_error(e.to_string()))?;

    FieldSchema::with_overrides_json(&contents).map_err(|e| schema_error(e.to_string()))
}
