use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::domain::{ElectricityPriceProvider, ElectricityProviderError, PriceRecord, Zone};

const VAT_FACTOR: f64 = 1.25;

/// Client for the public spot price API of hvakosterstrommen.no.
#[derive(Clone, Debug)]
pub(crate) struct HvaKosterStrommen {
    client: Client,
    base_url: String,
}

impl HvaKosterStrommen {
    pub(crate) fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn prices_url(&self, date: NaiveDate, zone: Zone) -> String {
        format!(
            "{}/v1/prices/{}_{}.json",
            self.base_url,
            date.format("%Y/%m-%d"),
            zone
        )
    }
}

#[async_trait]
impl ElectricityPriceProvider for HvaKosterStrommen {
    fn name(&self) -> &'static str {
        "hvakosterstrommen"
    }

    #[instrument(skip(self))]
    async fn fetch_prices(
        &self,
        date: NaiveDate,
        zone: Zone,
    ) -> Result<Vec<PriceRecord>, ElectricityProviderError> {
        let response = self
            .client
            .get(self.prices_url(date, zone))
            .send()
            .await
            .map_err(|e| ElectricityProviderError::Request(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(ElectricityProviderError::UnexpectedStatus {
                status: response.status().as_u16(),
                zone: zone.to_string(),
                date: date.format("%Y/%m-%d").to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ElectricityProviderError::Request(e.to_string()))?;

        let mut prices = parse_prices_json(&body)?;
        apply_vat(&mut prices, zone);

        debug!("fetched {} prices for {} on {}", prices.len(), zone, date);

        Ok(prices)
    }
}

fn parse_prices_json(json: &str) -> Result<Vec<PriceRecord>, ElectricityProviderError> {
    serde_json::from_str::<Vec<PriceRecord>>(json)
        .map_err(|e| ElectricityProviderError::Decode(e.to_string()))
}

/// Consumer prices in all zones but the exempt one include 25% VAT.
fn apply_vat(prices: &mut [PriceRecord], zone: Zone) {
    if zone.is_vat_exempt() {
        return;
    }

    for price in prices.iter_mut() {
        price.nok_per_kwh *= VAT_FACTOR;
    }
}
