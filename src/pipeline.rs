use chrono::NaiveDate;
use tracing::{error, info, instrument, warn};

use crate::{
    aggregate::{average_price, percent_change},
    domain::{ElectricityPriceProvider, PriceRecord, Zone, ZoneResult},
    fields::{seed_payload, FieldPayload},
    setup::AppState,
};

/// Outcome of one run: the payload that was sent and whether the item accepted it.
#[derive(Debug, Clone)]
pub(crate) struct RunReport {
    pub(crate) fields: FieldPayload,
    pub(crate) published: bool,
}

/// Fetch both days for every zone, collect the fields of the zones that have
/// prices for both days and publish them in a single update.
#[instrument(skip(state))]
pub(crate) async fn run(state: &AppState, today: NaiveDate, yesterday: NaiveDate) -> RunReport {
    let mut fields = seed_payload();

    for zone in Zone::ALL {
        match zone_result(&*state.electricity_provider, zone, today, yesterday).await {
            Some(result) => state.field_schema.insert_zone(&mut fields, &result),
            None => warn!("no fields for {} this run", zone),
        }
    }

    let published = match state.publisher.publish(&fields).await {
        Ok(()) => true,
        Err(error) => {
            error!("{}", error);
            false
        }
    };

    RunReport { fields, published }
}

async fn zone_result(
    electricity_provider: &dyn ElectricityPriceProvider,
    zone: Zone,
    today: NaiveDate,
    yesterday: NaiveDate,
) -> Option<ZoneResult> {
    let today_prices = fetch_prices(electricity_provider, today, zone).await;
    let yesterday_prices = fetch_prices(electricity_provider, yesterday, zone).await;

    let today_avg = average_price(today_prices.as_deref())?;
    let yesterday_avg = average_price(yesterday_prices.as_deref())?;

    let change = percent_change(today_avg, yesterday_avg);
    if change.is_none() {
        warn!(
            "average price for {} on {} was zero, not reporting a change",
            zone, yesterday
        );
    }

    Some(ZoneResult {
        zone,
        today_avg,
        percent_change: change,
    })
}

/// A failed fetch only costs the zone its fields, so it is logged and dropped here.
async fn fetch_prices(
    electricity_provider: &dyn ElectricityPriceProvider,
    date: NaiveDate,
    zone: Zone,
) -> Option<Vec<PriceRecord>> {
    match electricity_provider.fetch_prices(date, zone).await {
        Ok(prices) => {
            info!(
                "fetched {} prices for {} on {} from {}",
                prices.len(),
                zone,
                date,
                electricity_provider.name()
            );
            Some(prices)
        }
        Err(error) => {
            error!("{}", error);
            None
        }
    }
}
