use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fields::FieldPayload;

/// One of the five Norwegian electricity pricing areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub(crate) enum Zone {
    NO1,
    NO2,
    NO3,
    NO4,
    NO5,
}

impl Zone {
    /// All zones in the order they are processed.
    pub(crate) const ALL: [Zone; 5] = [Zone::NO1, Zone::NO2, Zone::NO3, Zone::NO4, Zone::NO5];

    pub(crate) const fn as_str(&self) -> &'static str {
        match self {
            Zone::NO1 => "NO1",
            Zone::NO2 => "NO2",
            Zone::NO3 => "NO3",
            Zone::NO4 => "NO4",
            Zone::NO5 => "NO5",
        }
    }

    /// The numeric suffix of the zone identifier, "1" for NO1 and so on.
    pub(crate) fn index(&self) -> &'static str {
        &self.as_str()[2..]
    }

    /// Northern Norway (NO4) is exempt from value-added tax on electricity.
    pub(crate) const fn is_vat_exempt(&self) -> bool {
        matches!(self, Zone::NO4)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The price of one hour, as delivered by the price API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct PriceRecord {
    #[serde(rename = "NOK_per_kWh")]
    pub(crate) nok_per_kwh: f64,
    pub(crate) time_start: DateTime<FixedOffset>,
    pub(crate) time_end: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PriceTrend {
    Increase,
    Decrease,
}

impl PriceTrend {
    /// A change of exactly zero counts as a decrease.
    pub(crate) fn of(percent_change: f64) -> Self {
        if percent_change > 0.0 {
            PriceTrend::Increase
        } else {
            PriceTrend::Decrease
        }
    }

    pub(crate) const fn sign(&self) -> char {
        match self {
            PriceTrend::Increase => '+',
            PriceTrend::Decrease => '-',
        }
    }

    pub(crate) const fn color(&self) -> &'static str {
        match self {
            PriceTrend::Increase => "#ff5722",
            PriceTrend::Decrease => "#4caf50",
        }
    }
}

/// The figures published for one zone in one run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ZoneResult {
    pub(crate) zone: Zone,
    pub(crate) today_avg: f64,
    /// Absent when yesterday's average was zero.
    pub(crate) percent_change: Option<f64>,
}

impl ZoneResult {
    pub(crate) fn trend(&self) -> Option<PriceTrend> {
        self.percent_change.map(PriceTrend::of)
    }
}

#[async_trait]
pub(crate) trait ElectricityPriceProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_prices(
        &self,
        date: NaiveDate,
        zone: Zone,
    ) -> Result<Vec<PriceRecord>, ElectricityProviderError>;
}

#[async_trait]
pub(crate) trait ContentPublisher: Send + Sync {
    async fn publish(&self, fields: &FieldPayload) -> Result<(), PublishError>;
}

#[derive(Debug, Clone, Error)]
pub enum ElectricityProviderError {
    #[error("failed to retrieve electricity data for {zone} on {date}, status code: {status}")]
    UnexpectedStatus {
        status: u16,
        zone: String,
        date: String,
    },
    #[error("failed to fetch prices: {0}")]
    Request(String),
    #[error("failed to decode prices: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Error)]
pub enum PublishError {
    #[error("failed to update item, status code: {status}\n{body}")]
    Rejected { status: u16, body: String },
    #[error("failed to send item update: {0}")]
    Request(String),
}
