use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Zone, ZoneResult};

/// Flat field name to value mapping, sent as the `fieldData` of the item.
pub(crate) type FieldPayload = BTreeMap<String, String>;

const ITEM_NAME: &str = "Zone";
const ITEM_SLUG: &str = "zone";

/// The payload every run starts from, before any zone has contributed.
pub(crate) fn seed_payload() -> FieldPayload {
    FieldPayload::from([
        ("name".to_string(), ITEM_NAME.to_string()),
        ("slug".to_string(), ITEM_SLUG.to_string()),
    ])
}

/// Names of the item fields a zone writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ZoneFields {
    pub(crate) average: String,
    pub(crate) change: String,
    pub(crate) color: String,
}

impl ZoneFields {
    fn for_zone(zone: Zone) -> Self {
        let index = zone.index();

        // The collection's zone 1 color field is the only one spelled out in full.
        let color = match zone {
            Zone::NO1 => format!("sone{index}-yesterday-color"),
            _ => format!("sone{index}-yesterday-colo"),
        };

        Self {
            average: format!("sone{index}"),
            change: format!("sone{index}-prosentendring-yesterday"),
            color,
        }
    }
}

/// Maps each zone to the field names of the item collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldSchema {
    zones: BTreeMap<Zone, ZoneFields>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self {
            zones: Zone::ALL
                .into_iter()
                .map(|zone| (zone, ZoneFields::for_zone(zone)))
                .collect(),
        }
    }
}

impl FieldSchema {
    /// Parse a JSON object of zone overrides, e.g.
    /// `{"NO2": {"average": "sone2", "change": "...", "color": "..."}}`.
    /// Zones that are not named keep their default field names.
    pub(crate) fn with_overrides_json(json: &str) -> Result<Self, serde_json::Error> {
        let overrides: BTreeMap<Zone, ZoneFields> = serde_json::from_str(json)?;

        let mut schema = Self::default();
        schema.zones.extend(overrides);

        Ok(schema)
    }

    pub(crate) fn fields_for(&self, zone: Zone) -> &ZoneFields {
        // Every zone has an entry: the default covers them all and overrides only replace.
        &self.zones[&zone]
    }

    /// Write the fields of one zone into `payload`. The change and its color
    /// are left out when there is no change to report.
    pub(crate) fn insert_zone(&self, payload: &mut FieldPayload, result: &ZoneResult) {
        let fields = self.fields_for(result.zone);

        payload.insert(fields.average.clone(), format_price(result.today_avg));

        if let (Some(change), Some(trend)) = (result.percent_change, result.trend()) {
            payload.insert(
                fields.change.clone(),
                format!("{}{:.2}%", trend.sign(), change.abs()),
            );
            payload.insert(fields.color.clone(), trend.color().to_string());
        }
    }
}

fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(zone: Zone, today_avg: f64, percent_change: Option<f64>) -> ZoneResult {
        ZoneResult {
            zone,
            today_avg,
            percent_change,
        }
    }

    #[test]
    fn seeded_with_name_and_slug() {
        let payload = seed_payload();

        assert_eq!(payload.len(), 2);
        assert_eq!(payload["name"], "Zone");
        assert_eq!(payload["slug"], "zone");
    }

    #[test]
    fn increase_is_signed_and_orange_red() {
        let mut payload = FieldPayload::new();

        FieldSchema::default().insert_zone(&mut payload, &result(Zone::NO2, 12.0, Some(20.0)));

        assert_eq!(payload.len(), 3);
        assert_eq!(payload["sone2"], "12.00");
        assert_eq!(payload["sone2-prosentendring-yesterday"], "+20.00%");
        assert_eq!(payload["sone2-yesterday-colo"], "#ff5722");
    }

    #[test]
    fn decrease_is_signed_and_green() {
        let mut payload = FieldPayload::new();

        FieldSchema::default().insert_zone(&mut payload, &result(Zone::NO3, 8.0, Some(-20.0)));

        assert_eq!(payload["sone3"], "8.00");
        assert_eq!(payload["sone3-prosentendring-yesterday"], "-20.00%");
        assert_eq!(payload["sone3-yesterday-colo"], "#4caf50");
    }

    #[test]
    fn no_change_renders_as_decrease() {
        let mut payload = FieldPayload::new();

        FieldSchema::default().insert_zone(&mut payload, &result(Zone::NO5, 10.0, Some(0.0)));

        assert_eq!(payload["sone5-prosentendring-yesterday"], "-0.00%");
        assert_eq!(payload["sone5-yesterday-colo"], "#4caf50");
    }

    #[test]
    fn zone_one_color_field_is_spelled_out() {
        let schema = FieldSchema::default();

        assert_eq!(schema.fields_for(Zone::NO1).color, "sone1-yesterday-color");
        for zone in [Zone::NO2, Zone::NO3, Zone::NO4, Zone::NO5] {
            assert!(schema.fields_for(zone).color.ends_with("-yesterday-colo"));
        }
    }

    #[test]
    fn average_is_fixed_point_without_separators() {
        let mut payload = FieldPayload::new();

        FieldSchema::default().insert_zone(&mut payload, &result(Zone::NO1, 1234.5678, Some(1.0)));

        assert_eq!(payload["sone1"], "1234.57");
    }

    #[test]
    fn only_average_without_change() {
        let mut payload = FieldPayload::new();

        FieldSchema::default().insert_zone(&mut payload, &result(Zone::NO4, 0.5, None));

        assert_eq!(payload.len(), 1);
        assert_eq!(payload["sone4"], "0.50");
    }

    #[test]
    fn overrides_replace_named_zones_only() {
        let json = r#"{"NO2": {"average": "zone2", "change": "zone2-change", "color": "zone2-yesterday-color"}}"#;

        let schema = FieldSchema::with_overrides_json(json).unwrap();

        assert_eq!(schema.fields_for(Zone::NO2).color, "zone2-yesterday-color");
        assert_eq!(schema.fields_for(Zone::NO2).average, "zone2");
        assert_eq!(schema.fields_for(Zone::NO3).color, "sone3-yesterday-colo");
    }

    #[test]
    fn overrides_reject_unknown_zones() {
        let json = r#"{"SE3": {"average": "a", "change": "b", "color": "c"}}"#;

        assert!(FieldSchema::with_overrides_json(json).is_err());
    }
}
