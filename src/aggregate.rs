use crate::domain::PriceRecord;

/// The unweighted mean price of the given records. Absent input and an
/// empty slice both have no average.
pub(crate) fn average_price(prices: Option<&[PriceRecord]>) -> Option<f64> {
    let prices = prices.filter(|prices| !prices.is_empty())?;

    let total: f64 = prices.iter().map(|price| price.nok_per_kwh).sum();

    Some(total / prices.len() as f64)
}

/// Change from `yesterday` to `today` in percent of `yesterday`.
/// There is no meaningful change relative to a zero average.
pub(crate) fn percent_change(today: f64, yesterday: f64) -> Option<f64> {
    if yesterday == 0.0 {
        return None;
    }

    Some((today - yesterday) / yesterday * 100.0)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn record(nok_per_kwh: f64) -> PriceRecord {
        PriceRecord {
            nok_per_kwh,
            time_start: DateTime::parse_from_rfc3339("2024-06-15T00:00:00+02:00").unwrap(),
            time_end: DateTime::parse_from_rfc3339("2024-06-15T01:00:00+02:00").unwrap(),
        }
    }

    #[test]
    fn no_average_without_prices() {
        assert_eq!(average_price(None), None);
        assert_eq!(average_price(Some(Vec::new().as_slice())), None);
    }

    #[test]
    fn average_is_arithmetic_mean() {
        let prices = vec![record(10.0), record(20.0)];

        assert_eq!(average_price(Some(prices.as_slice())), Some(15.0));
    }

    #[test]
    fn average_of_single_price_is_that_price() {
        let prices = vec![record(-0.25)];

        assert_eq!(average_price(Some(prices.as_slice())), Some(-0.25));
    }

    #[test]
    fn percent_change_relative_to_yesterday() {
        let increase = percent_change(12.0, 10.0).unwrap();
        let decrease = percent_change(8.0, 10.0).unwrap();

        assert!((increase - 20.0).abs() < 1e-9);
        assert!((decrease + 20.0).abs() < 1e-9);
        assert_eq!(percent_change(10.0, 10.0), Some(0.0));
    }

    #[test]
    fn no_percent_change_from_zero() {
        assert_eq!(percent_change(1.5, 0.0), None);
        assert_eq!(percent_change(0.0, 0.0), None);
    }
}
