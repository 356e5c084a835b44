//! Quote values and the deterministic pricing rules used when no live data is
//! available.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::trip::RideClass;

/// Base fare in PKR applied to every mock estimate.
pub const BASE_FARE: i64 = 50;

/// Per-kilometre rate in PKR for mock estimates.
pub const PER_KM_RATE: f64 = 15.0;

/// No quote is ever shown below this amount.
pub const MIN_QUOTE_AMOUNT: i64 = 50;

/// Display currency. Amounts are whole units; no subunits are modelled.
pub const CURRENCY: &str = "PKR";

/// Where a quote's amount came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteSource {
    LiveProvider,
    FallbackProvider,
    MockEstimate,
}

/// A single price offered to the user. Never mutated, only superseded by a
/// fresh quote on re-request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub amount: i64,
    pub currency: String,
    pub source: QuoteSource,
}

impl PriceQuote {
    pub fn new(amount: i64, source: QuoteSource) -> Self {
        Self {
            amount,
            currency: CURRENCY.to_string(),
            source,
        }
    }

    /// Quotes not backed by the live endpoint carry an advisory note in the
    /// presentation layer.
    pub fn is_approximate(&self) -> bool {
        self.source != QuoteSource::LiveProvider
    }
}

/// Pricing knobs for the mock estimate, defaulting to the documented rates.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    pub base_fare: i64,
    pub per_km_rate: f64,
    pub min_quote_amount: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_fare: BASE_FARE,
            per_km_rate: PER_KM_RATE,
            min_quote_amount: MIN_QUOTE_AMOUNT,
        }
    }
}

impl PricingConfig {
    /// Deterministic estimate used when every live endpoint has failed:
    /// `base_fare + distance_km * per_km_rate * class multiplier`, clamped to
    /// the minimum quote amount.
    pub fn mock_quote(&self, ride_class: RideClass, distance_km: f64) -> PriceQuote {
        let variable = distance_km * self.per_km_rate * ride_class.mock_multiplier();
        let amount = self.base_fare + variable.round() as i64;
        PriceQuote {
            amount: amount.max(self.min_quote_amount),
            currency: CURRENCY.to_string(),
            source: QuoteSource::MockEstimate,
        }
    }
}

/// Derive the synthetic competitor quote from the primary one.
///
/// Bikes are marketed as the cheap alternative to car rides, so they get a
/// discount sampled uniformly from [40%, 50%); every other class gets a flat
/// 10% reduction. This is a placeholder business rule, not a real competitor
/// price feed, and the result is tagged [`QuoteSource::MockEstimate`] so no
/// consumer can mistake it for live pricing.
pub fn derive_competitor_quote<R: Rng>(
    primary: &PriceQuote,
    ride_class: RideClass,
    rng: &mut R,
) -> PriceQuote {
    let discount = match ride_class {
        RideClass::Bike => rng.gen_range(0.40..0.50),
        _ => 0.10,
    };
    let amount = (primary.amount as f64 * (1.0 - discount)).round() as i64;
    PriceQuote {
        amount: amount.max(MIN_QUOTE_AMOUNT),
        currency: primary.currency.clone(),
        source: QuoteSource::MockEstimate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn mock_quote_follows_fare_formula() {
        let pricing = PricingConfig::default();
        let quote = pricing.mock_quote(RideClass::Mini, 1.9);
        assert_eq!(quote.amount, 50 + (1.9_f64 * 15.0).round() as i64);
        assert_eq!(quote.source, QuoteSource::MockEstimate);
        assert_eq!(quote.currency, CURRENCY);
    }

    #[test]
    fn mock_quote_scales_with_ride_class() {
        let pricing = PricingConfig::default();
        let bike = pricing.mock_quote(RideClass::Bike, 10.0);
        let mini = pricing.mock_quote(RideClass::Mini, 10.0);
        let ac = pricing.mock_quote(RideClass::Ac, 10.0);
        assert!(bike.amount < mini.amount);
        assert!(mini.amount < ac.amount);
    }

    #[test]
    fn mock_quote_never_drops_below_floor() {
        let pricing = PricingConfig {
            base_fare: 0,
            ..PricingConfig::default()
        };
        let quote = pricing.mock_quote(RideClass::Bike, 0.1);
        assert_eq!(quote.amount, MIN_QUOTE_AMOUNT);
    }

    #[test]
    fn bike_discount_stays_in_documented_band() {
        let primary = PriceQuote::new(300, QuoteSource::LiveProvider);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let competitor = derive_competitor_quote(&primary, RideClass::Bike, &mut rng);
            assert!(
                (150..=180).contains(&competitor.amount),
                "seed {seed} produced {}",
                competitor.amount
            );
            assert!(competitor.amount < primary.amount);
            assert_eq!(competitor.source, QuoteSource::MockEstimate);
        }
    }

    #[test]
    fn non_bike_discount_is_exactly_ten_percent() {
        let primary = PriceQuote::new(300, QuoteSource::LiveProvider);
        let mut rng = StdRng::seed_from_u64(7);
        let mini = derive_competitor_quote(&primary, RideClass::Mini, &mut rng);
        assert_eq!(mini.amount, 270);
        let ac = derive_competitor_quote(&primary, RideClass::Ac, &mut rng);
        assert_eq!(ac.amount, 270);
    }

    #[test]
    fn competitor_quote_respects_floor() {
        let primary = PriceQuote::new(52, QuoteSource::MockEstimate);
        let mut rng = StdRng::seed_from_u64(1);
        let competitor = derive_competitor_quote(&primary, RideClass::Bike, &mut rng);
        assert_eq!(competitor.amount, MIN_QUOTE_AMOUNT);
    }

    #[test]
    fn approximate_flag_tracks_source() {
        assert!(!PriceQuote::new(100, QuoteSource::LiveProvider).is_approximate());
        assert!(PriceQuote::new(100, QuoteSource::FallbackProvider).is_approximate());
        assert!(PriceQuote::new(100, QuoteSource::MockEstimate).is_approximate());
    }
}
