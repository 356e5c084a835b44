//! The comparison pipeline: one forward pass from a validated trip request to
//! a presentable comparison.
//!
//! `TripRequest` -> `TripMetrics` -> ladder quote -> competitor quote ->
//! `ComparisonResult` -> `ComparisonSummary`. Each step consumes the previous
//! step's value; nothing is shared or cached between invocations, and the
//! only retry logic lives inside the quote ladder.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::comparison::{ComparisonResult, ComparisonSummary};
use crate::geo::Coordinate;
use crate::geocoding::GeocodingClient;
use crate::pricing::derive_competitor_quote;
use crate::quotes::{LadderFailure, QuoteLadder};
use crate::session::{SessionStore, UserProfile};
use crate::trip::{TripMetrics, TripRequest};

/// Label shown when reverse geocoding cannot name a coordinate.
pub const FALLBACK_ADDRESS_LABEL: &str = "Selected Location";

/// City used to bias suggestion lookups and label the default region.
pub const DEFAULT_BIAS_CITY: &str = "Islamabad";

/// Static region used when device location is unavailable or permission is
/// refused: central Islamabad, the app's home market. Degrading here keeps
/// the workflow usable instead of blocking on a permission prompt.
pub fn default_region() -> Coordinate {
    Coordinate::new(33.6844, 73.0479).expect("default region coordinate is valid")
}

/// Monotonic ticket guard for in-flight suggestion lookups on one input
/// field. A completion may publish its results only while its ticket is still
/// the newest one issued, so a slow stale response can never overwrite
/// fresher suggestions.
#[derive(Debug, Default)]
pub struct SuggestionGuard {
    issued: u64,
}

impl SuggestionGuard {
    /// Take a ticket before starting a lookup.
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// True when the lookup holding `ticket` may publish its results.
    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.issued
    }
}

/// Output of one full workflow pass.
#[derive(Debug)]
pub struct ComparisonOutcome {
    pub trip: TripRequest,
    pub metrics: TripMetrics,
    pub result: ComparisonResult,
    pub summary: ComparisonSummary,
    /// Ladder diagnostics, not surfaced to the user beyond the
    /// approximate-pricing note in the summary.
    pub failures: Vec<LadderFailure>,
}

/// Drives one price comparison end to end. Owns its collaborators; holds no
/// state across runs beyond the RNG used for competitor derivation.
pub struct ComparisonWorkflow {
    geocoder: GeocodingClient,
    ladder: QuoteLadder,
    rider: Option<UserProfile>,
    rng: StdRng,
}

impl ComparisonWorkflow {
    pub fn new(geocoder: GeocodingClient, ladder: QuoteLadder) -> Self {
        Self {
            geocoder,
            ladder,
            rider: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded variant for reproducible competitor pricing in tests.
    pub fn with_seed(geocoder: GeocodingClient, ladder: QuoteLadder, seed: u64) -> Self {
        Self {
            geocoder,
            ladder,
            rider: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Read the persisted session profile for personalization. A missing or
    /// unreadable blob degrades to no personalization.
    pub fn load_rider_profile(&mut self, path: &Path) {
        self.rider = match SessionStore::load(path) {
            Ok(profile) => profile,
            Err(error) => {
                warn!(%error, "session profile unavailable");
                None
            }
        };
    }

    pub fn rider_profile(&self) -> Option<&UserProfile> {
        self.rider.as_ref()
    }

    /// Run the forward pipeline for one trip. Always yields a comparison: the
    /// ladder bottoms out in a mock estimate and address resolution degrades
    /// to [`FALLBACK_ADDRESS_LABEL`].
    pub fn run(&mut self, trip: TripRequest) -> ComparisonOutcome {
        let metrics = TripMetrics::for_trip(&trip);
        let ladder_quote = self.ladder.quote_primary(&trip, &metrics);
        let competitor =
            derive_competitor_quote(&ladder_quote.quote, trip.ride_class, &mut self.rng);
        let result = ComparisonResult::build(ladder_quote.quote, competitor);

        let pickup_label = self
            .geocoder
            .resolve_address(trip.pickup)
            .unwrap_or_else(|| FALLBACK_ADDRESS_LABEL.to_string());
        let destination_label = self
            .geocoder
            .resolve_address(trip.destination)
            .unwrap_or_else(|| FALLBACK_ADDRESS_LABEL.to_string());

        let summary = ComparisonSummary {
            primary_amount: result.primary.amount,
            competitor_amount: result.competitor.amount,
            currency: result.primary.currency.clone(),
            cheaper_side: result.cheaper_side,
            savings_amount: result.savings_amount,
            savings_percent: result.savings_percent,
            ride_class: trip.ride_class,
            distance_km: metrics.distance_km,
            eta_minutes: metrics.eta_minutes,
            pickup_label,
            destination_label,
            approximate_pricing: result.primary.is_approximate(),
            rider_name: self.rider.as_ref().map(|profile| profile.first_name.clone()),
        };

        ComparisonOutcome {
            trip,
            metrics,
            result,
            summary,
            failures: ladder_quote.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_suggestion_ticket_is_rejected() {
        let mut guard = SuggestionGuard::default();
        let first = guard.begin();
        let second = guard.begin();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }

    #[test]
    fn fresh_ticket_stays_current_until_superseded() {
        let mut guard = SuggestionGuard::default();
        let ticket = guard.begin();
        assert!(guard.is_current(ticket));
        guard.begin();
        assert!(!guard.is_current(ticket));
    }

    #[test]
    fn default_region_sits_in_the_bias_city() {
        let region = default_region();
        assert!((region.latitude() - 33.6844).abs() < 1e-9);
        assert!((region.longitude() - 73.0479).abs() < 1e-9);
    }
}
