//! Live pricing providers and the fallback ladder.
//!
//! The ladder is an explicit ordered list of strategies: the primary estimate
//! endpoint, the provider's route-info fallback endpoint, then a local mock
//! estimate that cannot fail. Each rung tags the quote it produced so callers
//! can tell live pricing from approximations, and every rung failure is
//! recorded for diagnostics.

use std::time::Duration;

use reqwest::{blocking::Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::pricing::{PriceQuote, PricingConfig, QuoteSource, CURRENCY};
use crate::trip::{RideClass, TripMetrics, TripRequest};

const PRIMARY_TIMEOUT: Duration = Duration::from_secs(8);
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = "fare-compare/0.1 (ride price comparison client; ops@fare-compare.dev)";

/// Credentials and endpoints for the live pricing provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub api_key: String,
    pub estimate_endpoint: String,
    pub route_info_endpoint: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            api_key: String::new(),
            estimate_endpoint: "https://api.yango.yandex.com".to_string(),
            route_info_endpoint: "https://taxi-routeinfo.taxi.yandex.net".to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn with_credentials(mut self, client_id: &str, api_key: &str) -> Self {
        self.client_id = client_id.to_string();
        self.api_key = api_key.to_string();
        self
    }

    /// Point both endpoints somewhere else (tests, regional mirrors).
    pub fn with_endpoints(mut self, estimate: &str, route_info: &str) -> Self {
        self.estimate_endpoint = estimate.to_string();
        self.route_info_endpoint = route_info.to_string();
        self
    }
}

/// Errors from a single quote provider attempt.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("invalid endpoint url: {0}")]
    Endpoint(String),
    #[error("transport: {0}")]
    Http(reqwest::Error),
    #[error("endpoint returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Json(reqwest::Error),
    #[error("no price for class '{0}' in response")]
    MissingPrice(String),
}

/// A single rung in the quote ladder. Implementations must be `Send + Sync`
/// so one ladder can serve every workflow invocation.
pub trait QuoteProvider: Send + Sync {
    /// Short identifier used in logs and failure diagnostics.
    fn name(&self) -> &'static str;

    /// Fetch a price in whole currency units for the given trip.
    fn quote(&self, trip: &TripRequest) -> Result<i64, QuoteError>;
}

// ---------------------------------------------------------------------------
// Response parsing, shared by both endpoint variants
// ---------------------------------------------------------------------------

/// The provider returns either a bare number or an object with an `amount`
/// field depending on endpoint variant; tolerate both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceField {
    Amount(f64),
    Detailed { amount: f64 },
}

impl PriceField {
    fn amount(&self) -> f64 {
        match self {
            PriceField::Amount(value) => *value,
            PriceField::Detailed { amount } => *amount,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClassOption {
    class_name: String,
    price: PriceField,
}

/// Superset of the two response shapes the provider serves:
/// `{options: [{class_name, price}], ...}` and `{price: ...}`.
#[derive(Debug, Deserialize)]
struct EstimateResponse {
    options: Option<Vec<ClassOption>>,
    price: Option<PriceField>,
}

/// Extract the amount for the requested class from either response shape.
fn parse_estimate_response(
    response: EstimateResponse,
    ride_class: RideClass,
) -> Result<i64, QuoteError> {
    if let Some(options) = response.options {
        if let Some(option) = options
            .into_iter()
            .find(|option| option.class_name.eq_ignore_ascii_case(ride_class.api_class()))
        {
            return Ok(option.price.amount().round() as i64);
        }
    }
    if let Some(price) = response.price {
        return Ok(price.amount().round() as i64);
    }
    Err(QuoteError::MissingPrice(ride_class.api_class().to_string()))
}

/// Coordinate pair encoding the route-info endpoint expects:
/// `pickup_lon,pickup_lat~dropoff_lon,dropoff_lat`.
fn encode_route_pair(trip: &TripRequest) -> String {
    format!(
        "{:.6},{:.6}~{:.6},{:.6}",
        trip.pickup.longitude(),
        trip.pickup.latitude(),
        trip.destination.longitude(),
        trip.destination.latitude(),
    )
}

// ---------------------------------------------------------------------------
// Live providers
// ---------------------------------------------------------------------------

/// Primary estimate endpoint: authenticated GET with explicit coordinate
/// parameters.
pub struct EstimateApiProvider {
    client: Client,
    config: ProviderConfig,
}

impl EstimateApiProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(PRIMARY_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build estimate client");
        Self { client, config }
    }

    fn request_url(&self, trip: &TripRequest) -> Result<Url, QuoteError> {
        let base = format!(
            "{}/api/estimate",
            self.config.estimate_endpoint.trim_end_matches('/')
        );
        let mut url = Url::parse(&base).map_err(|err| QuoteError::Endpoint(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("pickup_lat", &trip.pickup.latitude().to_string())
            .append_pair("pickup_lon", &trip.pickup.longitude().to_string())
            .append_pair("dropoff_lat", &trip.destination.latitude().to_string())
            .append_pair("dropoff_lon", &trip.destination.longitude().to_string())
            .append_pair("vehicle_type", trip.ride_class.api_class());
        Ok(url)
    }
}

impl QuoteProvider for EstimateApiProvider {
    fn name(&self) -> &'static str {
        "estimate-api"
    }

    fn quote(&self, trip: &TripRequest) -> Result<i64, QuoteError> {
        let url = self.request_url(trip)?;
        let response = self
            .client
            .get(url)
            .header("CLID", &self.config.client_id)
            .header("APIKEY", &self.config.api_key)
            .header("Accept", "application/json")
            .send()
            .map_err(QuoteError::Http)?;
        if !response.status().is_success() {
            return Err(QuoteError::Status(response.status().as_u16()));
        }
        let parsed: EstimateResponse = response.json().map_err(QuoteError::Json)?;
        parse_estimate_response(parsed, trip.ride_class)
    }
}

/// Secondary route-info endpoint of the same provider, used when the estimate
/// API fails.
pub struct RouteInfoProvider {
    client: Client,
    config: ProviderConfig,
}

impl RouteInfoProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(FALLBACK_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build route-info client");
        Self { client, config }
    }

    fn request_url(&self, trip: &TripRequest) -> Result<Url, QuoteError> {
        let base = format!(
            "{}/taxi_info",
            self.config.route_info_endpoint.trim_end_matches('/')
        );
        let mut url = Url::parse(&base).map_err(|err| QuoteError::Endpoint(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("clid", &self.config.client_id)
            .append_pair("rll", &encode_route_pair(trip))
            .append_pair("class", trip.ride_class.api_class());
        Ok(url)
    }
}

impl QuoteProvider for RouteInfoProvider {
    fn name(&self) -> &'static str {
        "route-info"
    }

    fn quote(&self, trip: &TripRequest) -> Result<i64, QuoteError> {
        let url = self.request_url(trip)?;
        let response = self
            .client
            .get(url)
            .header("YaTaxi-Api-Key", &self.config.api_key)
            .header("Accept", "application/json")
            .send()
            .map_err(QuoteError::Http)?;
        if !response.status().is_success() {
            return Err(QuoteError::Status(response.status().as_u16()));
        }
        let parsed: EstimateResponse = response.json().map_err(QuoteError::Json)?;
        parse_estimate_response(parsed, trip.ride_class)
    }
}

// ---------------------------------------------------------------------------
// The ladder
// ---------------------------------------------------------------------------

/// One recorded failure while descending the ladder. Diagnostics only; the
/// user never sees these beyond the generic approximate-pricing note.
#[derive(Debug)]
pub struct LadderFailure {
    pub provider: &'static str,
    pub error: QuoteError,
}

/// Quote plus the diagnostics gathered while producing it.
#[derive(Debug)]
pub struct LadderQuote {
    pub quote: PriceQuote,
    pub failures: Vec<LadderFailure>,
}

struct LadderRung {
    source: QuoteSource,
    provider: Box<dyn QuoteProvider>,
}

/// Ordered quote strategies ending in a mock estimate that cannot fail.
pub struct QuoteLadder {
    rungs: Vec<LadderRung>,
    pricing: PricingConfig,
}

impl QuoteLadder {
    /// Custom rungs ahead of the mock floor. Rungs are tried in order.
    pub fn new(
        rungs: Vec<(QuoteSource, Box<dyn QuoteProvider>)>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            rungs: rungs
                .into_iter()
                .map(|(source, provider)| LadderRung { source, provider })
                .collect(),
            pricing,
        }
    }

    /// The production ladder: estimate API, then route-info, then mock.
    pub fn live(config: ProviderConfig, pricing: PricingConfig) -> Self {
        Self::new(
            vec![
                (
                    QuoteSource::LiveProvider,
                    Box::new(EstimateApiProvider::new(config.clone())),
                ),
                (
                    QuoteSource::FallbackProvider,
                    Box::new(RouteInfoProvider::new(config)),
                ),
            ],
            pricing,
        )
    }

    /// Ladder without live rungs; every quote is a mock estimate. Useful for
    /// offline runs.
    pub fn mock_only(pricing: PricingConfig) -> Self {
        Self::new(Vec::new(), pricing)
    }

    /// Produce a quote for the trip. Never fails: when every rung errors the
    /// terminal mock estimate supplies the amount.
    pub fn quote_primary(&self, trip: &TripRequest, metrics: &TripMetrics) -> LadderQuote {
        let mut failures = Vec::new();
        for rung in &self.rungs {
            match rung.provider.quote(trip) {
                Ok(amount) => {
                    return LadderQuote {
                        quote: PriceQuote {
                            amount,
                            currency: CURRENCY.to_string(),
                            source: rung.source,
                        },
                        failures,
                    };
                }
                Err(error) => {
                    warn!(provider = rung.provider.name(), %error, "quote rung failed, trying next");
                    failures.push(LadderFailure {
                        provider: rung.provider.name(),
                        error,
                    });
                }
            }
        }
        LadderQuote {
            quote: self.pricing.mock_quote(trip.ride_class, metrics.distance_km),
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;

    fn trip(ride_class: RideClass) -> TripRequest {
        TripRequest {
            pickup: Coordinate::new(33.6844, 73.0479).expect("pickup"),
            destination: Coordinate::new(33.7000, 73.0600).expect("destination"),
            ride_class,
        }
    }

    #[test]
    fn parse_picks_matching_class_option() {
        let response = EstimateResponse {
            options: Some(vec![
                ClassOption {
                    class_name: "bike".to_string(),
                    price: PriceField::Amount(150.0),
                },
                ClassOption {
                    class_name: "Mini".to_string(),
                    price: PriceField::Amount(310.4),
                },
            ]),
            price: None,
        };
        let amount = parse_estimate_response(response, RideClass::Mini).expect("amount");
        assert_eq!(amount, 310);
    }

    #[test]
    fn parse_falls_back_to_top_level_price() {
        let response = EstimateResponse {
            options: None,
            price: Some(PriceField::Detailed { amount: 450.0 }),
        };
        let amount = parse_estimate_response(response, RideClass::Ac).expect("amount");
        assert_eq!(amount, 450);
    }

    #[test]
    fn parse_reports_missing_class() {
        let response = EstimateResponse {
            options: Some(vec![ClassOption {
                class_name: "cargo".to_string(),
                price: PriceField::Amount(900.0),
            }]),
            price: None,
        };
        let result = parse_estimate_response(response, RideClass::Bike);
        assert!(matches!(result, Err(QuoteError::MissingPrice(class)) if class == "bike"));
    }

    #[test]
    fn price_field_tolerates_both_wire_shapes() {
        let bare: PriceField = serde_json::from_str("300").expect("bare number");
        assert_eq!(bare.amount(), 300.0);
        let detailed: PriceField =
            serde_json::from_str(r#"{"amount": 450, "currency": "PKR"}"#).expect("object");
        assert_eq!(detailed.amount(), 450.0);
    }

    #[test]
    fn route_pair_encodes_lon_lat_order() {
        let encoded = encode_route_pair(&trip(RideClass::Mini));
        assert_eq!(encoded, "73.047900,33.684400~73.060000,33.700000");
    }

    #[test]
    fn estimate_url_carries_coordinates_and_class() {
        let provider = EstimateApiProvider::new(ProviderConfig::default());
        let url = provider.request_url(&trip(RideClass::Ac)).expect("url");
        let query = url.query().expect("query string");
        assert!(query.contains("pickup_lat=33.6844"));
        assert!(query.contains("dropoff_lon=73.06"));
        assert!(query.contains("vehicle_type=ac"));
    }
}
