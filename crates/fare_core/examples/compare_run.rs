//! Run one offline comparison and print the presenter summary.
//!
//! Run with: cargo run -p fare_core --example compare_run

use fare_core::geo::Coordinate;
use fare_core::geocoding::{GeocoderConfig, GeocodingClient};
use fare_core::pricing::PricingConfig;
use fare_core::quotes::QuoteLadder;
use fare_core::trip::{RideClass, TripDraft};
use fare_core::workflow::ComparisonWorkflow;

fn main() {
    tracing_subscriber::fmt().init();

    // Blue Area to F-10, Islamabad.
    let draft = TripDraft {
        pickup: Some(Coordinate::new(33.6844, 73.0479).expect("pickup")),
        destination: Some(Coordinate::new(33.7000, 73.0600).expect("destination")),
        ride_class: Some(RideClass::Mini),
    };
    let trip = draft.finalize().expect("complete draft");

    // No live credentials in the example: every quote is a mock estimate.
    let ladder = QuoteLadder::mock_only(PricingConfig::default());
    let geocoder = GeocodingClient::new(GeocoderConfig::default());
    let mut workflow = ComparisonWorkflow::new(geocoder, ladder);

    let outcome = workflow.run(trip);
    let summary = &outcome.summary;

    println!("--- {} comparison ---", outcome.trip.ride_class.label());
    println!("{} -> {}", summary.pickup_label, summary.destination_label);
    println!(
        "{:.1} km, about {} min",
        summary.distance_km, summary.eta_minutes
    );
    println!(
        "primary: {} {}   competitor: {} {}",
        summary.primary_amount, summary.currency, summary.competitor_amount, summary.currency
    );
    println!(
        "cheaper side: {:?}, saves {} {} ({}%)",
        summary.cheaper_side, summary.savings_amount, summary.currency, summary.savings_percent
    );
    if summary.approximate_pricing {
        println!("note: approximate pricing (no live quote available)");
    }
}
