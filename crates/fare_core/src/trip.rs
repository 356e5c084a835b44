//! Trip value records: ride classes, the immutable request and its derived
//! metrics, and the draft that validates user input before any network call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{estimate_eta_minutes, haversine_km, Coordinate};

/// Service tier requested for a trip. Drives provider class selection and the
/// mock pricing multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RideClass {
    Bike,
    Mini,
    Ac,
}

impl RideClass {
    /// Class identifier the pricing provider expects.
    pub fn api_class(&self) -> &'static str {
        match self {
            RideClass::Bike => "bike",
            RideClass::Mini => "mini",
            RideClass::Ac => "ac",
        }
    }

    /// Multiplier applied to the per-km rate in mock estimates. The ratios
    /// follow the fallback price sheet (bike : mini : ac = 150 : 300 : 450).
    pub fn mock_multiplier(&self) -> f64 {
        match self {
            RideClass::Bike => 0.5,
            RideClass::Mini => 1.0,
            RideClass::Ac => 1.5,
        }
    }

    /// Human-readable name for presentation.
    pub fn label(&self) -> &'static str {
        match self {
            RideClass::Bike => "Bike",
            RideClass::Mini => "Ride Mini",
            RideClass::Ac => "Ride AC",
        }
    }
}

/// A fully specified trip. Immutable once built; the estimator never mutates
/// it, only derives values from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub pickup: Coordinate,
    pub destination: Coordinate,
    pub ride_class: RideClass,
}

/// Distance and travel time derived from a [`TripRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripMetrics {
    pub distance_km: f64,
    pub eta_minutes: u32,
}

impl TripMetrics {
    /// Pure derivation: the same request always yields the same metrics.
    pub fn for_trip(trip: &TripRequest) -> Self {
        let distance_km = haversine_km(trip.pickup, trip.destination);
        Self {
            distance_km,
            eta_minutes: estimate_eta_minutes(distance_km),
        }
    }
}

/// Precondition failures reported before any quote request goes out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TripValidationError {
    #[error("pickup location is not set")]
    MissingPickup,
    #[error("destination is not set")]
    MissingDestination,
    #[error("ride class is not selected")]
    MissingRideClass,
}

/// User input captured so far. [`TripDraft::finalize`] gates the workflow:
/// nothing talks to the network until all three fields are present.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TripDraft {
    pub pickup: Option<Coordinate>,
    pub destination: Option<Coordinate>,
    pub ride_class: Option<RideClass>,
}

impl TripDraft {
    pub fn finalize(&self) -> Result<TripRequest, TripValidationError> {
        let pickup = self.pickup.ok_or(TripValidationError::MissingPickup)?;
        let destination = self
            .destination
            .ok_or(TripValidationError::MissingDestination)?;
        let ride_class = self
            .ride_class
            .ok_or(TripValidationError::MissingRideClass)?;
        Ok(TripRequest {
            pickup,
            destination,
            ride_class,
        })
    }
}
