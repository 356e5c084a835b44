//! Deep links for handing the chosen trip off to the provider apps.
//!
//! Pure string builders; actually opening a URL or launching a package is the
//! navigation collaborator's job.

use crate::geo::Coordinate;

const PRIMARY_ROUTE_BASE: &str = "https://yango.go.link/route";
const COMPETITOR_PACKAGE: &str = "com.bykea.pk";
const COMPETITOR_STORE_URL: &str = "https://play.google.com/store/apps/details?id=com.bykea.pk";
const REFERRAL_TAG: &str = "fare_compare";

/// Routing deep link that opens the primary provider's app with both trip
/// endpoints pre-filled.
pub fn primary_ride_link(pickup: Coordinate, destination: Coordinate) -> String {
    format!(
        "{PRIMARY_ROUTE_BASE}?start-lat={}&start-lon={}&end-lat={}&end-lon={}&ref={REFERRAL_TAG}",
        pickup.latitude(),
        pickup.longitude(),
        destination.latitude(),
        destination.longitude(),
    )
}

/// Android package name for launching the competitor app directly.
pub fn competitor_package() -> &'static str {
    COMPETITOR_PACKAGE
}

/// Store page used when the competitor app is not installed.
pub fn competitor_install_link() -> &'static str {
    COMPETITOR_STORE_URL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_link_carries_both_endpoints() {
        let pickup = Coordinate::new(33.6844, 73.0479).expect("pickup");
        let destination = Coordinate::new(33.7, 73.06).expect("destination");
        let link = primary_ride_link(pickup, destination);
        assert!(link.starts_with(PRIMARY_ROUTE_BASE));
        assert!(link.contains("start-lat=33.6844"));
        assert!(link.contains("start-lon=73.0479"));
        assert!(link.contains("end-lat=33.7"));
        assert!(link.contains("end-lon=73.06"));
        assert!(link.contains("ref=fare_compare"));
    }

    #[test]
    fn competitor_fallback_points_at_store_listing() {
        assert!(competitor_install_link().contains(competitor_package()));
    }
}
