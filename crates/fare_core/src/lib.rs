pub mod comparison;
pub mod deeplink;
pub mod geo;
pub mod geocoding;
pub mod pricing;
pub mod quotes;
pub mod session;
pub mod trip;
pub mod workflow;
