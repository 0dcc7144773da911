mod geo_point;
mod geodesic_line;
mod property_bag;

pub use geo_point::{EndpointPair, GeoPoint};
pub use geodesic_line::{GeodesicLine, NormalizedGeometry};
pub use property_bag::PropertyBag;
