use crate::domain::GeoPoint;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

// Points are written as `[longitude, latitude]`, the GeoJSON position order
impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (longitude, latitude) = <(f64, f64)>::deserialize(deserializer)?;
        GeoPoint::new(longitude, latitude).map_err(|e| Error::custom(format!("invalid point [{}, {}]: {}", longitude, latitude, e)))
    }
}
