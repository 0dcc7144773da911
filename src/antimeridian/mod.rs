mod normalizer;

pub use normalizer::{GeometryError, crosses_antimeridian, normalize};
