mod sampler;

pub use sampler::{GeodesyError, InverseSolution, SamplingSpec, compute, inverse};
