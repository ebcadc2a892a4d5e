// Adapters layer: file formats in and out of the domain model.

pub mod tabular;
