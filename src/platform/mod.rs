// Device-facing backends: frame sources and hand landmark models
pub mod capture;
pub mod pose;
