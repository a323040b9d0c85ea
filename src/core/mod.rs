pub mod config;
pub mod logging;

// Dataset handling
pub mod dataset_store;
pub mod sample_ingestor;
pub mod statistics;
pub mod lifecycle;

// Session and detection loop
pub mod detection_feed;
pub mod capture_session;
