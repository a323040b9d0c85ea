// Data models for camera frames, hand tracking, and the labeled dataset

pub mod capture;
pub mod dataset;
pub mod pose;
