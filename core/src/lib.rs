//! Floorplan Relay Core Library
//! Serves the visualizer web GUI and relays uploads to a remote processing server

pub mod browser;
pub mod config;
pub mod proxy;
pub mod uploads;
