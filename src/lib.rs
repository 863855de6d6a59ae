//! Motorsport championship standings.
//!
//! Turns per-race result rows and penalty rows into driver points, pole
//! counts, rankings, and per-round highlights. The `standings` engine is pure;
//! loading, configuration, and rendering live around it.

pub mod config;
pub mod load;
pub mod logging;
pub mod output;
pub mod report;
pub mod snapshot;
pub mod standings;
