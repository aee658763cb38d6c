//! HTTP handlers.

mod metrics;
mod status;
mod vlans;

pub use metrics::{metrics_handler, render_exposition};
pub use status::status_handler;
pub use vlans::vlans_handler;
