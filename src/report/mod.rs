//! Report generation.
//!
//! Renders a built report as plain text or JSON.

pub mod clock;
pub mod generator;
pub mod narrative;

pub use clock::{Clock, SystemClock};
pub use generator::{
    build_report, generate_json_report, write_text_report, DEFAULT_TIMESTAMP_FORMAT,
};
