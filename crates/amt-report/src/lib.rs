//! amt-report — system card loading and HTML report generation.

pub mod card;
pub mod html;

pub use card::{CardError, SystemCard};
pub use html::{generate_html, timestamp_to_iso8601, write_html_report};
