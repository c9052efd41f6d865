//! Observability for argcheck
//!
//! Structured JSON-line logging of definition and parse outcomes.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on parsing
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use argcheck::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::info("ARGS_REJECTED", &[("field", "pageNo")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
