//! Logging facilities.
//!
//! Everything is instrumented with the `tracing` crate. To see logs, install
//! a subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // ...
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives, e.g.
/// `RUST_LOG=airline_md::selector=debug`.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "airline_md_core";
    /// Signal and one-shot signal target.
    pub const SIGNAL: &str = "airline_md_core::signal";
    /// Task queue target.
    pub const TASK: &str = "airline_md_core::task";
    /// List selection coordinator target.
    pub const SELECTOR: &str = "airline_md::selector";
    /// List view and selection model target.
    pub const LIST: &str = "airline_md::list";
    /// Entity service target.
    pub const SERVICE: &str = "airline_md::service";
    /// Screen controller target.
    pub const SCREEN: &str = "airline_md::screen";
    /// Configuration loading target.
    pub const CONFIG: &str = "airline_md::config";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for tracking the duration of an operation.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "airline_md::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
