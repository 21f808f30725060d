//! # CLI Behavior
//!
//! This is **one possible UI client** for shopctl, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! For the overall architecture, see the crate-level documentation of the `shopctl` library.
//!
//! ## Output Channels
//!
//! Results go to stdout, as a table or detail view in text mode and as JSON
//! with `--output json`. Warnings and errors always go to stderr, so the
//! fallback notices never corrupt JSON that is being piped elsewhere.
//!
//! ## Degraded Stores
//!
//! - `shopctl refunds create` retries through the Admin API when the Open API
//!   answers 404. The Admin credentials come from `--admin-token` /
//!   `--admin-merchant-id`, the `SHOPLINE_ADMIN_*` env vars, or the config file.
//!   `--performer-id` and `--payment-updated-at` skip action log detection.
//! - `shopctl refunds order <id>` prints refund-related action log entries
//!   instead of refunds when the order refunds endpoint answers 404.
//!
//! ## Module Structure
//!
//! - `commands`: Dispatch, context wiring, and per-command output
//! - `render`: Output formatting (tables, colors, messages)
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling constants

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
