//! # Shopctl Architecture
//!
//! Shopctl is a command-line client for a store's refunds on the Shopline
//! platform. Like any API client it is mostly plumbing; the part that needs
//! care is what happens when a store does not expose the Open API refund
//! endpoints at all and answers them with a 404:
//!
//! - **Creating** a refund degrades to the lower-level Admin API. That API
//!   wants integer minor units, a performer id, and the order's last payment
//!   update time, so the order is loaded, the amount is converted per the
//!   order's currency, and the missing fields are mined from the order's
//!   action logs (see [`commands::fallback`]).
//! - **Listing** an order's refunds degrades to an inferred view built from
//!   refund-related action log entries, clearly flagged as such
//!   (see [`commands::order_refunds`]).
//!
//! Only a structured API error carrying a 404 triggers either path.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Refund logic, fallback paths, action log mining          │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client Layer (client/)                                     │
//! │  - OpenApi / AdminApi traits, AdminProvider seam            │
//! │  - reqwest clients (production), memory clients (testing)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Progress notes travel back as [`commands::CmdMessage`]s and
//! diagnostics go through `tracing`.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): unit tests against the in-memory clients.
//!    This is where most testing lives.
//! 2. **Clients** (`client/*.rs`): request/response mapping against `httpmock`.
//! 3. **CLI** (`tests/`): the built binary end to end against a mock server.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`client`]: Remote API traits and implementations
//! - [`model`]: Wire and presentation types
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and rendering for the binary (not part of the lib API)

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
