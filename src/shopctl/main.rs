//! # Shopctl CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/shopctl/cli/`, while
//! this file only starts the runtime, invokes `cli::run()`, and handles process
//! termination. Everything from `api.rs` inward lives in the `shopctl` library
//! and never touches the terminal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (src/shopctl/cli/)                               │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Config + client wiring, dispatch (commands.rs)           │
//! │  - Terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (src/shopctl/api.rs)                             │
//! │  - Builds refund requests from bodies and flags             │
//! │  - Dispatches to command modules                            │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure surfaces here as `Error: <message>` on stderr with exit code 1.

mod cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
