use bigdecimal::BigDecimal;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2026-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parses a configured `output` value; anything unrecognized means text.
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "shopctl", bin_name = "shopctl", version = get_version())]
#[command(about = "Manage store refunds from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (defaults to the configured `output`)
    #[arg(short, long, global = true, value_enum, help_heading = "Options")]
    pub output: Option<OutputFormat>,

    /// Show what would be done without sending anything
    #[arg(long, global = true, help_heading = "Options")]
    pub dry_run: bool,

    /// Admin API token (overrides SHOPLINE_ADMIN_TOKEN)
    #[arg(long, global = true, value_name = "TOKEN", help_heading = "Admin fallback")]
    pub admin_token: Option<String>,

    /// Admin merchant ID (overrides SHOPLINE_ADMIN_MERCHANT_ID)
    #[arg(long, global = true, value_name = "ID", help_heading = "Admin fallback")]
    pub admin_merchant_id: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with refunds
    #[command(display_order = 1)]
    Refunds {
        #[command(subcommand)]
        command: RefundCommands,
    },

    /// Get or set configuration
    #[command(display_order = 2)]
    Config {
        /// Configuration key (e.g., admin-base-url)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RefundCommands {
    /// List refunds
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Results per page
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },

    /// Show one refund
    #[command(display_order = 2)]
    Get {
        /// Refund ID
        id: String,
    },

    /// List the refunds of an order (inferred from action logs if unavailable)
    #[command(display_order = 3)]
    Order {
        /// Order ID
        order_id: String,
    },

    /// Create a refund (falls back to the Admin API if unavailable)
    #[command(display_order = 4)]
    Create(CreateArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct CreateArgs {
    /// Order ID
    #[arg(long)]
    pub order_id: Option<String>,

    /// Refund amount in major units (e.g. 10.50)
    #[arg(long, value_parser = parse_amount)]
    pub amount: Option<BigDecimal>,

    /// Refund note
    #[arg(long)]
    pub note: Option<String>,

    /// Restock refunded items
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub restock: Option<bool>,

    /// Request body as inline JSON
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the request body from a file (`-` for stdin)
    #[arg(long, value_name = "PATH")]
    pub body_file: Option<PathBuf>,

    /// Admin fallback: performer ID (skips action log detection)
    #[arg(long, help_heading = "Admin fallback")]
    pub performer_id: Option<String>,

    /// Admin fallback: order payment updated-at timestamp (skips action log detection)
    #[arg(long, value_name = "TIMESTAMP", help_heading = "Admin fallback")]
    pub payment_updated_at: Option<String>,
}

fn parse_amount(raw: &str) -> std::result::Result<BigDecimal, String> {
    BigDecimal::from_str(raw.trim()).map_err(|_| format!("invalid amount: {}", raw))
}
