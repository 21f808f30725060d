//! Dispatch for the shopctl CLI.
//!
//! `run` parses arguments, sets up logging, resolves configuration, builds the
//! API facade, and hands off to one handler per command. Handlers call the API
//! and print; they never contain refund logic.

use super::render::{
    print_messages, render_config, render_fallback_json, render_inferred,
    render_inferred_json, render_json, render_order_refunds, render_refund_detail,
    render_refund_list,
};
use super::setup::{Cli, Commands, CreateArgs, OutputFormat, RefundCommands};
use clap::Parser;
use shopctl::api::{AdminOverrides, CmdResult, ConfigAction, RefundFlags, ShopApi};
use shopctl::client::admin::ConfigAdminProvider;
use shopctl::client::http::HttpClient;
use shopctl::config::{config_dir, ShopConfig};
use shopctl::error::{Result, ShopError};
use shopctl::model::RefundsListOptions;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

type Api = ShopApi<HttpClient, ConfigAdminProvider>;

struct AppContext {
    api: Api,
    output: OutputFormat,
}

impl AppContext {
    fn text_mode(&self) -> bool {
        self.output == OutputFormat::Text
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let dir = config_dir()?;

    let command = match cli.command {
        Commands::Config { key, value } => return handle_config(&dir, key, value),
        Commands::Refunds { command } => command,
    };

    if cli.dry_run {
        if let RefundCommands::Create(_) = command {
            println!("[DRY-RUN] Would create refund");
            return Ok(());
        }
    }

    let mut config = ShopConfig::load(&dir)?;
    config.apply_env();
    if let Some(token) = cli.admin_token {
        config.admin_token = Some(token);
    }
    if let Some(merchant_id) = cli.admin_merchant_id {
        config.admin_merchant_id = Some(merchant_id);
    }

    let token = config.access_token()?.to_string();
    let open = HttpClient::new(&config.api_base_url, token)?;
    let admin = ConfigAdminProvider::new(&config);
    let ctx = AppContext {
        api: ShopApi::new(open, admin),
        output: cli
            .output
            .unwrap_or_else(|| OutputFormat::from_config(&config.output)),
    };

    tokio::select! {
        res = dispatch(&ctx, command) => res,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted; abandoning in-flight request");
            Err(ShopError::Cancelled)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn dispatch(ctx: &AppContext, command: RefundCommands) -> Result<()> {
    match command {
        RefundCommands::List { page, page_size } => handle_list(ctx, page, page_size).await,
        RefundCommands::Get { id } => handle_get(ctx, &id).await,
        RefundCommands::Order { order_id } => handle_order(ctx, &order_id).await,
        RefundCommands::Create(args) => handle_create(ctx, args).await,
    }
}

async fn handle_list(ctx: &AppContext, page: u32, page_size: u32) -> Result<()> {
    let result = ctx
        .api
        .list_refunds(RefundsListOptions { page, page_size })
        .await?;
    if let Some(resp) = &result.refunds {
        if ctx.text_mode() {
            print!("{}", render_refund_list(resp));
        } else {
            print!("{}", render_json(resp)?);
        }
    }
    print_messages(&result.messages, ctx.text_mode());
    Ok(())
}

async fn handle_get(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.get_refund(id).await?;
    if let Some(refund) = &result.refund {
        if ctx.text_mode() {
            print!("{}", render_refund_detail(refund));
        } else {
            print!("{}", render_json(refund)?);
        }
    }
    print_messages(&result.messages, ctx.text_mode());
    Ok(())
}

async fn handle_order(ctx: &AppContext, order_id: &str) -> Result<()> {
    let result = ctx.api.list_order_refunds(order_id).await?;
    print_messages(&result.messages, ctx.text_mode());

    if let Some(inferred) = &result.inferred {
        if ctx.text_mode() {
            print!("{}", render_inferred(inferred));
        } else {
            print!("{}", render_inferred_json(inferred)?);
        }
    } else if let Some(resp) = &result.refunds {
        if ctx.text_mode() {
            print!("{}", render_order_refunds(order_id.trim(), resp));
        } else {
            print!("{}", render_json(resp)?);
        }
    }
    Ok(())
}

async fn handle_create(ctx: &AppContext, args: CreateArgs) -> Result<()> {
    let body = read_body(args.body, args.body_file.as_deref())?;
    let flags = RefundFlags {
        order_id: args.order_id,
        amount: args.amount,
        note: args.note,
        restock: args.restock,
    };
    let overrides = AdminOverrides {
        performer_id: args.performer_id,
        payment_updated_at: args.payment_updated_at,
    };

    let result = ctx
        .api
        .create_refund(body.as_deref(), &flags, &overrides)
        .await?;
    print_messages(&result.messages, ctx.text_mode());
    if !ctx.text_mode() {
        print_created_json(&result)?;
    }
    Ok(())
}

fn print_created_json(result: &CmdResult) -> Result<()> {
    if let Some(fallback) = &result.fallback_refund {
        print!("{}", render_fallback_json(fallback)?);
    } else if let Some(refund) = &result.refund {
        print!("{}", render_json(refund)?);
    }
    Ok(())
}

/// Resolves the raw request body from `--body` or `--body-file` (`-` reads stdin).
fn read_body(inline: Option<String>, file: Option<&Path>) -> Result<Option<String>> {
    if inline.is_some() {
        return Ok(inline);
    }
    let Some(path) = file else {
        return Ok(None);
    };

    let read = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).map(|_| buffer)
    } else {
        std::fs::read_to_string(path)
    };
    read.map(Some).map_err(|e| {
        ShopError::validation(format!(
            "failed to read refund body from {}: {}",
            path.display(),
            e
        ))
    })
}

fn handle_config(dir: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let result = shopctl::api::config(dir, action)?;

    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    print_messages(&result.messages, true);
    Ok(())
}
