//! Reservation admin command-line front-end
//!
//! Drives the list, form and dashboard view models against the configured
//! reservation backend.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use reservate_admin::notify::describe_failure;
use reservate_admin::{
    AdminContext, CreateForm, ListView, SortField, SortOrder, StateFilter, SubmitOutcome,
    SummaryView, UpdateForm, render,
};
use reservate_core::utils::parse_datetime;
use reservate_core::{AdminConfig, ClientId, ServiceId, init_logging};
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

/// Command line interface for the reservation admin
#[derive(Parser)]
#[command(
    name = "reservate-admin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Manage workshop service reservations",
    long_about = "List, create, edit and delete workshop service reservations and show a summary dashboard, backed by the reservation REST API."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// How results are printed
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Aligned text
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// List reservations
    List {
        /// Match client name, code or service title
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only show this state (or "all")
        #[arg(long, default_value = "all")]
        state: StateFilter,

        /// Sort column
        #[arg(long, value_enum, default_value_t = SortField::Date)]
        sort: SortField,

        /// Sort direction
        #[arg(long, value_enum, default_value_t = SortOrder::Descending)]
        order: SortOrder,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show one reservation
    Show {
        /// Reservation code
        #[arg(value_name = "CODE")]
        code: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Create a reservation
    Create {
        /// Positive reservation code
        #[arg(long)]
        code: i64,

        /// Reservation date (RFC 3339, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD`)
        #[arg(long)]
        date: String,

        /// Initial state
        #[arg(long, default_value = "pending")]
        state: String,

        /// Client id
        #[arg(long)]
        client: ClientId,

        /// Service id; repeat for several services
        #[arg(long = "service", value_name = "ID")]
        services: Vec<ServiceId>,
    },

    /// Edit a reservation
    Update {
        /// Reservation code
        #[arg(value_name = "CODE")]
        code: String,

        /// New reservation date
        #[arg(long)]
        date: Option<String>,

        /// New state
        #[arg(long)]
        state: Option<String>,

        /// New client id
        #[arg(long)]
        client: Option<ClientId>,

        /// Replace the services; repeat for several services
        #[arg(long = "service", value_name = "ID")]
        services: Vec<ServiceId>,

        /// Override the computed total
        #[arg(long)]
        total: Option<String>,
    },

    /// Delete a reservation
    Delete {
        /// Reservation code
        #[arg(value_name = "CODE")]
        code: String,

        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// Show reservation counts per state and revenue
    Summary {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Inspect configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Main entry point for the admin CLI
///
/// # Errors
///
/// Returns error if configuration, logging setup or the command fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    let config = AdminConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, cli.json || config.logging.is_json())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "Reservation admin starting"
    );

    if let Commands::Config { show } = cli.command {
        return handle_config_command(&config, show);
    }

    let context = AdminContext::new(config).context("Failed to create HTTP client")?;

    run_until_interrupted(run_command(cli.command, context), async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Run `command` unless `interrupt` resolves first, which fails the process
async fn run_until_interrupted(
    command: impl Future<Output = anyhow::Result<()>>,
    interrupt: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    tokio::select! {
        result = command => result,
        () = interrupt => {
            warn!("Received Ctrl+C, dropping in-flight request");
            bail!("Interrupted")
        }
    }
}

/// Dispatch a backend-facing subcommand
async fn run_command(command: Commands, context: AdminContext) -> anyhow::Result<()> {
    match command {
        Commands::List {
            search,
            state,
            sort,
            order,
            format,
        } => {
            let mut view = ListView::new(context);
            view.load().await;
            view.set_search_term(search);
            view.set_state_filter(state);
            view.set_sort(sort, order);

            let rows = view.rows();
            match format {
                OutputFormat::Table => println!("{}", render::reservation_table(rows)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
            }
            Ok(())
        }
        Commands::Show { code, format } => show_reservation(&context, &code, format).await,
        Commands::Create {
            code,
            date,
            state,
            client,
            services,
        } => {
            let mut form = CreateForm::new(context);
            form.load().await;
            form.input.code = Some(code);
            form.input.reservation_date = Some(parse_datetime(&date)?);
            form.input.state = state;
            form.input.client_id = Some(client);
            form.select_services(&services);

            report_outcome(form.submit().await, "Created")
        }
        Commands::Update {
            code,
            date,
            state,
            client,
            services,
            total,
        } => {
            let Ok(mut form) = UpdateForm::open(context, Some(code.as_str())).await else {
                bail!("Could not open reservation {code}");
            };

            if let Some(date) = date {
                form.input.reservation_date = Some(parse_datetime(&date)?);
            }
            if let Some(state) = state {
                form.input.state = state;
            }
            if client.is_some() {
                form.input.client_id = client;
            }
            if !services.is_empty() {
                form.select_services(&services);
            }
            if let Some(total) = total {
                form.set_total_price(total);
            }

            report_outcome(form.submit().await, "Updated")
        }
        Commands::Delete { code, yes } => {
            let mut view = ListView::new(context);
            view.open_delete_dialog(code.clone());

            if !yes {
                view.cancel_delete();
                println!("Deletion of {code} cancelled; pass --yes to confirm");
                return Ok(());
            }
            if !view.confirm_delete().await {
                bail!("Reservation {code} was not deleted");
            }
            Ok(())
        }
        Commands::Summary { format } => {
            let mut view = SummaryView::new(context);
            view.load().await;

            match format {
                OutputFormat::Table => println!("{}", render::summary(view.summary())),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(view.summary())?);
                }
            }
            Ok(())
        }
        Commands::Config { .. } => Ok(()),
    }
}

/// Fetch and print a single reservation
async fn show_reservation(
    context: &AdminContext,
    code: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let reservation = match context.service.get_reservation_by_code(code).await {
        Ok(reservation) => reservation,
        Err(e) => {
            context
                .notifier
                .error(&describe_failure("Error loading reservation", &e));
            return Err(e.into());
        }
    };

    match format {
        OutputFormat::Table => println!("{}", render::reservation_detail(&reservation)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reservation)?),
    }
    Ok(())
}

/// Turn a form outcome into the process result
fn report_outcome(outcome: SubmitOutcome, verb: &str) -> anyhow::Result<()> {
    match outcome {
        SubmitOutcome::Saved {
            reservation,
            navigate_to,
        } => {
            info!(code = %reservation.code, route = %navigate_to, "Form submitted");
            println!("{verb} reservation {}", reservation.code);
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => bail!("Invalid reservation: {errors}"),
        SubmitOutcome::Failed { reason } => bail!("{reason}"),
    }
}

/// Handle configuration commands
///
/// # Errors
///
/// Returns error if configuration cannot be serialized
fn handle_config_command(config: &AdminConfig, show: bool) -> anyhow::Result<()> {
    if show {
        println!("{}", config.to_toml()?);
    } else {
        info!(base_url = %config.api.base_url, "Configuration is valid");
        println!("Configuration is valid. Use --show to print it.");
    }
    Ok(())
}
