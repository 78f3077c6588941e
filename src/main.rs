use clap::Parser;
use finance_tracker::args::{Args, Command};
use finance_tracker::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args).await?.print(),

        Command::Add(add_args) => commands::add(Config::load(home).await?, add_args.clone())
            .await?
            .print(),

        Command::Edit(edit_args) => commands::edit(Config::load(home).await?, edit_args.clone())
            .await?
            .print(),

        Command::Delete(delete_args) => {
            commands::delete(Config::load(home).await?, delete_args.clone())
                .await?
                .print()
        }

        Command::View(view_args) => commands::view(Config::load(home).await?, view_args.clone())
            .await?
            .print(),

        Command::Categories(categories_args) => commands::categories(categories_args)?.print(),

        Command::Months(months_args) => commands::months(months_args)?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "finance_tracker={},{}={}",
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
