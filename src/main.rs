use clap::Parser;
use expense_tracker::args::{Args, Command};
use expense_tracker::{commands, Config, Result};
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
    let home = args.common().expenses_home().path();
    let user = args.common().user();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.currency()).await?.print(),

        Command::Login(login_args) => {
            commands::login(Config::load(home).await?, login_args.username())
                .await?
                .print()
        }

        Command::Logout => commands::logout(Config::load(home).await?).await?.print(),

        Command::Add(add_args) => {
            commands::add(Config::load(home).await?, user, add_args.clone())
                .await?
                .print()
        }

        Command::Edit(edit_args) => {
            commands::edit(Config::load(home).await?, user, edit_args.clone())
                .await?
                .print()
        }

        Command::Delete(delete_args) => {
            commands::delete(Config::load(home).await?, user, delete_args.clone())
                .await?
                .print()
        }

        Command::List(list_args) => {
            commands::list(Config::load(home).await?, user, list_args.clone())
                .await?
                .print()
        }

        Command::Summary(summary_args) => {
            commands::summary(Config::load(home).await?, user, summary_args.clone())
                .await?
                .print()
        }

        Command::SetIncome(set_args) => {
            commands::set_income(Config::load(home).await?, user, set_args.clone())
                .await?
                .print()
        }

        Command::Backup => commands::backup(Config::load(home).await?, user)
            .await?
            .print(),
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
            // RUST_LOG does not exist; use the given level for the library and the binary only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
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
