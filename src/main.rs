//! usersync — manage user records against a REST collection.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use usersync::config;
use usersync::constants;
use usersync::env;
use usersync::logging;
use usersync::models;
use usersync::session;
use usersync::store;

use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use cli::args::{Cli, Command, CreateArgs, DeleteArgs, UpdateArgs};
use config::Config;
use env::Env;
use models::StoreMode;
use session::{Outcome, Session};
use store::UserStore;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::real();

    logging::init(cli.verbose, &env);

    let workdir = std::env::current_dir().ok();
    let mut config =
        Config::load(workdir.as_deref(), &env).context("failed to load configuration")?;
    config.apply_overrides(&cli.overrides());
    debug!(?config, "resolved configuration");

    match cli.command {
        Command::List => run_list(&config).await,
        Command::Create(args) => run_create(&config, args).await,
        Command::Update(args) => run_update(&config, args).await,
        Command::Delete(args) => run_delete(&config, args).await,
        Command::Shell => run_shell(&config).await,
        Command::Config => run_config(&config),
        Command::Version => run_version(),
    }
}

fn open_store(config: &Config) -> Result<UserStore> {
    let store = UserStore::from_config(config).context("failed to set up the remote client")?;
    if store.mode().is_local_only() {
        warn!(mode = %store.mode(), "changes are kept in memory and discarded on exit");
    }
    Ok(store)
}

/// Print users in the configured format.
fn print_users(config: &Config, users: &[models::UserRecord]) {
    let text = config.display.format.renderer().render(users);
    println!("{}", text.trim_end());
}

/// Fetch and list all users.
async fn run_list(config: &Config) -> Result<()> {
    let mut store = open_store(config)?;
    let users = store.refresh().await.context("could not load users")?;
    print_users(config, users);
    Ok(())
}

/// Create a single user.
async fn run_create(config: &Config, args: CreateArgs) -> Result<()> {
    let mut store = open_store(config)?;
    let draft = args.into_draft(config.records.default_gender);
    let created = store.create(draft).await.context("could not create user")?;
    print_users(config, std::slice::from_ref(&created));
    Ok(())
}

/// Update fields of an existing user.
async fn run_update(config: &Config, args: UpdateArgs) -> Result<()> {
    if args.is_empty() {
        bail!("nothing to update: pass at least one field flag (e.g. --name)");
    }

    let mut store = open_store(config)?;
    store.refresh().await.context("could not load users")?;

    let mut draft = store.edit(&args.id)?;
    args.apply(&mut draft);
    let updated = store
        .update(&args.id, draft)
        .await
        .with_context(|| format!("could not update user {}", args.id))?;
    print_users(config, std::slice::from_ref(&updated));
    Ok(())
}

/// Delete a user.
async fn run_delete(config: &Config, args: DeleteArgs) -> Result<()> {
    let mut store = open_store(config)?;
    store.refresh().await.context("could not load users")?;
    store
        .delete(&args.id)
        .await
        .with_context(|| format!("could not delete user {}", args.id))?;
    println!("  {} Deleted user {}.", "✔".green().bold(), args.id);
    Ok(())
}

/// Interactive shell over one store for the lifetime of the process.
async fn run_shell(config: &Config) -> Result<()> {
    let mut store = open_store(config)?;
    if store.mode() != StoreMode::Offline {
        match store.refresh().await {
            Ok(users) => println!("Loaded {} user(s).", users.len()),
            Err(e) => eprintln!("{} {e}", "✖".red().bold()),
        }
    }

    let mut session = Session::new(store, config.display.format);
    let mut rl = DefaultEditor::new().context("failed to start line editor")?;

    println!(
        "{} {} shell ({} mode) - type {} for commands, {} to leave",
        constants::APP_NAME.bold(),
        constants::VERSION,
        session.store().mode(),
        "help".cyan(),
        "quit".cyan(),
    );

    loop {
        let prompt = session.prompt();
        let line = tokio::task::block_in_place(|| rl.readline(&prompt));
        match line {
            Ok(line) => {
                if let Some(entry) = history_entry(&line) {
                    if let Err(e) = rl.add_history_entry(entry) {
                        debug!(error = %e, "could not record shell history");
                    }
                }
                match session.run_line(&line).await {
                    Ok(Outcome::Continue(text)) => {
                        if !text.is_empty() {
                            println!("{}", text.trim_end());
                        }
                    }
                    Ok(Outcome::Quit) => break,
                    Err(e) => eprintln!("{} {e}", "✖".red().bold()),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("failed to read input"),
        }
    }

    Ok(())
}

/// The text to keep in shell history for `line`, if any.
fn history_entry(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Print the resolved configuration as TOML.
fn run_config(config: &Config) -> Result<()> {
    let text = toml::to_string_pretty(config).context("failed to serialize configuration")?;
    if let Some(path) = Config::global_config_path() {
        println!("# global config: {}", path.display());
    }
    println!("# local config:  ./{}", constants::CONFIG_FILENAME);
    print!("{text}");
    Ok(())
}

/// Print detailed version and build information.
fn run_version() -> Result<()> {
    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    println!("{}     {}", "target:".dimmed(), constants::TARGET);
    Ok(())
}
