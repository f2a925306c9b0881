// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sukarela volunteer client CLI.
//!
//! Each subcommand is one screen of the app: sign in, look at the profile
//! and event lists, or feed decoded QR codes to the attendance scanner.

use std::path::PathBuf;

use clap::Parser;
use sukarela_client::config::Config;
use sukarela_client::screens::login::login_alert;
use sukarela_client::screens::Route;
use sukarela_client::AppState;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sukarela", about = "Sukarela volunteer client")]
struct Cli {
    /// Server host, without the /api suffix.
    #[arg(long, env = "SUKARELA_API_BASE")]
    api_base: Option<String>,

    /// Directory for the sealed credential store.
    #[arg(long, env = "SUKARELA_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Emit JSON logs instead of human-readable ones.
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Show whether a session is stored and where the app would open.
    Status,
    /// Sign in as a volunteer.
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when not given.
        #[arg(long, env = "SUKARELA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session.
    Logout {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Profile and totals.
    Home {
        /// Keep the screen open; Enter refreshes, q quits.
        #[arg(long)]
        follow: bool,
    },
    /// Upcoming events.
    Upcoming {
        #[arg(long)]
        follow: bool,
    },
    /// Attendance history.
    Attended {
        #[arg(long)]
        follow: bool,
    },
    /// Record attendance from one decoded QR code.
    Scan { code: String },
    /// Treat every stdin line as a decoded QR code.
    Scanner,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let mut config = Config::from_env()?;
    if let Some(api_base) = cli.api_base {
        config.set_api_base("--api-base", &api_base)?;
    }
    if let Some(state_dir) = cli.state_dir {
        config.state_dir = state_dir;
    }
    tracing::debug!(api = %config.api_url(), state_dir = %config.state_dir.display(), "Configuration loaded");

    let state = AppState::new(config)?;
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    match cli.command {
        Command::Status => status(&state),
        Command::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => {
                    eprint!("Password: ");
                    stdin.next_line().await?.unwrap_or_default()
                }
            };
            login(&state, &email, &password).await;
        }
        Command::Logout { yes } => {
            if !yes {
                println!("Are you sure you want to log out? [y/N]");
                let answer = stdin.next_line().await?.unwrap_or_default();
                if !matches!(answer.trim(), "y" | "Y" | "yes") {
                    return Ok(());
                }
            }
            state.home_screen().logout();
            println!("Logged out.");
        }
        Command::Home { follow } => {
            if require_session(&state) {
                home(&state, follow, &mut stdin).await;
            }
        }
        Command::Upcoming { follow } => {
            if require_session(&state) {
                let mut screen = state.upcoming_screen();
                screen.load().await;
                println!("{}", screen.render(&chrono::Local::now()));
                while follow && next_prompt(&mut stdin).await == Prompt::Refresh {
                    screen.refresh().await;
                    println!("{}", screen.render(&chrono::Local::now()));
                }
            }
        }
        Command::Attended { follow } => {
            if require_session(&state) {
                let mut screen = state.attended_screen();
                screen.load().await;
                println!("{}", screen.render(&chrono::Local::now()));
                while follow && next_prompt(&mut stdin).await == Prompt::Refresh {
                    screen.refresh().await;
                    println!("{}", screen.render(&chrono::Local::now()));
                }
            }
        }
        Command::Scan { code } => {
            if require_session(&state) {
                let screen = state.scanner_screen();
                if let Some(alert) = screen.on_decode(&code).await {
                    println!("{}: {}", alert.title, alert.message);
                }
            }
        }
        Command::Scanner => {
            if require_session(&state) {
                let screen = state.scanner_screen();
                println!("{}", screen.instructions());
                while let Some(line) = stdin.next_line().await? {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Some(alert) = screen.on_decode(&line).await {
                        println!("{}: {}", alert.title, alert.message);
                    }
                }
            }
        }
    }

    Ok(())
}

fn status(state: &AppState) {
    let stored = state.store.load();
    match state.startup_route() {
        Route::Home => {
            let name = stored
                .user
                .as_ref()
                .map(|u| u.display_name().to_string())
                .unwrap_or_else(|| "unknown user".to_string());
            println!("Logged in as {}", name);
        }
        _ => println!("Not logged in"),
    }
}

async fn login(state: &AppState, email: &str, password: &str) {
    let screen = state.login_screen();
    match screen.submit(email, password).await {
        Ok(session) => println!("Welcome, {}!", session.user.first_name()),
        Err(e) => {
            let alert = login_alert(&e);
            println!("{}: {}", alert.title, alert.message);
        }
    }
}

async fn home(state: &AppState, follow: bool, stdin: &mut Lines<BufReader<Stdin>>) {
    let mut screen = state.home_screen();
    let mut route = screen.load().await;
    loop {
        if route == Some(Route::Login) {
            println!("Your session has expired. Run `sukarela login` to sign in again.");
            return;
        }
        println!("{}", screen.render(&chrono::Local::now()));
        if !follow || next_prompt(stdin).await == Prompt::Quit {
            return;
        }
        route = screen.refresh().await;
    }
}

/// Screens behind login bounce to the login hint when no session is stored.
fn require_session(state: &AppState) -> bool {
    if state.startup_route() == Route::Login {
        println!("Not logged in. Run `sukarela login --email <EMAIL>` first.");
        return false;
    }
    true
}

#[derive(Debug, PartialEq, Eq)]
enum Prompt {
    Refresh,
    Quit,
}

/// Enter or `r` refreshes; `q` or end of input quits.
async fn next_prompt(stdin: &mut Lines<BufReader<Stdin>>) -> Prompt {
    match stdin.next_line().await {
        Ok(Some(line)) if matches!(line.trim(), "q" | "quit") => Prompt::Quit,
        Ok(Some(_)) => Prompt::Refresh,
        Ok(None) => Prompt::Quit,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stdin");
            Prompt::Quit
        }
    }
}

/// Initialize logging on stderr, optionally as structured JSON.
fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sukarela_client=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
