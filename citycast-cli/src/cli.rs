use std::process::ExitCode;

use anyhow::Context;
use citycast_core::{Config, FileStore, OpenWeatherProvider, RecentSearches, WeatherApp, app, render};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};

use crate::terminal::TerminalSink;

type App = WeatherApp<OpenWeatherProvider, FileStore, TerminalSink>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "Current weather and 5-day forecast by city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show weather and forecast for a city.
    Search {
        /// City name, e.g. "Paris" or "New York".
        city: String,
    },

    /// Search repeatedly from a menu (the default).
    Interactive,

    /// List recent searches.
    History,

    /// Forget recent searches and the last searched city.
    Clear {
        /// Do not ask for confirmation.
        #[arg(long, short)]
        yes: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(),
            Command::Search { city } => {
                let mut app = build_app()?;
                match app.submit_search(&city).await {
                    Ok(()) => Ok(ExitCode::SUCCESS),
                    Err(_) => Ok(ExitCode::FAILURE),
                }
            }
            Command::Interactive => {
                let mut app = build_app()?;
                interactive(&mut app).await?;
                Ok(ExitCode::SUCCESS)
            }
            Command::History => {
                let recent = RecentSearches::load(open_store()?);
                if recent.is_empty() {
                    println!("No recent searches.");
                } else {
                    for (i, city) in recent.cities().iter().enumerate() {
                        println!("{}. {city}", i + 1);
                    }
                }
                if let Some(city) = recent.last_city() {
                    println!("Last searched: {city}");
                }
                tracing::debug!(path = %recent.store().path().display(), "history file");
                Ok(ExitCode::SUCCESS)
            }
            Command::Clear { yes } => {
                let mut recent = RecentSearches::load(open_store()?);
                let mut sink = TerminalSink::new(yes);
                if !app::clear_history(&mut recent, &mut sink) {
                    println!("History kept.");
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt was aborted")?;

    if key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(key);
    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(ExitCode::SUCCESS)
}

fn open_store() -> anyhow::Result<FileStore> {
    FileStore::open(Config::history_file_path()?)
}

fn build_app() -> anyhow::Result<App> {
    let config = Config::load()?;
    let provider = OpenWeatherProvider::from_config(&config)?;
    Ok(WeatherApp::new(config, provider, open_store()?, TerminalSink::default()))
}

enum MenuItem {
    Search,
    Recent(usize, String),
    Clear,
    Quit,
}

impl std::fmt::Display for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuItem::Search => f.write_str(render::SEARCH_LABEL),
            MenuItem::Recent(_, city) => write!(f, "↺ {city}"),
            MenuItem::Clear => f.write_str("Clear history"),
            MenuItem::Quit => f.write_str("Quit"),
        }
    }
}

async fn interactive(app: &mut App) -> anyhow::Result<()> {
    app.start().await;

    loop {
        let mut items = vec![MenuItem::Search];
        items.extend(
            app.recent_cities()
                .iter()
                .enumerate()
                .map(|(i, city)| MenuItem::Recent(i, city.clone())),
        );
        if !app.recent_cities().is_empty() {
            items.push(MenuItem::Clear);
        }
        items.push(MenuItem::Quit);

        println!();
        let choice = match Select::new("What next?", items).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        match choice {
            MenuItem::Search => {
                let input = match Text::new("City:").prompt() {
                    Ok(input) => input,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(InquireError::OperationInterrupted) => break,
                    Err(e) => return Err(e.into()),
                };
                // Errors are already on screen.
                let _ = app.submit_search(&input).await;
            }
            MenuItem::Recent(index, _) => {
                let _ = app.search_recent(index).await;
            }
            MenuItem::Clear => {
                app.clear_history();
            }
            MenuItem::Quit => break,
        }
    }

    Ok(())
}
