use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Select, Text};
use std::{fmt, path::PathBuf};
use weather_core::{
    Config, FileHistoryStore, HistoryStore, MemoryHistoryStore, SearchHistory, UiState,
    WeatherApp, format::long_date_label, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Current weather and a 5-day forecast for any city"
)]
pub struct Cli {
    /// Read configuration from this file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Neither read nor write search history.
    #[arg(long, global = true)]
    pub no_history: bool,

    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// Key to store; prompted for when absent.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Look up one city and print the result.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,
    },

    /// Search repeatedly, picking from recent searches.
    Interactive,

    /// List recent searches.
    History {
        /// Forget all recent searches.
        #[arg(long)]
        clear: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.as_ref().unwrap_or(&Command::Interactive) {
            Command::Configure { api_key } => self.configure(api_key.clone()),
            Command::Show { city } => self.show(city).await,
            Command::Interactive => self.interactive().await,
            Command::History { clear } => self.history(*clear),
        }
    }

    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_file_path(),
        }
    }

    /// File values only; env overrides are applied by [`Self::load_config`].
    fn load_file_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    fn save_file_config(&self, config: &Config) -> anyhow::Result<()> {
        match &self.config {
            Some(path) => config.save_to(path),
            None => config.save(),
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        Ok(self.load_file_config()?.with_env_overrides())
    }

    fn history_store(&self) -> anyhow::Result<Box<dyn HistoryStore>> {
        if self.no_history {
            return Ok(Box::new(MemoryHistoryStore::default()));
        }
        Ok(Box::new(FileHistoryStore::new(
            Config::preferences_file_path()?,
        )))
    }

    fn app(&self) -> anyhow::Result<WeatherApp> {
        let config = self.load_config()?;
        tracing::debug!(base_url = config.base_url(), "using OpenWeather");
        let provider = provider_from_config(&config)?;
        Ok(WeatherApp::new(provider, self.history_store()?))
    }

    fn configure(&self, api_key: Option<String>) -> anyhow::Result<()> {
        // Env overrides are never persisted.
        let mut config = self.load_file_config()?;

        let api_key = match api_key {
            Some(key) => key,
            None => Password::new("OpenWeather API key:")
                .without_confirmation()
                .prompt()
                .context("Failed to read API key")?,
        };
        if api_key.trim().is_empty() {
            bail!("API key must not be empty");
        }

        config.set_api_key(api_key);
        self.save_file_config(&config)?;
        println!("Saved configuration to {}", self.config_path()?.display());
        Ok(())
    }

    async fn show(&self, city: &str) -> anyhow::Result<()> {
        let mut app = self.app()?;
        let state = app.search(Some(city.to_string())).await;

        if let Some(error) = &state.error {
            bail!("{error}");
        }
        print!("{}", render::render_state(state, &long_date_label()));
        Ok(())
    }

    fn history(&self, clear: bool) -> anyhow::Result<()> {
        let store = self.history_store()?;

        if clear {
            store.save(&SearchHistory::default())?;
            println!("Search history cleared.");
            return Ok(());
        }

        let history = store.load();
        if history.is_empty() {
            println!("No recent searches.");
        } else {
            println!("{}", render::render_chips(&history));
        }
        Ok(())
    }

    async fn interactive(&self) -> anyhow::Result<()> {
        let mut app = self.app()?;
        app.start();

        loop {
            if app.state().is_loading {
                println!("{}", app.state().search_label());
                app.settle().await;
            }
            print!("{}", render::render_state(app.state(), &long_date_label()));

            let choice = tokio::task::block_in_place(|| prompt_next(app.state()))?;
            match choice {
                MenuChoice::Search(query) => {
                    app.set_query(query);
                    app.submit(None);
                }
                MenuChoice::Chip(city) => app.submit(Some(city)),
                MenuChoice::Quit => break,
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum MenuChoice {
    Search(String),
    Chip(String),
    Quit,
}

/// One entry in the action menu.
#[derive(Debug, Clone, PartialEq)]
enum MenuItem {
    NewSearch,
    Chip(String),
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::NewSearch => f.write_str("Search for a city..."),
            MenuItem::Chip(city) => write!(f, "[{city}]"),
            MenuItem::Quit => f.write_str("Quit"),
        }
    }
}

fn menu_items(state: &UiState) -> Vec<MenuItem> {
    std::iter::once(MenuItem::NewSearch)
        .chain(state.history.entries().iter().cloned().map(MenuItem::Chip))
        .chain(std::iter::once(MenuItem::Quit))
        .collect()
}

fn prompt_next(state: &UiState) -> anyhow::Result<MenuChoice> {
    let item = match Select::new("What next?", menu_items(state)).prompt() {
        Ok(item) => item,
        Err(err) if is_cancel(&err) => return Ok(MenuChoice::Quit),
        Err(err) => return Err(err).context("Failed to read menu choice"),
    };

    match item {
        MenuItem::NewSearch => {
            let answer = Text::new("City:")
                .with_placeholder("Search for a city...")
                .with_initial_value(&state.query)
                .prompt();
            match answer {
                Ok(query) => Ok(MenuChoice::Search(query)),
                Err(err) if is_cancel(&err) => Ok(MenuChoice::Quit),
                Err(err) => Err(err).context("Failed to read city"),
            }
        }
        MenuItem::Chip(city) => Ok(MenuChoice::Chip(city)),
        MenuItem::Quit => Ok(MenuChoice::Quit),
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["weather"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.no_history);
    }

    #[test]
    fn show_takes_city_and_global_flags() {
        let cli = Cli::try_parse_from(["weather", "show", "Paris,FR", "--no-history", "-v"]).unwrap();

        assert!(cli.no_history);
        assert!(cli.verbose);
        match cli.command {
            Some(Command::Show { city }) => assert_eq!(city, "Paris,FR"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_a_city() {
        assert!(Cli::try_parse_from(["weather", "show"]).is_err());
    }

    #[test]
    fn menu_lists_history_chips_between_search_and_quit() {
        let state = UiState {
            history: SearchHistory::from_entries(["Paris", "Tokyo"]),
            ..Default::default()
        };

        let items = menu_items(&state);
        assert_eq!(
            items,
            vec![
                MenuItem::NewSearch,
                MenuItem::Chip("Paris".into()),
                MenuItem::Chip("Tokyo".into()),
                MenuItem::Quit,
            ]
        );
        assert_eq!(items[1].to_string(), "[Paris]");
    }

    #[test]
    fn history_clear_flag() {
        let cli = Cli::try_parse_from(["weather", "history", "--clear"]).unwrap();
        assert!(matches!(cli.command, Some(Command::History { clear: true })));
    }

    #[test]
    fn configure_writes_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cli = Cli::try_parse_from([
            "weather",
            "configure",
            "--api-key",
            " KEY ",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();

        cli.configure(Some(" KEY ".into())).unwrap();

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.require_api_key().unwrap(), "KEY");
        assert_eq!(cli.load_file_config().unwrap(), saved);
    }
}
