use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dictionary::Dictionary;
use lexicon::audio::SystemPlayer;
use lexicon::config::Overrides;
use lexicon::header::{Font, Theme};
use lexicon::{logging, ui, App, Config};

#[derive(Parser, Debug)]
#[command(name = "lexicon", about = "Look up English words in the terminal", version)]
struct Cli {
    /// Word to look up right away.
    word: Option<String>,

    /// Print the lookup for WORD to stdout instead of opening the UI.
    #[arg(long, requires = "word")]
    once: bool,

    /// Config file (defaults to <config dir>/lexicon/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the entries endpoint.
    #[arg(long)]
    api_base_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    #[arg(long, value_enum)]
    theme: Option<Theme>,

    #[arg(long, value_enum)]
    font: Option<Font>,

    /// Where to write logs (defaults to <cache dir>/lexicon/lexicon.log).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?.apply(Overrides {
        api_base_url: cli.api_base_url,
        request_timeout_secs: cli.timeout,
        theme: cli.theme,
        font: cli.font,
        log_file: cli.log_file,
    });
    let log_guard = logging::init(config.log_file.as_deref())?;
    tracing::info!(api = %config.api_base_url, theme = %config.theme, "starting");

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .user_agent(concat!("lexicon/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build http client")?;
    let dict = Dictionary::with_client(client, config.api_base_url.clone());
    let player = SystemPlayer::new(config.audio_player.clone());
    let (mut app, channels) = App::new(&config, dict, Box::new(player));

    if let Some(word) = &cli.word {
        if !app.submit_word(word) {
            anyhow::bail!("{}", lexicon::search::EMPTY_SEARCH_MESSAGE);
        }
    }

    if cli.once {
        let found = ui::print_once(app, channels).await?;
        drop(log_guard);
        if !found {
            std::process::exit(1);
        }
        return Ok(());
    }
    let result = ui::run(app, channels).await;
    drop(log_guard);
    result
}
