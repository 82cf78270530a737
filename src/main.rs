mod action;
mod app;
mod categories;
mod classify;
mod config;
mod error;
mod event;
mod github;
mod session;
mod source;
mod tui;
mod types;
mod ui;
mod view;

use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::github::GitHub;
use crate::source::IssueSource;
use crate::tui::EventHandler;
use crate::types::SortKey;

/// Terminal browser for the ruanyf/weekly submission tracker.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Repository to browse, as owner/name
    #[arg(long)]
    repo: Option<String>,

    /// Initial sort: newest, oldest, most-commented or recently-updated
    #[arg(long)]
    sort: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let args = Args::parse();

    let mut config = Config::load();
    if let Some(repo) = args.repo {
        config.repo = repo;
    }
    if let Some(sort) = args.sort {
        config.sort = sort;
    }

    let sort = SortKey::parse(&config.sort);
    if sort.is_none() {
        tracing::warn!(sort = %config.sort, "unknown sort key, entries keep fetch order");
    }

    let token = config.token();
    if token.is_none() {
        tracing::info!(
            env = %config.token_env,
            "no API token found, unauthenticated rate limits apply"
        );
    }

    let github = GitHub::new(&config, token)?;

    // Run the application
    let result = run(Arc::new(github), config.repo.clone(), sort).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(
    source: Arc<dyn IssueSource>,
    repo: String,
    sort: Option<SortKey>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let mut app = App::new(source, repo, sort, action_tx.clone());

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
