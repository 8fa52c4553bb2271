//! jiratui - browse, read and comment on JIRA issues from the terminal.

mod api;
mod app;
mod config;
mod error;
mod events;
mod logging;
mod store;
mod tasks;
mod ui;

use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

use crate::api::{Auth, JiraClient};
use crate::app::{reduce, App};
use crate::config::{Config, Overrides};
use crate::error::{AppError, Result};
use crate::events::{Event, EventHandler};
use crate::tasks::{create_task_channel, Task, TaskMessage, TaskSpawner};

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[derive(Parser, Debug)]
#[command(name = "jiratui", version, about = "Browse and comment on JIRA issues")]
struct Cli {
    /// Path to a config file [default: <config dir>/jiratui/config.toml]
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// JIRA base URL, e.g. https://company.atlassian.net
    #[arg(long, env = "JIRA_URL")]
    url: Option<String>,

    /// Account email used for authentication
    #[arg(long, env = "JIRA_EMAIL")]
    email: Option<String>,

    /// API token; read from the OS keyring when omitted
    #[arg(long, env = "JIRA_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// JQL to run at startup
    #[arg(long, short, env = "JIRA_DEFAULT_JQL")]
    query: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            email: self.email.clone(),
            token: self.token.clone(),
            query: self.query.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let result = match load_config(&cli) {
        Ok(config) => match build_client(&config) {
            Ok(client) => run_tui(config, client).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    logging::shutdown();
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Exiting with error");
            eprintln!("jiratui: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// Resolve the configuration from file, environment and flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.overrides());
    config.validate()?;
    Ok(config)
}

/// Build the JIRA client, falling back to the keyring for the token.
fn build_client(config: &Config) -> Result<JiraClient> {
    let auth = match config.token.as_deref() {
        Some(token) => Auth::new(&config.profile.email, token),
        None => Auth::from_keyring(&config.profile.email)?,
    };
    Ok(JiraClient::new(
        &config.profile.url,
        auth,
        config.settings.max_results,
    )?)
}

async fn run_tui(config: Config, client: JiraClient) -> Result<()> {
    info!(url = client.base_url(), "Starting UI");
    let (rx, spawner) = create_task_channel(Arc::new(client));
    let (app, tasks) = App::new(&config.settings);
    let events = EventHandler::with_tick_rate(config.settings.tick_rate_ms);
    info!(tick_rate = ?events.tick_rate(), "Event handler ready");

    setup_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, app, tasks, &spawner, rx, events);
    let restored = restore_terminal(&mut terminal);

    result.and(restored)
}

/// Enter raw mode and the alternate screen.
///
/// On failure the terminal is put back before the error is returned.
fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().map_err(|e| AppError::terminal(format!("cannot enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        reset_terminal(&mut stdout);
        return Err(e.into());
    }
    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
        reset_terminal(&mut io::stdout());
        e.into()
    })
}

/// Best-effort restore used when the normal teardown cannot run.
fn reset_terminal<W: Write>(out: &mut W) {
    let _ = disable_raw_mode();
    let _ = execute!(out, LeaveAlternateScreen, Show);
}

/// Restore the terminal before the default panic message is printed.
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        reset_terminal(&mut io::stdout());
        original_hook(panic_info);
    }));
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// The event loop: draw, wait for input, apply completions, dispatch tasks.
fn run_app(
    terminal: &mut Tui,
    mut app: App,
    tasks: Vec<Task>,
    spawner: &TaskSpawner,
    mut rx: UnboundedReceiver<TaskMessage>,
    events: EventHandler,
) -> Result<()> {
    dispatch_all(spawner, tasks);

    let size = terminal.size()?;
    dispatch_all(spawner, app.update(Event::Resize(size.width, size.height)));
    info!(width = size.width, height = size.height, "Entering event loop");

    loop {
        terminal.draw(|frame| app.view(frame))?;

        let event = events.next()?;
        let (next, tasks) = reduce(app, event);
        app = next;
        dispatch_all(spawner, tasks);

        while let Ok(message) = rx.try_recv() {
            let (next, tasks) = reduce(app, Event::Task(message));
            app = next;
            dispatch_all(spawner, tasks);
        }

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}

fn dispatch_all(spawner: &TaskSpawner, tasks: Vec<Task>) {
    for task in tasks {
        spawner.dispatch(task);
    }
}
