use std::sync::Arc;

use anyhow::Context;
use dashboard::config::DashboardConfig;
use dashboard::console::{Command, HELP};
use dashboard::pipeline::Pipeline;
use dashboard::source::ProxySource;
use dashboard::state::{Dashboard, DashboardState, LoadOutcome, RequestTicket};
use dashboard::view::render;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

type SharedDashboard = Arc<Dashboard<ProxySource>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the rendered dashboard owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = DashboardConfig::from_env();
    tracing::info!(
        proxy_url = %config.proxy_url,
        desc = config.sort_descending,
        limit = config.limit,
        view = config.view_mode.as_str(),
        "Starting dashboard"
    );

    let source = ProxySource::new(config.proxy_url.clone(), config.timeout())
        .context("failed to build HTTP client")?;
    let dashboard: SharedDashboard = Arc::new(Dashboard::new(
        Pipeline::new(source),
        DashboardState::new(config.initial_params(), config.view_mode),
    ));

    println!("{}", HELP);
    if let Some(ticket) = dashboard.begin(config.initial_params(), true) {
        spawn_run(&dashboard, ticket);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let ticket = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => {
                println!("{}", HELP);
                continue;
            }
            Ok(Command::ToggleView) => {
                dashboard.toggle_view();
                print_current(&dashboard);
                continue;
            }
            Ok(Command::ToggleSort) => dashboard.begin_toggle_sort(),
            Ok(Command::SetLimit(limit)) => dashboard.begin_set_limit(limit),
            Ok(Command::Refresh) => dashboard.begin_refresh(),
            Err(e) => {
                println!("{} (h for help)", e);
                continue;
            }
        };

        match ticket {
            Some(ticket) => spawn_run(&dashboard, ticket),
            None => report(&dashboard, LoadOutcome::Skipped),
        }
    }

    tracing::info!("Dashboard closed");
    Ok(())
}

/// Fetch in the background so input stays responsive; a newer command
/// supersedes whatever is still in flight.
fn spawn_run(dashboard: &SharedDashboard, ticket: RequestTicket) {
    println!("Loading...");
    let run = dashboard.spawn(ticket);
    let dashboard = Arc::clone(dashboard);
    tokio::spawn(async move {
        match run.await {
            Ok(outcome) => report(&dashboard, outcome),
            Err(e) => tracing::error!(error = %e, "Load task failed"),
        }
    });
}

fn report(dashboard: &SharedDashboard, outcome: LoadOutcome) {
    match outcome {
        LoadOutcome::Applied => print_current(dashboard),
        LoadOutcome::Skipped => println!("Already showing these settings (r to refresh)."),
        LoadOutcome::Superseded => tracing::debug!("Superseded result dropped"),
    }
}

fn print_current(dashboard: &SharedDashboard) {
    let rendered = dashboard.with_state(|state| {
        state
            .envelope()
            .map(|envelope| render(envelope, state.view_mode()))
    });
    match rendered {
        Some(text) => println!("{}", text),
        None => println!("Loading..."),
    }
}
