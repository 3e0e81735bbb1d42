use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEventKind};
use tokio::sync::mpsc;

use stockscope::api::ApiClient;
use stockscope::config::Config;
use stockscope::event::AppEvent;
use stockscope::export;
use stockscope::input::parse_command;
use stockscope::runtime::fetch;
use stockscope::ui::{self, AppState, Effect};

/// Approximate pixel width of one terminal column, used to feed terminal
/// resizes into the chart viewport.
const CELL_WIDTH_PX: u32 = 8;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists and api.base_url is valid");
            std::process::exit(1);
        }
    };

    // Log to file so it doesn't interfere with the TUI
    let log_file = std::fs::File::create("stockscope.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(config.logging.env_filter())
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        symbol = %config.chart.symbol,
        timeframe = %config.chart.timeframe,
        api_url = %config.api.base_url,
        "Starting stockscope"
    );

    let client = ApiClient::from_config(&config.api).context("failed to build HTTP client")?;
    let compute_missing = config.chart.compute_missing_indicators;
    let output_dir = Path::new(&config.chart.output_dir).to_path_buf();

    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(256);
    let mut app_state = AppState::from_config(&config)?;

    let mut terminal = ratatui::init();
    if let Ok(size) = terminal.size() {
        app_state.resize(u32::from(size.width) * CELL_WIDTH_PX);
    }

    for request in app_state.initial_requests() {
        fetch::spawn(request, &client, compute_missing, &app_tx);
    }
    app_state.push_log(format!(
        "stockscope started | {} | {}",
        app_state.symbol(),
        config.api.base_url
    ));

    let result: Result<()> = async {
        loop {
            terminal.draw(|frame| ui::render(frame, &app_state))?;

            if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
                match crossterm::event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        let Some(cmd) = parse_command(&key.code) else {
                            continue;
                        };
                        let mut quit = false;
                        for effect in app_state.handle_command(cmd) {
                            match effect {
                                Effect::Quit => quit = true,
                                Effect::Fetch(request) => {
                                    fetch::spawn(request, &client, compute_missing, &app_tx);
                                }
                                Effect::Export => {
                                    let gauge = app_state.status.gauge();
                                    let event = match export::write_snapshots(
                                        &output_dir,
                                        app_state.rendered_chart(),
                                        gauge.as_ref(),
                                        app_state.mode(),
                                    ) {
                                        Ok(paths) => AppEvent::ExportWritten(paths),
                                        Err(e) => AppEvent::Error(format!("Export failed: {}", e)),
                                    };
                                    app_state.apply(event);
                                }
                            }
                        }
                        if quit {
                            tracing::info!("User quit");
                            break;
                        }
                    }
                    Event::Resize(cols, _) => {
                        app_state.resize(u32::from(cols) * CELL_WIDTH_PX);
                    }
                    _ => {}
                }
            }

            while let Ok(evt) = app_rx.try_recv() {
                app_state.apply(evt);
            }
        }
        Ok(())
    }
    .await;

    ratatui::restore();
    tracing::info!("Shutdown complete");
    result?;
    println!("Goodbye! Check stockscope.log for details.");
    Ok(())
}
