mod app;
mod config;
mod finance;
mod logging;
mod ui;
mod wallet;

use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::state::AppState;
use crate::app::timers::FlowTimers;
use crate::wallet::{build_provider, ChainFamily, WalletManager};
use anyhow::{Context, Result};
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let cfg = config::load_config()?;
    let log_file = logging::init(&cfg.logging)?;
    tracing::info!(log_file = ?log_file, "meridian starting");

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, cfg).await;

    restore_terminal()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "meridian exited with an error");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    tracing::info!("meridian stopped");
    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let mut state = AppState::new(cfg.clone());
    // Any store change marks the screen for redraw.
    let mut render_sub = state.store.subscribe();

    let mut wallets = WalletManager::new(event_tx.clone());
    for chain in ChainFamily::ALL {
        for wallet in state.adapters(chain) {
            wallets.register(build_provider(chain, wallet));
        }
    }
    let mut timers = FlowTimers::new(event_tx.clone(), cfg.flows.clone());
    let refresh_period = Duration::from_secs(cfg.refresh.balance_interval_secs);

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(event)) => {
                    if term_tx.send(AppEvent::Terminal(event)).is_err() {
                        break;
                    }
                }
                Some(Err(_)) => break,
                None => break,
            }
        }
    });

    // Spawn tick task for spinners
    let tick_tx = event_tx.clone();
    let tick = Duration::from_millis(cfg.ui.tick_ms.max(16));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    // Initial render
    terminal.draw(|f| ui::render(f, &state))?;

    // Main event loop
    loop {
        let event = event_rx.recv().await;
        let Some(event) = event else { break };

        let actions = handler::handle_event(&mut state, event);

        // Process actions
        for action in actions {
            match action {
                Action::ConnectWallet { chain, adapter } => {
                    if let Err(e) = wallets.connect(chain, adapter) {
                        handler::connect_failed(&mut state, chain, adapter, e);
                    }
                }
                Action::StartBalanceRefresh { chain, adapter, address } => {
                    if !wallets.start_refresh(chain, adapter, address, refresh_period) {
                        tracing::warn!(%chain, adapter, "no provider for balance refresh");
                    }
                }
                Action::MintIdentity => timers.schedule_identity(),
                Action::ScheduleFlowStep { flow_id, step } => timers.schedule(flow_id, step),
                Action::CancelFlow { flow_id } => timers.cancel(flow_id),
                Action::Quit => state.should_quit = true,
            }
        }

        if state.should_quit {
            break;
        }

        if let Some(note) = render_sub.latest() {
            tracing::debug!(
                revision = note.revision,
                screen = ?app::router::route(&note.snapshot),
                "store changed"
            );
            state.dirty = true;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    state.store.unsubscribe(render_sub.id);
    wallets.shutdown();
    timers.shutdown();
    Ok(())
}
