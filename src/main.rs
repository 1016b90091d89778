use anyhow::{Context, Result};
use baseshell::app::{Shell, ShellCommand, ShellEvent, parse_command};
use baseshell::cli::{self, RuntimeOptions};
use baseshell_config::{JsonFileStore, ShellConfig};
use baseshell_keybindings::InProcessHost;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let options = cli::process_cli();

    // CLI --log-level flag takes highest precedence, then RUST_LOG, then settings (applied later).
    baseshell::debug::init_log_bridge(options.log_level);
    log::info!("Starting baseshell {}", baseshell::VERSION);

    // One event thread: every shell event is handled in arrival order
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let result = runtime.block_on(run(options));
    log::info!("Event loop exited");

    if let Err(ref e) = result {
        eprintln!("baseshell: error: {e:#}");
    }
    result
}

async fn run(options: RuntimeOptions) -> Result<()> {
    let settings_path = options
        .settings_path
        .clone()
        .unwrap_or_else(ShellConfig::settings_path);
    let config = ShellConfig::load_from(&settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;
    baseshell::debug::set_log_level(config.log_level.to_level_filter());

    let store_path = options
        .store_path
        .clone()
        .unwrap_or_else(|| config.store_path());
    let store = Arc::new(JsonFileStore::open(store_path).await);
    let host = Arc::new(InProcessHost::new());

    let mut shell = Shell::new(config, store, Arc::clone(&host));
    shell.mount().await;

    tokio::spawn(read_commands(shell.sender(), host));

    let exit_after = options
        .exit_after
        .map(Duration::try_from_secs_f64)
        .transpose()
        .context("invalid --exit-after")?;
    let mut stdout = std::io::stdout();
    shell.run(&mut stdout, exit_after).await
}

/// Feed stdin lines to the shell until EOF or `quit`.
async fn read_commands(events: UnboundedSender<ShellEvent>, host: Arc<InProcessHost>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read stdin: {}", e);
                break;
            }
        };

        match parse_command(&line) {
            Ok(Some(ShellCommand::Event(event))) => {
                let exit = event == ShellEvent::Exit;
                if events.send(event).is_err() || exit {
                    return;
                }
            }
            Ok(Some(ShellCommand::PressShortcut(combo))) => {
                if !host.trigger(&combo) {
                    eprintln!("no global shortcut bound to {}", combo);
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("error: {e:#}"),
        }
    }
    let _ = events.send(ShellEvent::Exit);
}
