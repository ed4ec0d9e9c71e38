mod pump;

use hotkey_core::{load_config, ConfigError, KeyBindingWidget, KeyEventSource, WidgetConfig};
use hotkey_platform::{install_signal_handler, start_key_hook, PlatformError, SystemClipboard};
use pump::{ExitReason, SignalGate};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotkey=info,hotkey_core=info,hotkey_platform=info".into()),
        )
        .try_init();
}

fn load_or_default() -> WidgetConfig {
    match load_config() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            WidgetConfig::default()
        }
    }
}

fn run() -> Result<ExitReason, AppError> {
    let config = load_or_default();
    let quit_binding = config.quit_key_binding()?;
    let mut widget =
        KeyBindingWidget::from_config(&config)?.with_clipboard(Arc::new(SystemClipboard));
    let source = KeyEventSource::global();

    println!("{}", widget.render());
    println!("(press {} to quit)", quit_binding);

    let signals = install_signal_handler()?;
    let hook = start_key_hook();
    widget.mount(source);

    let reason = pump::run(
        source,
        hook.events(),
        || hook.is_running(),
        &signals,
        quit_binding,
        SignalGate::new(config.double_press_window_ms),
    );

    widget.unmount();
    hook.stop();
    if let Some(e) = hook.take_error() {
        warn!("{}", e);
    }
    info!(?reason, listeners = source.listener_count(), "Shut down");
    Ok(reason)
}

fn main() {
    init_logging();

    match run() {
        Ok(ExitReason::HookStopped) => std::process::exit(2),
        Ok(_) => {}
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
