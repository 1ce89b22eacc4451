#![recursion_limit = "256"]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
pub mod mappings;
mod rules;
mod services;
mod utils;

use config::Settings;
use events::WindowScope;
use services::{create_hotkey_subsystem, create_spawner, create_window_manager, Controller};
use utils::shortcuts_file;

#[derive(Parser, Debug)]
#[command(name = "run-or-raise")]
#[command(about = "Горячие клавиши, которые поднимают окно приложения или запускают его")]
struct Args {
    /// Путь к файлу настроек
    #[arg(short, long, default_value = "run-or-raise.toml")]
    config: String,

    /// Файл правил (перекрывает paths.shortcuts)
    #[arg(short, long)]
    shortcuts: Option<String>,

    /// Режим сухого запуска: сочетания читаются из stdin, окна эмулируются
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level)
    #[arg(long)]
    log_level: Option<String>,

    /// Только проверить файл правил и выйти
    #[arg(long)]
    check: bool,

    /// Вывести список окон в порядке MRU и выйти
    #[arg(long)]
    list_windows: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(&args.config)?;
    settings.apply_overrides(args.shortcuts.as_deref(), args.log_level.as_deref());
    settings.validate()?;

    init_tracing(&settings.logging.level, &settings.logging.format)?;

    info!("Запуск run-or-raise v{}", env!("CARGO_PKG_VERSION"));
    info!("Настройки загружены из: {}", args.config);

    if args.check {
        return check_shortcuts(&settings);
    }

    if args.list_windows {
        return list_windows(&settings, args.dry_run);
    }

    if args.dry_run {
        warn!("Режим сухого запуска - окна и процессы не затрагиваются");
    } else {
        utils::permissions::check_permissions()?;
    }

    let settings = Arc::new(settings);
    let hotkeys = create_hotkey_subsystem(settings.clone(), args.dry_run)?;
    let windows = create_window_manager(&settings, args.dry_run)?;
    let spawner = create_spawner(args.dry_run);

    let mut controller = Controller::new(settings.clone(), hotkeys.backend, windows, spawner);
    let report = controller.enable();
    for binding in controller.registry().bindings() {
        info!("{} {}", binding.action, binding.rule);
    }
    if report.bound.is_empty() {
        warn!("Ни одно сочетание не активно, проверьте файл правил (--check)");
    }

    info!("Все компоненты инициализированы");

    let listener = hotkeys.listener;
    let listener_handle = tokio::spawn(async move {
        if let Err(e) = listener.run().await {
            error!("Ошибка в слушателе горячих клавиш: {}", e);
        }
    });

    let mut activations = hotkeys.activations;
    loop {
        tokio::select! {
            action = activations.recv() => match action {
                Some(action) => {
                    if !controller.activate(action) {
                        warn!("Сочетание {} не связано ни с одним правилом", action);
                    }
                }
                None => {
                    info!("Слушатель горячих клавиш остановлен");
                    break;
                }
            },
            result = signal::ctrl_c() => {
                match result {
                    Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                    Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
                }
                break;
            }
        }
    }

    info!("Завершение работы...");

    let released = controller.disable();
    for failure in &released.failures {
        warn!("{}", failure);
    }

    listener_handle.abort();
    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    if tokio::time::timeout(shutdown_timeout, listener_handle).await.is_err() {
        warn!("Таймаут при завершении слушателя");
    }

    info!("run-or-raise завершил работу");
    Ok(())
}

/// Разобрать файл правил и вывести результат
fn check_shortcuts(settings: &Settings) -> Result<()> {
    let path: PathBuf = settings.shortcuts_path();
    let text = shortcuts_file::load_shortcuts(&path, settings.default_shortcuts_path().as_deref())?;
    let report = rules::parse(&text);

    for rule in &report.rules {
        println!("{:>4}: {}", rule.line, rule);
    }
    for line_error in &report.errors {
        println!("{}", line_error);
    }
    println!(
        "{:?}: правил {}, ошибок {}",
        path,
        report.rules.len(),
        report.errors.len()
    );

    if report.is_clean() {
        Ok(())
    } else {
        anyhow::bail!("в файле правил есть ошибки")
    }
}

fn list_windows(settings: &Settings, dry_run: bool) -> Result<()> {
    let windows = create_window_manager(settings, dry_run)?;
    for window in windows.list_windows(WindowScope::AllWorkspaces)? {
        println!(
            "{} monitor={} workspace={} focused={} class={:?} title={:?}",
            window.id, window.monitor, window.workspace, window.focused, window.class, window.title
        );
    }
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        "compact" => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }

    Ok(())
}
