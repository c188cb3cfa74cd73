// Vedam - terminal lesson browser and practice player
// Pick a lesson, drill into an anuvakam or panasa, loop it until it sticks

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vedam::{config::Config, ui::App};

#[derive(Parser)]
#[command(name = "vedam")]
#[command(about = "Browse recitation lessons and practise them with loop and speed control")]
struct Args {
    /// Enable developer logging (stderr + debug output)
    #[arg(long)]
    dev: bool,

    /// Use this config file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lesson tree root (directory or http(s) URL), overrides the config
    #[arg(long)]
    content: Option<String>,

    /// Open this lesson id on startup
    #[arg(long)]
    lesson: Option<String>,
}

fn init_logging(dev: bool, log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    // Daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(log_dir, "vedam.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let base_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,vedam=debug"));

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false);

    // dev mode mirrors everything to stderr as well
    let stderr_layer = dev.then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(base_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base) = args.content {
        config.content.base = base;
    }

    let _log_guard = init_logging(args.dev, &config.log_directory)?;
    info!("Vedam starting up");

    // ALSA prints straight to stderr and would tear through the TUI
    if !args.dev {
        debug!("Redirecting stderr to suppress ALSA errors");
        redirect_stderr_to_null()?;
    }

    let mut app = App::new(config, args.lesson).await?;
    app.run().await?;

    Ok(())
}

/// Redirect stderr to /dev/null so audio backend chatter can't corrupt the screen
fn redirect_stderr_to_null() -> Result<()> {
    unsafe {
        let null_fd = libc::open(
            b"/dev/null\0".as_ptr() as *const libc::c_char,
            libc::O_WRONLY,
        );
        if null_fd == -1 {
            return Err(anyhow::anyhow!("Failed to open /dev/null"));
        }

        if libc::dup2(null_fd, libc::STDERR_FILENO) == -1 {
            libc::close(null_fd);
            return Err(anyhow::anyhow!("Failed to redirect stderr"));
        }

        libc::close(null_fd);
    }

    Ok(())
}
