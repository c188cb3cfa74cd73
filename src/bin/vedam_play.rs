// Headless practice player: plays one lesson, anuvakam or panasa straight from the
// lesson tree, no TUI. Handy for checking a content tree and the audio setup.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vedam::audio::{AudioConfig, AudioOutput, LoopMode, PlaybackRate, PlaybackSession};
use vedam::catalog::{Catalog, ResourceLocator};
use vedam::config::Config;

#[derive(Clone, Copy, ValueEnum)]
enum LoopArg {
    Off,
    Infinite,
    Five,
}

impl From<LoopArg> for LoopMode {
    fn from(arg: LoopArg) -> Self {
        match arg {
            LoopArg::Off => LoopMode::Off,
            LoopArg::Infinite => LoopMode::Infinite,
            LoopArg::Five => LoopMode::FiveTimes,
        }
    }
}

#[derive(Parser)]
#[command(name = "vedam_play")]
#[command(about = "Play a single lesson recording without the terminal UI")]
struct Args {
    /// Lesson id
    lesson: String,

    /// Anuvakam (sub-unit) id
    #[arg(long)]
    sub_unit: Option<String>,

    /// Panasa (sub-section) id, needs --sub-unit
    #[arg(long, requires = "sub_unit")]
    sub_section: Option<String>,

    /// Lesson tree root, overrides the config
    #[arg(long)]
    content: Option<String>,

    #[arg(long, value_enum, default_value = "off")]
    loop_mode: LoopArg,

    /// One of 0.5, 0.75, 1, 1.25, 1.5
    #[arg(long)]
    rate: Option<f32>,

    /// Stop after this many seconds even if still looping
    #[arg(long)]
    max_seconds: Option<u64>,
}

impl Args {
    fn locator(&self) -> ResourceLocator {
        match (&self.sub_unit, &self.sub_section) {
            (Some(unit), Some(section)) => {
                ResourceLocator::sub_section(self.lesson.as_str(), unit.as_str(), section.as_str())
            }
            (Some(unit), None) => ResourceLocator::sub_unit(self.lesson.as_str(), unit.as_str()),
            _ => ResourceLocator::lesson(self.lesson.as_str()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(base) = &args.content {
        config.content.base = base.clone();
    }

    let mut audio_config = AudioConfig::from(&config);
    if let Some(rate) = args.rate {
        audio_config.default_rate = PlaybackRate::from_multiplier(rate).ok_or_else(|| {
            anyhow!("unsupported rate {}, expected one of 0.5/0.75/1/1.25/1.5", rate)
        })?;
    }

    let catalog = Catalog::from_config(&config.content);
    let locator = args.locator();
    info!("Fetching {}", catalog.audio_uri(&locator));
    let media = catalog.fetch_audio(&locator).await?;

    let output = AudioOutput::open(audio_config.clone())?;
    let mut session = PlaybackSession::open(
        output.transport(),
        &media,
        locator.to_string(),
        true,
        audio_config.default_rate,
    );

    if let Some(fault) = &session.snapshot().fault {
        return Err(anyhow!("could not load {}: {}", media.uri, fault));
    }

    let wanted: LoopMode = args.loop_mode.into();
    while session.snapshot().loop_mode != wanted {
        session.cycle_loop_mode();
    }

    let mut updates = session.subscribe();
    let deadline = args.max_seconds.map(|s| Instant::now() + Duration::from_secs(s));
    let mut started = false;
    let mut last_count = 0;

    loop {
        session.pump_events();

        if updates.has_changed().unwrap_or(false) {
            let snapshot = updates.borrow_and_update().clone();

            if let Some(fault) = &snapshot.fault {
                warn!("Playback problem: {}", fault);
            }
            if snapshot.repeat_count != last_count {
                last_count = snapshot.repeat_count;
                info!("{}", snapshot.loop_label());
            }
            if snapshot.playing {
                started = true;
            } else if started {
                info!("Finished at {}", snapshot.time_label());
                break;
            }
        }

        // checked on the session itself, a failure present from the start is never "changed"
        let snapshot = session.snapshot();
        if snapshot.load_failed() || (snapshot.ready && !started && snapshot.fault.is_some()) {
            let fault = snapshot.fault.clone().unwrap_or_default();
            return Err(anyhow!("playback of {} failed: {}", media.uri, fault));
        }

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            info!("Time limit reached at {}", session.snapshot().time_label());
            break;
        }

        sleep(audio_config.poll_interval).await;
    }

    Ok(())
}
