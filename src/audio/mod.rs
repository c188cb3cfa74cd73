pub mod session;
pub mod transport;

#[cfg(feature = "audio")]
pub mod rodio_transport;

#[cfg(feature = "probe")]
pub mod probe;

pub use session::{LoopMode, PlaybackRate, PlaybackSession, RateTone, SessionSnapshot};
pub use transport::{MediaSource, Transport, TransportEvent};

#[cfg(feature = "audio")]
pub use rodio_transport::{AudioOutput, RodioTransport};

use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub volume: f32, // 0.0 to 1.0
    pub default_rate: PlaybackRate,
    pub poll_interval: Duration, // how often the transport is asked for position/completion
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            default_rate: PlaybackRate::Normal,
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl From<&crate::config::Config> for AudioConfig {
    fn from(config: &crate::config::Config) -> Self {
        let default_rate = PlaybackRate::from_multiplier(config.playback.default_rate)
            .unwrap_or_else(|| {
                warn!(
                    "Unsupported default rate {} in config, using 1×",
                    config.playback.default_rate
                );
                PlaybackRate::Normal
            });

        Self {
            volume: config.playback.volume.clamp(0.0, 1.0),
            default_rate,
            poll_interval: Duration::from_millis(config.playback.tick_ms.max(10)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioFormat {
    Mp3,
    Flac,
    Ogg,
    Mp4,
    Wav,
    Unknown,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "mp3" => AudioFormat::Mp3,
            "flac" => AudioFormat::Flac,
            "ogg" | "oga" => AudioFormat::Ogg,
            "mp4" | "m4a" | "aac" => AudioFormat::Mp4,
            "wav" => AudioFormat::Wav,
            _ => AudioFormat::Unknown,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, AudioFormat::Unknown)
    }
}

/// `M:SS`, minutes unpadded, fractional seconds truncated.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let whole = seconds.trunc() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

pub fn format_duration(duration: Duration) -> String {
    format_time(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(5.0), "0:05");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(59.999), "0:59");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_duration(Duration::from_millis(125_400)), "2:05");
    }

    #[test]
    fn test_audio_format_from_extension() {
        assert_eq!(AudioFormat::from_extension("MP3"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::from_extension(".m4a"), AudioFormat::Mp4);
        assert!(!AudioFormat::from_extension("png").is_supported());
    }

    #[test]
    fn test_audio_config_from_config() {
        let mut config = crate::config::Config::default();
        config.playback.default_rate = 0.75;
        config.playback.volume = 3.0;
        let audio = AudioConfig::from(&config);
        assert_eq!(audio.default_rate, PlaybackRate::ThreeQuarters);
        assert_eq!(audio.volume, 1.0);

        config.playback.default_rate = 0.8;
        assert_eq!(AudioConfig::from(&config).default_rate, PlaybackRate::Normal);
    }
}
