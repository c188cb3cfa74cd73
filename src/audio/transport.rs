use crate::error::TransportError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Encoded audio handed to a transport, plus the locator it came from (for logs and the UI).
#[derive(Clone)]
pub struct MediaSource {
    pub uri: String,
    pub bytes: Arc<[u8]>,
}

impl MediaSource {
    pub fn new(uri: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            uri: uri.into(),
            bytes: Arc::from(bytes),
        }
    }

    /// File extension of the locator, used as a decoder hint.
    pub fn extension(&self) -> Option<&str> {
        let name = self.uri.rsplit('/').next()?;
        let (_, ext) = name.rsplit_once('.')?;
        Some(ext)
    }
}

impl fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSource")
            .field("uri", &self.uri)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Notifications flowing from a transport back to its session.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Media is decoded and can start on request.
    Loaded,
    DurationKnown(Duration),
    PositionChanged(Duration),
    /// Natural end of media, not a pause or a stop.
    PlaybackCompleted,
}

pub type EventSender = mpsc::UnboundedSender<TransportEvent>;

/// The thing that actually makes sound. Requests return immediately; anything the
/// backend learns later arrives as a [`TransportEvent`] on the attached sender.
pub trait Transport {
    fn attach(&mut self, events: EventSender);
    fn detach(&mut self);

    fn load(&mut self, media: &MediaSource) -> Result<(), TransportError>;
    fn play(&mut self) -> Result<(), TransportError>;
    fn pause(&mut self);
    fn set_position(&mut self, position: Duration) -> Result<(), TransportError>;
    fn set_rate(&mut self, multiplier: f32);

    /// Backends without push notifications emit whatever changed since the last call.
    fn poll(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_hint() {
        let media = MediaSource::new("lessons/a/b/audio.mp3", vec![0; 4]);
        assert_eq!(media.extension(), Some("mp3"));

        let media = MediaSource::new("https://example.org/lessons/x.y/audio", Vec::new());
        assert_eq!(media.extension(), None);
    }
}
