use super::transport::{EventSender, MediaSource, Transport, TransportEvent};
use super::AudioConfig;
use crate::error::TransportError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The output device. Lives for the whole program; every session gets its own
/// [`RodioTransport`] (its own sink) on top of it.
pub struct AudioOutput {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    config: AudioConfig,
}

impl AudioOutput {
    pub fn open(config: AudioConfig) -> Result<Self, TransportError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| TransportError::Output(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            config,
        })
    }

    pub fn transport(&self) -> RodioTransport {
        RodioTransport::new(self.stream_handle.clone(), self.config.volume)
    }
}

/// rodio has no callbacks, so position and end-of-media are discovered in [`Transport::poll`].
pub struct RodioTransport {
    stream_handle: OutputStreamHandle,
    volume: f32,
    rate: f32,
    sink: Option<Sink>,
    media: Option<MediaSource>,
    events: Option<EventSender>,
    // requested by the session, as opposed to what the sink happens to be doing
    playing: bool,
    completed: bool,
    last_position: Duration,
}

impl RodioTransport {
    pub fn new(stream_handle: OutputStreamHandle, volume: f32) -> Self {
        Self {
            stream_handle,
            volume,
            rate: 1.0,
            sink: None,
            media: None,
            events: None,
            playing: false,
            completed: false,
            last_position: Duration::ZERO,
        }
    }

    fn emit(&self, event: TransportEvent) {
        if let Some(sender) = &self.events {
            let _ = sender.send(event);
        }
    }

    fn decoder(media: &MediaSource) -> Result<Decoder<Cursor<Arc<[u8]>>>, TransportError> {
        Decoder::new(Cursor::new(Arc::clone(&media.bytes))).map_err(|e| TransportError::Decode {
            uri: media.uri.clone(),
            reason: e.to_string(),
        })
    }

    /// The sink drops a source once it has played out; queue a fresh decoder so the
    /// recording can be replayed or sought again.
    fn requeue_if_drained(&mut self) -> Result<(), TransportError> {
        let (Some(sink), Some(media)) = (&self.sink, &self.media) else {
            return Err(TransportError::NotLoaded);
        };
        if sink.empty() {
            debug!("Re-queueing {}", media.uri);
            sink.append(Self::decoder(media)?);
            self.completed = false;
        }
        Ok(())
    }
}

impl Transport for RodioTransport {
    fn attach(&mut self, events: EventSender) {
        self.events = Some(events);
    }

    fn detach(&mut self) {
        self.events = None;
    }

    fn load(&mut self, media: &MediaSource) -> Result<(), TransportError> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| TransportError::Output(e.to_string()))?;
        sink.pause();
        sink.set_volume(self.volume);
        sink.set_speed(self.rate);

        let source = Self::decoder(media)?;
        let duration = source.total_duration().or_else(|| probe(media));
        sink.append(source);

        self.sink = Some(sink);
        self.media = Some(media.clone());
        self.playing = false;
        self.completed = false;
        self.last_position = Duration::ZERO;

        self.emit(TransportEvent::Loaded);
        match duration {
            Some(duration) => self.emit(TransportEvent::DurationKnown(duration)),
            None => debug!("No duration for {}", media.uri),
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), TransportError> {
        self.requeue_if_drained()?;
        if let Some(sink) = &self.sink {
            sink.play();
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        self.playing = false;
    }

    fn set_position(&mut self, position: Duration) -> Result<(), TransportError> {
        self.requeue_if_drained()?;
        if let Some(sink) = &self.sink {
            sink.try_seek(position)
                .map_err(|e| TransportError::Seek(e.to_string()))?;
        }
        self.last_position = position;
        self.emit(TransportEvent::PositionChanged(position));
        Ok(())
    }

    fn set_rate(&mut self, multiplier: f32) {
        self.rate = multiplier;
        if let Some(sink) = &self.sink {
            sink.set_speed(multiplier);
        }
    }

    fn poll(&mut self) {
        let Some(sink) = &self.sink else {
            return;
        };

        let position = sink.get_pos();
        let drained = sink.empty();

        if position != self.last_position && !drained {
            self.last_position = position;
            self.emit(TransportEvent::PositionChanged(position));
        }

        if self.playing && drained && !self.completed {
            self.completed = true;
            self.playing = false;
            self.emit(TransportEvent::PlaybackCompleted);
        }
    }
}

impl Drop for RodioTransport {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

#[cfg(feature = "probe")]
fn probe(media: &MediaSource) -> Option<Duration> {
    super::probe::probe_duration(Arc::clone(&media.bytes), media.extension())
}

#[cfg(not(feature = "probe"))]
fn probe(_media: &MediaSource) -> Option<Duration> {
    None
}
