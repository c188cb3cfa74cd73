// One playback session per mounted player: a single recording, its loop/speed
// state machine, and the transport subscription that feeds it.

use super::format_duration;
use super::transport::{MediaSource, Transport, TransportEvent};
use std::fmt;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Number of plays in `LoopMode::FiveTimes`.
pub const FIVE_TIMES_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    #[default]
    Off,
    Infinite,
    FiveTimes,
}

impl LoopMode {
    pub fn next(self) -> Self {
        match self {
            LoopMode::Off => LoopMode::Infinite,
            LoopMode::Infinite => LoopMode::FiveTimes,
            LoopMode::FiveTimes => LoopMode::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackRate {
    Half,
    ThreeQuarters,
    #[default]
    Normal,
    OneAndQuarter,
    OneAndHalf,
}

/// Whether a rate is below, at, or above normal speed. The UI colours by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateTone {
    Slower,
    Normal,
    Faster,
}

impl PlaybackRate {
    pub const ALL: [PlaybackRate; 5] = [
        PlaybackRate::Half,
        PlaybackRate::ThreeQuarters,
        PlaybackRate::Normal,
        PlaybackRate::OneAndQuarter,
        PlaybackRate::OneAndHalf,
    ];

    pub fn multiplier(self) -> f32 {
        match self {
            PlaybackRate::Half => 0.5,
            PlaybackRate::ThreeQuarters => 0.75,
            PlaybackRate::Normal => 1.0,
            PlaybackRate::OneAndQuarter => 1.25,
            PlaybackRate::OneAndHalf => 1.5,
        }
    }

    pub fn from_multiplier(multiplier: f32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rate| (rate.multiplier() - multiplier).abs() < 1e-3)
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|rate| *rate == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn tone(self) -> RateTone {
        match self {
            PlaybackRate::Half | PlaybackRate::ThreeQuarters => RateTone::Slower,
            PlaybackRate::Normal => RateTone::Normal,
            PlaybackRate::OneAndQuarter | PlaybackRate::OneAndHalf => RateTone::Faster,
        }
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×", self.multiplier())
    }
}

/// Read-only view of a session, everything a renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub source: String,
    pub title: String,
    pub position: Duration,
    /// `None` until the transport reports metadata.
    pub duration: Option<Duration>,
    pub playing: bool,
    pub loop_mode: LoopMode,
    pub repeat_count: u32,
    pub rate: PlaybackRate,
    pub ready: bool,
    /// Last transport failure, shown instead of crashing.
    pub fault: Option<String>,
}

impl SessionSnapshot {
    fn new(source: String, title: String, rate: PlaybackRate) -> Self {
        Self {
            source,
            title,
            position: Duration::ZERO,
            duration: None,
            playing: false,
            loop_mode: LoopMode::Off,
            repeat_count: 0,
            rate,
            ready: false,
            fault: None,
        }
    }

    /// Fraction played in `[0, 1]`; 0 while the duration is unknown.
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(total) if !total.is_zero() => {
                (self.position.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// `M:SS / M:SS`, with the total shown as `0:00` until known.
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_duration(self.position),
            format_duration(self.duration.unwrap_or_default())
        )
    }

    /// The source never loaded, so nothing will ever play on this session.
    pub fn load_failed(&self) -> bool {
        !self.ready && self.fault.is_some()
    }

    pub fn loop_label(&self) -> String {
        match self.loop_mode {
            LoopMode::Off => "Loop: Off".to_string(),
            LoopMode::Infinite => "Loop: ∞".to_string(),
            LoopMode::FiveTimes => {
                format!("Loop: 5× ({}/{})", self.repeat_count, FIVE_TIMES_LIMIT)
            }
        }
    }
}

pub struct PlaybackSession<T: Transport> {
    transport: T,
    state: SessionSnapshot,
    auto_play_pending: bool,
    events: mpsc::UnboundedReceiver<TransportEvent>,
    observers: watch::Sender<SessionSnapshot>,
}

impl<T: Transport> PlaybackSession<T> {
    /// Starts a session on `media`. The transport subscription lives exactly as long
    /// as the returned value; dropping it releases the transport and discards any
    /// notification still queued for this source.
    pub fn open(
        mut transport: T,
        media: &MediaSource,
        title: impl Into<String>,
        auto_play: bool,
        rate: PlaybackRate,
    ) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        transport.attach(event_tx);
        transport.set_rate(rate.multiplier());

        let mut state = SessionSnapshot::new(media.uri.clone(), title.into(), rate);
        if let Err(e) = transport.load(media) {
            warn!("Failed to load {}: {}", media.uri, e);
            state.fault = Some(e.to_string());
        }

        info!(source = %media.uri, auto_play, "Playback session opened");

        let (observers, _) = watch::channel(state.clone());
        Self {
            transport,
            state,
            auto_play_pending: auto_play,
            events,
            observers,
        }
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.state
    }

    /// Observers get a fresh snapshot after every command or notification that changed something.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.observers.subscribe()
    }

    pub fn play(&mut self) {
        if self.state.loop_mode == LoopMode::FiveTimes && self.state.repeat_count == 0 {
            self.state.repeat_count = 1;
        }
        if self.at_end() {
            self.move_to(Duration::ZERO);
        }

        match self.transport.play() {
            Ok(()) => {
                self.state.playing = true;
                self.state.fault = None;
            }
            Err(e) => {
                warn!("Play request for {} rejected: {}", self.state.source, e);
                self.state.playing = false;
                self.state.fault = Some(e.to_string());
            }
        }
        self.publish();
    }

    pub fn pause(&mut self) {
        if !self.state.playing {
            return;
        }
        self.transport.pause();
        self.state.playing = false;
        self.publish();
    }

    pub fn toggle(&mut self) {
        if self.state.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn restart(&mut self) {
        if self.state.loop_mode == LoopMode::FiveTimes {
            self.state.repeat_count = 1;
        }
        self.move_to(Duration::ZERO);
    }

    /// Jumps to `fraction` of the recording. Ignored until the duration is known.
    pub fn seek(&mut self, fraction: f64) {
        let Some(total) = self.state.duration else {
            debug!("Seek ignored, duration not known yet");
            return;
        };
        if !fraction.is_finite() {
            return;
        }
        self.move_to(total.mul_f64(fraction.clamp(0.0, 1.0)));
    }

    pub fn cycle_loop_mode(&mut self) {
        self.state.loop_mode = self.state.loop_mode.next();
        self.state.repeat_count = 0;
        debug!(mode = ?self.state.loop_mode, "Loop mode changed");
        self.publish();
    }

    pub fn cycle_rate(&mut self) {
        self.state.rate = self.state.rate.next();
        self.transport.set_rate(self.state.rate.multiplier());
        debug!(rate = %self.state.rate, "Playback rate changed");
        self.publish();
    }

    /// Lets the transport report and applies every queued notification.
    pub fn pump_events(&mut self) {
        self.transport.poll();
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
        }
        self.publish();
    }

    fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Loaded => {
                self.state.ready = true;
                if std::mem::take(&mut self.auto_play_pending) {
                    debug!("Source ready, auto-playing {}", self.state.source);
                    self.play();
                }
            }
            TransportEvent::DurationKnown(total) => {
                if total.is_zero() {
                    return;
                }
                self.state.duration = Some(total);
                self.state.position = self.state.position.min(total);
            }
            TransportEvent::PositionChanged(position) => {
                self.state.position = match self.state.duration {
                    Some(total) => position.min(total),
                    None => position,
                };
            }
            TransportEvent::PlaybackCompleted => self.on_playback_complete(),
        }
    }

    fn on_playback_complete(&mut self) {
        match self.state.loop_mode {
            LoopMode::Infinite => self.rewind_and_resume(),
            LoopMode::FiveTimes if self.state.repeat_count < FIVE_TIMES_LIMIT - 1 => {
                self.state.repeat_count += 1;
                self.rewind_and_resume();
            }
            LoopMode::FiveTimes => {
                self.state.repeat_count = 0;
                self.stop_at_end();
            }
            LoopMode::Off => self.stop_at_end(),
        }
    }

    fn rewind_and_resume(&mut self) {
        self.state.position = Duration::ZERO;
        if let Err(e) = self.transport.set_position(Duration::ZERO) {
            warn!("Rewind failed for {}: {}", self.state.source, e);
        }
        match self.transport.play() {
            Ok(()) => self.state.playing = true,
            Err(e) => {
                warn!("Could not resume {}: {}", self.state.source, e);
                self.state.playing = false;
                self.state.fault = Some(e.to_string());
            }
        }
    }

    fn stop_at_end(&mut self) {
        self.transport.pause();
        self.state.playing = false;
        if let Some(total) = self.state.duration {
            self.state.position = total;
        }
    }

    fn move_to(&mut self, position: Duration) {
        self.state.position = position;
        if let Err(e) = self.transport.set_position(position) {
            warn!("Seek to {:?} failed: {}", position, e);
        }
        self.publish();
    }

    fn at_end(&self) -> bool {
        matches!(self.state.duration, Some(total) if self.state.position >= total)
    }

    fn publish(&self) {
        self.observers.send_if_modified(|current| {
            if *current == self.state {
                false
            } else {
                *current = self.state.clone();
                true
            }
        });
    }
}

impl<T: Transport> Drop for PlaybackSession<T> {
    fn drop(&mut self) {
        self.transport.pause();
        self.transport.detach();
        info!(source = %self.state.source, "Playback session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::transport::EventSender;
    use crate::error::TransportError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Attach,
        Detach,
        Load(String),
        Play,
        Pause,
        SetPosition(Duration),
        SetRate(f32),
    }

    #[derive(Default)]
    struct Script {
        calls: Vec<Call>,
        events: Option<EventSender>,
        reject_play: bool,
        fail_load: bool,
    }

    /// In-memory transport; the test keeps a second handle to inspect calls and push events.
    #[derive(Clone, Default)]
    struct ScriptedTransport(Rc<RefCell<Script>>);

    impl ScriptedTransport {
        fn emit(&self, event: TransportEvent) {
            let script = self.0.borrow();
            let sender = script.events.as_ref().expect("transport not attached");
            sender.send(event).expect("session dropped its receiver");
        }

        fn calls(&self) -> Vec<Call> {
            self.0.borrow().calls.clone()
        }

        fn clear_calls(&self) {
            self.0.borrow_mut().calls.clear();
        }

        fn reject_play(&self, reject: bool) {
            self.0.borrow_mut().reject_play = reject;
        }

        fn fail_load(&self) {
            self.0.borrow_mut().fail_load = true;
        }
    }

    impl Transport for ScriptedTransport {
        fn attach(&mut self, events: EventSender) {
            let mut script = self.0.borrow_mut();
            script.events = Some(events);
            script.calls.push(Call::Attach);
        }

        fn detach(&mut self) {
            let mut script = self.0.borrow_mut();
            script.events = None;
            script.calls.push(Call::Detach);
        }

        fn load(&mut self, media: &MediaSource) -> Result<(), TransportError> {
            let mut script = self.0.borrow_mut();
            script.calls.push(Call::Load(media.uri.clone()));
            if script.fail_load {
                return Err(TransportError::Decode {
                    uri: media.uri.clone(),
                    reason: "bad frame header".into(),
                });
            }
            Ok(())
        }

        fn play(&mut self) -> Result<(), TransportError> {
            let mut script = self.0.borrow_mut();
            script.calls.push(Call::Play);
            if script.reject_play {
                return Err(TransportError::Rejected("autoplay blocked".into()));
            }
            Ok(())
        }

        fn pause(&mut self) {
            self.0.borrow_mut().calls.push(Call::Pause);
        }

        fn set_position(&mut self, position: Duration) -> Result<(), TransportError> {
            self.0.borrow_mut().calls.push(Call::SetPosition(position));
            Ok(())
        }

        fn set_rate(&mut self, multiplier: f32) {
            self.0.borrow_mut().calls.push(Call::SetRate(multiplier));
        }
    }

    fn media(uri: &str) -> MediaSource {
        MediaSource::new(uri, vec![0u8; 16])
    }

    fn open(transport: &ScriptedTransport, auto_play: bool) -> PlaybackSession<ScriptedTransport> {
        PlaybackSession::open(
            transport.clone(),
            &media("lesson-1/audio.mp3"),
            "Lesson 1",
            auto_play,
            PlaybackRate::Normal,
        )
    }

    fn with_duration(
        transport: &ScriptedTransport,
        session: &mut PlaybackSession<ScriptedTransport>,
        secs: u64,
    ) {
        transport.emit(TransportEvent::Loaded);
        transport.emit(TransportEvent::DurationKnown(Duration::from_secs(secs)));
        session.pump_events();
    }

    #[test]
    fn test_open_attaches_and_loads() {
        let transport = ScriptedTransport::default();
        let session = open(&transport, false);

        assert_eq!(
            transport.calls(),
            vec![Call::Attach, Call::SetRate(1.0), Call::Load("lesson-1/audio.mp3".into())]
        );
        let snapshot = session.snapshot();
        assert!(!snapshot.playing);
        assert_eq!(snapshot.duration, None);
        assert_eq!(snapshot.loop_mode, LoopMode::Off);
        assert_eq!(snapshot.title, "Lesson 1");
    }

    #[test]
    fn test_loop_cycle_resets_repeat_count() {
        let transport = ScriptedTransport::default();
        let mut session = open(&transport, false);

        let mut seen = Vec::new();
        for _ in 0..6 {
            session.play();
            session.cycle_loop_mode();
            assert_eq!(session.snapshot().repeat_count, 0);
            seen.push(session.snapshot().loop_mode);
        }
        assert_eq!(
            seen,
            vec![
                LoopMode::Infinite,
                LoopMode::FiveTimes,
                LoopMode::Off,
                LoopMode::Infinite,
                LoopMode::FiveTimes,
                LoopMode::Off,
            ]
        );
    }

    #[test]
    fn test_five_times_stops_after_four_restarts() {
        let transport = ScriptedTransport::default();
        let mut session = open(&transport, false);
        with_duration(&transport, &mut session, 30);
        session.cycle_loop_mode();
        session.cycle_loop_mode();
        assert_eq!(session.snapshot().loop_mode, LoopMode::FiveTimes);
        assert_eq!(session.snapshot().repeat_count, 0);
        transport.clear_calls();

        let mut counts = Vec::new();
        let mut restarts = 0;
        for _ in 0..5 {
            transport.emit(TransportEvent::PlaybackCompleted);
            session.pump_events();
            counts.push(session.snapshot().repeat_count);
            if session.snapshot().playing {
                restarts += 1;
            }
        }

        assert_eq!(counts, vec![1, 2, 3, 4, 0]);
        assert_eq!(restarts, 4);
        assert!(!session.snapshot().playing);
        let replays = transport.calls().iter().filter(|c| **c == Call::Play).count();
        assert_eq!(replays, 4);
    }

    #[test]
    fn test_play_starts_five_times_count_at_one() {
        let transport = ScriptedTransport::default();
        let mut session = open(&transport, false);
        session.cycle_loop_mode();
        session.cycle_loop_mode();

        session.play();
        assert_eq!(session.snapshot().repeat_count, 1);
        assert!(session.snapshot().playing);

        // already counting, a pause/play does not reset it
        transport.emit(TransportEvent::PlaybackCompleted);
        session.pump_events();
        session.pause();
        session.play();
        assert_eq!(session.snapshot().repeat_count, 2);
    }

    #[test]
    fn test_infinite_never_stops() {
        let transport = ScriptedTransport::default();
        let mut session = open(&transport, false);
        with_duration(&transport, &mut session, 12);
        session.cycle_loop_mode();
        session.play();

        for _ in 0..25 {
            transport.emit(TransportEvent::PositionChanged(Duration::from_secs(12)));
            transport.emit(TransportEvent::PlaybackCompleted);
            session.pump_events();
            assert!(session.snapshot().playing);
            assert_eq!(session.snapshot().position, Duration::ZERO);
        }
    }

    #[test]
    fn test_off_stops_at_end() {
        let transport = ScriptedTransport::default();
        let mut session = open(&transport, false);
        with_duration(&transport, &mut session, 90);
        session.play();

        transport.emit(TransportEvent::PositionChanged(Duration::from_millis(89_900)));
        transport.emit(TransportEvent::PlaybackCompleted);
        session.pump_events();

        assert!(!session.snapshot().playing);
        assert_eq!(session.snapshot().position, Duration::from_secs(90));
        assert_eq!(session.snapshot().progress(), 1.0);
    }

    #[test]
    fn test_play_after_end_starts_over() {
        let transport = ScriptedTransport::default();
        let mut session = open(&transport, false);
        with_duration(&transport, &mut session, 10);
        session.play();
        transport.emit(TransportEvent::PlaybackCompleted);
        session.pump_events();

        session.seek(1.0);
        transport.clear_calls();

        session.play();
        assert!(session.snapshot().playing);
        assert_eq!(session.snapshot().position, Duration::ZERO);
        assert_eq!(
            transport.calls(),
            vec![Call::SetPosition(Duration::ZERO), Call::Play]
        );
    }

    #[test]
    fn test_undecodable_source_is_terminal() {
        let transport = ScriptedTransport::default();
        transport.fail_load();
        let mut session = open(&transport, true);
        let updates = session.subscribe();

        assert!(session.snapshot().load_failed());
        assert!(session
            .snapshot()
            .fault
            .as_deref()
            .is_some_and(|fault| fault.contains("lesson-1/audio.mp3")));

        for _ in 0..100 {
            session.pump_events();
        }
        let snapshot = session.snapshot();
        assert!(snapshot.load_failed());
        assert!(!snapshot.ready);
        assert!(!snapshot.playing);
        // the failure is already in the initial state, nothing new to publish
        assert!(!updates.has_changed().unwrap());
        assert!(!transport.calls().contains(&Call::Play));
    }

    #[test]
    fn test_seek_maps_fraction_to_duration() {
        let transport = ScriptedTransport::default();
        let mut session = open(&transport, false);

        session.seek(0.5);
        assert_eq!(session.snapshot().position, Duration::ZERO);
        assert!(!transport.calls().iter().any(|c| matches!(c, Call::SetPosition(_))));

        with_duration(&transport, &mut session, 200);
        session.seek(0.5);
        assert_eq!(session.snapshot().position, Duration::from_secs(100));
        assert_eq!(transport.calls().last(), Some(&Call::SetPosition(Duration::from_secs(100))));

        session.seek(1.7);
        assert_eq!(session.snapshot().position, Duration::from_secs(200));
        session.seek(-0.2);
        assert_eq!(session.snapshot().position, Duration::ZERO);
    }

    #[test]
    fn test_restart_keeps_play_state() {
        let transport = ScriptedTransport::default();
        let mut session = open(&transport, false);
        with_duration(&transport, &mut session, 60);
        session.seek(0.25);

        session.restart();
        assert_eq!(session.snapshot().position, Duration::ZERO);
        assert!(!session.snapshot().playing);
        assert_eq!(session.snapshot().repeat_count, 0);

        session.cycle_loop_mode();
        session.cycle_loop_mode();
        session.play();
        transport.emit(TransportEvent::PlaybackCompleted);
        session.pump_events();
        assert_eq!(session.snapshot().repeat_count, 2);

        session.restart();
        assert!(session.snapshot().playing);
        assert_eq!(session.snapshot().repeat_count, 1);
    }

    #[test]
    fn test_rate_cycle_wraps() {
        let transport = ScriptedTransport::default();
        let mut session = open(&transport, false);
        with_duration(&transport, &mut session, 60);
        session.play();
        session.seek(0.5);
        let position = session.snapshot().position;

        let mut seen = Vec::new();
        for _ in 0..7 {
            session.cycle_rate();
            seen.push(session.snapshot().rate.multiplier());
            assert!(session.snapshot().playing);
            assert_eq!(session.snapshot().position, position);
        }
        assert_eq!(seen, vec![1.25, 1.5, 0.5, 0.75, 1.0, 1.25, 1.5]);
        assert_eq!(transport.calls().last(), Some(&Call::SetRate(1.5)));
    }

    #[test]
    fn test_auto_play_waits_for_ready() {
        let transport = ScriptedTransport::default();
        let mut session = open(&transport, true);
        assert!(!session.snapshot().playing);

        transport.emit(TransportEvent::Loaded);
        session.pump_events();
        assert!(session.snapshot().playing);

        // a second ready notification does not replay
        transport.clear_calls();
        transport.emit(TransportEvent::Loaded);
        session.pump_events();
        assert!(!transport.calls().contains(&Call::Play));
    }

    #[test]
    fn test_auto_play_rejection_leaves_session_paused() {
        let transport = ScriptedTransport::default();
        transport.reject_play(true);
        let mut session = open(&transport, true);

        transport.emit(TransportEvent::Loaded);
        session.pump_events();
        assert!(!session.snapshot().playing);
        assert!(session.snapshot().ready);
        assert!(session.snapshot().fault.is_some());

        transport.reject_play(false);
        session.toggle();
        assert!(session.snapshot().playing);
        assert_eq!(session.snapshot().fault, None);
    }

    #[test]
    fn test_replacing_source_starts_fresh() {
        let transport = ScriptedTransport::default();
        let mut first = open(&transport, false);
        with_duration(&transport, &mut first, 100);
        first.cycle_loop_mode();
        first.cycle_loop_mode();
        first.play();
        first.seek(0.4);
        let stale = transport.0.borrow().events.clone().expect("attached");

        drop(first);
        assert_eq!(transport.calls().last(), Some(&Call::Detach));
        assert!(stale.send(TransportEvent::PlaybackCompleted).is_err());

        let second = PlaybackSession::open(
            transport.clone(),
            &media("lesson-1/anuvakam-2/audio.mp3"),
            "Anuvakam 2 - Full",
            false,
            PlaybackRate::Normal,
        );
        let snapshot = second.snapshot();
        assert_eq!(snapshot.position, Duration::ZERO);
        assert!(!snapshot.playing);
        assert_eq!(snapshot.repeat_count, 0);
        assert_eq!(snapshot.loop_mode, LoopMode::Off);
        assert_eq!(snapshot.source, "lesson-1/anuvakam-2/audio.mp3");
    }

    #[test]
    fn test_subscribers_see_changes() {
        let transport = ScriptedTransport::default();
        let mut session = open(&transport, false);
        let mut rx = session.subscribe();
        assert!(!rx.has_changed().unwrap());

        session.cycle_rate();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().rate, PlaybackRate::OneAndQuarter);

        // pausing while paused changes nothing
        session.pause();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_labels() {
        let mut snapshot = SessionSnapshot::new("a".into(), "A".into(), PlaybackRate::Normal);
        assert_eq!(snapshot.loop_label(), "Loop: Off");
        assert_eq!(snapshot.time_label(), "0:00 / 0:00");
        assert_eq!(snapshot.progress(), 0.0);

        snapshot.loop_mode = LoopMode::FiveTimes;
        snapshot.repeat_count = 3;
        snapshot.duration = Some(Duration::from_secs(125));
        snapshot.position = Duration::from_millis(65_900);
        assert_eq!(snapshot.loop_label(), "Loop: 5× (3/5)");
        assert_eq!(snapshot.time_label(), "1:05 / 2:05");

        assert_eq!(PlaybackRate::OneAndQuarter.to_string(), "1.25×");
        assert_eq!(PlaybackRate::Normal.to_string(), "1×");
        assert_eq!(PlaybackRate::Half.tone(), RateTone::Slower);
        assert_eq!(PlaybackRate::from_multiplier(0.75), Some(PlaybackRate::ThreeQuarters));
        assert_eq!(PlaybackRate::from_multiplier(2.0), None);
    }
}
