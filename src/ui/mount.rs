// Bookkeeping for what the player has mounted and which background fetches are still wanted.
// Every fetch carries a request id; only the latest lesson and media requests count.

use super::navigation::PlayerRequest;

/// What the app has to do with the player after navigation moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountChange {
    /// Same source, keep the running session.
    Keep,
    /// Nothing to play any more; drop the session.
    Clear,
    /// Drop the session and fetch this source under `request`.
    Fetch { request: u64, player: PlayerRequest },
}

#[derive(Debug, Default)]
pub struct PlayerMount {
    mounted: Option<PlayerRequest>,
    lesson_request: u64,
    media_request: u64,
}

impl PlayerMount {
    pub fn mounted(&self) -> Option<&PlayerRequest> {
        self.mounted.as_ref()
    }

    /// Compares what should be playing with what is mounted. Any change invalidates
    /// the media fetch in flight.
    pub fn sync(&mut self, wanted: Option<PlayerRequest>) -> MountChange {
        let keep = match (&self.mounted, &wanted) {
            (Some(mounted), Some(wanted)) => {
                // re-selecting the same source with auto-play (wrapping onto the only
                // sub-unit) still has to start it
                mounted.locator == wanted.locator && !(wanted.auto_play && !mounted.auto_play)
            }
            (None, None) => true,
            _ => false,
        };
        if keep {
            return MountChange::Keep;
        }

        self.media_request += 1;
        self.mounted = wanted.clone();
        match wanted {
            Some(player) => MountChange::Fetch {
                request: self.media_request,
                player,
            },
            None => MountChange::Clear,
        }
    }

    pub fn begin_lesson_load(&mut self) -> u64 {
        self.lesson_request += 1;
        self.lesson_request
    }

    pub fn is_current_lesson(&self, request: u64) -> bool {
        request == self.lesson_request
    }

    pub fn is_current_media(&self, request: u64) -> bool {
        request == self.media_request
    }
}
