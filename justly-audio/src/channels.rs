use crate::warnings::NoteKind;

/// Number of synthesizer channels available to one pass. Pool slot `i`
/// is MIDI channel `i`.
pub const CHANNEL_COUNT: usize = 16;

/// General MIDI plays channel 10 (index 9) as drums whatever program is
/// selected, so pitched notes only get it when every other channel is busy.
pub const PERCUSSION_CHANNEL: usize = 9;

/// Per-channel busy-until times for one scheduling pass.
#[derive(Debug, Clone)]
pub struct ChannelPool {
    free_at: [f64; CHANNEL_COUNT],
}

impl ChannelPool {
    /// All channels free from `time`.
    pub fn new(time: f64) -> Self {
        Self {
            free_at: [time; CHANNEL_COUNT],
        }
    }

    /// First channel that is free at `time`.
    pub fn find_free(&self, time: f64) -> Option<usize> {
        self.free_at.iter().position(|&free_at| free_at <= time)
    }

    pub fn is_free(&self, channel: usize, time: f64) -> bool {
        self.free_at
            .get(channel)
            .is_some_and(|&free_at| free_at <= time)
    }

    /// Free channel for a note of `kind`: unpitched notes take the
    /// percussion channel first, pitched notes take it last.
    pub fn find_free_for(&self, time: f64, kind: NoteKind) -> Option<usize> {
        let percussion_free = self.is_free(PERCUSSION_CHANNEL, time);
        match kind {
            NoteKind::Unpitched if percussion_free => Some(PERCUSSION_CHANNEL),
            NoteKind::Unpitched => self.find_free(time),
            NoteKind::Pitched => (0..CHANNEL_COUNT)
                .filter(|&channel| channel != PERCUSSION_CHANNEL)
                .find(|&channel| self.is_free(channel, time))
                .or(percussion_free.then_some(PERCUSSION_CHANNEL)),
        }
    }

    /// Mark `channel` busy until `until`.
    pub fn reserve(&mut self, channel: usize, until: f64) {
        if let Some(free_at) = self.free_at.get_mut(channel) {
            *free_at = until;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_free_channel_wins() {
        let mut pool = ChannelPool::new(0.0);
        assert_eq!(pool.find_free(0.0), Some(0));
        pool.reserve(0, 100.0);
        assert_eq!(pool.find_free(0.0), Some(1));
        assert_eq!(pool.find_free(100.0), Some(0));
    }

    #[test]
    fn percussion_channel_is_kept_for_drums() {
        let mut pool = ChannelPool::new(0.0);
        assert_eq!(pool.find_free_for(0.0, NoteKind::Unpitched), Some(PERCUSSION_CHANNEL));
        for channel in 0..PERCUSSION_CHANNEL {
            pool.reserve(channel, 10.0);
        }
        assert_eq!(pool.find_free_for(0.0, NoteKind::Pitched), Some(10));

        pool.reserve(PERCUSSION_CHANNEL, 10.0);
        assert_eq!(pool.find_free_for(0.0, NoteKind::Unpitched), Some(10));

        let mut pool = ChannelPool::new(0.0);
        for channel in (0..CHANNEL_COUNT).filter(|&c| c != PERCUSSION_CHANNEL) {
            pool.reserve(channel, 10.0);
        }
        assert_eq!(pool.find_free_for(0.0, NoteKind::Pitched), Some(PERCUSSION_CHANNEL));
    }

    #[test]
    fn exhaustion() {
        let mut pool = ChannelPool::new(0.0);
        for channel in 0..CHANNEL_COUNT {
            pool.reserve(channel, 10.0);
        }
        assert_eq!(pool.find_free(5.0), None);
        assert_eq!(pool.find_free(10.0), Some(0));
    }
}
