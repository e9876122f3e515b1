use justly_types::ScoreView;

use crate::scheduler::{schedule, PassOutcome, PlayRange};
use crate::sink::{SinkResult, SynthSink};

/// Owns a sink and runs one pass at a time on it. Starting a pass stops
/// the previous one first.
pub struct Player<S: SynthSink> {
    sink: S,
    final_time: f64,
}

impl<S: SynthSink> Player<S> {
    pub fn new(sink: S) -> Self {
        let final_time = sink.current_time();
        Self { sink, final_time }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn play<V: ScoreView + ?Sized>(&mut self, view: &V, range: PlayRange) -> SinkResult<PassOutcome> {
        self.stop()?;
        self.sink.set_gain(view.gain())?;
        let outcome = schedule(view, &self.sink, range)?;
        self.final_time = outcome.final_time;
        log::info!(target: "audio::player", "playing {} notes until {:.0} ms", outcome.notes_played, outcome.final_time);
        Ok(outcome)
    }

    /// Silence everything. Calling this while idle is harmless.
    pub fn stop(&mut self) -> SinkResult {
        self.sink.stop()?;
        self.final_time = self.sink.current_time();
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.sink.current_time() < self.final_time
    }

    /// Time at which the current pass ends.
    pub fn final_time(&self) -> f64 {
        self.final_time
    }
}
