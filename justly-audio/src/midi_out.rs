//! Realtime delivery to a MIDI output port.
//!
//! Events are queued over a channel to a delivery thread that holds them
//! until their timestamp and then writes them to the port.

use std::collections::VecDeque;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use midir::{MidiOutput, MidiOutputConnection};
use midly::live::LiveEvent;
use midly::num::{u4, u7};
use midly::{MidiMessage, TrackEventKind};

use crate::channels::CHANNEL_COUNT;
use crate::export::{event_messages, gain_to_volume};
use crate::sink::{SinkError, SinkResult, SynthEvent, SynthSink};

const CLIENT_NAME: &str = "justly";
const CC_VOLUME: u8 = 7;
const CC_ALL_NOTES_OFF: u8 = 123;

/// Longest the delivery thread sleeps before looking at its queue again.
const MAX_WAIT: Duration = Duration::from_secs(1);

/// Information about an available MIDI output port
#[derive(Debug, Clone)]
pub struct MidiPortInfo {
    pub index: usize,
    pub name: String,
}

pub fn list_ports() -> SinkResult<Vec<MidiPortInfo>> {
    let output = MidiOutput::new(CLIENT_NAME).map_err(|e| SinkError(e.to_string()))?;
    Ok(output
        .ports()
        .iter()
        .enumerate()
        .filter_map(|(index, port)| {
            output
                .port_name(port)
                .ok()
                .map(|name| MidiPortInfo { index, name })
        })
        .collect())
}

enum Delivery {
    Event(SynthEvent),
    Gain(f64),
    Stop,
    Shutdown,
}

pub struct MidiOutputSink {
    tx: Sender<Delivery>,
    clock: Instant,
    port_name: String,
    handle: Option<JoinHandle<()>>,
}

impl MidiOutputSink {
    /// Connect to the first port whose name contains `wanted`, or to the
    /// first port when `wanted` is `None`.
    pub fn connect(wanted: Option<&str>) -> SinkResult<Self> {
        let output = MidiOutput::new(CLIENT_NAME).map_err(|e| SinkError(e.to_string()))?;
        let ports = output.ports();
        let port = match wanted {
            Some(wanted) => ports.iter().find(|port| {
                output
                    .port_name(port)
                    .map(|name| name.contains(wanted))
                    .unwrap_or(false)
            }),
            None => ports.first(),
        };
        let Some(port) = port.cloned() else {
            return Err(SinkError(match wanted {
                Some(wanted) => format!("no MIDI output port matching \"{}\"", wanted),
                None => "no MIDI output ports".to_string(),
            }));
        };
        let port_name = output
            .port_name(&port)
            .unwrap_or_else(|_| "Unknown".to_string());
        let connection = output
            .connect(&port, "justly-output")
            .map_err(|e| SinkError(e.to_string()))?;

        let clock = Instant::now();
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = thread::Builder::new()
            .name("midi-out".into())
            .spawn(move || delivery_loop(connection, rx, clock))
            .map_err(|e| SinkError(e.to_string()))?;

        log::info!(target: "audio::midi_out", "connected to {}", port_name);
        Ok(Self {
            tx,
            clock,
            port_name,
            handle: Some(handle),
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    fn deliver(&self, delivery: Delivery) -> SinkResult {
        self.tx
            .send(delivery)
            .map_err(|_| SinkError("MIDI delivery thread has stopped".to_string()))
    }
}

impl SynthSink for MidiOutputSink {
    fn current_time(&self) -> f64 {
        elapsed_ms(self.clock)
    }

    fn send(&self, event: SynthEvent) -> SinkResult {
        if !event.time.is_finite() {
            return Err(SinkError(format!("event time {} is not finite", event.time)));
        }
        self.deliver(Delivery::Event(event))
    }

    fn set_gain(&self, gain: f64) -> SinkResult {
        self.deliver(Delivery::Gain(gain))
    }

    fn stop(&self) -> SinkResult {
        self.deliver(Delivery::Stop)
    }
}

impl Drop for MidiOutputSink {
    fn drop(&mut self) {
        let _ = self.tx.send(Delivery::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn elapsed_ms(clock: Instant) -> f64 {
    clock.elapsed().as_secs_f64() * 1000.0
}

/// Time to sleep before an event at `due`, capped at [`MAX_WAIT`].
fn wait_until(due: f64, now: f64) -> Duration {
    Duration::try_from_secs_f64(((due - now) / 1000.0).max(0.0))
        .map_or(MAX_WAIT, |wait| wait.min(MAX_WAIT))
}

fn write_message(connection: &mut MidiOutputConnection, channel: u8, message: MidiMessage) {
    let mut bytes = Vec::with_capacity(3);
    let event = LiveEvent::Midi {
        channel: u4::from(channel),
        message,
    };
    if let Err(e) = event.write_std(&mut bytes) {
        log::warn!(target: "audio::midi_out", "could not encode MIDI message: {}", e);
        return;
    }
    if let Err(e) = connection.send(&bytes) {
        log::warn!(target: "audio::midi_out", "MIDI send failed: {}", e);
    }
}

fn write_event(connection: &mut MidiOutputConnection, event: &SynthEvent) {
    for kind in event_messages(event) {
        if let TrackEventKind::Midi { channel, message } = kind {
            write_message(connection, channel.as_int(), message);
        }
    }
}

fn write_all_channels(connection: &mut MidiOutputConnection, controller: u8, value: u8) {
    for channel in 0..CHANNEL_COUNT as u8 {
        write_message(
            connection,
            channel,
            MidiMessage::Controller {
                controller: u7::from(controller),
                value: u7::from(value),
            },
        );
    }
}

fn delivery_loop(mut connection: MidiOutputConnection, rx: Receiver<Delivery>, clock: Instant) {
    // Sorted by time; equal times keep arrival order.
    let mut pending: VecDeque<SynthEvent> = VecDeque::new();
    loop {
        let now = elapsed_ms(clock);
        while pending.front().is_some_and(|event| event.time <= now) {
            if let Some(event) = pending.pop_front() {
                write_event(&mut connection, &event);
            }
        }

        let delivery = match pending.front() {
            Some(next) => {
                let wait = wait_until(next.time, now);
                match rx.recv_timeout(wait) {
                    Ok(delivery) => delivery,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(delivery) => delivery,
                Err(_) => break,
            },
        };

        match delivery {
            Delivery::Event(event) => {
                let index = pending.partition_point(|queued| queued.time <= event.time);
                pending.insert(index, event);
            }
            Delivery::Gain(gain) => {
                write_all_channels(&mut connection, CC_VOLUME, gain_to_volume(gain));
            }
            Delivery::Stop => {
                pending.clear();
                write_all_channels(&mut connection, CC_ALL_NOTES_OFF, 0);
            }
            Delivery::Shutdown => {
                write_all_channels(&mut connection, CC_ALL_NOTES_OFF, 0);
                break;
            }
        }
    }
    connection.close();
    log::debug!(target: "audio::midi_out", "delivery thread finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_are_capped() {
        assert_eq!(wait_until(1500.0, 1000.0), Duration::from_millis(500));
        assert_eq!(wait_until(900.0, 1000.0), Duration::ZERO);
        assert_eq!(wait_until(1.2e24, 0.0), MAX_WAIT);
        assert_eq!(wait_until(f64::INFINITY, 0.0), MAX_WAIT);
    }
}
