//! A stopwatch driven by scripted start/stop button frames.
//!
//! Shows the windowing and folding layers working together: `between` turns
//! button presses into an open/closed run window, and `fold_stream` counts
//! the ticks that fall inside it.
//!
//! Run with: cargo run --example stopwatch

use anyhow::Result;
use ratchet::Occurrence::{Absent, Occurred};
use ratchet::{between, Automaton, Occurrence};

/// One input sample from the host loop.
#[derive(Debug, Clone, Copy)]
struct Frame {
    start_pressed: bool,
    stop_pressed: bool,
}

impl Frame {
    fn idle() -> Self {
        Frame {
            start_pressed: false,
            stop_pressed: false,
        }
    }

    fn start() -> Self {
        Frame {
            start_pressed: true,
            stop_pressed: false,
        }
    }

    fn stop() -> Self {
        Frame {
            start_pressed: false,
            stop_pressed: true,
        }
    }
}

fn main() -> Result<()> {
    let starts = Automaton::stateless(|frame: Frame| {
        if frame.start_pressed {
            Occurred(())
        } else {
            Absent
        }
    });
    let stops = Automaton::stateless(|frame: Frame| {
        if frame.stop_pressed {
            Occurred(())
        } else {
            Absent
        }
    });

    // Occurred(()) on every step the stopwatch is running; counting those
    // steps gives elapsed ticks. The window re-arms, so a second start
    // resumes counting where the total left off.
    let running: Automaton<Frame, Occurrence<()>> = between(starts, stops);
    let mut elapsed = running.fold_stream(0u32, |ticks, _| *ticks + 1);

    let script = [
        Frame::idle(),
        Frame::start(),
        Frame::idle(),
        Frame::idle(),
        Frame::stop(),
        Frame::idle(),
        Frame::start(),
        Frame::idle(),
        Frame::stop(),
    ];

    for (step, frame) in script.into_iter().enumerate() {
        let (ticks, next) = elapsed.step(frame)?;
        println!("step {step}: {frame:?} -> {ticks} ticks elapsed");
        elapsed = next;
    }

    Ok(())
}
