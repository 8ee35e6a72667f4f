//! Animation values selected by a mode stream.
//!
//! `switch_by_mode` keeps one live value automaton per distinct mode and
//! rebuilds it from scratch whenever the mode changes, so each easing ramp
//! restarts at zero when its mode is re-entered.
//!
//! Run with: cargo run --example mode_switch

use anyhow::Result;
use ratchet::{switch_by_mode, Automaton};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Easing {
    Ramp,
    Pulse,
}

fn ramp() -> Automaton<Easing, f64> {
    Automaton::scan(0.0, |t, _| {
        *t += 0.25;
        *t
    })
}

fn pulse() -> Automaton<Easing, f64> {
    Automaton::scan(0u32, |phase, _| {
        *phase += 1;
        if *phase % 2 == 0 { 0.0 } else { 1.0 }
    })
}

fn main() -> Result<()> {
    let modes = Automaton::stateless(|mode: Easing| mode);
    let mut animation = switch_by_mode(modes, |mode| match mode {
        Easing::Ramp => ramp(),
        Easing::Pulse => pulse(),
    });

    let script = [
        Easing::Ramp,
        Easing::Ramp,
        Easing::Ramp,
        Easing::Pulse,
        Easing::Pulse,
        Easing::Ramp,
        Easing::Ramp,
    ];

    for (step, mode) in script.into_iter().enumerate() {
        let (value, next) = animation.step(mode)?;
        println!("step {step}: {mode:?} -> {value:.2}");
        animation = next;
    }

    Ok(())
}
