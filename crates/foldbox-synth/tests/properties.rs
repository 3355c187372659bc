//! Property-based tests for the foldbox-synth voice stages.
//!
//! Bounds that must hold for every input: PolyBLEP saw range, wavefold range,
//! envelope timing and monotonicity, filter stability, allocator bookkeeping.

use foldbox_synth::{
    Envelope, EnvelopeStage, Oversampling, Saturator, SawSubOscillator, VoiceAllocator, ZdfFilter,
    poly_blep, wavefold,
};
use proptest::prelude::*;

const SAMPLE_RATE: f32 = 48000.0;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// The corrected saw stays in [-1.2, 1.2] over a whole period.
    #[test]
    fn polyblep_saw_bounded(dt in 1.0e-5f32..0.5f32, steps in 2usize..2000) {
        for i in 0..steps {
            let t = i as f32 / steps as f32;
            let y = 2.0 * t - 1.0 - poly_blep(t, dt);
            prop_assert!((-1.2..=1.2).contains(&y), "dt={} t={} y={}", dt, t, y);
        }
    }

    /// The running oscillator obeys the same bound.
    #[test]
    fn oscillator_bounded(dt in 1.0e-3f32..0.5f32) {
        let mut osc = SawSubOscillator::new();
        let period = (1.0 / dt) as usize + 2;
        for _ in 0..period * 3 {
            let frame = osc.advance(dt);
            prop_assert!((-1.2..=1.2).contains(&frame.saw));
            prop_assert!((-1.0..=1.0).contains(&frame.sub));
            prop_assert!((0.0..1.0).contains(&osc.saw_phase()));
            prop_assert!((0.0..1.0).contains(&osc.sub_phase()));
        }
    }

    /// Wavefold output is inside [-1, 1] for any finite input and amount.
    #[test]
    fn wavefold_bounded(x in -1.0e6f32..1.0e6f32, amount in 0.0f32..=1.0f32) {
        let y = wavefold(x, amount);
        prop_assert!((-1.0..=1.0).contains(&y), "wavefold({}, {}) = {}", x, amount, y);
    }

    /// Envelope values never leave [0, 1] whatever the stage times.
    #[test]
    fn envelope_in_unit_range(
        attack in 0.0f32..0.5f32,
        decay in 0.0f32..2.0f32,
        sustain in -1.0f32..2.0f32,
        release in 0.0f32..2.0f32,
        gate_len in 1usize..4000,
    ) {
        let mut env = Envelope::new(SAMPLE_RATE);
        env.set_attack(attack);
        env.set_decay(decay);
        env.set_sustain(sustain);
        env.set_release(release);
        env.gate_on();
        for _ in 0..gate_len {
            let v = env.advance();
            prop_assert!((0.0..=1.0).contains(&v));
        }
        env.gate_off();
        for _ in 0..4000 {
            let v = env.advance();
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }

    /// Release from full level falls monotonically and never rises.
    #[test]
    fn release_is_monotonic(release in 0.001f32..5.0f32) {
        let mut env = Envelope::new(SAMPLE_RATE);
        env.set_attack(0.0);
        env.set_release(release);
        env.gate_on();
        prop_assert_eq!(env.advance(), 1.0);
        env.gate_off();
        let mut prev = env.value();
        for _ in 0..20000 {
            let v = env.advance();
            prop_assert!(v <= prev, "release rose from {} to {}", prev, v);
            prev = v;
        }
    }

    /// At most one slot per note; a held note always maps back to its slot.
    #[test]
    fn allocator_bookkeeping(ops in prop::collection::vec((any::<bool>(), 0u8..12), 1..200)) {
        let mut alloc = VoiceAllocator::<4>::new();
        for (on, note) in ops {
            if on {
                let had = alloc.slot_of(note);
                let slot = alloc.note_on(note);
                prop_assert!(slot < 4);
                if let Some(prev) = had {
                    prop_assert_eq!(slot, prev);
                }
                prop_assert_eq!(alloc.note_at(slot), Some(note));
            } else {
                let slot = alloc.note_off(note);
                if let Some(slot) = slot {
                    prop_assert_eq!(alloc.note_at(slot), None);
                }
                prop_assert_eq!(alloc.slot_of(note), None);
            }
            for n in 0u8..12 {
                let held = (0..4).filter(|&s| alloc.note_at(s) == Some(n)).count();
                prop_assert!(held <= 1, "note {} held by {} slots", n, held);
            }
        }
    }
}

/// 10 ms attack at 48 kHz reaches 0.999 within the one-pole time constant.
#[test]
fn attack_reaches_target_in_time() {
    let mut env = Envelope::new(SAMPLE_RATE);
    env.set_attack(0.010);
    env.set_sustain(1.0);
    env.gate_on();

    let limit = (1000.0f32.ln() * 0.010 * SAMPLE_RATE).ceil() as usize + 2;
    let mut reached = None;
    for n in 1..=limit {
        if env.advance() >= 0.999 {
            reached = Some(n);
            break;
        }
    }
    assert!(reached.is_some(), "attack did not reach 0.999 in {limit} samples");
    assert_eq!(env.stage(), EnvelopeStage::Decay);
}

/// Impulse response does not grow anywhere on the cutoff × resonance grid,
/// at either solver rate.
#[test]
fn filter_impulse_does_not_grow() {
    const N: usize = 10_000;
    let max_cutoff = SAMPLE_RATE * 0.49;

    for oversampling in [Oversampling::None, Oversampling::Double] {
        for saturator in [Saturator::HardClip, Saturator::Tanh] {
            for i in 0..12 {
                let cutoff = 20.0 * (max_cutoff / 20.0).powf(i as f32 / 11.0);
                for resonance in [0.0, 0.25, 0.5, 0.75, 1.0] {
                    let mut filter = ZdfFilter::new(SAMPLE_RATE);
                    filter.set_oversampling(oversampling);
                    filter.set_saturator(saturator);
                    filter.set_cutoff(cutoff);
                    filter.set_resonance(resonance);

                    let mut first = 0.0f32;
                    let mut second = 0.0f32;
                    for n in 0..N {
                        let y = filter.process(if n == 0 { 1.0 } else { 0.0 });
                        assert!(
                            y.is_finite() && y.abs() < 16.0,
                            "{oversampling:?} diverged at {cutoff} Hz / {resonance}"
                        );
                        if n < N / 2 {
                            first = first.max(y.abs());
                        } else {
                            second = second.max(y.abs());
                        }
                    }
                    assert!(
                        second <= first * 1.01 + 1e-6,
                        "{oversampling:?} {saturator:?} {cutoff} Hz res {resonance}: {first} -> {second}"
                    );
                }
            }
        }
    }
}

/// A self-oscillating oversampled filter settles into a bounded cycle.
#[test]
fn oversampled_self_oscillation_is_bounded() {
    let mut filter = ZdfFilter::new(SAMPLE_RATE);
    filter.set_oversampling(Oversampling::Double);
    filter.set_saturator(Saturator::HardClip);
    filter.set_cutoff(10_000.0);
    filter.set_resonance(1.0);

    let mut first = 0.0f32;
    let mut second = 0.0f32;
    for n in 0..10_000 {
        let y = filter.process(if n == 0 { 1.0 } else { 0.0 });
        assert!(y.is_finite());
        if n < 5_000 {
            first = first.max(y.abs());
        } else {
            second = second.max(y.abs());
        }
    }
    assert!(first < 16.0, "peak {first}");
    assert!(second <= first * 1.01, "{first} -> {second}");
}
