//! Lock-free parameter store shared between control and audio threads.
//!
//! Each raw control and the pitch bend live in their own `AtomicU32` holding
//! `f32` bits. Writes and reads are `Relaxed`: every field is last-write-wins
//! and no cross-field consistency is promised. A torn pair (say cutoff from
//! this message, drive from the last) lasts one block at most.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::event::SynthEvent;
use crate::params::{CcMap, Control, Curves, ParamSet, bend_from_14bit, cc_to_unit};

/// Atomic raw-control store.
///
/// The control thread writes through [`set`](Self::set) or
/// [`apply_event`](Self::apply_event); the audio thread takes a
/// [`snapshot`](Self::snapshot) per block.
///
/// # Example
///
/// ```rust
/// use foldbox_synth::{Control, SharedParams};
///
/// let shared = SharedParams::default();
/// shared.set(Control::Fold, 0.8);
/// let params = shared.snapshot();
/// assert!((params.derived().fold_amount - 0.8).abs() < 1e-6);
/// ```
#[derive(Debug)]
pub struct SharedParams {
    curves: Curves,
    raw: [AtomicU32; Control::COUNT],
    bend: AtomicU32,
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new(Curves::default())
    }
}

impl SharedParams {
    /// Store holding the default raw values.
    pub fn new(curves: Curves) -> Self {
        Self::from_params(&ParamSet::new(curves))
    }

    /// Store seeded from an existing parameter set.
    pub fn from_params(params: &ParamSet) -> Self {
        let raw = params.raw_values();
        Self {
            curves: *params.curves(),
            raw: core::array::from_fn(|i| AtomicU32::new(raw[i].to_bits())),
            bend: AtomicU32::new(params.pitch_bend().to_bits()),
        }
    }

    /// Set one raw control. Clamped on the next snapshot.
    #[inline]
    pub fn set(&self, control: Control, value: f32) {
        self.raw[control.index()].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Overwrite every raw control.
    pub fn store_raw(&self, raw: &[f32; Control::COUNT]) {
        for (slot, value) in self.raw.iter().zip(raw) {
            slot.store(value.to_bits(), Ordering::Relaxed);
        }
    }

    /// Last value written for `control`.
    #[inline]
    pub fn get(&self, control: Control) -> f32 {
        f32::from_bits(self.raw[control.index()].load(Ordering::Relaxed))
    }

    /// Set pitch bend in [-1, 1].
    #[inline]
    pub fn set_pitch_bend(&self, bend: f32) {
        self.bend.store(bend.to_bits(), Ordering::Relaxed);
    }

    /// Last pitch bend written.
    pub fn pitch_bend(&self) -> f32 {
        f32::from_bits(self.bend.load(Ordering::Relaxed))
    }

    /// Apply a controller or bend event. Returns `false` for note events
    /// and unmapped controllers, which the caller routes elsewhere.
    pub fn apply_event(&self, event: SynthEvent, map: &CcMap) -> bool {
        match event {
            SynthEvent::ControlChange { cc, value } => match map.control_for(cc) {
                Some(control) => {
                    self.set(control, cc_to_unit(value));
                    true
                }
                None => false,
            },
            SynthEvent::PitchBend { value } => {
                self.set_pitch_bend(bend_from_14bit(value));
                true
            }
            SynthEvent::NoteOn { .. } | SynthEvent::NoteOff { .. } => false,
        }
    }

    /// Read every field and recompute the derived view.
    pub fn snapshot(&self) -> ParamSet {
        let raw = core::array::from_fn(|i| f32::from_bits(self.raw[i].load(Ordering::Relaxed)));
        ParamSet::from_raw(self.curves, raw, self.pitch_bend())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_matches_defaults() {
        let shared = SharedParams::default();
        assert_eq!(shared.snapshot(), ParamSet::default());
    }

    #[test]
    fn last_write_wins() {
        let shared = SharedParams::default();
        shared.set(Control::Cutoff, 0.1);
        shared.set(Control::Cutoff, 0.9);
        assert_eq!(shared.snapshot().raw(Control::Cutoff), 0.9);
    }

    #[test]
    fn out_of_range_writes_are_clamped_on_read() {
        let shared = SharedParams::default();
        shared.set(Control::Sub, 3.0);
        shared.set_pitch_bend(-7.0);
        let p = shared.snapshot();
        assert_eq!(p.raw(Control::Sub), 1.0);
        assert_eq!(p.pitch_bend(), -1.0);
    }

    #[test]
    fn events_route_to_fields() {
        let shared = SharedParams::default();
        let map = CcMap::default();
        assert!(shared.apply_event(SynthEvent::ControlChange { cc: 8, value: 127 }, &map));
        assert!(shared.apply_event(SynthEvent::PitchBend { value: 0 }, &map));
        assert!(!shared.apply_event(SynthEvent::NoteOn { note: 60, velocity: 100 }, &map));
        assert!(!shared.apply_event(SynthEvent::ControlChange { cc: 64, value: 127 }, &map));

        let p = shared.snapshot();
        assert_eq!(p.derived().fx_amount, 1.0);
        assert_eq!(p.pitch_bend(), -1.0);
    }

    #[test]
    fn writes_from_another_thread_are_visible() {
        let shared = std::sync::Arc::new(SharedParams::default());
        let writer = std::sync::Arc::clone(&shared);
        std::thread::spawn(move || writer.set(Control::Drive, 0.7))
            .join()
            .unwrap();
        assert_eq!(shared.get(Control::Drive), 0.7);
    }
}
