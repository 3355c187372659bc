//! Decoded control events.
//!
//! Transport decoding happens elsewhere; these are the messages the engine
//! and the parameter store understand once a byte stream has been parsed.

/// A decoded note or controller message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthEvent {
    /// Key pressed. Velocity 0 is a release.
    NoteOn {
        /// MIDI note number, 0-127.
        note: u8,
        /// MIDI velocity, 0-127.
        velocity: u8,
    },
    /// Key released.
    NoteOff {
        /// MIDI note number, 0-127.
        note: u8,
    },
    /// Controller moved.
    ControlChange {
        /// Controller number, 0-127.
        cc: u8,
        /// Controller value, 0-127.
        value: u8,
    },
    /// Pitch wheel moved.
    PitchBend {
        /// 14-bit value, center 8192.
        value: u16,
    },
}

impl SynthEvent {
    /// Note on or note off.
    pub fn is_note(&self) -> bool {
        matches!(self, Self::NoteOn { .. } | Self::NoteOff { .. })
    }
}
