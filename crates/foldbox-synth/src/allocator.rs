//! Fixed-pool note-to-slot mapping with steal-oldest.
//!
//! The allocator only tracks which note sits in which slot and when it was
//! triggered. It owns no voices; the engine indexes its voice array with the
//! returned slot.

/// Maps MIDI notes onto `N` slots.
///
/// # Example
///
/// ```rust
/// use foldbox_synth::VoiceAllocator;
///
/// let mut alloc = VoiceAllocator::<2>::new();
/// assert_eq!(alloc.note_on(60), 0);
/// assert_eq!(alloc.note_on(64), 1);
/// assert_eq!(alloc.note_on(67), 0); // steals the oldest
/// assert_eq!(alloc.note_off(60), None);
/// assert_eq!(alloc.note_off(64), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct VoiceAllocator<const N: usize> {
    notes: [Option<u8>; N],
    ages: [u64; N],
    counter: u64,
}

impl<const N: usize> Default for VoiceAllocator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> VoiceAllocator<N> {
    /// Empty allocator.
    pub fn new() -> Self {
        Self {
            notes: [None; N],
            ages: [0; N],
            counter: 0,
        }
    }

    /// Claim a slot for `note` and return its index.
    ///
    /// Priority: the slot already holding `note`, then the first free slot,
    /// then the slot with the smallest age (lowest index on ties). The age
    /// counter advances on every call.
    pub fn note_on(&mut self, note: u8) -> usize {
        self.counter += 1;

        let slot = self
            .slot_of(note)
            .or_else(|| self.notes.iter().position(Option::is_none))
            .unwrap_or_else(|| self.oldest());

        if N > 0 {
            self.notes[slot] = Some(note);
            self.ages[slot] = self.counter;
        }
        slot
    }

    /// Free the slot holding `note`. `None` if the note was stolen or is
    /// already released.
    pub fn note_off(&mut self, note: u8) -> Option<usize> {
        let slot = self.slot_of(note)?;
        self.notes[slot] = None;
        Some(slot)
    }

    /// Slot currently holding `note`.
    pub fn slot_of(&self, note: u8) -> Option<usize> {
        self.notes.iter().position(|&n| n == Some(note))
    }

    /// Note assigned to `slot`.
    pub fn note_at(&self, slot: usize) -> Option<u8> {
        self.notes.get(slot).copied().flatten()
    }

    /// Trigger age of `slot` (0 if never used).
    pub fn age_at(&self, slot: usize) -> u64 {
        self.ages.get(slot).copied().unwrap_or(0)
    }

    /// Number of NoteOn calls so far.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Any slot holding a note.
    pub fn any_held(&self) -> bool {
        self.notes.iter().any(Option::is_some)
    }

    /// Every slot holds a note.
    pub fn is_full(&self) -> bool {
        self.notes.iter().all(Option::is_some)
    }

    /// Free every slot. Ages are kept so recency ordering survives.
    pub fn release_all(&mut self) {
        self.notes = [None; N];
    }

    /// Forget everything, including ages.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn oldest(&self) -> usize {
        // min_by_key returns the first minimum, which is the lowest index.
        self.ages
            .iter()
            .enumerate()
            .min_by_key(|&(_, age)| *age)
            .map_or(0, |(i, _)| i)
    }
}
