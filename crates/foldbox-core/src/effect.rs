//! The [`Effect`] trait: mono sample processors with state.
//!
//! Every stateful stage in the post-mix path implements this trait so the
//! effects chain can drive them uniformly. Implementations must not allocate,
//! block or lock inside `process`.

/// Mono, sample-at-a-time processor.
///
/// # Example
///
/// ```rust
/// use foldbox_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.gain
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut g = Gain { gain: 0.5 };
/// assert_eq!(g.process(1.0), 0.5);
/// ```
pub trait Effect {
    /// Process a single sample and advance internal state by one step.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// The default implementation calls [`Effect::process`] per sample.
    /// Buffers must have equal length.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Recompute sample-rate dependent coefficients.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear all internal state (delay lines, filter memories).
    fn reset(&mut self);
}
