//! Text score format.
//!
//! One event per line, `#` starts a comment:
//!
//! ```text
//! # time(s)  kind  args
//! 0.0        on    60 100     # note, optional velocity (default 100)
//! 0.5        cc    5 90       # controller, value
//! 0.75       bend  12000      # 14-bit, 8192 = centre
//! 1.0        off   60
//! 3.0        end              # optional, extends the render
//! ```
//!
//! Events are played in time order; lines with equal times keep file order.

use foldbox_synth::SynthEvent;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_VELOCITY: u8 = 100;

/// Errors raised while reading a score.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The score file could not be read.
    #[error("failed to read score '{path}': {source}")]
    Io {
        /// Score path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Time column missing, negative or not a number.
    #[error("line {line}: invalid time '{value}'")]
    InvalidTime {
        /// 1-based line number.
        line: usize,
        /// Text found.
        value: String,
    },

    /// Event kind other than on, off, cc, bend or end.
    #[error("line {line}: unknown event '{kind}'")]
    UnknownEvent {
        /// 1-based line number.
        line: usize,
        /// Text found.
        kind: String,
    },

    /// A required argument is absent.
    #[error("line {line}: '{kind}' needs a {arg}")]
    MissingArgument {
        /// 1-based line number.
        line: usize,
        /// Event kind.
        kind: &'static str,
        /// Argument name.
        arg: &'static str,
    },

    /// An argument is not an integer or exceeds its range.
    #[error("line {line}: {arg} '{value}' is not an integer in 0..={max}")]
    InvalidArgument {
        /// 1-based line number.
        line: usize,
        /// Argument name.
        arg: &'static str,
        /// Text found.
        value: String,
        /// Largest accepted value.
        max: u16,
    },

    /// More columns than the event takes.
    #[error("line {line}: unexpected '{extra}'")]
    TrailingInput {
        /// 1-based line number.
        line: usize,
        /// First surplus token.
        extra: String,
    },
}

/// One timed event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent {
    /// Seconds from the start.
    pub time_s: f64,
    /// What happens.
    pub event: SynthEvent,
}

impl TimedEvent {
    /// Sample index of this event at `sample_rate`.
    pub fn frame(&self, sample_rate: u32) -> u64 {
        (self.time_s * f64::from(sample_rate)).round() as u64
    }
}

/// A parsed score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    events: Vec<TimedEvent>,
    end_s: f64,
}

impl Score {
    /// Read and parse a score file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse score text.
    pub fn parse(text: &str) -> Result<Self, ScoreError> {
        let mut events = Vec::new();
        let mut end_s = 0.0f64;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let content = raw.split('#').next().unwrap_or_default();
            let mut tokens = content.split_whitespace();

            let Some(time_tok) = tokens.next() else {
                continue;
            };
            let time_s = time_tok
                .parse::<f64>()
                .ok()
                .filter(|t| t.is_finite() && *t >= 0.0)
                .ok_or_else(|| ScoreError::InvalidTime {
                    line,
                    value: time_tok.to_string(),
                })?;
            end_s = end_s.max(time_s);

            let kind = tokens.next().ok_or(ScoreError::MissingArgument {
                line,
                kind: "event",
                arg: "kind",
            })?;

            let event = match kind {
                "on" => {
                    let note = required(&mut tokens, line, "on", "note", 127)?;
                    let velocity = match tokens.next() {
                        Some(tok) => number(tok, line, "velocity", 127)?,
                        None => u16::from(DEFAULT_VELOCITY),
                    };
                    Some(SynthEvent::NoteOn {
                        note: note as u8,
                        velocity: velocity as u8,
                    })
                }
                "off" => {
                    let note = required(&mut tokens, line, "off", "note", 127)?;
                    Some(SynthEvent::NoteOff { note: note as u8 })
                }
                "cc" => {
                    let cc = required(&mut tokens, line, "cc", "controller", 127)?;
                    let value = required(&mut tokens, line, "cc", "value", 127)?;
                    Some(SynthEvent::ControlChange {
                        cc: cc as u8,
                        value: value as u8,
                    })
                }
                "bend" => {
                    let value = required(&mut tokens, line, "bend", "value", 16383)?;
                    Some(SynthEvent::PitchBend { value })
                }
                "end" => None,
                other => {
                    return Err(ScoreError::UnknownEvent {
                        line,
                        kind: other.to_string(),
                    });
                }
            };

            if let Some(extra) = tokens.next() {
                return Err(ScoreError::TrailingInput {
                    line,
                    extra: extra.to_string(),
                });
            }
            if let Some(event) = event {
                events.push(TimedEvent { time_s, event });
            }
        }

        events.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
        Ok(Self { events, end_s })
    }

    /// Events in play order.
    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    /// Time of the last event or `end` marker.
    pub fn end_s(&self) -> f64 {
        self.end_s
    }

    /// Number of note-on events.
    pub fn note_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.event, SynthEvent::NoteOn { .. }))
            .count()
    }
}

fn required<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    kind: &'static str,
    arg: &'static str,
    max: u16,
) -> Result<u16, ScoreError> {
    let tok = tokens
        .next()
        .ok_or(ScoreError::MissingArgument { line, kind, arg })?;
    number(tok, line, arg, max)
}

fn number(tok: &str, line: usize, arg: &'static str, max: u16) -> Result<u16, ScoreError> {
    tok.parse::<u16>()
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| ScoreError::InvalidArgument {
            line,
            arg,
            value: tok.to_string(),
            max,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_event_kinds() {
        let score = Score::parse(
            "# intro\n\
             0 on 60\n\
             0.25 on 64 80   # softer\n\
             0.5 cc 5 127\n\
             \n\
             0.75 bend 16383\n\
             1.0 off 60\n",
        )
        .unwrap();

        let kinds: Vec<_> = score.events().iter().map(|e| e.event).collect();
        assert_eq!(
            kinds,
            [
                SynthEvent::NoteOn { note: 60, velocity: 100 },
                SynthEvent::NoteOn { note: 64, velocity: 80 },
                SynthEvent::ControlChange { cc: 5, value: 127 },
                SynthEvent::PitchBend { value: 16383 },
                SynthEvent::NoteOff { note: 60 },
            ]
        );
        assert_eq!(score.end_s(), 1.0);
        assert_eq!(score.note_count(), 2);
    }

    #[test]
    fn out_of_order_lines_are_sorted_stably() {
        let score = Score::parse("1 off 60\n0 on 60\n1 on 62\n").unwrap();
        let times: Vec<_> = score.events().iter().map(|e| e.time_s).collect();
        assert_eq!(times, [0.0, 1.0, 1.0]);
        assert_eq!(score.events()[1].event, SynthEvent::NoteOff { note: 60 });
    }

    #[test]
    fn end_marker_extends_without_event() {
        let score = Score::parse("0 on 48\n4.5 end\n").unwrap();
        assert_eq!(score.events().len(), 1);
        assert_eq!(score.end_s(), 4.5);
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = Score::parse("0 on 60\n\n0.5 on 200\n").unwrap_err();
        assert!(matches!(err, ScoreError::InvalidArgument { line: 3, arg: "note", .. }));
        assert!(err.to_string().starts_with("line 3:"));

        assert!(matches!(
            Score::parse("x on 60").unwrap_err(),
            ScoreError::InvalidTime { line: 1, .. }
        ));
        assert!(matches!(
            Score::parse("-1 on 60").unwrap_err(),
            ScoreError::InvalidTime { .. }
        ));
        assert!(matches!(
            Score::parse("0 strum 60").unwrap_err(),
            ScoreError::UnknownEvent { .. }
        ));
        assert!(matches!(
            Score::parse("0 cc 5").unwrap_err(),
            ScoreError::MissingArgument { arg: "value", .. }
        ));
        assert!(matches!(
            Score::parse("0 off 60 61").unwrap_err(),
            ScoreError::TrailingInput { .. }
        ));
    }

    #[test]
    fn frame_rounds_to_nearest_sample() {
        let ev = TimedEvent {
            time_s: 0.5,
            event: SynthEvent::NoteOff { note: 1 },
        };
        assert_eq!(ev.frame(48000), 24000);
    }
}
