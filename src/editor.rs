//! Edit operations on a [`Document`].
//!
//! Every operation leaves sequence numbers dense and 1-based and every
//! caption with `start < end`. Positions are 0-based indices into the
//! document; a position that does not exist turns the operation into a no-op.

use crate::caption::{Caption, Document};
use crate::config::EditPolicy;
use crate::error::{ConfigError, EditError};
use crate::timestamp::{self, quantize, Clock, MAX_SECONDS};

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

#[derive(Debug, Clone, Default)]
pub struct Editor {
    policy: EditPolicy,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: EditPolicy) -> Result<Self, ConfigError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Adds a caption after the last one, separated from it by the append
    /// gap. Returns the position of the new caption.
    pub fn append<S: Into<String>>(&self, doc: &mut Document, text: S) -> usize {
        let start = match doc.captions.last() {
            Some(last) => quantize(last.end + self.policy.append_gap),
            None => 0.0,
        };
        doc.push(Caption {
            sequence_number: 0,
            start,
            end: quantize(start + self.policy.append_duration),
            text: text.into(),
        });
        doc.len() - 1
    }

    pub fn remove(&self, doc: &mut Document, position: usize) -> Option<Caption> {
        if position >= doc.len() {
            debug!("Ignoring removal of caption at missing position {}", position);
            return None;
        }
        let removed = doc.captions.remove(position);
        doc.renumber();
        Some(removed)
    }

    /// Moves one endpoint of a caption to `value` seconds.
    ///
    /// If that leaves the caption with `start >= end`, the opposite endpoint
    /// is pushed to sit `correction_offset` seconds away from the new value.
    /// The edit itself is never refused for ordering reasons; only values
    /// that are not finite, negative or beyond [`MAX_SECONDS`] are rejected.
    pub fn set_time(
        &self,
        doc: &mut Document,
        position: usize,
        endpoint: Endpoint,
        value: f64,
    ) -> Result<(), EditError> {
        if !value.is_finite() || value < 0.0 || value > MAX_SECONDS {
            return Err(EditError::InvalidTime(value));
        }
        let caption = match doc.captions.get_mut(position) {
            Some(caption) => caption,
            None => {
                debug!("Ignoring time edit at missing position {}", position);
                return Ok(());
            }
        };

        let before = caption.clone();
        let value = quantize(value);
        let offset = self.policy.correction_offset;
        match endpoint {
            Endpoint::Start => {
                caption.start = value;
                if caption.start >= caption.end {
                    caption.end = quantize(value + offset);
                    debug!(
                        "Caption {}: end moved to {} after start edit",
                        caption.sequence_number, caption.end
                    );
                }
            }
            Endpoint::End => {
                caption.end = value;
                if caption.end <= caption.start {
                    caption.start = quantize((value - offset).max(0.0));
                    if caption.start >= caption.end {
                        // An end at zero leaves no room before it.
                        caption.end = quantize(caption.start + offset);
                    }
                    debug!(
                        "Caption {}: start moved to {} after end edit",
                        caption.sequence_number, caption.start
                    );
                }
            }
        }
        if !caption.has_valid_interval() {
            *caption = before;
            return Err(EditError::InvalidTime(value));
        }
        Ok(())
    }

    /// Applies a clock value typed by the user. A value that does not decode
    /// is rejected and the document stays as it was.
    pub fn set_time_text(
        &self,
        doc: &mut Document,
        position: usize,
        endpoint: Endpoint,
        text: &str,
        clock: Clock,
    ) -> Result<(), EditError> {
        let value = timestamp::decode(text.trim(), clock)?;
        self.set_time(doc, position, endpoint, value)
    }

    /// Replaces the text of a caption. Empty text is kept as is. Returns
    /// whether a caption was changed.
    pub fn set_text<S: Into<String>>(&self, doc: &mut Document, position: usize, text: S) -> bool {
        match doc.captions.get_mut(position) {
            Some(caption) => {
                caption.text = text.into();
                true
            }
            None => {
                debug!("Ignoring text edit at missing position {}", position);
                false
            }
        }
    }
}
