use crate::timestamp::{quantize, MAX_SECONDS};

use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    /// 1-based display position. Recomputed after structural edits, so it
    /// does not identify a caption across edits.
    pub sequence_number: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Caption {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub(crate) fn has_valid_interval(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && 0.0 <= self.start && self.start < self.end
    }
}

/// An ordered list of captions. Order is playback order; nothing here sorts
/// by time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub(crate) captions: Vec<Caption>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from recogniser output. Text is trimmed; segments
    /// without text, with an empty interval or outside the clock range are
    /// skipped.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64, S)>,
        S: AsRef<str>,
    {
        let mut doc = Document::new();
        for (start, end, text) in segments {
            let caption = Caption {
                sequence_number: 0,
                start: quantize(start),
                end: quantize(end),
                text: text.as_ref().trim().to_string(),
            };
            let in_range = 0.0 <= start && end <= MAX_SECONDS;
            if caption.text.is_empty() || !in_range || !caption.has_valid_interval() {
                debug!(
                    "Skipping segment {}..{} ('{}')",
                    start, end, caption.text
                );
                continue;
            }
            doc.push(caption);
        }
        doc
    }

    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }

    pub fn get(&self, position: usize) -> Option<&Caption> {
        self.captions.get(position)
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    /// Adds a caption at the end, numbering it after the current last one.
    pub(crate) fn push(&mut self, mut caption: Caption) {
        caption.sequence_number = self.captions.len() + 1;
        self.captions.push(caption);
    }

    pub(crate) fn renumber(&mut self) {
        for (index, caption) in self.captions.iter_mut().enumerate() {
            caption.sequence_number = index + 1;
        }
    }
}
