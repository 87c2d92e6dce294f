use crate::error::EngineError;
use crate::timestamp::Clock;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The subtitle dialects the engine reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Numbered blocks with `HH:MM:SS,mmm` time ranges.
    Srt,
    /// `WEBVTT` header followed by cues with `HH:MM:SS.mmm` time ranges.
    WebVtt,
    /// One caption per line, no timing.
    Plain,
}

impl Format {
    /// The clock notation used by this dialect, if it carries timing at all.
    pub fn clock(self) -> Option<Clock> {
        match self {
            Format::Srt => Some(Clock::Srt),
            Format::WebVtt => Some(Clock::WebVtt),
            Format::Plain => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Srt => "srt",
            Format::WebVtt => "vtt",
            Format::Plain => "txt",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Srt => "application/x-subrip",
            Format::WebVtt => "text/vtt",
            Format::Plain => "text/plain",
        }
    }

    /// Infers the format from a file extension. Returns `None` when the path
    /// has no extension or an unrecognised one.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    /// Names the subtitle artifact generated for a media file, e.g.
    /// `talk.mp4` becomes `talk.srt`.
    pub fn file_name_for(self, original: &str) -> String {
        let stem = Path::new(original)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("subtitles");
        format!("{}.{}", stem, self.extension())
    }
}

impl FromStr for Format {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "srt" => Ok(Format::Srt),
            "vtt" | "webvtt" => Ok(Format::WebVtt),
            "txt" | "plain" => Ok(Format::Plain),
            _ => Err(EngineError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_names() {
        assert_eq!("srt".parse::<Format>(), Ok(Format::Srt));
        assert_eq!("VTT".parse::<Format>(), Ok(Format::WebVtt));
        assert_eq!("webvtt".parse::<Format>(), Ok(Format::WebVtt));
        assert_eq!("txt".parse::<Format>(), Ok(Format::Plain));
        assert_eq!("plain".parse::<Format>(), Ok(Format::Plain));
        assert_eq!(
            "ass".parse::<Format>(),
            Err(EngineError::UnknownFormat("ass".to_string()))
        );
    }

    #[test]
    fn infers_format_from_path() {
        assert_eq!(Format::from_path("movie.en.srt"), Some(Format::Srt));
        assert_eq!(Format::from_path("/tmp/cues.VTT"), Some(Format::WebVtt));
        assert_eq!(Format::from_path("notes.txt"), Some(Format::Plain));
        assert_eq!(Format::from_path("movie.mkv"), None);
        assert_eq!(Format::from_path("-"), None);
    }

    #[test]
    fn names_artifacts_after_the_media_file() {
        assert_eq!(Format::Srt.file_name_for("talk.mp4"), "talk.srt");
        assert_eq!(Format::WebVtt.file_name_for("my.talk.mkv"), "my.talk.vtt");
        assert_eq!(Format::Plain.file_name_for("audio"), "audio.txt");
        assert_eq!(Format::Srt.file_name_for(""), "subtitles.srt");
    }

    #[test]
    fn only_timed_formats_have_a_clock() {
        assert_eq!(Format::Srt.clock(), Some(Clock::Srt));
        assert_eq!(Format::WebVtt.clock(), Some(Clock::WebVtt));
        assert_eq!(Format::Plain.clock(), None);
    }
}
