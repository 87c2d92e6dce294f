use crate::caption::{Caption, Document};
use crate::config::PlainTiming;
use crate::error::ConfigError;
use crate::format::Format;
use crate::timestamp::{self, quantize, Clock};

use log::{debug, warn};
use nom::bytes::complete::tag;
use nom::character::complete::{digit1, space0};
use nom::combinator::{all_consuming, map_res};
use nom::error::VerboseError;
use nom::IResult;
use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("Invalid blank line regex"));

const WEBVTT_HEADER: &str = "WEBVTT";

/// Best-effort reader for all supported dialects. Parsing never fails:
/// blocks that do not have the expected shape are left out of the document.
pub struct Parser {
    plain_timing: PlainTiming,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            plain_timing: PlainTiming::default(),
        }
    }

    pub fn with_plain_timing(plain_timing: PlainTiming) -> Result<Self, ConfigError> {
        plain_timing.validate()?;
        Ok(Self { plain_timing })
    }

    pub fn parse(&self, input: &str, format: Format) -> Document {
        let input = normalise(input);
        let doc = match format {
            Format::Srt => srt_document(&input),
            Format::WebVtt => webvtt_document(&input),
            Format::Plain => plain_document(&input, self.plain_timing),
        };
        if doc.is_empty() && !input.trim().is_empty() {
            warn!("No captions recognised in {} input", format);
        }
        doc
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses `input` with the default plain-text timing.
pub fn parse(input: &str, format: Format) -> Document {
    Parser::new().parse(input, format)
}

fn normalise(input: &str) -> String {
    input
        .strip_prefix('\u{FEFF}')
        .unwrap_or(input)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

fn srt_document(input: &str) -> Document {
    let mut doc = Document::new();
    for block in BLANK_LINES.split(input) {
        let block = block.trim_matches('\n');
        if block.trim().is_empty() {
            continue;
        }
        match srt_block(block) {
            Some(caption) => doc.push(caption),
            None => debug!("Dropping malformed SRT block: {:?}", block),
        }
    }
    doc
}

fn srt_block(block: &str) -> Option<Caption> {
    let mut lines = block.lines();
    let index_line = lines.next()?;
    all_consuming(seq_num)(index_line.trim()).ok()?;

    let range_line = lines.next()?;
    let (rest, (start, end)) = time_range(range_line.trim(), Clock::Srt).ok()?;
    if !rest.is_empty() {
        return None;
    }

    let text = caption_text(lines);
    let caption = Caption {
        sequence_number: 0,
        start,
        end,
        text,
    };
    if caption.text.is_empty() || !caption.has_valid_interval() {
        return None;
    }
    Some(caption)
}

fn webvtt_document(input: &str) -> Document {
    let mut doc = Document::new();
    let mut current: Option<Caption> = None;
    let mut lines = input.lines().peekable();

    if let Some(first) = lines.peek() {
        if first.trim_start().starts_with(WEBVTT_HEADER) {
            lines.next();
        }
    }

    for line in lines {
        let line = line.trim_end();
        if let Ok((_, (start, end))) = webvtt_time_line(line.trim_start()) {
            flush_cue(&mut doc, current.take());
            current = Some(Caption {
                sequence_number: 0,
                start,
                end,
                text: String::new(),
            });
        } else if line.trim().is_empty() {
            flush_cue(&mut doc, current.take());
        } else if let Some(cue) = current.as_mut() {
            if !cue.text.is_empty() {
                cue.text.push('\n');
            }
            cue.text.push_str(line);
        }
        // Anything else sits outside a cue: identifiers, NOTE and STYLE blocks.
    }
    flush_cue(&mut doc, current);
    doc
}

fn flush_cue(doc: &mut Document, cue: Option<Caption>) {
    if let Some(cue) = cue {
        if cue.text.is_empty() || !cue.has_valid_interval() {
            debug!("Dropping malformed WebVTT cue at {}..{}", cue.start, cue.end);
        } else {
            doc.push(cue);
        }
    }
}

fn plain_document(input: &str, timing: PlainTiming) -> Document {
    let mut doc = Document::new();
    let step = timing.duration + timing.gap;
    let lines = input.lines().map(str::trim).filter(|l| !l.is_empty());
    for (index, line) in lines.enumerate() {
        let start = quantize(index as f64 * step);
        let caption = Caption {
            sequence_number: 0,
            start,
            end: quantize(start + timing.duration),
            text: line.to_string(),
        };
        if !caption.has_valid_interval() {
            debug!("Dropping plain line {} at {}..{}", index + 1, caption.start, caption.end);
            continue;
        }
        doc.push(caption);
    }
    doc
}

fn caption_text<'a, I: Iterator<Item = &'a str>>(lines: I) -> String {
    lines
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect::<Vec<&str>>()
        .join("\n")
}

fn time_range(input: &str, clock: Clock) -> IResult<&str, (f64, f64), VerboseError<&str>> {
    let (input, start) = timestamp::timestamp(input, clock)?;
    let (input, _) = space0(input)?;
    let (input, _) = tag("-->")(input)?;
    let (input, _) = space0(input)?;
    let (input, end) = timestamp::timestamp(input, clock)?;
    let (input, _) = space0(input)?;

    Ok((input, (start, end)))
}

/// A cue timing line; cue settings after the end time are ignored.
fn webvtt_time_line(input: &str) -> IResult<&str, (f64, f64), VerboseError<&str>> {
    time_range(input, Clock::WebVtt)
}

fn seq_num(input: &str) -> IResult<&str, usize, VerboseError<&str>> {
    map_res(digit1, |s: &str| s.parse())(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(doc: &Document) -> Vec<&str> {
        doc.captions().iter().map(|c| c.text.as_str()).collect()
    }

    fn numbers(doc: &Document) -> Vec<usize> {
        doc.captions().iter().map(|c| c.sequence_number).collect()
    }

    macro_rules! test_time_range {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, clock, expected) = $value;

                let (_, range) = time_range(input, clock).unwrap();

                assert_eq!(range, expected);
            }
        )*
        }
    }

    test_time_range! {
        test_time_range_0: ("00:00:01,200 --> 00:00:02,000", Clock::Srt, (1.2, 2.0)),
        test_time_range_1: ("00:00:01,200-->00:00:02,000", Clock::Srt, (1.2, 2.0)),
        test_time_range_2: ("01:00:00.000 --> 01:00:03.500", Clock::WebVtt, (3600.0, 3603.5)),
    }

    #[test]
    fn parses_srt_blocks() {
        let input = "1\n00:00:00,000 --> 00:00:02,500\nHello\n\n2\n00:00:03,000 --> 00:00:05,000\nTwo\nlines\n";
        let doc = parse(input, Format::Srt);

        assert_eq!(texts(&doc), vec!["Hello", "Two\nlines"]);
        assert_eq!(numbers(&doc), vec![1, 2]);
        assert_eq!(doc.captions()[0].start, 0.0);
        assert_eq!(doc.captions()[0].end, 2.5);
        assert_eq!(doc.captions()[1].start, 3.0);
        assert_eq!(doc.captions()[1].end, 5.0);
    }

    #[test]
    fn srt_accepts_bom_and_crlf() {
        let input = "\u{FEFF}1\r\n00:00:01,000 --> 00:00:02,000\r\nHi\r\n\r\n";
        let doc = parse(input, Format::Srt);
        assert_eq!(texts(&doc), vec!["Hi"]);
    }

    #[test]
    fn srt_drops_block_without_time_range() {
        let input = "1\nNo timing here\n\n2\n00:00:03,000 --> 00:00:04,000\nKept\n\n3\n00:00:05,000 --> 00:00:06,000\nAlso kept\n";
        let doc = parse(input, Format::Srt);

        assert_eq!(texts(&doc), vec!["Kept", "Also kept"]);
        assert_eq!(numbers(&doc), vec![1, 2]);
    }

    #[test]
    fn srt_drops_blocks_without_text_or_with_empty_interval() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:05,000 --> 00:00:05,000\nEmpty\n\n3\n00:00:06,000 --> 00:00:04,000\nInverted\n";
        assert!(parse(input, Format::Srt).is_empty());
    }

    #[test]
    fn srt_tolerates_trailing_garbage() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nHi\n\n\n\ngarbage\nmore garbage";
        assert_eq!(texts(&parse(input, Format::Srt)), vec!["Hi"]);
    }

    #[test]
    fn srt_rejects_dot_separated_timestamps() {
        let input = "1\n00:00:01.000 --> 00:00:02.000\nHi\n";
        assert!(parse(input, Format::Srt).is_empty());
    }

    #[test]
    fn parses_webvtt_cues() {
        let input = "WEBVTT\n\n1\n00:00:00.000 --> 00:00:01.500\nFirst\n\n7\n00:00:02.000 --> 00:00:04.000 align:start\nSecond\nline\n";
        let doc = parse(input, Format::WebVtt);

        assert_eq!(texts(&doc), vec!["First", "Second\nline"]);
        assert_eq!(numbers(&doc), vec![1, 2]);
        assert_eq!(doc.captions()[1].start, 2.0);
        assert_eq!(doc.captions()[1].end, 4.0);
    }

    #[test]
    fn webvtt_without_header_or_trailing_blank_line() {
        let input = "00:00:00.000 --> 00:00:01.000\nOne\n00:00:01.000 --> 00:00:02.000\nTwo";
        let doc = parse(input, Format::WebVtt);
        assert_eq!(texts(&doc), vec!["One", "Two"]);
    }

    #[test]
    fn webvtt_skips_notes_and_identifiers() {
        let input = "WEBVTT - Some title\n\nNOTE this is a comment\n\nintro\n00:00:00.000 --> 00:00:01.000\nHi\n";
        let doc = parse(input, Format::WebVtt);
        assert_eq!(texts(&doc), vec!["Hi"]);
    }

    #[test]
    fn plain_lines_get_synthetic_timing() {
        let doc = parse("a\n\nb\nc", Format::Plain);

        assert_eq!(texts(&doc), vec!["a", "b", "c"]);
        let starts: Vec<f64> = doc.captions().iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0.0, 3.1, 6.2]);
        for caption in doc.captions() {
            assert!((caption.duration() - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn plain_timing_is_configurable() {
        let parser = Parser::with_plain_timing(PlainTiming {
            duration: 2.0,
            gap: 0.5,
        })
        .unwrap();
        let doc = parser.parse("x\ny", Format::Plain);
        assert_eq!(doc.captions()[1].start, 2.5);
        assert_eq!(doc.captions()[1].end, 4.5);
    }

    #[test]
    fn plain_timing_must_produce_real_intervals() {
        let invalid = PlainTiming {
            duration: 0.0,
            gap: -1.0,
        };
        assert!(matches!(
            Parser::with_plain_timing(invalid),
            Err(ConfigError::TooSmall { name: "plain duration", .. })
        ));
    }

    #[test]
    fn srt_drops_blocks_beyond_the_clock_limit() {
        let input = "1\n277777777:46:40,001 --> 277777777:46:41,000\nToo late\n\n2\n00:00:01,000 --> 00:00:02,000\nOn time\n";
        assert_eq!(texts(&parse(input, Format::Srt)), vec!["On time"]);
    }

    #[test]
    fn empty_or_unrecognised_input_yields_empty_document() {
        for &format in &[Format::Srt, Format::WebVtt, Format::Plain] {
            assert!(parse("", format).is_empty());
            assert!(parse("\n\n  \n", format).is_empty());
        }
        assert!(parse("just some words", Format::Srt).is_empty());
        assert!(parse("WEBVTT\n\nwords without timing", Format::WebVtt).is_empty());
    }
}
