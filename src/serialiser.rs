use crate::caption::{Caption, Document};
use crate::format::Format;
use crate::timestamp::{encode, Clock};

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

const WEBVTT_HEADER: &str = "WEBVTT";

/// Writes the document in the given format to `dst`.
pub fn serialise<W: Write>(doc: &Document, format: Format, dst: W) -> Result<()> {
    let mut writer = BufWriter::new(dst);
    writer
        .write_all(to_string(doc, format).as_bytes())
        .context("Failed to write subtitles.")?;
    writer.flush().context("Failed to write subtitles.")?;
    Ok(())
}

pub fn to_string(doc: &Document, format: Format) -> String {
    let mut out = String::new();
    match format {
        Format::Srt => write_cues(&mut out, doc, Clock::Srt, true),
        Format::WebVtt => {
            write_header(&mut out);
            write_cues(&mut out, doc, Clock::WebVtt, true);
        }
        Format::Plain => write_plain(&mut out, doc),
    }
    out
}

/// The encoding handed to the video overlay: WebVTT cues with timing and
/// text only. It is regenerated from the document on every apply and never
/// read back.
pub fn preview(doc: &Document) -> String {
    let mut out = String::new();
    write_header(&mut out);
    write_cues(&mut out, doc, Clock::WebVtt, false);
    out
}

fn write_header(out: &mut String) {
    out.push_str(WEBVTT_HEADER);
    out.push_str("\n\n");
}

fn write_cues(out: &mut String, doc: &Document, clock: Clock, numbered: bool) {
    for caption in doc.captions() {
        write_cue(out, caption, clock, numbered);
    }
}

fn write_cue(out: &mut String, caption: &Caption, clock: Clock, numbered: bool) {
    if numbered {
        out.push_str(&caption.sequence_number.to_string());
        out.push('\n');
    }
    out.push_str(&encode(caption.start, clock));
    out.push_str(" --> ");
    out.push_str(&encode(caption.end, clock));
    out.push('\n');
    // Blank lines inside the text would end the block early.
    for line in caption.text.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
}

fn write_plain(out: &mut String, doc: &Document) {
    let texts: Vec<&str> = doc.captions().iter().map(|c| c.text.as_str()).collect();
    if texts.is_empty() {
        return;
    }
    out.push_str(&texts.join("\n\n"));
    out.push('\n');
}
