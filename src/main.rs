use subvert::config::{check, MIN_DURATION};
use subvert::{preview, serialise, Editor, Format, Parser, PlainTiming};

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn, LevelFilter};

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Convert and edit SRT, WebVTT and plain text subtitles")]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to read from. If not supplied, the subtitles will be read from standard input.",
        default_value = "-"
    )]
    input: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write to. If not supplied, the subtitles will be written to standard output.",
        default_value = "-"
    )]
    output: String,
    #[arg(
        long,
        value_name = "FORMAT",
        help = "Format of the input (srt, vtt, txt). Inferred from the input file name if not supplied."
    )]
    from: Option<Format>,
    #[arg(
        long,
        value_name = "FORMAT",
        help = "Format of the output (srt, vtt, txt). Inferred from the output file name if not supplied."
    )]
    to: Option<Format>,
    #[arg(
        long,
        help = "Write the live preview encoding instead of a regular subtitle file.",
        conflicts_with = "to"
    )]
    preview: bool,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Write a backup of the original input to the specified file."
    )]
    backup: Option<String>,
    #[arg(
        long,
        value_name = "N",
        help = "Remove the subtitle with the given sequence number. May be repeated."
    )]
    remove: Vec<usize>,
    #[arg(
        long,
        value_name = "TEXT",
        help = "Append a subtitle with the given text after the last one. May be repeated."
    )]
    append: Vec<String>,
    #[arg(
        long,
        value_name = "SECONDS",
        env = "SUBVERT_PLAIN_DURATION",
        default_value_t = PlainTiming::default().duration,
        value_parser = parse_duration,
        help = "How long each line of a plain text input is shown."
    )]
    plain_duration: f64,
    #[arg(
        long,
        value_name = "SECONDS",
        env = "SUBVERT_PLAIN_GAP",
        default_value_t = PlainTiming::default().gap,
        value_parser = parse_gap,
        help = "Pause between consecutive lines of a plain text input."
    )]
    plain_gap: f64,
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Log more details. May be repeated."
    )]
    verbose: u8,
}

fn parse_seconds(s: &str, name: &'static str, min: f64) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    check(name, value, min).map_err(|err| err.to_string())?;
    Ok(value)
}

fn parse_duration(s: &str) -> Result<f64, String> {
    parse_seconds(s, "plain duration", MIN_DURATION)
}

fn parse_gap(s: &str) -> Result<f64, String> {
    parse_seconds(s, "plain gap", 0.0)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data = if cli.input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&cli.input)
            .context(format!("Failed to open input file: '{}'", cli.input))?
    };

    if let Some(backup_path) = &cli.backup {
        std::fs::write(backup_path, &data)
            .context(format!("Failed to write backup file: '{}'", backup_path))?;
    }

    let from = cli
        .from
        .or_else(|| Format::from_path(&cli.input))
        .unwrap_or(Format::Srt);
    let to = cli
        .to
        .or_else(|| Format::from_path(&cli.output))
        .unwrap_or(from);

    let parser = Parser::with_plain_timing(PlainTiming {
        duration: cli.plain_duration,
        gap: cli.plain_gap,
    })
    .context("Invalid plain text timing")?;
    let mut doc = parser.parse(&data, from);
    info!("Read {} subtitles as {}", doc.len(), from);
    if doc.is_empty() {
        warn!("You appear to have supplied an empty file.");
    }

    let editor = Editor::new();
    let mut removals = cli.remove.clone();
    // Highest first, so earlier removals don't shift later positions.
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for number in removals {
        let removed = number
            .checked_sub(1)
            .and_then(|position| editor.remove(&mut doc, position));
        if removed.is_none() {
            warn!("There is no subtitle number {} to remove.", number);
        }
    }
    for text in &cli.append {
        editor.append(&mut doc, text.as_str());
    }

    let output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            std::fs::File::create(&cli.output)
                .context(format!("Failed to create output file: '{}'", cli.output))?,
        )
    };

    if cli.preview {
        let mut output = output;
        output
            .write_all(preview(&doc).as_bytes())
            .context("Failed to write preview.")?;
        output.flush().context("Failed to write preview.")?;
    } else {
        info!("Writing {} subtitles as {}", doc.len(), to);
        serialise(&doc, to, output)?;
    }

    Ok(())
}
