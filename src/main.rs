use clap::Parser;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use utamml::{FrameCompiler, MidiCompiler};

#[derive(Parser, Debug)]
#[command(name = "utamml")]
#[command(version = "0.1.0")]
#[command(about = "Compile song notation to a singing-synthesis or MIDI-style score", long_about = None)]
struct Args {
    /// Input notation file (reads from stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compile the melody dialect to a MIDI-style event list instead of the
    /// lyric dialect's frame score
    #[arg(long)]
    midi: bool,

    /// Ticks per quarter note for --midi output
    #[arg(long, default_value_t = utamml::duration::DEFAULT_PPQ)]
    ppq: u32,

    /// Semitone shift applied to every resolved key (lyric dialect)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    key_shift: i32,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let json_string = if args.midi {
        let score = MidiCompiler::new(args.ppq).compile(&text)?;
        to_json(&score, args.compact)?
    } else {
        let mut compiler = FrameCompiler::new();
        compiler.key_shift = args.key_shift;
        let score = compiler.compile(&text)?;
        to_json(&score, args.compact)?
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(score: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(score)
    } else {
        serde_json::to_string_pretty(score)
    }
}
