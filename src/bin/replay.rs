use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use linecount::report::CrossingReport;
use linecount::timecode::PlaybackClock;
use linecount::{CrossingEngine, EngineConfig, Frame, Line};

/// Replays recorded tracker output against a set of counting lines.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON array of lines: [{"id": "...", "geometry": [[x, y], ...]}]
    #[arg(short, long)]
    lines: PathBuf,

    /// JSON lines file, one {"timestamp": "...", "detections": [...]} per frame
    #[arg(short, long)]
    frames: PathBuf,

    /// Positions kept per track
    #[arg(long, default_value_t = 20)]
    history: usize,

    /// Frame rate used to label frames that carry no timestamp
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Source name written into every report row
    #[arg(long)]
    source: Option<String>,

    /// Write the crossings as JSON lines to this file
    #[arg(short, long)]
    report: Option<PathBuf>,
}

fn open_frames(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Number of non-blank lines, used to size the playback clock before streaming.
fn count_frames(path: &Path) -> Result<u64> {
    let mut count = 0;
    for line in open_frames(path)?.lines() {
        if !line?.trim().is_empty() {
            count += 1;
        }
    }

    Ok(count)
}

/// Parses frames lazily, one JSON object per non-blank line.
fn stream_frames(path: &Path) -> Result<impl Iterator<Item = Result<Frame>> + '_> {
    let frames = open_frames(path)?
        .lines()
        .enumerate()
        .filter_map(move |(n, line)| {
            let line = match line {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            if line.trim().is_empty() {
                return None;
            }

            Some(
                serde_json::from_str::<Frame>(&line)
                    .with_context(|| format!("{}:{}: bad frame", path.display(), n + 1)),
            )
        });

    Ok(frames)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let lines: Vec<Line> = serde_json::from_reader(BufReader::new(
        File::open(&args.lines).with_context(|| format!("opening {}", args.lines.display()))?,
    ))
    .context("parsing lines")?;

    let mut clock = PlaybackClock::new(count_frames(&args.frames)?, args.fps);
    let mut engine = CrossingEngine::new(EngineConfig::new(args.history))?;
    let mut report = CrossingReport::new(args.source.clone());

    for frame in stream_frames(&args.frames)? {
        let mut frame = frame?;
        if frame.timestamp.is_empty() {
            frame.timestamp = clock.timestamp();
        }

        engine
            .process_frame(&frame, &lines, &mut |event: linecount::CrossingEvent| {
                println!(
                    "{} line={} track={} class={} direction={}",
                    event.crossing_time,
                    event.line_id,
                    event.track_id,
                    event.vehicle_class,
                    event.direction
                );
                report.record(event);
            })
            .with_context(|| format!("frame {}", frame.timestamp))?;

        clock.advance();
    }

    for (line, classes) in report.tally() {
        for (class, counts) in classes {
            println!(
                "{} {}: forward={} backward={} indeterminate={}",
                line, class, counts.forward, counts.backward, counts.indeterminate
            );
        }
    }
    println!("total crossings: {}", report.total());

    if let Some(path) = &args.report {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        report.write_json_lines(BufWriter::new(file))?;
    }

    Ok(())
}
