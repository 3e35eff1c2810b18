use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, Timelike};
use clap::{Parser, Subcommand};
use ledbadge::{BANK_COUNT, Document, Mode, Speed};

mod config;
mod hid;

use config::{BadgeConfig, Bitmap};

/// Build and upload payloads for 11-pixel-tall scrolling LED badges.
#[derive(Parser)]
#[command(name = "badge-toolkit", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the payload from a JSON description and write it to the badge.
    Send {
        /// JSON badge description.
        config: PathBuf,
        /// hidraw node of the badge (VID 0x0416, PID 0x5020).
        #[arg(long, default_value = "/dev/hidraw0")]
        device: PathBuf,
        /// Leave the header timestamp zeroed instead of stamping now.
        #[arg(long)]
        no_timestamp: bool,
    },
    /// Build the payload and hex-dump it to stdout.
    Dump {
        /// JSON badge description.
        config: PathBuf,
        /// Leave the header timestamp zeroed instead of stamping now.
        #[arg(long)]
        no_timestamp: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Send {
            config,
            device,
            no_timestamp,
        } => {
            let buffer = build(&config, !no_timestamp)?;
            let written = hid::send(&device, &buffer)
                .with_context(|| format!("writing to {}", device.display()))?;
            eprintln!(
                "wrote {written} bytes to {} (badge {})",
                device.display(),
                hid::device_id()
            );
            Ok(())
        }
        Command::Dump {
            config,
            no_timestamp,
        } => {
            let buffer = build(&config, !no_timestamp)?;
            dump(&buffer);
            Ok(())
        }
    }
}

fn build(path: &Path, stamp: bool) -> Result<Vec<u8>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let badge: BadgeConfig = serde_json::from_str(&text).context("parsing badge description")?;

    let mut document = Document::with_log_handler(|line| eprintln!("{line}"));
    document.set_brightness(badge.brightness);

    for entry in &badge.banks {
        entry.validate()?;
        let bitmap = Bitmap::parse(&entry.pattern)
            .with_context(|| format!("parsing pattern for bank {}", entry.bank))?;

        let mut bank = document.bank_mut(entry.bank);
        bank.set_blinking(entry.blinking);
        bank.set_animated_border(entry.animated_border);
        bank.set_mode(entry.mode);
        bank.set_speed(entry.speed);
        bank.set_pixels(bitmap.width(), |x, y| bitmap.lit(x, y))?;
    }

    if stamp {
        let now = Local::now();
        document.set_year((now.year() % 100) as u8);
        document.set_month(now.month() as u8);
        document.set_day(now.day() as u8);
        document.set_hour(now.hour() as u8);
        document.set_minute(now.minute() as u8);
        document.set_second(now.second() as u8);
    }

    Ok(document.assemble()?)
}

fn dump(buffer: &[u8]) {
    for (index, chunk) in buffer.chunks(16).enumerate() {
        print!("{:04x}:", index * 16);
        for byte in chunk {
            print!(" {byte:02x}");
        }
        println!();
    }

    println!();
    for line in summarize_banks(buffer) {
        println!("{line}");
    }
}

/// One line per non-empty bank, read back out of the header bytes.
fn summarize_banks(buffer: &[u8]) -> Vec<String> {
    let mut lines = Vec::new();
    for bank in 0..BANK_COUNT {
        let units = u16::from_be_bytes([buffer[16 + 2 * bank], buffer[17 + 2 * bank]]);
        if units == 0 {
            continue;
        }

        let code = buffer[8 + bank];
        let line = match (Mode::try_from(code & 0x0f), Speed::try_from(code & 0xf0)) {
            (Ok(mode), Ok(speed)) => {
                format!("bank {bank}: {units} units, {mode:?} at {speed:?}")
            }
            _ => format!("bank {bank}: {units} units, unrecognized mode/speed byte {code:#04x}"),
        };
        lines.push(line);
    }
    lines
}
