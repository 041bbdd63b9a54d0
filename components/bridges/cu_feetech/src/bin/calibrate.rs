//! Records the travel of each arm joint into `calibration.json`.
//!
//! ```sh
//! cargo run --bin feetech-calibrate -- /dev/ttyACM0
//! cargo run --bin feetech-calibrate -- /dev/ttyACM0 --ids 11 12 13 14 15 16 --output calibration_arm.json
//! ```
//!
//! Sweep every joint from stop to stop by hand, then press Enter. The file is
//! only written when all six joints answered and moved.

use anyhow::Context;
use clap::Parser;
use cu_arm_ik::angles::NUM_JOINTS;
use cu_feetech::RangeTracker;
use cu_feetech::arm::DEFAULT_SERVO_IDS;
use cu_feetech::messages::read_position;
use log::{LevelFilter, debug, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

/// Refresh period of the live range line.
const REFRESH: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "feetech-calibrate", about = "Record the joint ranges of a Feetech sorting arm")]
struct Args {
    /// Serial device of the bus adapter.
    device: String,
    /// Bus IDs of the joints, base first.
    #[arg(long, num_args = NUM_JOINTS, default_values_t = DEFAULT_SERVO_IDS)]
    ids: Vec<u8>,
    #[arg(long, default_value = "calibration.json")]
    output: PathBuf,
    #[arg(long, default_value_t = 1_000_000)]
    baud: u32,
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    TermLogger::init(args.log_level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;

    let ids: [u8; NUM_JOINTS] = args
        .ids
        .as_slice()
        .try_into()
        .with_context(|| format!("Expected {NUM_JOINTS} servo IDs, got {:?}", args.ids))?;

    let mut port = serialport::new(&args.device, args.baud)
        .timeout(Duration::from_millis(10))
        .open()
        .with_context(|| format!("Failed to open serial port {}", args.device))?;

    info!("Calibrating joints {ids:?} on {}", args.device);
    println!("Sweep every joint through its full travel, then press Enter.");

    let (enter_tx, enter_rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = io::stdin().lock().read_line(&mut String::new());
        let _ = enter_tx.send(());
    });

    let mut tracker = RangeTracker::new(ids);
    let mut last_refresh = Instant::now();
    loop {
        match enter_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }
        for (joint, &id) in ids.iter().enumerate() {
            match read_position(&mut port, id) {
                Ok(pos) => tracker.record(joint, pos),
                Err(e) => debug!("servo {id}: {e}"),
            }
        }
        if last_refresh.elapsed() >= REFRESH {
            print!("\r{tracker}");
            io::stdout().flush()?;
            last_refresh = Instant::now();
        }
    }
    println!();

    let data = tracker
        .finish()
        .context("Calibration not saved; check IDs and wiring, and move every joint")?;
    data.save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    info!("Saved {}", args.output.display());
    for s in &data.servos {
        info!(
            "servo {:>2}: {:>4}..{:>4} center {:.1} ({} ticks)",
            s.id,
            s.min,
            s.max,
            s.center(),
            s.range()
        );
    }
    Ok(())
}
