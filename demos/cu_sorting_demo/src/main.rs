//! Example application for the sorting arm.
//!
//! Runs the IK solver, the pixel mapper and the bin sequencer from the
//! command line. Sequences are printed as JSON; with `--port` they are also
//! sent to a Feetech servo arm.
//!
//! ```sh
//! cargo run -p cu-sorting-demo -- solve 100 50 0
//! cargo run -p cu-sorting-demo -- pixel 320 380
//! cargo run -p cu-sorting-demo -- sequence detections.json
//! cargo run -p cu-sorting-demo -- sequence detections.json --port /dev/ttyACM0 --calibration calibration.json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use cu_arm_ik::{CoordinateMapper, ImageFrame, KinematicsSolver, SolveOutcome, SolverConfig};
use cu_bin_sorter::{
    BinPresets, DEFAULT_REVIEW_THRESHOLD, Detection, MotionSequencer, RecordingDriver, ServoDriver,
    locate, review_status, run_sequence,
};
use cu_feetech::arm::DEFAULT_SERVO_IDS;
use cu_feetech::{CalibrationData, FeetechArm};
use log::{LevelFilter, debug, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cu-sorting-demo", about = "Recycling sorting arm demo")]
struct Cli {
    /// Solver configuration (JSON). Defaults to the stock 105/105/100 mm arm.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve joint angles for a workspace point in mm.
    Solve {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
    },
    /// Map an image pixel to the workspace and solve for it.
    Pixel {
        #[arg(allow_negative_numbers = true)]
        px: f64,
        #[arg(allow_negative_numbers = true)]
        py: f64,
        #[arg(long, default_value_t = 640)]
        width: u32,
        #[arg(long, default_value_t = 480)]
        height: u32,
    },
    /// Build the servo queue for a detector output file and run it.
    Sequence {
        detections: PathBuf,
        /// Bin presets (JSON).
        #[arg(long)]
        presets: Option<PathBuf>,
        /// Serial device of a Feetech arm. Dry run when absent.
        #[arg(long, requires = "calibration")]
        port: Option<String>,
        #[arg(long)]
        calibration: Option<PathBuf>,
        #[arg(long, default_value_t = 1_000_000)]
        baud: u32,
        /// Wait after each step, in milliseconds.
        #[arg(long, default_value_t = 1500)]
        settle_ms: u64,
    },
    /// Solve for the center of every detection's bounding box.
    Locate { detections: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    TermLogger::init(cli.log_level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;

    let solver_config = match &cli.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    let solver = KinematicsSolver::new(solver_config);

    match cli.command {
        Command::Solve { x, y, z } => report(&solver.solve(x, y, z)),
        Command::Pixel {
            px,
            py,
            width,
            height,
        } => {
            let point = CoordinateMapper::default().pixel_to_workspace(px, py, ImageFrame { width, height });
            println!("workspace: ({:.1}, {:.1}, {:.1}) mm", point.x, point.y, point.z);
            report(&solver.solve_point(point));
        }
        Command::Sequence {
            detections,
            presets,
            port,
            calibration,
            baud,
            settle_ms,
        } => {
            let detections = load_detections(&detections)?;
            let presets = match presets {
                Some(path) => BinPresets::load(&path)?,
                None => BinPresets::default(),
            };
            for d in &detections {
                debug!("{} ({:.2}): {:?}", d.label, d.score, review_status(d, DEFAULT_REVIEW_THRESHOLD));
            }
            let steps = MotionSequencer::new(presets).build_sequence(&detections);
            println!("{}", serde_json::to_string_pretty(&steps)?);

            let mut driver: Box<dyn ServoDriver> = match (port, calibration) {
                (Some(port), Some(calibration)) => {
                    let calibration = CalibrationData::load(&calibration)
                        .with_context(|| format!("Failed to load {}", calibration.display()))?;
                    calibration
                        .check_joints(&DEFAULT_SERVO_IDS)
                        .context("Calibration does not cover the arm; rerun feetech-calibrate")?;
                    let serial = serialport::new(&port, baud)
                        .timeout(Duration::from_millis(10))
                        .open()
                        .with_context(|| format!("Failed to open serial port {port}"))?;
                    info!("Driving the arm on {port}");
                    Box::new(FeetechArm::new(serial, calibration).with_settle(Duration::from_millis(settle_ms)))
                }
                _ => {
                    info!("No --port given, dry run");
                    Box::new(RecordingDriver::default())
                }
            };
            run_sequence(driver.as_mut(), &steps).inspect_err(|_| print_setup_help())?;
        }
        Command::Locate { detections } => {
            let mapper = CoordinateMapper::default();
            for d in load_detections(&detections)? {
                print!("{}: ", d.label);
                report(&locate(&d, ImageFrame::default(), &mapper, &solver));
            }
        }
    }
    Ok(())
}

fn load_detections(path: &Path) -> anyhow::Result<Vec<Detection>> {
    let contents = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Bad detections JSON in {}", path.display()))
}

fn report(outcome: &SolveOutcome) {
    match outcome {
        SolveOutcome::Solved(angles) => println!("angles: {angles}"),
        SolveOutcome::Unreachable {
            distance_mm,
            reach_mm,
        } => println!("unreachable: wrist {distance_mm:.1} mm away, reach {reach_mm:.1} mm"),
        SolveOutcome::SafeFallback { angles, reason } => println!("safe home {angles} ({reason})"),
    }
}

fn print_setup_help() {
    eprintln!("Check: USB adapter plugged in? Device path correct? Calibration IDs match the bus?");
    eprintln!("       Permission? Try: sudo usermod -aG dialout $USER");
}
