//! # RC Link Transmitter
//!
//! The input endpoint: reads gamepad stick and button state and streams
//! control frames to the receiver over UDP.
//!
//! The gamepad read is blocking, so the event/encode/send loop runs on
//! a blocking task while the async main waits for Ctrl+C. There is no
//! explicit send rate: the cadence follows the gamepad's event rate,
//! and a failed send just drops that frame (the next input batch
//! supersedes it).

use anyhow::Result;
use tracing::{debug, info, warn};

use rc_link::config::{Config, DEFAULT_CONFIG_PATH};
use rc_link::gamepad::device::Gamepad;
use rc_link::gamepad::state::StateTracker;
use rc_link::link::FrameSender;
use rc_link::proto::encoder::encode_frame;

/// Number of frames between status log messages
const LOG_INTERVAL_FRAMES: u64 = 500;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("RC Link transmitter v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::load_or_default(DEFAULT_CONFIG_PATH)?;

    // GamepadNotFound is fatal: never enter the loop without a gamepad
    let gamepad = if config.gamepad.device_path.is_empty() {
        Gamepad::open()?
    } else {
        Gamepad::open_path(&config.gamepad.device_path)?
    };
    info!(
        "Using gamepad {} at {}",
        gamepad.name().unwrap_or("unknown"),
        gamepad.device_path()
    );

    let sender = FrameSender::connect(&config.link.address, config.link.port)?;
    info!("Streaming control frames to {}", sender.target());
    info!("Press Ctrl+C to exit");

    let pilot = tokio::task::spawn_blocking(move || pilot_loop(gamepad, sender));

    tokio::select! {
        result = pilot => {
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    Ok(())
}

/// The blocking event/encode/send loop.
///
/// Each iteration drains one batch of gamepad events into the state
/// tracker (unchanged axes retain their previous value), encodes the
/// resulting state and sends it. Runs until the process is interrupted
/// or the gamepad disappears.
fn pilot_loop(mut gamepad: Gamepad, sender: FrameSender) -> rc_link::error::Result<()> {
    let mut tracker = StateTracker::new();
    let mut frame_count: u64 = 0;

    loop {
        // Blocks until the gamepad reports at least one event
        for event in gamepad.fetch_events()? {
            tracker.process_event(&event);
        }

        let state = tracker.state();
        debug!(
            "State x={} y={} rx={} ry={} boost={}",
            state.left_stick_x,
            state.left_stick_y,
            state.right_stick_x,
            state.right_stick_y,
            state.boost
        );

        let frame = encode_frame(state);
        if let Err(e) = sender.send_frame(&frame) {
            // Datagram loss is acceptable; the next batch supersedes this frame
            warn!("Dropped control frame: {}", e);
            continue;
        }

        frame_count += 1;
        if frame_count % LOG_INTERVAL_FRAMES == 0 {
            info!("Sent {} control frames", frame_count);
        }
    }
}
