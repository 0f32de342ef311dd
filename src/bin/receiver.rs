//! # RC Link Receiver
//!
//! The actuator endpoint: receives control frames over UDP, maps them
//! to servo and motor duty cycles and drives the GPIO PWM outputs.
//!
//! Each receive attempt has a fixed timeout; an expired window with no
//! frame is the failsafe trigger and forces both outputs to zero duty
//! (no pulses). The next decoded frame resumes mapped output
//! immediately.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info, warn};

use rc_link::config::{Config, DEFAULT_CONFIG_PATH};
use rc_link::control::mapper::CommandMapper;
use rc_link::control::pipeline::ControlPipeline;
use rc_link::link::FrameReceiver;
use rc_link::pwm::GpioPwm;

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

    info!("RC Link receiver v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::load_or_default(DEFAULT_CONFIG_PATH)?;

    // Bind failure is fatal: never enter the loop without a socket
    let receiver = FrameReceiver::bind(
        &config.link.address,
        config.link.port,
        Duration::from_millis(config.link.receive_timeout_ms),
    )
    .await?;
    info!(
        "UDP socket ready on {} (receive timeout {:?})",
        receiver.local_addr()?,
        receiver.recv_timeout()
    );

    let pwm = GpioPwm::new(config.servo.gpio_pin, config.motor.gpio_pin)?;
    let mapper = CommandMapper::from_config(&config.servo, &config.motor);
    let mut pipeline = ControlPipeline::new(mapper, pwm);
    pipeline.configure_outputs(&config.servo, &config.motor)?;

    info!("Press Ctrl+C to exit");

    let mut frame_count: u64 = 0;

    // Main control loop
    loop {
        tokio::select! {
            // Handle Ctrl+C for operator shutdown; the actuator hardware
            // holds its last commanded duty, no further cleanup needed
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }

            outcome = receiver.recv_frame() => match outcome? {
                Some((datagram, sender)) => {
                    match pipeline.handle_frame(&datagram, Instant::now()) {
                        Ok(command) => {
                            frame_count += 1;
                            debug!(
                                "Frame from {}: servo {} motor {}",
                                sender, command.servo_duty, command.motor_duty
                            );

                            if frame_count % LOG_INTERVAL_FRAMES == 0 {
                                info!("Received {} control frames", frame_count);
                            }
                        }
                        Err(e) => {
                            // Recovered locally: skip the frame, await the next
                            warn!("Dropping datagram from {}: {}", sender, e);
                        }
                    }
                }
                None => {
                    // Receive window expired with no frame
                    pipeline.handle_timeout(Instant::now())?;
                }
            }
        }
    }

    info!("Total control frames received: {}", frame_count);
    Ok(())
}
