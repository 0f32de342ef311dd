//! # Gamepad Device Module
//!
//! This module handles gamepad detection, connection and input reading
//! using the Linux evdev interface.
//!
//! ## Device Detection
//!
//! Unlike a vendor-locked setup, any controller advertising the
//! standard gamepad key (`BTN_SOUTH`, aliased `BTN_GAMEPAD` in the
//! kernel) is accepted, so DualShock, DualSense and Xbox-style pads all
//! work as long as they expose the usual stick axes.

use evdev::{Device, Key};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{RcLinkError, Result};

/// Gamepad handle
///
/// Represents an active connection to a gamepad via evdev.
/// Provides methods for reading controller input events.
pub struct Gamepad {
    device: Device,
    device_path: String,
}

impl std::fmt::Debug for Gamepad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gamepad")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl Gamepad {
    /// Detect and open the first available gamepad.
    ///
    /// Scans all `/dev/input/event*` devices and picks the first one
    /// that reports gamepad button capabilities.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Gamepad)` if a gamepad is found and opened successfully.
    ///
    /// # Errors
    ///
    /// - `GamepadNotFound`: No gamepad present on the system
    /// - `Gamepad`: Permission denied or other I/O errors while scanning
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rc_link::gamepad::device::Gamepad;
    ///
    /// let gamepad = Gamepad::open()?;
    /// println!("Connected to gamepad at: {}", gamepad.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open() -> Result<Self> {
        let input_dir = Path::new("/dev/input");

        if !input_dir.exists() {
            return Err(RcLinkError::Gamepad(
                "/dev/input directory not found".to_string(),
            ));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| RcLinkError::Gamepad(format!("Failed to read /dev/input: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RcLinkError::Gamepad(format!("Failed to read directory entry: {}", e)))?;

        // Sort entries for deterministic device selection when multiple pads are connected
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();

            // Only check event* devices
            if let Some(filename) = path.file_name() {
                if !filename.to_string_lossy().starts_with("event") {
                    continue;
                }
            } else {
                continue;
            }

            match Device::open(&path) {
                Ok(device) => {
                    if Self::is_gamepad(&device) {
                        let device_path = path.to_string_lossy().to_string();
                        info!(
                            "Found gamepad at: {} ({})",
                            device_path,
                            device.name().unwrap_or("unknown")
                        );

                        return Ok(Gamepad {
                            device,
                            device_path,
                        });
                    }

                    debug!("Skipping non-gamepad input device: {}", path.display());
                }
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                }
            }
        }

        Err(RcLinkError::GamepadNotFound)
    }

    /// Open a gamepad by explicit device path, bypassing detection.
    ///
    /// # Arguments
    ///
    /// * `path` - Device path (e.g., `/dev/input/event4`)
    ///
    /// # Errors
    ///
    /// Returns `Gamepad` error if the device cannot be opened or does
    /// not report gamepad capabilities.
    pub fn open_path(path: &str) -> Result<Self> {
        let device = Device::open(path)
            .map_err(|e| RcLinkError::Gamepad(format!("Failed to open {}: {}", path, e)))?;

        if !Self::is_gamepad(&device) {
            return Err(RcLinkError::Gamepad(format!(
                "{} does not report gamepad capabilities",
                path
            )));
        }

        Ok(Gamepad {
            device,
            device_path: path.to_string(),
        })
    }

    /// Checks whether an evdev device looks like a gamepad.
    fn is_gamepad(device: &Device) -> bool {
        device
            .supported_keys()
            .map_or(false, |keys| keys.contains(Key::BTN_SOUTH))
    }

    /// Get the device path of this gamepad.
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Fetch events from the gamepad.
    ///
    /// Blocks until at least one input event is available, then returns
    /// an iterator over the batch.
    ///
    /// # Errors
    ///
    /// Returns `Gamepad` error if fetching events fails (e.g., the pad
    /// disconnected).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use rc_link::gamepad::device::Gamepad;
    /// # let mut gamepad = Gamepad::open()?;
    /// loop {
    ///     for event in gamepad.fetch_events()? {
    ///         println!("Event: {:?}", event);
    ///     }
    /// }
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn fetch_events(&mut self) -> Result<impl Iterator<Item = evdev::InputEvent> + '_> {
        self.device
            .fetch_events()
            .map_err(|e| RcLinkError::Gamepad(format!("Failed to fetch events: {}", e)))
    }

    /// Get the gamepad name from evdev.
    pub fn name(&self) -> Option<&str> {
        self.device.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_path_with_invalid_path_returns_error() {
        let result = Gamepad::open_path("/dev/input/nonexistent_event_99");
        assert!(result.is_err());

        match result.unwrap_err() {
            RcLinkError::Gamepad(msg) => {
                assert!(msg.contains("/dev/input/nonexistent_event_99"));
            }
            other => panic!("Expected Gamepad error, got: {:?}", other),
        }
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore] // Run with: cargo test -- --ignored
    fn test_open_with_real_hardware() {
        // This test requires a connected gamepad
        let result = Gamepad::open();
        assert!(result.is_ok(), "Should detect connected gamepad");

        let gamepad = result.unwrap();
        assert!(gamepad.device_path().starts_with("/dev/input/event"));
        assert!(gamepad.name().is_some());
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_fetch_events_with_real_hardware() {
        let mut gamepad = Gamepad::open().expect("Gamepad not found");

        println!("Move the sticks or press buttons within 5 seconds...");

        for _ in 0..100 {
            match gamepad.fetch_events() {
                Ok(events) => {
                    for event in events {
                        println!("Received event: {:?}", event);
                        return; // Test passed if we got at least one event
                    }
                }
                Err(_) => continue,
            }

            std::thread::sleep(std::time::Duration::from_millis(50));
        }

        panic!("No events received from gamepad");
    }
}
