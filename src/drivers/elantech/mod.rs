//! Reference: https://github.com/torvalds/linux/blob/master/drivers/input/mouse/elantech.c
pub mod command;
pub mod device;
pub mod driver;
pub mod event;
pub mod gesture;
pub mod packet;
pub mod profile;
pub mod version;

#[cfg(test)]
pub mod device_test;
#[cfg(test)]
pub mod gesture_test;
#[cfg(test)]
pub mod version_test;

// Synaptics style query commands
pub const FW_ID_QUERY: u8 = 0x00;
pub const FW_VERSION_QUERY: u8 = 0x01;
pub const CAPABILITIES_QUERY: u8 = 0x02;
pub const SAMPLE_QUERY: u8 = 0x03;
pub const RESOLUTION_QUERY: u8 = 0x04;

// Register access sub-commands
pub const REGISTER_READ: u8 = 0x10;
pub const REGISTER_WRITE: u8 = 0x11;
pub const REGISTER_READWRITE: u8 = 0x00;

/// Custom PS/2 command prefix used by hardware version 2 and later
pub const CUSTOM_COMMAND: u8 = 0xf8;

// Attempts and delay for command round trips issued during start-up
pub const COMMAND_TRIES: u32 = 3;
pub const COMMAND_DELAY_MS: u64 = 500;

// Attempts and delay for reading back register 0x10
pub const READ_BACK_TRIES: u32 = 5;
pub const READ_BACK_DELAY_US: u64 = 2000;

/// Register 0x10 bit that must be set for version 1 hardware to be in
/// absolute mode
pub const R10_ABSOLUTE_MODE: u8 = 0x04;

/// Capability bit for touchpads with a rocker switch
pub const CAP_HAS_ROCKER: u8 = 0x04;

// Version 1 axis ranges. Edge fuzz covers the bezel around the touchpad.
pub const EDGE_FUZZ_V1: u32 = 32;
pub const XMIN_V1: u32 = EDGE_FUZZ_V1;
pub const XMAX_V1: u32 = 576 - EDGE_FUZZ_V1;
pub const YMIN_V1: u32 = EDGE_FUZZ_V1;
pub const YMAX_V1: u32 = 384 - EDGE_FUZZ_V1;

// Axis ranges for older version 2 hardware
pub const XMIN_V2: u32 = 0;
pub const XMAX_V2: u32 = 1152;
pub const YMIN_V2: u32 = 0;
pub const YMAX_V2: u32 = 768;

/// Number of finger slots tracked on version 3 hardware
pub const MAX_FINGERS: usize = 2;

/// Maximum distance in either axis a finger may travel and still count as a tap
pub const TAP_TO_CLICK_DISTANCE: u32 = 32;

/// Expected reply to the magic knock
pub const MAGIC_KNOCK: [u8; 2] = [0x3c, 0x03];
/// Accepted values of the last magic knock byte
pub const MAGIC_KNOCK_LAST: [u8; 2] = [0xc8, 0x00];

/// Sample rates that a regular PS/2 mouse reports in the third status byte
pub const SAMPLE_RATES: [u8; 7] = [200, 100, 80, 60, 40, 20, 10];
