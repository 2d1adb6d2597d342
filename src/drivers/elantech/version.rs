use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::ps2::transport::Transport;

use super::{
    command::{send_query, CommandError},
    profile::{Bounds, DeviceProfile, ParityTable, Resolution},
    FW_ID_QUERY, MAGIC_KNOCK, MAGIC_KNOCK_LAST, RESOLUTION_QUERY, SAMPLE_QUERY, SAMPLE_RATES,
    XMAX_V1, XMAX_V2, XMIN_V1, XMIN_V2, YMAX_V1, YMAX_V2, YMIN_V1, YMIN_V2,
};

/// Reasons a device is not accepted as a supported Elantech touchpad
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("unexpected magic knock: {0:02x?}")]
    BadMagicKnock([u8; 3]),
    #[error("invalid firmware signature: {0:02x?}")]
    InvalidSignature([u8; 3]),
    #[error("unknown hardware version in firmware {0:#08x}")]
    UnknownHardware(u32),
    #[error("command failed: {0}")]
    Command(#[from] CommandError),
}

/// Possible errors determining the coordinate range
#[derive(Debug, Error)]
pub enum RangeError {
    #[error("range query failed: {0}")]
    Query(#[from] CommandError),
    #[error("invalid trace count {traces} for x_max {x_max}")]
    InvalidTraces { traces: u8, x_max: u32 },
}

/// How multi-byte commands are framed on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Four scaling/resolution pairs carrying two bits each
    Sliced,
    /// Vendor 0xF8 prefix followed by the raw byte
    Custom,
}

/// Elantech protocol dialect
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Generation {
    V1,
    V2,
    V3,
    V4,
}

impl Generation {
    /// Determine the hardware generation from the firmware version
    pub fn from_firmware(fw_version: u32) -> Result<Self, DetectionError> {
        // Early firmware does not follow the IC body rule
        if fw_version < 0x020030 || fw_version == 0x020600 {
            return Ok(Generation::V1);
        }

        // Version of the IC body
        let ic_body = (fw_version & 0x0f0000) >> 16;
        match ic_body {
            2 | 4 => Ok(Generation::V2),
            5 => Ok(Generation::V3),
            6 => Ok(Generation::V4),
            _ => Err(DetectionError::UnknownHardware(fw_version)),
        }
    }

    pub fn version(&self) -> u8 {
        match self {
            Generation::V1 => 1,
            Generation::V2 => 2,
            Generation::V3 => 3,
            Generation::V4 => 4,
        }
    }

    /// Size of a packet in the byte stream
    pub fn packet_size(&self) -> usize {
        match self {
            Generation::V1 => 4,
            _ => 6,
        }
    }

    /// Encoding used for queries
    pub fn query_encoding(&self) -> Encoding {
        match self {
            Generation::V1 | Generation::V2 => Encoding::Sliced,
            Generation::V3 | Generation::V4 => Encoding::Custom,
        }
    }

    /// Encoding used for register reads and writes
    pub fn register_encoding(&self) -> Encoding {
        match self {
            Generation::V1 => Encoding::Sliced,
            _ => Encoding::Custom,
        }
    }

    /// Registers written to put the touchpad into absolute mode
    pub fn absolute_mode_registers(&self) -> &'static [(u8, u8)] {
        match self {
            Generation::V1 => &[(0x10, 0x16), (0x11, 0x8f)],
            // Windows driver values
            Generation::V2 => &[(0x10, 0x54), (0x11, 0x88), (0x21, 0x60)],
            Generation::V3 => &[(0x10, 0x0b)],
            Generation::V4 => &[(0x07, 0x01)],
        }
    }

    /// Whether register 0x10 is read back after entering absolute mode.
    /// Version 4 hardware has no register 0x10.
    pub fn reads_back_mode(&self) -> bool {
        !matches!(self, Generation::V4)
    }
}

impl Display for Generation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.version())
    }
}

/// Assemble the 24-bit firmware version from a version query reply
pub fn firmware_version(param: [u8; 3]) -> u32 {
    (param[0] as u32) << 16 | (param[1] as u32) << 8 | param[2] as u32
}

/// Returns true if the magic knock reply identifies Elantech hardware
pub fn is_magic_knock_valid(param: &[u8; 3]) -> bool {
    param[..2] == MAGIC_KNOCK && MAGIC_KNOCK_LAST.contains(&param[2])
}

/// Returns true if the firmware version reply looks like it came from an
/// Elantech touchpad and not from a regular mouse echoing its status.
pub fn is_signature_valid(param: &[u8; 3]) -> bool {
    if param[0] == 0 {
        return false;
    }
    if param[1] == 0 {
        return true;
    }
    !SAMPLE_RATES.contains(&param[2])
}

/// Build the [DeviceProfile] for the given firmware version
pub fn resolve(fw_version: u32) -> Result<DeviceProfile, DetectionError> {
    let generation = Generation::from_firmware(fw_version)?;

    // This firmware misreports coordinates when a touch action starts
    let jumpy_cursor = fw_version == 0x020022 || fw_version == 0x020600;

    let (debug, reports_pressure) = match generation {
        Generation::V1 => (0, false),
        _ => (2, fw_version >= 0x020800),
    };

    Ok(DeviceProfile {
        generation,
        fw_version,
        capabilities: [0; 3],
        parity_check: true,
        jumpy_cursor,
        reports_pressure,
        debug,
        registers: Vec::new(),
        bounds: Bounds::default(),
        width: 0,
        resolution: Resolution::default(),
        parity: ParityTable::new(),
    })
}

/// Convert a firmware resolution value into dots per mm.
/// (value from firmware) * 10 + 790 = dpi
pub fn convert_res(val: u32) -> u32 {
    (val * 10 + 790) * 10 / 254
}

/// Decode the reply to a resolution query
pub fn resolution_from_reply(param: [u8; 3]) -> Resolution {
    Resolution {
        x: convert_res((param[1] & 0x0f) as u32),
        y: convert_res(((param[1] & 0xf0) >> 4) as u32),
    }
}

/// Coordinate range and trace width of the touchpad
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Range {
    pub bounds: Bounds,
    pub width: u32,
}

/// Range for hardware whose range is fixed by its firmware version
pub fn fixed_range(generation: Generation, fw_version: u32) -> Option<Range> {
    let bounds = match generation {
        Generation::V1 => Bounds {
            min_x: XMIN_V1,
            max_x: XMAX_V1,
            min_y: YMIN_V1,
            max_y: YMAX_V1,
        },
        Generation::V2 if matches!(fw_version, 0x020800 | 0x020b00 | 0x020030) => Bounds {
            min_x: XMIN_V2,
            max_x: XMAX_V2,
            min_y: YMIN_V2,
            max_y: YMAX_V2,
        },
        _ => return None,
    };
    Some(Range { bounds, width: 0 })
}

/// Unpack x_max and y_max from a firmware id reply. Each is 12 bits wide
/// with its high nibble stored in the first byte.
pub fn range_from_fw_id(param: [u8; 3]) -> (u32, u32) {
    let x_max = ((param[0] & 0x0f) as u32) << 8 | param[1] as u32;
    let y_max = ((param[0] & 0xf0) as u32) << 4 | param[2] as u32;
    (x_max, y_max)
}

/// Distance between two sensor traces
pub fn trace_width(x_max: u32, traces: u8) -> Result<u32, RangeError> {
    if traces < 2 || traces as u32 > x_max {
        return Err(RangeError::InvalidTraces { traces, x_max });
    }
    Ok(x_max / (traces as u32 - 1))
}

/// Query the touchpad for its coordinate range. The capabilities of the
/// profile must already be known.
pub fn query_range<T: Transport + ?Sized>(
    transport: &mut T,
    profile: &DeviceProfile,
) -> Result<Range, RangeError> {
    if let Some(range) = fixed_range(profile.generation, profile.fw_version) {
        return Ok(range);
    }

    let encoding = profile.query_encoding();
    let fw_version = profile.fw_version;
    let caps = profile.capabilities;
    match profile.generation {
        Generation::V2 => {
            let i = if fw_version > 0x020800 && fw_version < 0x020900 {
                1
            } else {
                2
            };
            let param = send_query(transport, encoding, FW_ID_QUERY)?;
            let fixed_dpi = param[1] & 0x10 != 0;

            let (x_max, y_max) = if (fw_version >> 16) == 0x14 && fixed_dpi {
                let param = send_query(transport, encoding, SAMPLE_QUERY)?;
                (
                    (caps[1] as u32).saturating_sub(i) * param[1] as u32 / 2,
                    (caps[2] as u32).saturating_sub(i) * param[2] as u32 / 2,
                )
            } else if fw_version == 0x040216 {
                (819, 405)
            } else if fw_version == 0x040219 || fw_version == 0x040215 {
                (900, 500)
            } else {
                (
                    (caps[1] as u32).saturating_sub(i) * 64,
                    (caps[2] as u32).saturating_sub(i) * 64,
                )
            };

            Ok(Range {
                bounds: Bounds {
                    max_x: x_max,
                    max_y: y_max,
                    ..Default::default()
                },
                width: 0,
            })
        }
        Generation::V3 | Generation::V4 => {
            let param = send_query(transport, encoding, FW_ID_QUERY)?;
            let (x_max, y_max) = range_from_fw_id(param);
            let width = match profile.generation {
                Generation::V4 => trace_width(x_max, caps[1])?,
                _ => 0,
            };

            Ok(Range {
                bounds: Bounds {
                    max_x: x_max,
                    max_y: y_max,
                    ..Default::default()
                },
                width,
            })
        }
        // Version 1 always has a fixed range
        Generation::V1 => Ok(Range::default()),
    }
}

/// Query the sensor resolution of version 4 hardware
pub fn query_resolution<T: Transport + ?Sized>(
    transport: &mut T,
    profile: &DeviceProfile,
) -> Result<Resolution, CommandError> {
    let param = send_query(transport, profile.query_encoding(), RESOLUTION_QUERY)?;
    Ok(resolution_from_reply(param))
}
