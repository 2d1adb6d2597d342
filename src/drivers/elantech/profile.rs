use std::fmt::{Display, Formatter};

use super::{
    version::{Encoding, Generation},
    CAP_HAS_ROCKER,
};

/// Precomputed bit parity for every byte value. An entry is 1 when the byte
/// has an even number of set bits.
#[derive(Clone, PartialEq, Eq)]
pub struct ParityTable([u8; 256]);

impl ParityTable {
    pub fn new() -> Self {
        let mut table = [0; 256];
        table[0] = 1;
        for i in 1..256 {
            table[i] = table[i & (i - 1)] ^ 1;
        }
        Self(table)
    }

    pub fn get(&self, byte: u8) -> u8 {
        self.0[byte as usize]
    }
}

impl Default for ParityTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParityTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ParityTable")
    }
}

/// Absolute coordinate range reported by the touchpad
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

/// Sensor resolution in dots per mm
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub x: u32,
    pub y: u32,
}

/// Everything known about the attached touchpad. Produced by detection,
/// completed during start-up and treated as read-only afterwards.
#[derive(Clone, Debug)]
pub struct DeviceProfile {
    /// Protocol dialect
    pub generation: Generation,
    /// 24-bit firmware version
    pub fw_version: u32,
    /// Reply to the capabilities query
    pub capabilities: [u8; 3],
    /// Whether version 1 packets are parity checked
    pub parity_check: bool,
    /// Firmware misreports coordinates when a touch starts
    pub jumpy_cursor: bool,
    /// Firmware reports finger pressure
    pub reports_pressure: bool,
    /// Diagnostics verbosity. 0 is silent, 2 or more is verbose.
    pub debug: u8,
    /// Registers written to enter absolute mode as (register, value)
    pub registers: Vec<(u8, u8)>,
    pub bounds: Bounds,
    /// Sensor trace pitch (version 4 only)
    pub width: u32,
    pub resolution: Resolution,
    pub parity: ParityTable,
}

impl DeviceProfile {
    /// Size of a single packet in the byte stream
    pub fn packet_size(&self) -> usize {
        self.generation.packet_size()
    }

    /// Encoding used for queries
    pub fn query_encoding(&self) -> Encoding {
        self.generation.query_encoding()
    }

    pub fn y_max(&self) -> u32 {
        self.bounds.max_y
    }

    pub fn has_rocker(&self) -> bool {
        self.capabilities[0] & CAP_HAS_ROCKER != 0
    }

    /// Returns the value written to the given register during start-up
    pub fn register(&self, reg: u8) -> Option<u8> {
        self.registers
            .iter()
            .find(|(r, _)| *r == reg)
            .map(|(_, val)| *val)
    }

    /// Firmware version formatted the way it is printed on the wire
    pub fn firmware_string(&self) -> String {
        format!("0x{:06x}", self.fw_version)
    }
}

impl Display for DeviceProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Elantech {} (firmware {}) x: {}..{} y: {}..{}",
            self.generation,
            self.firmware_string(),
            self.bounds.min_x,
            self.bounds.max_x,
            self.bounds.min_y,
            self.bounds.max_y
        )
    }
}
