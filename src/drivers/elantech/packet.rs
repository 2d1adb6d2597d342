use packed_struct::prelude::*;

use super::{event::Buttons, profile::ParityTable};

/// Signature of the spurious packet version 3 hardware sends after a finger
/// lands. It shares its constant bits with [PacketType::V3Head].
pub const DEBOUNCE_PACKET: [u8; 6] = [0xc4, 0xff, 0xff, 0x02, 0xff, 0xff];

/// Size of a version 3 packet
pub const V3_PACKET_SIZE: usize = 6;

/// Classification of a version 3 packet based on its constant bits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketType {
    Unknown,
    Debounce,
    V3Head,
    V3Tail,
}

impl PacketType {
    /// Whether packets of this type carry finger data
    pub fn is_decodable(&self) -> bool {
        matches!(self, PacketType::V3Head | PacketType::V3Tail)
    }
}

/// Check the parity bits of a version 1 packet against bytes 1-3
pub fn check_v1(parity: &ParityTable, fw_version: u32, packet: &[u8]) -> bool {
    let [b0, b1, b2, b3, ..] = packet else {
        return false;
    };

    // Parity bits are placed differently
    let (p1, p2) = if fw_version < 0x020000 {
        // byte 0:  D   U  p1  p2   1  p3   R   L
        ((b0 & 0x20) >> 5, (b0 & 0x10) >> 4)
    } else {
        // byte 0: n1  n0  p2  p1   1  p3   R   L
        ((b0 & 0x10) >> 4, (b0 & 0x20) >> 5)
    };
    let p3 = (b0 & 0x04) >> 2;

    parity.get(*b1) == p1 && parity.get(*b2) == p2 && parity.get(*b3) == p3
}

/// Classify a version 3 packet. Packet checking is mandatory for version 3
/// because the constant bits are the only way to tell packets apart.
pub fn check_v3(packet: &[u8; V3_PACKET_SIZE]) -> PacketType {
    // Debounce first, it has the same signature in bytes 0 and 3 as a head packet
    if *packet == DEBOUNCE_PACKET {
        return PacketType::Debounce;
    }
    if (packet[0] & 0x0c) == 0x04 && (packet[3] & 0xcf) == 0x02 {
        return PacketType::V3Head;
    }
    if (packet[0] & 0x0c) == 0x0c && (packet[3] & 0xce) == 0x0c {
        return PacketType::V3Tail;
    }
    PacketType::Unknown
}

// byte 0: n1  n0  w3  w2   .   .   R   L
// byte 1: p7  p6  p5  p4 x11 x10  x9  x8
// byte 2: x7  x6  x5  x4  x3  x2  x1  x0
// byte 3:  .   .  w1  w0   .   .   .   .
// byte 4: p3  p2  p1  p0 y11 y10  y9  y8
// byte 5: y7  y6  y5  y4  y3  y2  y1  y0
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "6")]
pub struct V3Packet {
    #[packed_field(bits = "0..=1")]
    pub fingers: Integer<u8, packed_bits::Bits<2>>,
    #[packed_field(bits = "2..=3")]
    pub width_hi: Integer<u8, packed_bits::Bits<2>>,
    #[packed_field(bits = "4..=5")]
    pub type_bits_0: Integer<u8, packed_bits::Bits<2>>,
    #[packed_field(bits = "6")]
    pub right: bool,
    #[packed_field(bits = "7")]
    pub left: bool,
    #[packed_field(bits = "8..=11")]
    pub pressure_hi: Integer<u8, packed_bits::Bits<4>>,
    #[packed_field(bits = "12..=15")]
    pub x_hi: Integer<u8, packed_bits::Bits<4>>,
    #[packed_field(bytes = "2")]
    pub x_lo: u8,
    #[packed_field(bits = "24..=25")]
    pub type_bits_3_hi: Integer<u8, packed_bits::Bits<2>>,
    #[packed_field(bits = "26..=27")]
    pub width_lo: Integer<u8, packed_bits::Bits<2>>,
    #[packed_field(bits = "28..=31")]
    pub type_bits_3_lo: Integer<u8, packed_bits::Bits<4>>,
    #[packed_field(bits = "32..=35")]
    pub pressure_lo: Integer<u8, packed_bits::Bits<4>>,
    #[packed_field(bits = "36..=39")]
    pub y_hi: Integer<u8, packed_bits::Bits<4>>,
    #[packed_field(bytes = "5")]
    pub y_lo: u8,
}

impl V3Packet {
    /// Number of fingers on the touchpad (0-3)
    pub fn get_fingers(&self) -> u8 {
        self.fingers.to_primitive()
    }

    /// Physical buttons held down
    pub fn get_buttons(&self) -> Buttons {
        let mut buttons = Buttons::default();
        if self.left {
            buttons |= Buttons::LEFT;
        }
        if self.right {
            buttons |= Buttons::RIGHT;
        }
        buttons
    }

    /// Raw 12-bit X coordinate
    pub fn get_x(&self) -> u16 {
        let high = self.x_hi.to_primitive() as u16;
        let low = self.x_lo as u16;
        high << 8 | low
    }

    /// Raw 12-bit Y coordinate. The axis grows upwards.
    pub fn get_y(&self) -> u16 {
        let high = self.y_hi.to_primitive() as u16;
        let low = self.y_lo as u16;
        high << 8 | low
    }

    pub fn get_pressure(&self) -> u8 {
        self.pressure_hi.to_primitive() << 4 | self.pressure_lo.to_primitive()
    }

    pub fn get_width(&self) -> u8 {
        self.width_hi.to_primitive() << 2 | self.width_lo.to_primitive()
    }
}
