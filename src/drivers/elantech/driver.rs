use std::time::Instant;

use packed_struct::PackedStruct;

use crate::config::DriverConfig;

use super::{
    event::{Event, PointerEvent},
    gesture::{GestureState, Point},
    packet::{check_v1, check_v3, PacketType, V3Packet, V3_PACKET_SIZE},
    profile::DeviceProfile,
    version::Generation,
};

/// Largest packet size of any hardware version
const MAX_PACKET_SIZE: usize = 6;

/// Fixed size buffer that accumulates the byte stream into packets
#[derive(Debug)]
struct PacketFrame {
    buf: [u8; MAX_PACKET_SIZE],
    len: usize,
    size: usize,
}

impl PacketFrame {
    fn new(size: usize) -> Self {
        Self {
            buf: [0; MAX_PACKET_SIZE],
            len: 0,
            size: size.clamp(1, MAX_PACKET_SIZE),
        }
    }

    /// Append a byte. Returns the complete packet and empties the frame once
    /// `size` bytes have been collected.
    fn push(&mut self, byte: u8) -> Option<[u8; MAX_PACKET_SIZE]> {
        self.buf[self.len] = byte;
        self.len += 1;
        if self.len < self.size {
            return None;
        }
        self.len = 0;
        Some(self.buf)
    }
}

/// Decodes the byte stream of an Elantech touchpad into pointer events.
/// Every method runs on the byte arrival path and never blocks or talks to
/// the device.
#[derive(Debug)]
pub struct Driver {
    profile: DeviceProfile,
    frame: PacketFrame,
    gesture: GestureState,
    /// Finger 0 position from the head packet of a two finger pair
    head: Option<Point>,
    /// Diagnostics verbosity
    debug: u8,
    /// Whether version 1 packets are parity checked
    parity_check: bool,
}

impl Driver {
    pub fn new(profile: DeviceProfile, config: &DriverConfig) -> Self {
        let frame = PacketFrame::new(profile.packet_size());
        let debug = config.debug.unwrap_or(profile.debug);
        let parity_check = config.parity_check.unwrap_or(profile.parity_check);
        let gesture = GestureState::new(config.tap_to_click, config.tap_distance);
        log::info!("Started Elantech {} driver.", profile.generation);
        Self {
            profile,
            frame,
            gesture,
            head: None,
            debug,
            parity_check,
        }
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Number of bytes of the current packet received so far
    pub fn pending(&self) -> usize {
        self.frame.len
    }

    /// Handle one byte from the touchpad
    pub fn handle_byte(&mut self, data: u8) -> Vec<Event> {
        if self.debug > 2 {
            log::trace!("Byte {}: {data:#04x}", self.frame.len);
        }
        let Some(buf) = self.frame.push(data) else {
            return Vec::new();
        };
        let packet = &buf[..self.frame.size];

        match self.profile.generation {
            Generation::V1 => {
                if self.parity_check
                    && !check_v1(&self.profile.parity, self.profile.fw_version, packet)
                {
                    log::trace!("Dropping packet with bad parity: {packet:02x?}");
                }
                Vec::new()
            }
            Generation::V3 => {
                let mut sized_buf = [0; V3_PACKET_SIZE];
                sized_buf.copy_from_slice(packet);
                self.handle_v3_packet(sized_buf)
            }
            Generation::V2 | Generation::V4 => {
                log::trace!(
                    "Absolute packets are not decoded for {} hardware",
                    self.profile.generation
                );
                Vec::new()
            }
        }
    }

    /// Handle a chunk of bytes from the touchpad
    pub fn handle_bytes(&mut self, data: &[u8]) -> Vec<Event> {
        data.iter().flat_map(|byte| self.handle_byte(*byte)).collect()
    }

    /// Classify a version 3 packet and decode it if it carries finger data
    fn handle_v3_packet(&mut self, buf: [u8; V3_PACKET_SIZE]) -> Vec<Event> {
        let packet_type = check_v3(&buf);
        if !packet_type.is_decodable() {
            log::trace!("Dropping {packet_type:?} packet: {buf:02x?}");
            return Vec::new();
        }

        let packet = match V3Packet::unpack(&buf) {
            Ok(packet) => packet,
            Err(e) => {
                log::warn!("Failed to unpack packet {buf:02x?}: {e:?}");
                return Vec::new();
            }
        };

        self.report_absolute_v3(packet, packet_type)
    }

    /// Decode the finger position of a packet. The Y axis is flipped so it
    /// grows downwards.
    fn decode_point(&self, packet: &V3Packet) -> Point {
        let x = packet.get_x() as i32;
        let y = self.profile.y_max() as i32 - packet.get_y() as i32;
        Point::new(x, y)
    }

    /// Translate a version 3 packet into events. Two finger contacts are
    /// reported as a head packet for the first finger followed by a tail
    /// packet for the second.
    fn report_absolute_v3(&mut self, packet: V3Packet, packet_type: PacketType) -> Vec<Event> {
        let timestamp = Instant::now();
        let mut events = Vec::new();
        let fingers = packet.get_fingers();
        let mut buttons = packet.get_buttons();
        let mut first = Point::default();
        let mut second = Point::default();

        match fingers {
            0 => {
                buttons |= self.gesture.release();
                self.head = None;
                events.push(Event::Release(PointerEvent {
                    dx: 0,
                    dy: 0,
                    buttons,
                    timestamp,
                }));
            }
            1 => {
                first = self.decode_point(&packet);
                if is_valid(first) {
                    if let Some((dx, dy)) = self.gesture.motion(first) {
                        events.push(Event::Motion(PointerEvent {
                            dx,
                            dy,
                            buttons,
                            timestamp,
                        }));
                    }
                    self.gesture.track(0, first);
                }
            }
            2 => match packet_type {
                PacketType::V3Head => {
                    first = self.decode_point(&packet);
                    if is_valid(first) {
                        self.gesture.track(0, first);
                    }
                    // Wait for the tail packet
                    self.head = Some(first);
                }
                _ => {
                    second = self.decode_point(&packet);
                    if is_valid(second) {
                        self.gesture.track(1, second);
                    }
                    if let Some(head) = self.head.take() {
                        first = head;
                        log::trace!("Two finger sample: {first:?} {second:?}");
                    }
                }
            },
            // Three fingers can't be told apart from the head/tail framing
            _ => (),
        }

        if self.debug > 1 {
            log::debug!(
                "fingers {fingers}, x1 {}, y1 {}, x2 {}, y2 {}, width {}, pres {}",
                first.x,
                first.y,
                second.x,
                second.y,
                packet.get_width(),
                packet.get_pressure()
            );
        }

        self.gesture.set_fingers(fingers);
        events
    }
}

/// A zero coordinate on either axis means the packet has no usable position
fn is_valid(point: Point) -> bool {
    point.x != 0 && point.y != 0
}
