//! Generic PS/2 AUX device plumbing. A [Request] is an ordered list of bus
//! operations that a [transport::Transport] executes as a single blocking
//! round trip.
pub mod scripted;
pub mod serio;
pub mod transport;


// Device responses
pub const ACK: u8 = 0xfa;
pub const RESEND: u8 = 0xfe;
pub const ERROR: u8 = 0xfc;

// Device commands
pub const SET_SCALING_1_1: u8 = 0xe6;
pub const SET_RESOLUTION: u8 = 0xe8;
pub const GET_INFO: u8 = 0xe9;
pub const ENABLE: u8 = 0xf4;
pub const SET_DEFAULTS_AND_DISABLE: u8 = 0xf5;
pub const SET_DEFAULTS: u8 = 0xf6;

/// Size of the reply to a [GET_INFO] status request
pub const REPLY_SIZE: usize = 3;

/// A single low-level bus operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Send a byte to the device and expect an acknowledgement
    SendCommand(u8),
    /// Read one byte from the data port. Holds the byte that was read once
    /// the request has been submitted.
    ReadData(u8),
}

/// Ordered list of bus operations executed as one round trip
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    operations: Vec<Operation>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command byte
    pub fn command(mut self, byte: u8) -> Self {
        self.operations.push(Operation::SendCommand(byte));
        self
    }

    /// Append a data port read
    pub fn read(mut self) -> Self {
        self.operations.push(Operation::ReadData(0));
        self
    }

    /// Append the given value as a "sliced" command: a scaling reset followed
    /// by four set-resolution commands, each carrying two bits of the value
    /// from the most significant pair down.
    pub fn sliced(mut self, value: u8) -> Self {
        self = self.command(SET_SCALING_1_1);
        for shift in [6, 4, 2, 0] {
            let slice = (value >> shift) & 0x03;
            self = self.command(SET_RESOLUTION).command(slice);
        }
        self
    }

    /// Append a status request along with the reads for its 3 byte reply
    pub fn get_info(self) -> Self {
        self.command(GET_INFO).read().read().read()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operations_mut(&mut self) -> &mut [Operation] {
        &mut self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns the command bytes of this request in order
    pub fn commands(&self) -> Vec<u8> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                Operation::SendCommand(byte) => Some(*byte),
                Operation::ReadData(_) => None,
            })
            .collect()
    }

    /// Number of read operations in this request
    pub fn read_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::ReadData(_)))
            .count()
    }

    /// Returns the results of the last three read operations in order, or
    /// None if the request reads fewer than three bytes.
    pub fn reply(&self) -> Option<[u8; REPLY_SIZE]> {
        let reads: Vec<u8> = self
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::ReadData(byte) => Some(*byte),
                Operation::SendCommand(_) => None,
            })
            .collect();
        let start = reads.len().checked_sub(REPLY_SIZE)?;
        reads[start..].try_into().ok()
    }
}
