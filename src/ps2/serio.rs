use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Write},
    os::fd::AsFd,
    time::{Duration, Instant},
};

use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

use super::{
    transport::{Transport, TransportError},
    Operation, Request, ACK, ERROR, RESEND,
};

/// Milliseconds to wait for each response from the device
pub const SERIO_TIMEOUT: u16 = 500;

/// [Transport] over the Linux `serio_raw` character device. The kernel
/// passes every byte written straight to the AUX port and every byte
/// received from it back to userspace.
#[derive(Debug)]
pub struct SerioRaw {
    file: File,
    timeout: u16,
}

impl SerioRaw {
    /// Open the given serio_raw device node (e.g. "/dev/serio_raw0")
    pub fn open(devnode: &str) -> Result<Self, TransportError> {
        let file = OpenOptions::new().read(true).write(true).open(devnode)?;
        log::debug!("Opened serio_raw device: {devnode}");
        Ok(Self::from_file(file))
    }

    /// Use an already open device. Useful for devices that are not opened
    /// from a path.
    pub fn from_file(file: File) -> Self {
        Self {
            file,
            timeout: SERIO_TIMEOUT,
        }
    }

    /// Set the milliseconds to wait for each response
    pub fn with_timeout(mut self, timeout: u16) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns a handle for reading the asynchronous packet stream
    pub fn stream(&self) -> io::Result<File> {
        self.file.try_clone()
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), TransportError> {
        self.file.write_all(&[byte])?;
        self.file.flush()?;
        Ok(())
    }

    /// Block until a byte is available or the deadline passes
    fn read_byte(&mut self, pending: u8, deadline: Instant) -> Result<u8, TransportError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let timeout = u16::try_from(remaining.as_millis()).unwrap_or(u16::MAX);
        let ready = {
            let mut fds = [PollFd::new(self.file.as_fd(), PollFlags::POLLIN)];
            poll(&mut fds, PollTimeout::from(timeout)).map_err(io::Error::from)?
        };
        if ready == 0 {
            return Err(TransportError::Timeout(pending));
        }

        let mut buf = [0; 1];
        self.file.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn deadline(&self) -> Instant {
        Instant::now() + Duration::from_millis(self.timeout as u64)
    }

    /// Send a command and wait for its acknowledgement. Packet bytes that
    /// were already queued ahead of the acknowledgement are discarded.
    fn send_command(&mut self, command: u8) -> Result<(), TransportError> {
        self.write_byte(command)?;
        let deadline = self.deadline();
        loop {
            let response = self.read_byte(command, deadline)?;
            match response {
                ACK => return Ok(()),
                RESEND | ERROR => return Err(TransportError::Nack { command, response }),
                _ => log::trace!(
                    "Discarding {response:#04x} while waiting for ack of {command:#04x}"
                ),
            }
        }
    }
}

impl Transport for SerioRaw {
    fn submit(&mut self, request: &mut Request) -> Result<(), TransportError> {
        let mut last_command = 0;
        for op in request.operations_mut() {
            match op {
                Operation::SendCommand(command) => {
                    last_command = *command;
                    self.send_command(*command)?;
                }
                Operation::ReadData(value) => {
                    let deadline = self.deadline();
                    *value = self.read_byte(last_command, deadline)?;
                }
            }
        }
        Ok(())
    }
}
