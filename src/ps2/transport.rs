use std::io;

use thiserror::Error;

use super::Request;

/// Possible errors while executing a [Request]
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("device rejected command {command:#04x} with {response:#04x}")]
    Nack { command: u8, response: u8 },
    #[error("timed out waiting for a response to {0:#04x}")]
    Timeout(u8),
    #[error("no more scripted replies")]
    Exhausted,
}

/// Executes bus requests against a PS/2 device. Submission blocks until
/// every operation in the request has completed or failed, and must never be
/// called from the byte stream decoding path.
pub trait Transport {
    /// Execute every operation of the request in order. On success each
    /// [super::Operation::ReadData] holds the byte read from the device.
    fn submit(&mut self, request: &mut Request) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn submit(&mut self, request: &mut Request) -> Result<(), TransportError> {
        (**self).submit(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn submit(&mut self, request: &mut Request) -> Result<(), TransportError> {
        (**self).submit(request)
    }
}
