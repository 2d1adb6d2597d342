use thiserror::Error;

use crate::ps2::{
    transport::{Transport, TransportError},
    Request, ENABLE, REPLY_SIZE, SET_DEFAULTS, SET_DEFAULTS_AND_DISABLE,
    SET_SCALING_1_1,
};

use super::{
    version::{Encoding, Generation},
    CUSTOM_COMMAND, REGISTER_READ, REGISTER_READWRITE, REGISTER_WRITE,
};

/// Possible errors issuing commands to the touchpad
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid register {0:#04x}")]
    InvalidRegister(u8),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("expected a {expected} byte reply, got {got}")]
    ShortReply { expected: usize, got: usize },
}

/// Returns an error if the register cannot be accessed. Valid registers are
/// 0x07-0x11 and 0x20-0x26.
pub fn validate_register(reg: u8) -> Result<(), CommandError> {
    if !(0x07..=0x26).contains(&reg) || (0x12..=0x1f).contains(&reg) {
        return Err(CommandError::InvalidRegister(reg));
    }
    Ok(())
}

/// Build a query command whose 3 byte reply is read back with a status
/// request.
pub fn query(encoding: Encoding, command: u8) -> Request {
    match encoding {
        Encoding::Sliced => Request::new().sliced(command).get_info(),
        Encoding::Custom => Request::new()
            .command(CUSTOM_COMMAND)
            .command(command)
            .get_info(),
    }
}

/// Build the request that writes `val` into register `reg`
pub fn write_register(generation: Generation, reg: u8, val: u8) -> Result<Request, CommandError> {
    validate_register(reg)?;
    let request = match generation {
        Generation::V1 => Request::new()
            .sliced(REGISTER_WRITE)
            .sliced(reg)
            .sliced(val),
        Generation::V2 => custom(REGISTER_WRITE, reg).command(CUSTOM_COMMAND).command(val),
        Generation::V3 => custom(REGISTER_READWRITE, reg)
            .command(CUSTOM_COMMAND)
            .command(val),
        Generation::V4 => custom(REGISTER_READWRITE, reg)
            .command(CUSTOM_COMMAND)
            .command(REGISTER_READWRITE)
            .command(CUSTOM_COMMAND)
            .command(val),
    };
    Ok(request.command(SET_SCALING_1_1))
}

/// Build the request that reads register `reg`
pub fn read_register(generation: Generation, reg: u8) -> Result<Request, CommandError> {
    validate_register(reg)?;
    let request = match generation {
        Generation::V1 => Request::new().sliced(REGISTER_READ).sliced(reg),
        Generation::V2 => custom(REGISTER_READ, reg),
        Generation::V3 | Generation::V4 => custom(REGISTER_READWRITE, reg),
    };
    Ok(request.get_info())
}

/// Custom command prefix for register access: `F8 op F8 reg`
fn custom(op: u8, reg: u8) -> Request {
    Request::new()
        .command(CUSTOM_COMMAND)
        .command(op)
        .command(CUSTOM_COMMAND)
        .command(reg)
}

/// Extract the register value from a register read reply
pub fn register_value(generation: Generation, reply: [u8; REPLY_SIZE]) -> u8 {
    match generation {
        Generation::V4 => reply[1],
        _ => reply[0],
    }
}

/// Build the "magic knock" sequence used to identify Elantech hardware
pub fn magic_knock() -> Request {
    Request::new()
        .command(SET_DEFAULTS)
        .command(SET_DEFAULTS_AND_DISABLE)
        .command(SET_SCALING_1_1)
        .command(SET_SCALING_1_1)
        .command(SET_SCALING_1_1)
        .get_info()
}

/// Build the request that enables or disables touchpad reporting
pub fn set_enabled(enable: bool) -> Request {
    let command = match enable {
        true => ENABLE,
        false => SET_DEFAULTS_AND_DISABLE,
    };
    Request::new().command(command)
}

/// Submit the request and return its 3 byte reply
pub fn submit_for_reply<T: Transport + ?Sized>(
    transport: &mut T,
    mut request: Request,
) -> Result<[u8; REPLY_SIZE], CommandError> {
    transport.submit(&mut request)?;
    request.reply().ok_or(CommandError::ShortReply {
        expected: REPLY_SIZE,
        got: request.read_count(),
    })
}

/// Send a query using the given encoding and return the reply
pub fn send_query<T: Transport + ?Sized>(
    transport: &mut T,
    encoding: Encoding,
    command: u8,
) -> Result<[u8; REPLY_SIZE], CommandError> {
    log::debug!("Sending {encoding:?} query: {command:#04x}");
    let param = submit_for_reply(transport, query(encoding, command))?;
    log::debug!(
        "Query {command:#04x} result: {:#04x}, {:#04x}, {:#04x}",
        param[0],
        param[1],
        param[2]
    );
    Ok(param)
}

/// Write `val` into register `reg`. Invalid registers are rejected before
/// anything is sent to the device.
pub fn write_reg<T: Transport + ?Sized>(
    transport: &mut T,
    generation: Generation,
    reg: u8,
    val: u8,
) -> Result<(), CommandError> {
    let mut request = write_register(generation, reg, val)?;
    log::debug!("Writing register {reg:#04x} = {val:#04x}");
    transport.submit(&mut request)?;
    Ok(())
}

/// Read register `reg`. Invalid registers are rejected before anything is
/// sent to the device.
pub fn read_reg<T: Transport + ?Sized>(
    transport: &mut T,
    generation: Generation,
    reg: u8,
) -> Result<u8, CommandError> {
    let request = read_register(generation, reg)?;
    let reply = submit_for_reply(transport, request)?;
    let val = register_value(generation, reply);
    log::debug!("Read register {reg:#04x} = {val:#04x}");
    Ok(val)
}

/// Enable or disable touchpad reporting
pub fn enable<T: Transport + ?Sized>(transport: &mut T, enable: bool) -> Result<(), CommandError> {
    let mut request = set_enabled(enable);
    transport.submit(&mut request)?;
    Ok(())
}
