use std::{fmt::Display, thread, time::Duration};

use thiserror::Error;

use crate::{config::DriverConfig, ps2::transport::Transport};

use super::{
    command::{enable, magic_knock, read_reg, send_query, submit_for_reply, write_reg, CommandError},
    profile::DeviceProfile,
    version::{
        firmware_version, is_magic_knock_valid, is_signature_valid, query_range, query_resolution,
        resolve, DetectionError, Encoding, Generation, RangeError,
    },
    CAPABILITIES_QUERY, FW_VERSION_QUERY, R10_ABSOLUTE_MODE,
};

/// Register holding the reporting mode on version 1-3 hardware
const MODE_REGISTER: u8 = 0x10;

/// Possible errors putting a detected touchpad into absolute mode
#[derive(Debug, Error)]
pub enum StartError {
    #[error("failed to query capabilities: {0}")]
    Capabilities(CommandError),
    #[error("failed to write absolute mode registers: {0}")]
    AbsoluteMode(CommandError),
    #[error("failed to read back register 0x10: {0}")]
    ReadBack(CommandError),
    #[error("touchpad refused absolute mode, register 0x10 = {0:#04x}")]
    RefusedAbsoluteMode(u8),
    #[error("failed to query range: {0}")]
    Range(#[from] RangeError),
    #[error("failed to enable touchpad: {0}")]
    Enable(CommandError),
}

/// Control path of an Elantech touchpad. Owns the transport and issues the
/// blocking request/response round trips needed to detect, start and stop
/// the device. Byte stream decoding happens in [super::driver::Driver].
#[derive(Debug)]
pub struct Device<T: Transport> {
    transport: T,
    profile: DeviceProfile,
}

impl<T: Transport> Device<T> {
    /// Identify the touchpad behind the transport. Fails if the device is
    /// not a supported Elantech touchpad.
    pub fn detect(mut transport: T) -> Result<Self, DetectionError> {
        let profile = detect(&mut transport)?;
        Ok(Self { transport, profile })
    }

    /// Put the touchpad into absolute mode and enable reporting
    pub fn start(&mut self, config: &DriverConfig) -> Result<(), StartError> {
        start(&mut self.transport, &mut self.profile, config)
    }

    /// Disable reporting
    pub fn stop(&mut self) -> Result<(), CommandError> {
        log::info!("Disabling Elantech touchpad");
        enable(&mut self.transport, false)
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_parts(self) -> (T, DeviceProfile) {
        (self.transport, self.profile)
    }
}

/// Run the detection sequence: magic knock, firmware version and signature
/// check. Returns the resolved profile for the hardware.
pub fn detect<T: Transport + ?Sized>(transport: &mut T) -> Result<DeviceProfile, DetectionError> {
    let param = submit_for_reply(transport, magic_knock())?;
    if !is_magic_knock_valid(&param) {
        log::debug!(
            "Unexpected magic knock result: {:#04x}, {:#04x}, {:#04x}",
            param[0],
            param[1],
            param[2]
        );
        return Err(DetectionError::BadMagicKnock(param));
    }

    // The firmware version is always queried the Synaptics way
    let param = send_query(transport, Encoding::Sliced, FW_VERSION_QUERY)?;
    if !is_signature_valid(&param) {
        log::debug!("Probably not a real Elantech touchpad: {param:02x?}");
        return Err(DetectionError::InvalidSignature(param));
    }

    let fw_version = firmware_version(param);
    let profile = resolve(fw_version)?;
    log::info!(
        "Elantech version {}, hardware {}",
        profile.firmware_string(),
        profile.generation
    );
    Ok(profile)
}

/// Complete the profile and put the touchpad into absolute mode
pub fn start<T: Transport + ?Sized>(
    transport: &mut T,
    profile: &mut DeviceProfile,
    config: &DriverConfig,
) -> Result<(), StartError> {
    let encoding = profile.query_encoding();
    let command_delay = Duration::from_millis(config.command_delay_ms);
    profile.capabilities = retry(config.command_retries, command_delay, || {
        send_query(&mut *transport, encoding, CAPABILITIES_QUERY)
    })
    .map_err(StartError::Capabilities)?;
    let caps = profile.capabilities;
    log::info!(
        "Elantech capabilities: {:#04x}, {:#04x}, {:#04x}",
        caps[0],
        caps[1],
        caps[2]
    );
    if profile.has_rocker() {
        log::debug!("Touchpad has a rocker switch");
    }

    set_absolute_mode(transport, profile, config)?;

    let range = query_range(transport, profile)?;
    profile.bounds = range.bounds;
    profile.width = range.width;

    if profile.generation == Generation::V4 {
        match query_resolution(transport, profile) {
            Ok(resolution) => profile.resolution = resolution,
            Err(e) => log::warn!("Failed to query resolution data: {e}"),
        }
    }

    enable(transport, true).map_err(StartError::Enable)?;
    log::info!("Started {profile}");
    Ok(())
}

/// Write the absolute mode registers for the generation and, where the
/// hardware has one, read back the mode register to confirm it took.
fn set_absolute_mode<T: Transport + ?Sized>(
    transport: &mut T,
    profile: &mut DeviceProfile,
    config: &DriverConfig,
) -> Result<(), StartError> {
    let generation = profile.generation;
    for &(reg, val) in generation.absolute_mode_registers() {
        write_reg(transport, generation, reg, val).map_err(StartError::AbsoluteMode)?;
        profile.registers.push((reg, val));
    }

    if !generation.reads_back_mode() {
        return Ok(());
    }

    let delay = Duration::from_micros(config.read_back_delay_us);
    let val = retry(config.read_back_retries, delay, || {
        read_reg(&mut *transport, generation, MODE_REGISTER)
    })
    .map_err(StartError::ReadBack)?;

    if generation == Generation::V1 && val & R10_ABSOLUTE_MODE == 0 {
        return Err(StartError::RefusedAbsoluteMode(val));
    }

    Ok(())
}

/// Call `f` up to `tries` times, sleeping `delay` between failed attempts
fn retry<R, E, F>(tries: u32, delay: Duration, mut f: F) -> Result<R, E>
where
    E: Display,
    F: FnMut() -> Result<R, E>,
{
    let tries = tries.max(1);
    let mut attempt = 1;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(e) if attempt < tries => {
                log::debug!("Attempt {attempt}/{tries} failed: {e}");
                thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
