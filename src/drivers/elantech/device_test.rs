use std::error::Error;

use crate::{
    config::DriverConfig,
    drivers::elantech::{
        device::{detect, start, Device, StartError},
        profile::Resolution,
        version::{DetectionError, Generation},
    },
    ps2::{
        scripted::ScriptedTransport,
        transport::{Transport, TransportError},
        Request, ENABLE,
    },
};

const KNOCK: [u8; 3] = [0x3c, 0x03, 0xc8];

/// Config without delays between attempts
fn fast_config() -> DriverConfig {
    DriverConfig {
        command_delay_ms: 0,
        read_back_delay_us: 0,
        ..Default::default()
    }
}

/// Transport that fails the first few requests before handing off to a
/// scripted transport
struct FlakyTransport {
    failures: usize,
    inner: ScriptedTransport,
}

impl Transport for FlakyTransport {
    fn submit(&mut self, request: &mut Request) -> Result<(), TransportError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(TransportError::Timeout(0xe9));
        }
        self.inner.submit(request)
    }
}

#[test]
fn test_bad_magic_knock() {
    let mut transport = ScriptedTransport::new([0x3c, 0x03, 0x64]);
    let result = detect(&mut transport);
    assert!(matches!(
        result,
        Err(DetectionError::BadMagicKnock([0x3c, 0x03, 0x64]))
    ));
    // Nothing is sent after a failed knock
    assert_eq!(transport.history().len(), 1);
}

#[test]
fn test_invalid_signature() {
    let mut transport = ScriptedTransport::new(KNOCK.into_iter().chain([0x3c, 0x03, 0x64]));
    let result = detect(&mut transport);
    assert!(matches!(result, Err(DetectionError::InvalidSignature(_))));
}

#[test]
fn test_unknown_hardware() {
    let mut transport = ScriptedTransport::new(KNOCK.into_iter().chain([0x33, 0x0f, 0x01]));
    let result = Device::detect(&mut transport);
    assert!(matches!(
        result,
        Err(DetectionError::UnknownHardware(0x330f01))
    ));
}

#[test]
fn test_detect_no_reply() {
    let mut transport = ScriptedTransport::default();
    let result = detect(&mut transport);
    assert!(matches!(result, Err(DetectionError::Command(_))));
}

#[test]
fn test_v1_refuses_absolute_mode() -> Result<(), Box<dyn Error>> {
    let replies = KNOCK
        .into_iter()
        .chain([0x01, 0x00, 0x00]) // firmware 0x010000
        .chain([0x00, 0x00, 0x00]) // capabilities
        .chain([0x12, 0x00, 0x00]); // register 0x10 without the absolute bit
    let mut device = Device::detect(ScriptedTransport::new(replies))?;
    assert_eq!(device.profile().generation, Generation::V1);

    let result = device.start(&fast_config());
    assert!(matches!(result, Err(StartError::RefusedAbsoluteMode(0x12))));
    assert_eq!(device.profile().registers, vec![(0x10, 0x16), (0x11, 0x8f)]);

    Ok(())
}

#[test]
fn test_v1_start() -> Result<(), Box<dyn Error>> {
    let replies = KNOCK
        .into_iter()
        .chain([0x01, 0x00, 0x00])
        .chain([0x00, 0x00, 0x00])
        .chain([0x16, 0x00, 0x00]);
    let mut device = Device::detect(ScriptedTransport::new(replies))?;
    device.start(&fast_config())?;

    let profile = device.profile();
    assert_eq!(profile.bounds.min_x, 32);
    assert_eq!(profile.bounds.max_y, 352);
    assert_eq!(device.transport().sent().last(), Some(&ENABLE));
    assert_eq!(device.transport().remaining(), 0);

    Ok(())
}

#[test]
fn test_read_back_retries() -> Result<(), Box<dyn Error>> {
    let replies = KNOCK
        .into_iter()
        .chain([0x45, 0x0f, 0x01])
        .chain([0x08, 0x17, 0x0c])
        .chain([0x0b, 0x00, 0x00])
        .chain([0x25, 0xbe, 0xbc]);
    let mut transport = FlakyTransport {
        failures: 0,
        inner: ScriptedTransport::new(replies),
    };
    let mut profile = detect(&mut transport)?;

    // Fail the capabilities query twice, it succeeds on the last attempt
    transport.failures = 2;
    start(&mut transport, &mut profile, &fast_config())?;
    assert_eq!(profile.capabilities, [0x08, 0x17, 0x0c]);
    assert_eq!(profile.bounds.max_x, 1470);
    assert_eq!(profile.y_max(), 700);

    Ok(())
}

#[test]
fn test_capabilities_failure() -> Result<(), Box<dyn Error>> {
    let replies = KNOCK.into_iter().chain([0x45, 0x0f, 0x01]);
    let mut transport = FlakyTransport {
        failures: 0,
        inner: ScriptedTransport::new(replies),
    };
    let mut profile = detect(&mut transport)?;

    transport.failures = 3;
    let result = start(&mut transport, &mut profile, &fast_config());
    assert!(matches!(result, Err(StartError::Capabilities(_))));

    Ok(())
}

#[test]
fn test_v4_missing_resolution() -> Result<(), Box<dyn Error>> {
    let replies = KNOCK
        .into_iter()
        .chain([0x46, 0x0f, 0x02])
        .chain([0x00, 0x0f, 0x00])
        .chain([0x25, 0xbe, 0xbc]);
    let mut device = Device::detect(ScriptedTransport::new(replies))?;
    // The resolution query runs out of replies and is skipped
    device.start(&fast_config())?;

    let profile = device.profile();
    assert_eq!(profile.generation, Generation::V4);
    assert_eq!(profile.registers, vec![(0x07, 0x01)]);
    assert_eq!(profile.width, 105);
    assert_eq!(profile.resolution, Resolution::default());

    device.stop()?;
    assert_eq!(device.transport().sent().last(), Some(&0xf5));

    Ok(())
}
