use std::error::Error;

use crate::{
    drivers::elantech::{
        profile::{Bounds, ParityTable},
        version::{
            convert_res, firmware_version, is_magic_knock_valid, is_signature_valid,
            query_range, resolution_from_reply, resolve, trace_width, DetectionError, Generation,
            RangeError,
        },
    },
    ps2::scripted::ScriptedTransport,
};

#[test]
fn test_parity_table() {
    let parity = ParityTable::new();
    for byte in 0..=255u8 {
        let expected = if byte.count_ones() % 2 == 0 { 1 } else { 0 };
        assert_eq!(parity.get(byte), expected, "parity of {byte:#04x}");
    }
}

#[test]
fn test_generation_from_firmware() {
    let cases = [
        (0x010000, Generation::V1),
        (0x020022, Generation::V1),
        (0x020600, Generation::V1),
        (0x020030, Generation::V2),
        (0x040216, Generation::V2),
        (0x450f01, Generation::V3),
        (0x360f02, Generation::V4),
    ];
    for (fw_version, generation) in cases {
        let result = Generation::from_firmware(fw_version);
        assert_eq!(result.ok(), Some(generation), "firmware {fw_version:#08x}");
    }
}

#[test]
fn test_unknown_hardware() {
    let result = resolve(0x030000);
    assert!(matches!(
        result,
        Err(DetectionError::UnknownHardware(0x030000))
    ));
}

#[test]
fn test_resolve() -> Result<(), Box<dyn Error>> {
    let profile = resolve(0x020030)?;
    assert_eq!(profile.generation, Generation::V2);
    assert_eq!(profile.packet_size(), 6);
    assert_eq!(profile.debug, 2);
    assert!(profile.parity_check);
    assert!(!profile.reports_pressure);

    let profile = resolve(0x020600)?;
    assert_eq!(profile.generation, Generation::V1);
    assert_eq!(profile.packet_size(), 4);
    assert_eq!(profile.debug, 0);
    assert!(profile.jumpy_cursor);

    let profile = resolve(0x450f01)?;
    assert!(profile.reports_pressure);
    assert_eq!(profile.firmware_string(), "0x450f01");

    Ok(())
}

#[test]
fn test_signature() {
    assert!(is_signature_valid(&[0x3c, 0x00, 0x64]));
    assert!(is_signature_valid(&[0x45, 0x0f, 0x01]));
    // Looks like a regular mouse reporting its sample rate
    assert!(!is_signature_valid(&[0x3c, 0x03, 0x64]));
    assert!(!is_signature_valid(&[0x00, 0x0f, 0x01]));
}

#[test]
fn test_magic_knock_reply() {
    assert!(is_magic_knock_valid(&[0x3c, 0x03, 0xc8]));
    assert!(is_magic_knock_valid(&[0x3c, 0x03, 0x00]));
    assert!(!is_magic_knock_valid(&[0x3c, 0x03, 0x64]));
    assert!(!is_magic_knock_valid(&[0x00, 0x00, 0x64]));
}

#[test]
fn test_firmware_version() {
    assert_eq!(firmware_version([0x45, 0x0f, 0x01]), 0x450f01);
}

#[test]
fn test_fixed_range() -> Result<(), Box<dyn Error>> {
    let mut transport = ScriptedTransport::default();

    let profile = resolve(0x010000)?;
    let range = query_range(&mut transport, &profile)?;
    assert_eq!(
        range.bounds,
        Bounds {
            min_x: 32,
            max_x: 544,
            min_y: 32,
            max_y: 352
        }
    );

    let profile = resolve(0x020b00)?;
    let range = query_range(&mut transport, &profile)?;
    assert_eq!(range.bounds.max_x, 1152);
    assert_eq!(range.bounds.max_y, 768);

    // Nothing was sent to the device
    assert!(transport.history().is_empty());

    Ok(())
}

#[test]
fn test_range_v2() -> Result<(), Box<dyn Error>> {
    let mut profile = resolve(0x040100)?;
    profile.capabilities = [0x00, 0x10, 0x0c];
    let mut transport = ScriptedTransport::new([0x00, 0x00, 0x00]);
    let range = query_range(&mut transport, &profile)?;
    assert_eq!(range.bounds.max_x, (0x10 - 2) * 64);
    assert_eq!(range.bounds.max_y, (0x0c - 2) * 64);

    let profile = resolve(0x040216)?;
    let mut transport = ScriptedTransport::new([0x00, 0x00, 0x00]);
    let range = query_range(&mut transport, &profile)?;
    assert_eq!((range.bounds.max_x, range.bounds.max_y), (819, 405));

    Ok(())
}

#[test]
fn test_range_v2_fixed_dpi() -> Result<(), Box<dyn Error>> {
    let mut profile = resolve(0x140100)?;
    profile.capabilities = [0x00, 0x10, 0x0c];
    // FW_ID reply with the fixed dpi bit, then the sample query reply
    let mut transport = ScriptedTransport::new([0x00, 0x10, 0x00, 0x00, 0x20, 0x30]);
    let range = query_range(&mut transport, &profile)?;
    assert_eq!(range.bounds.max_x, (0x10 - 2) * 0x20 / 2);
    assert_eq!(range.bounds.max_y, (0x0c - 2) * 0x30 / 2);
    assert_eq!(transport.remaining(), 0);

    Ok(())
}

#[test]
fn test_range_v3() -> Result<(), Box<dyn Error>> {
    let profile = resolve(0x450f01)?;
    let mut transport = ScriptedTransport::new([0x25, 0xbe, 0xbc]);
    let range = query_range(&mut transport, &profile)?;
    assert_eq!(range.bounds.max_x, 1470);
    assert_eq!(range.bounds.max_y, 700);
    assert_eq!(range.width, 0);
    assert_eq!(transport.sent(), vec![0xf8, 0x00, 0xe9]);

    Ok(())
}

#[test]
fn test_range_v4() -> Result<(), Box<dyn Error>> {
    let mut profile = resolve(0x460f02)?;
    profile.capabilities = [0x00, 0x0f, 0x00];
    let mut transport = ScriptedTransport::new([0x25, 0xbe, 0xbc]);
    let range = query_range(&mut transport, &profile)?;
    assert_eq!(range.width, 1470 / 14);

    // Too few traces
    profile.capabilities = [0x00, 0x01, 0x00];
    let mut transport = ScriptedTransport::new([0x25, 0xbe, 0xbc]);
    let result = query_range(&mut transport, &profile);
    assert!(matches!(
        result,
        Err(RangeError::InvalidTraces { traces: 1, .. })
    ));

    Ok(())
}

#[test]
fn test_range_query_failure() -> Result<(), Box<dyn Error>> {
    let profile = resolve(0x450f01)?;
    let mut transport = ScriptedTransport::default();
    let result = query_range(&mut transport, &profile);
    assert!(matches!(result, Err(RangeError::Query(_))));

    Ok(())
}

#[test]
fn test_trace_width() {
    assert_eq!(trace_width(1000, 11).ok(), Some(100));
    assert!(trace_width(1000, 0).is_err());
    assert!(trace_width(10, 11).is_err());
}

#[test]
fn test_resolution() {
    assert_eq!(convert_res(0), 31);
    assert_eq!(convert_res(1), 31);
    assert_eq!(convert_res(5), 33);

    let resolution = resolution_from_reply([0x00, 0x51, 0x00]);
    assert_eq!(resolution.x, convert_res(1));
    assert_eq!(resolution.y, convert_res(5));
}
