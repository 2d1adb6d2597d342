use std::error::Error;
use std::path::PathBuf;

use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use elanpad::config::DriverConfig;
use elanpad::drivers::elantech::{device::Device, profile::DeviceProfile};
use elanpad::ps2::serio::SerioRaw;

#[derive(Tabled)]
struct ProfileRow {
    property: String,
    value: String,
}

impl ProfileRow {
    fn new(property: &str, value: impl ToString) -> Self {
        Self {
            property: property.to_string(),
            value: value.to_string(),
        }
    }
}

/// Build a table describing the given profile
pub fn profile_table(profile: &DeviceProfile) -> Table {
    let caps = profile.capabilities;
    let registers: Vec<String> = profile
        .registers
        .iter()
        .map(|(reg, val)| format!("{reg:#04x}={val:#04x}"))
        .collect();
    let bounds = profile.bounds;

    let rows = vec![
        ProfileRow::new("Hardware", profile.generation),
        ProfileRow::new("Firmware", profile.firmware_string()),
        ProfileRow::new(
            "Capabilities",
            format!("{:02x} {:02x} {:02x}", caps[0], caps[1], caps[2]),
        ),
        ProfileRow::new("Packet size", profile.packet_size()),
        ProfileRow::new("X range", format!("{}..{}", bounds.min_x, bounds.max_x)),
        ProfileRow::new("Y range", format!("{}..{}", bounds.min_y, bounds.max_y)),
        ProfileRow::new("Trace width", profile.width),
        ProfileRow::new(
            "Resolution",
            format!("{}x{}", profile.resolution.x, profile.resolution.y),
        ),
        ProfileRow::new("Registers", registers.join(" ")),
        ProfileRow::new("Rocker switch", profile.has_rocker()),
        ProfileRow::new("Parity check", profile.parity_check),
        ProfileRow::new("Jumpy cursor", profile.jumpy_cursor),
        ProfileRow::new("Reports pressure", profile.reports_pressure),
        ProfileRow::new("Debug level", profile.debug),
    ];

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header("Elantech Touchpad"));
    table
}

pub async fn handle_probe(
    devnode: String,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = DriverConfig::load(config.as_deref())?;

    // Command round trips block, keep them off the async runtime
    let task = tokio::task::spawn_blocking(
        move || -> Result<DeviceProfile, Box<dyn Error + Send + Sync>> {
            let transport = SerioRaw::open(devnode.as_str())?;
            let mut device = Device::detect(transport)?;
            device.start(&config)?;
            device.stop()?;
            let (_, profile) = device.into_parts();
            Ok(profile)
        },
    );
    let profile = task.await??;

    println!("{}", profile_table(&profile));

    Ok(())
}
