use std::error::Error;
use std::path::PathBuf;

use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use elanpad::config::{capture::Capture, path::get_captures_path};
use elanpad::drivers::elantech::{device::Device, driver::Driver, event::Event};
use elanpad::ps2::scripted::ScriptedTransport;

use super::probe::profile_table;

#[derive(Tabled)]
struct EventRow {
    index: usize,
    event: String,
    dx: i32,
    dy: i32,
    buttons: String,
}

pub async fn handle_replay(path: PathBuf) -> Result<(), Box<dyn Error + Send + Sync>> {
    // Fall back to the bundled captures
    let path = if path.exists() {
        path
    } else {
        get_captures_path().join(path)
    };
    log::debug!("Loading capture: {path:?}");
    let capture = Capture::from_yaml_file(&path)?;

    let config = capture.config.clone().unwrap_or_default();
    let transport = ScriptedTransport::new(capture.reply_bytes()?);

    // Start-up sleeps between retries, keep it off the async runtime
    let start_config = config.clone();
    let task = tokio::task::spawn_blocking(move || {
        let mut device = Device::detect(transport)?;
        device.start(&start_config)?;
        Ok::<_, Box<dyn Error + Send + Sync>>(device)
    });
    let device = task.await??;
    let remaining = device.transport().remaining();
    if remaining > 0 {
        log::warn!("{remaining} scripted replies were not used");
    }
    println!("{}", profile_table(device.profile()));

    let mut driver = Driver::new(device.profile().clone(), &config);
    let events = driver.handle_bytes(&capture.stream_bytes()?);
    let count = events.len();
    let rows: Vec<EventRow> = events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let pointer = event.pointer();
            EventRow {
                index,
                event: event.name().to_string(),
                dx: pointer.dx,
                dy: pointer.dy,
                buttons: pointer.buttons.to_string(),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header(capture.name.as_str()));
    println!("{table}");
    println!("Decoded {count} event(s)");
    let clicks = events
        .iter()
        .filter(|event| matches!(event, Event::Release(p) if !p.buttons.is_empty()))
        .count();
    println!("Found {clicks} click(s)");

    Ok(())
}
