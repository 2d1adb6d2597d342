use std::error::Error;
use std::fs::File;
use std::io::{self, Read};
use std::os::fd::AsFd;
use std::path::PathBuf;

use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use tokio::sync::mpsc;

use elanpad::config::DriverConfig;
use elanpad::drivers::elantech::{device::Device, driver::Driver};
use elanpad::ps2::serio::SerioRaw;

/// Number of chunks that can be queued between the reader and the decoder
const CHANNEL_SIZE: usize = 256;
/// Size of a single read from the device
const READ_SIZE: usize = 64;
/// How often the reader checks whether the decoder is gone
const POLL_INTERVAL_MS: u16 = 100;

pub async fn handle_run(
    devnode: String,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = DriverConfig::load(config.as_deref())?;
    log::debug!("Using config: {config:?}");

    let start_config = config.clone();
    let task = tokio::task::spawn_blocking(move || {
        let transport = SerioRaw::open(devnode.as_str())?;
        let stream = transport.stream()?;
        let mut device = Device::detect(transport)?;
        device.start(&start_config)?;
        Ok::<_, Box<dyn Error + Send + Sync>>((device, stream))
    });
    let (mut device, stream) = task.await??;

    let mut driver = Driver::new(device.profile().clone(), &config);

    // Read the packet stream on a blocking thread and decode it here
    let (tx, mut rx) = mpsc::channel(CHANNEL_SIZE);
    let reader = tokio::task::spawn_blocking(move || read_stream(stream, tx));

    loop {
        tokio::select! {
            data = rx.recv() => {
                let Some(data) = data else {
                    log::warn!("Touchpad stream closed");
                    break;
                };
                for event in driver.handle_bytes(&data) {
                    println!("{event}");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutting down");
                break;
            }
        }
    }

    // Stop the reader before talking to the device again
    drop(rx);
    if let Err(e) = reader.await? {
        log::error!("Error reading touchpad stream: {e}");
    }

    tokio::task::spawn_blocking(move || device.stop()).await??;
    log::info!("Touchpad disabled");

    Ok(())
}

/// Forward bytes from the touchpad until the stream ends or the receiver is
/// dropped
fn read_stream(mut stream: File, tx: mpsc::Sender<Vec<u8>>) -> io::Result<()> {
    let mut buf = [0; READ_SIZE];
    while !tx.is_closed() {
        let ready = {
            let mut fds = [PollFd::new(stream.as_fd(), PollFlags::POLLIN)];
            poll(&mut fds, PollTimeout::from(POLL_INTERVAL_MS)).map_err(io::Error::from)?
        };
        if ready == 0 {
            continue;
        }

        let bytes_read = stream.read(&mut buf)?;
        if bytes_read == 0 {
            break;
        }
        log::trace!("Read {bytes_read} bytes: {:02x?}", &buf[..bytes_read]);
        if tx.blocking_send(buf[..bytes_read].to_vec()).is_err() {
            break;
        }
    }

    Ok(())
}
