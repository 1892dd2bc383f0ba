use log::{error, info};
use std::process;
use std::thread;
use std::time::Instant;
use xpipe::{channel, ChannelConfig, ReadEnd, WriteEnd};

const DEMO_TEXT: &[u8] = b"PIPE data flow demo:";
const STREAM_SIZE: usize = 256 * 1024; // 256 KB
const WRITE_CHUNK: usize = 4096;
const READ_CHUNK: usize = 1000;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("pipe demo failed: {}", e);
        process::exit(1);
    }
}

fn run() -> xpipe::Result<()> {
    let (tx, rx) = channel()?;
    partial_transfers(&tx, &rx)?;
    drop((tx, rx));

    stream_through(&ChannelConfig::default())
}

/// One write, three reads of mismatched sizes.
fn partial_transfers(tx: &WriteEnd, rx: &ReadEnd) -> xpipe::Result<()> {
    let ret = tx.write(DEMO_TEXT)?;
    println!("{} bytes written", ret);
    println!();

    let mut data = [0u8; 10];
    for want in [5, 5, 10] {
        let ret = rx.read(&mut data[..want])?;
        println!("{} bytes read", ret);
        println!("{}", String::from_utf8_lossy(&data[..ret]));
    }
    Ok(())
}

/// Pushes more than the channel holds from a producer thread and checks
/// every byte on the consumer side.
fn stream_through(config: &ChannelConfig) -> xpipe::Result<()> {
    let (tx, rx) = xpipe::channel_with_config(config)?;
    let data: Vec<u8> = (0..STREAM_SIZE).map(|i| (i % 251) as u8).collect();

    info!(
        "Streaming {} KB through a {} KB channel...",
        STREAM_SIZE / 1024,
        rx.capacity() / 1024
    );
    let start = Instant::now();

    let producer = {
        let data = data.clone();
        thread::spawn(move || -> xpipe::Result<()> {
            for chunk in data.chunks(WRITE_CHUNK) {
                tx.write_all(chunk)?;
            }
            Ok(())
        })
    };

    let mut received = Vec::with_capacity(STREAM_SIZE);
    let mut buf = [0u8; READ_CHUNK];
    loop {
        let n = rx.read(&mut buf)?;
        if n == 0 {
            break;
        }
        received.extend_from_slice(&buf[..n]);
    }

    match producer.join() {
        Ok(result) => result?,
        Err(_) => {
            error!("producer thread panicked");
            process::exit(1);
        }
    }

    let elapsed = start.elapsed();
    let speed = (received.len() as f64 / 1024.0) / elapsed.as_secs_f64();

    if received == data {
        info!("Data matches exactly");
    } else {
        info!("Data does not match");
    }

    let stats = rx.stats();
    info!("=== Stream Complete ===");
    info!("Total received: {} KB", received.len() / 1024);
    info!("Writes: {}, reads: {}", stats.writes, stats.reads);
    info!("Writer waited on a full buffer {} times", stats.writer_waits);
    info!("Time: {:.2} seconds", elapsed.as_secs_f64());
    info!("Speed: {:.2} KB/s", speed);

    Ok(())
}
