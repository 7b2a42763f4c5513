// Entry point: headless sampling run that prints the three panels and
// optionally dumps a JSON snapshot.
mod cli;

use clap::Parser;
use std::error::Error;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shadowpost::config::AppConfig;
use shadowpost::report::{Snapshot, render_text};
use shadowpost::sim::auto::AutoSampler;
use shadowpost::sim::session::Session;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    let mut cfg = AppConfig::load_or_default(&args.config);
    args.apply(&mut cfg);

    let mut session = Session::new(&cfg)?;

    match args.auto_sec {
        Some(secs) => run_auto(&mut session, cfg.sampling.auto_interval_ms, secs)?,
        None => {
            let political = session.sample_many(args.samples);
            info!("sampled {} users, {political} political", args.samples);
        }
    }

    println!("{}", render_text(&session, args.width));

    if let Some(path) = &args.json_out {
        std::fs::write(path, Snapshot::capture(&session).to_json()?)?;
        info!("wrote snapshot to {}", path.display());
    }
    Ok(())
}

fn run_auto(session: &mut Session, interval_ms: u64, secs: f64) -> Result<(), Box<dyn Error>> {
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_for_ctrlc = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_for_ctrlc.store(true, Ordering::SeqCst);
    })?;

    let run_for = Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO);
    let mut auto = AutoSampler::from_millis(interval_ms);
    let tick = auto.interval().max(Duration::from_millis(1));
    auto.start();

    let started = Instant::now();
    let mut last = started;
    while !stop_flag.load(Ordering::SeqCst) && started.elapsed() < run_for {
        std::thread::sleep(tick);
        let now = Instant::now();
        session.sample_many(auto.advance(now - last));
        last = now;
    }
    auto.stop();
    info!(
        "auto-sampling ran {:.2}s, {} users",
        started.elapsed().as_secs_f64(),
        session.counters().users
    );
    Ok(())
}
