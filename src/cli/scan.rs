use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;

use crate::config;
use crate::output;
use crate::probe::TcpProber;
use crate::protocol::Event;
use crate::resolve::DnsResolver;
use crate::scanner::{ScanConfig, ScanCoordinator};
use crate::target;

pub async fn run(
    target_spec: Option<String>,
    timeout: Option<u64>,
    concurrency: Option<usize>,
    events_mode: bool,
    json: bool,
) -> Result<()> {
    let cfg = config::load()?;

    let spec = match target_spec {
        Some(spec) => spec,
        None => {
            let subnet = target::local_subnet();
            if !json && !events_mode {
                eprintln!("No target given, scanning local subnet {subnet}");
            }
            subnet.to_string()
        }
    };

    let scan_config = ScanConfig {
        probe_timeout: Duration::from_millis(timeout.unwrap_or(cfg.probe_timeout_ms)),
        resolve_timeout: Duration::from_millis(cfg.resolve_timeout_ms),
        concurrency: concurrency.unwrap_or(cfg.concurrency),
    };

    let (tx, mut rx) = mpsc::channel(256);
    let coordinator = ScanCoordinator::new(
        spec.clone(),
        scan_config,
        TcpProber::new(cfg.probe_ports),
        DnsResolver,
        tx,
    );

    let started = Instant::now();
    coordinator.start_scan()?;

    let mut total = 0usize;
    let mut failure: Option<String> = None;
    while let Some(event) = rx.recv().await {
        if events_mode {
            println!("{}", event.to_json());
        } else if !json {
            render(&event);
        }
        match &event {
            Event::Progress { data } => total = data.total,
            Event::Error { msg } => failure = Some(msg.clone()),
            _ => {}
        }
        if event.is_terminal() {
            break;
        }
    }

    if let Some(msg) = failure {
        anyhow::bail!(msg);
    }

    if !events_mode {
        let devices = coordinator.results();
        let out = output::ScanOutput {
            target: spec,
            stats: output::ScanStatsOutput {
                total_addresses: total,
                found: devices.len(),
                duration_ms: started.elapsed().as_millis() as u64,
            },
            devices,
        };
        output::print(&out, json);
    }
    Ok(())
}

fn render(event: &Event) {
    match event {
        Event::Info { msg } => eprintln!("{msg}"),
        Event::Found { data } => {
            let name = data.hostname.as_deref().unwrap_or("-");
            eprintln!("\rfound {:<16} {name}", data.ip.to_string());
        }
        Event::Progress { data } => eprint!("\r{}/{} scanned", data.done, data.total),
        Event::Done { .. } => eprintln!(),
        Event::Error { .. } => {}
    }
}
