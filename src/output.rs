use serde::Serialize;

use crate::protocol::DeviceRecord;

/// Final scan report printed by the CLI.
#[derive(Debug, Serialize)]
pub struct ScanOutput {
    pub target: String,
    pub devices: Vec<DeviceRecord>,
    pub stats: ScanStatsOutput,
}

#[derive(Debug, Serialize)]
pub struct ScanStatsOutput {
    pub total_addresses: usize,
    pub found: usize,
    pub duration_ms: u64,
}

pub fn print(out: &ScanOutput, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(out).expect("serialization failed")
        );
        return;
    }

    if out.devices.is_empty() {
        println!("No devices found on {}", out.target);
    } else {
        for device in &out.devices {
            match &device.hostname {
                Some(name) => println!("{:<16} {}", device.ip.to_string(), name),
                None => println!("{:<16} -", device.ip.to_string()),
            }
        }
    }
    println!(
        "{} of {} addresses responded in {} ms",
        out.stats.found, out.stats.total_addresses, out.stats.duration_ms
    );
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let payload = serde_json::json!({ "type": "error", "msg": err.to_string() });
        eprintln!("{payload}");
    } else {
        eprintln!("Error: {err:#}");
    }
}
