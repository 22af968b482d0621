use anyhow::Result;

use crate::config::{self, Config};

pub fn show(json: bool) -> Result<()> {
    let cfg = config::load()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
    } else {
        println!("probe_timeout_ms   = {}", cfg.probe_timeout_ms);
        println!("resolve_timeout_ms = {}", cfg.resolve_timeout_ms);
        println!("concurrency        = {}", cfg.concurrency);
        println!("probe_ports        = {:?}", cfg.probe_ports);
    }
    Ok(())
}

pub fn set(key: &str, value: &str, json: bool) -> Result<()> {
    let mut cfg = config::load()?;
    config::set(&mut cfg, key, value)?;
    config::save(&cfg)?;
    if !json {
        println!("{key} = {value}");
    }
    Ok(())
}

pub fn reset(json: bool) -> Result<()> {
    config::save(&Config::default())?;
    if !json {
        println!("Configuration reset to defaults");
    }
    Ok(())
}
