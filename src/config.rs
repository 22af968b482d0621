use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::probe::DEFAULT_PROBE_PORTS;

/// Persistent scan defaults, stored as TOML under the platform config
/// directory. Missing file or missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-address probe timeout in milliseconds.
    pub probe_timeout_ms: u64,
    /// Per-address reverse-resolution timeout in milliseconds.
    pub resolve_timeout_ms: u64,
    /// Maximum concurrent probes.
    pub concurrency: usize,
    /// Ports tried by the TCP prober.
    pub probe_ports: Vec<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 800,
            resolve_timeout_ms: 1_000,
            concurrency: 120,
            probe_ports: DEFAULT_PROBE_PORTS.to_vec(),
        }
    }
}

pub fn path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("no config directory for this platform")?;
    Ok(dir.join("lanscan").join("config.toml"))
}

pub fn load() -> Result<Config> {
    let path = path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub fn save(cfg: &Config) -> Result<()> {
    let path = path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

pub fn set(cfg: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "probe_timeout_ms" => cfg.probe_timeout_ms = value.parse()?,
        "resolve_timeout_ms" => cfg.resolve_timeout_ms = value.parse()?,
        "concurrency" => cfg.concurrency = value.parse()?,
        "probe_ports" => {
            cfg.probe_ports = value
                .split(',')
                .map(|p| p.trim().parse())
                .collect::<Result<_, _>>()?;
        }
        other => anyhow::bail!("unknown config key: {other}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_updates_known_keys() {
        let mut cfg = Config::default();
        set(&mut cfg, "concurrency", "32").unwrap();
        set(&mut cfg, "probe_timeout_ms", "250").unwrap();
        set(&mut cfg, "probe_ports", "22, 80,443").unwrap();
        assert_eq!(cfg.concurrency, 32);
        assert_eq!(cfg.probe_timeout_ms, 250);
        assert_eq!(cfg.probe_ports, vec![22, 80, 443]);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_value() {
        let mut cfg = Config::default();
        assert!(set(&mut cfg, "nope", "1").is_err());
        assert!(set(&mut cfg, "concurrency", "many").is_err());
    }

    #[test]
    fn toml_round_trip_with_partial_file() {
        let cfg: Config = toml::from_str("concurrency = 8\n").unwrap();
        assert_eq!(cfg.concurrency, 8);
        assert_eq!(cfg.probe_timeout_ms, Config::default().probe_timeout_ms);

        let full: Config = toml::from_str(&toml::to_string_pretty(&cfg).unwrap()).unwrap();
        assert_eq!(full, cfg);
    }
}
