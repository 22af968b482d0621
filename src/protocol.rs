use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// Wire format for events pushed to the consumer, one JSON object each.
///
/// `found` events arrive in completion order, not enumeration order.
/// `done` is always the last event of a successful session; `error`
/// terminates a session with nothing after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    /// Human-readable status narration.
    Info { msg: String },
    /// One discovered device, emitted once per device.
    Found { data: DeviceRecord },
    /// Monotonic progress counter.
    Progress { data: ScanProgress },
    /// Terminal event carrying the number of devices found this session.
    Done { data: ScanSummary },
    /// Unrecoverable failure; the session is over.
    Error { msg: String },
}

impl Event {
    /// Serialize to a single JSON line for the consumer.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialization failed")
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Done { .. } | Event::Error { .. })
    }
}

/// A discovered device. `hostname` is `None` when reverse resolution
/// failed or timed out; the device is still reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub ip: Ipv4Addr,
    pub hostname: Option<String>,
}

/// Cumulative completion counter. `done` never decreases and never
/// exceeds `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub done: usize,
    pub total: usize,
}

/// Payload of the terminal `done` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn info_event_wire_shape() {
        let event = Event::Info {
            msg: "scan starting".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "info", "msg": "scan starting"})
        );
    }

    #[test]
    fn found_event_wire_shape() {
        let event = Event::Found {
            data: DeviceRecord {
                ip: "192.168.1.7".parse().unwrap(),
                hostname: Some("printer.lan".to_string()),
            },
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "found", "data": {"ip": "192.168.1.7", "hostname": "printer.lan"}})
        );
    }

    #[test]
    fn found_event_without_hostname_serializes_null() {
        let event = Event::Found {
            data: DeviceRecord {
                ip: "10.0.0.2".parse().unwrap(),
                hostname: None,
            },
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "found", "data": {"ip": "10.0.0.2", "hostname": null}})
        );
    }

    #[test]
    fn progress_and_done_wire_shapes() {
        let progress = Event::Progress {
            data: ScanProgress { done: 3, total: 254 },
        };
        assert_eq!(
            serde_json::to_value(&progress).unwrap(),
            json!({"type": "progress", "data": {"done": 3, "total": 254}})
        );

        let done = Event::Done {
            data: ScanSummary { count: 12 },
        };
        assert_eq!(
            serde_json::to_value(&done).unwrap(),
            json!({"type": "done", "data": {"count": 12}})
        );
    }

    #[test]
    fn error_event_wire_shape() {
        let event = Event::Error {
            msg: "invalid target".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "error", "msg": "invalid target"})
        );
    }

    #[test]
    fn events_round_trip_through_json_lines() {
        let event = Event::Progress {
            data: ScanProgress { done: 1, total: 4 },
        };
        let parsed: Event = serde_json::from_str(&event.to_json()).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn terminal_classification() {
        assert!(Event::Done {
            data: ScanSummary { count: 0 }
        }
        .is_terminal());
        assert!(Event::Error {
            msg: String::new()
        }
        .is_terminal());
        assert!(!Event::Info {
            msg: String::new()
        }
        .is_terminal());
    }
}
