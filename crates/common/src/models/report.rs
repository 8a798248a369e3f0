use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Signal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairReport {
    pub display_name: String,
    pub signal: Signal,
}

impl fmt::Display for PairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display_name, self.signal)
    }
}

/// Result of one pass over the basket, in configured pair order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub entries: Vec<PairReport>,
}

impl ScanReport {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, display_name: &str, signal: Signal) {
        self.entries.push(PairReport {
            display_name: display_name.to_string(),
            signal,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn signal_for(&self, display_name: &str) -> Option<Signal> {
        self.entries
            .iter()
            .find(|e| e.display_name == display_name)
            .map(|e| e.signal)
    }

    pub fn count(&self, signal: Signal) -> usize {
        self.entries.iter().filter(|e| e.signal == signal).count()
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}
