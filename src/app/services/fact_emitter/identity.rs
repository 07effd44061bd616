//! Identity allocation for measurement individuals

use crate::app::models::Reading;
use crate::app::vocabulary::Vocabulary;
use crate::constants::CONTENT_HASH_LENGTH;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

/// Allocates local names for measurement individuals
///
/// Implementations guarantee that every name handed out by one allocator
/// instance is distinct.
pub trait IdentityAllocator {
    fn allocate(&mut self, reading: &Reading) -> String;
}

/// Identity strategies selectable from configuration
///
/// Content hashes are the default: a measurement's name depends only on its
/// own reading, so no counter state is shared between files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityStrategy {
    /// `TurbidityXMeasurement1`, `TurbidityXMeasurement2`, ... counted across the run
    Counter,
    /// `TurbidityXMeasurement-3f9a...` derived from the reading content
    #[default]
    ContentHash,
}

impl IdentityStrategy {
    /// Fresh allocator for one run
    pub fn allocator(&self) -> Box<dyn IdentityAllocator> {
        match self {
            Self::Counter => Box::new(CounterAllocator::new()),
            Self::ContentHash => Box::new(ContentHashAllocator::new()),
        }
    }
}

impl fmt::Display for IdentityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counter => f.write_str("counter"),
            Self::ContentHash => f.write_str("content-hash"),
        }
    }
}

/// Running counter per quantity-kind short name
#[derive(Debug, Default)]
pub struct CounterAllocator {
    counters: HashMap<String, u64>,
}

impl CounterAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityAllocator for CounterAllocator {
    fn allocate(&mut self, reading: &Reading) -> String {
        let short = Vocabulary::short_name(&reading.quantity_kind);
        let counter = self.counters.entry(short.to_string()).or_insert(0);
        *counter += 1;
        format!("{}Measurement{}", short, counter)
    }
}

/// Content-addressed names, identical across runs over unchanged input
#[derive(Debug, Default)]
pub struct ContentHashAllocator {
    seen: HashMap<String, u32>,
}

impl ContentHashAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hex digest prefix over the identifying content of a reading
    pub fn digest(reading: &Reading) -> String {
        let timestamp = reading.interval.begin.to_rfc3339();
        let mut hasher = Sha256::new();
        for part in [
            reading.location.as_str(),
            reading.quantity_kind.as_str(),
            reading.unit.as_str(),
            timestamp.as_str(),
            reading.source_column.as_str(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0x1f]);
        }
        let mut digest = format!("{:x}", hasher.finalize());
        digest.truncate(CONTENT_HASH_LENGTH);
        digest
    }
}

impl IdentityAllocator for ContentHashAllocator {
    fn allocate(&mut self, reading: &Reading) -> String {
        let short = Vocabulary::short_name(&reading.quantity_kind);
        let base = format!("{}Measurement-{}", short, Self::digest(reading));

        let repeats = self.seen.entry(base.clone()).or_insert(0);
        *repeats += 1;
        match *repeats {
            1 => base,
            n => format!("{}-{}", base, n),
        }
    }
}
