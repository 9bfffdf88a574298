//! Job-scoped execution context threaded through every pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The dominant font detected by the upstream design-tool integration.
///
/// Seeded once when the context is created and read-only for the rest of the
/// job — no pass may change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryFont {
    /// Font family name as the design tool reports it (e.g. `Poppins`).
    pub family: String,
    /// Style name (e.g. `Regular`, `SemiBold`).
    pub style: String,
}

/// Counters of mutations a pass actually applied.
///
/// Keys are counter names (e.g. `classesOptimized`); values are the number of
/// elements the pass mutated under that counter. Zero-valued counters are
/// never recorded, so an empty record means the pass found nothing to do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsRecord(BTreeMap<String, u64>);

impl MetricsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` to a named counter. A zero `n` leaves the record untouched.
    pub fn add(&mut self, counter: &str, n: u64) {
        if n > 0 {
            *self.0.entry(counter.to_string()).or_insert(0) += n;
        }
    }

    pub fn increment(&mut self, counter: &str) {
        self.add(counter, 1);
    }

    pub fn get(&self, counter: &str) -> u64 {
        self.0.get(counter).copied().unwrap_or(0)
    }

    /// Sum over all counters — the pass's total mutation count.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Shared mutable state for one conversion job.
///
/// One context is created per job, handed to the orchestrator by reference,
/// and threaded through every pass. `metrics` is append-only: the
/// orchestrator inserts one [`MetricsRecord`] per pass, keyed by pass name.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    primary_font: Option<PrimaryFont>,
    /// Per-pass metrics, filled in by the orchestrator as passes complete.
    pub metrics: BTreeMap<String, MetricsRecord>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context seeded with the upstream-detected primary font.
    pub fn with_primary_font(font: PrimaryFont) -> Self {
        Self {
            primary_font: Some(font),
            metrics: BTreeMap::new(),
        }
    }

    /// The upstream-detected primary font. Read-only inside the pipeline:
    /// the field is private and only the seeding constructor sets it.
    pub fn primary_font(&self) -> Option<&PrimaryFont> {
        self.primary_font.as_ref()
    }

    /// Per-job report: pass name → counters of mutations applied.
    pub fn report(&self) -> &BTreeMap<String, MetricsRecord> {
        &self.metrics
    }
}
