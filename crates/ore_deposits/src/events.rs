//! Event types and sinks for observing deposit generation.
//!
//! This module defines [`DepositEvent`] and a set of sinks to emit, collect, or forward
//! events while running [`crate::driver::DepositSystem`] callbacks. Configuration errors
//! are reported here in addition to being logged.
use glam::IVec3;

use crate::driver::ChunkDepositReport;

/// Describes events emitted during deposit generation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum DepositEvent {
    /// A deposit variant was disabled or defaulted because of bad configuration.
    ConfigError {
        /// Deposit code (or `"unknown"`).
        variant: String,
        /// File the variant was loaded from, if known.
        source: Option<String>,
        /// Human-readable message.
        message: String,
    },

    /// Ore maps were created for a region.
    RegionPopulated {
        region_x: i32,
        region_z: i32,
        /// Codes whose ore map was created by this call.
        codes: Vec<String>,
    },

    /// Deposit generation started for a chunk column.
    ChunkStarted { chunk_x: i32, chunk_z: i32 },

    /// A deposit attempt passed the climate filter and was handed to its generator.
    AttemptMade {
        code: String,
        /// World position of the attempt (y is 0 for top-level attempts).
        pos: IVec3,
    },

    /// A deposit attempt was rejected by the climate filter.
    ClimateRejected { code: String, pos: IVec3 },

    /// A queued child deposit was generated.
    SubDepositGenerated { code: String, pos: IVec3 },

    /// Deposit generation finished for a chunk column.
    ChunkFinished {
        chunk_x: i32,
        chunk_z: i32,
        report: ChunkDepositReport,
    },
}

/// Discriminant of a [`DepositEvent`], used to skip building unwanted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepositEventKind {
    ConfigError,
    RegionPopulated,
    ChunkStarted,
    AttemptMade,
    ClimateRejected,
    SubDepositGenerated,
    ChunkFinished,
}

impl DepositEvent {
    pub fn kind(&self) -> DepositEventKind {
        match self {
            DepositEvent::ConfigError { .. } => DepositEventKind::ConfigError,
            DepositEvent::RegionPopulated { .. } => DepositEventKind::RegionPopulated,
            DepositEvent::ChunkStarted { .. } => DepositEventKind::ChunkStarted,
            DepositEvent::AttemptMade { .. } => DepositEventKind::AttemptMade,
            DepositEvent::ClimateRejected { .. } => DepositEventKind::ClimateRejected,
            DepositEvent::SubDepositGenerated { .. } => DepositEventKind::SubDepositGenerated,
            DepositEvent::ChunkFinished { .. } => DepositEventKind::ChunkFinished,
        }
    }
}

/// A generic event sink that accepts [`DepositEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: DepositEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: DepositEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: DepositEvent) {}

    #[inline]
    fn wants(&self, _kind: DepositEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(DepositEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(DepositEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(DepositEvent),
{
    #[inline]
    fn send(&mut self, event: DepositEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<DepositEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<DepositEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[DepositEvent] {
        &self.events
    }

    /// Number of collected events of the given kind.
    pub fn count(&self, kind: DepositEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: DepositEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: DepositEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            if sink.wants(event.kind()) {
                sink.send(event.clone());
            }
        }
        if last.wants(event.kind()) {
            last.send(event);
        }
    }

    fn wants(&self, kind: DepositEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
