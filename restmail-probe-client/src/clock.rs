//! Time and identifier sources for payload builders.
//!
//! Builders never read the wall clock themselves. Tests pass a
//! [`FixedClock`] and [`SequentialIds`] to get byte-for-byte reproducible
//! payloads.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, FixedOffset, Local};
use ulid::Ulid;

pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Supplies the per-message unique part of a `Message-ID`.
pub trait IdSource {
    fn next_id(&self) -> String;
}

/// The local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Random, lexicographically sortable identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UlidIds;

impl IdSource for UlidIds {
    fn next_id(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}

/// `1`, `2`, `3`, ...
#[derive(Debug, Default)]
pub struct SequentialIds(AtomicU64);

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        (self.0.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

impl<I: IdSource + ?Sized> IdSource for &I {
    fn next_id(&self) -> String {
        (**self).next_id()
    }
}
