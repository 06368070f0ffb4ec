//! Comparison session: discards results of superseded requests.
//!
//! Every run takes a ticket from a monotonically increasing counter. When a
//! run completes, its result is published only if no newer run has started
//! since. A failed run leaves the last published comparison untouched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::compare::{compare, Comparison, CompareOptions};
use crate::error::CompareError;
use crate::fetch::QuoteSource;

/// Generation number handed to one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// The run was the newest one and its result is now the latest.
    Published(Arc<Comparison>),
    /// A newer run started before this one finished; its result was dropped.
    Superseded { ticket: u64, current: u64 },
}

#[derive(Default)]
pub struct ComparisonSession {
    generation: AtomicU64,
    latest: Mutex<Option<Arc<Comparison>>>,
}

impl ComparisonSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation. Any run holding an older ticket is now stale.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation()
    }

    /// The most recently published comparison, if any.
    pub fn latest(&self) -> Option<Arc<Comparison>> {
        self.latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Publishes `comparison` if `ticket` is still the newest generation.
    pub fn publish(&self, ticket: Ticket, comparison: Comparison) -> Outcome {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        let current = self.generation.load(Ordering::SeqCst);
        if current != ticket.generation() {
            tracing::debug!(
                ticket = ticket.generation(),
                current,
                "discarding superseded comparison"
            );
            return Outcome::Superseded {
                ticket: ticket.generation(),
                current,
            };
        }
        let comparison = Arc::new(comparison);
        *latest = Some(Arc::clone(&comparison));
        Outcome::Published(comparison)
    }

    /// Runs [`compare`] under a fresh ticket.
    ///
    /// Errors from a run that has already been superseded are swallowed and
    /// reported as [`Outcome::Superseded`]; the newer run owns the outcome.
    pub async fn run<S>(
        &self,
        source: &S,
        start: NaiveDate,
        end: NaiveDate,
        options: &CompareOptions,
    ) -> Result<Outcome, CompareError>
    where
        S: QuoteSource + Sync,
    {
        let ticket = self.begin();
        match compare(source, start, end, options).await {
            Ok(comparison) => Ok(self.publish(ticket, comparison)),
            Err(e) if !self.is_current(ticket) => {
                tracing::debug!(
                    ticket = ticket.generation(),
                    "superseded comparison failed: {}",
                    e
                );
                Ok(Outcome::Superseded {
                    ticket: ticket.generation(),
                    current: self.generation.load(Ordering::SeqCst),
                })
            }
            Err(e) => Err(e),
        }
    }
}
