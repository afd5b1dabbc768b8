//! Per-block execution context handed to every keeper call

use crate::games::events::GameEvent;
use chrono::{DateTime, Utc};

/// Block height and time plus the side effects collected while executing.
///
/// The keeper reads time only from here, never from the wall clock, so replaying
/// a block with the same context yields the same state and events.
#[derive(Debug, Clone)]
pub struct BlockContext {
    height: u64,
    time: DateTime<Utc>,
    events: Vec<GameEvent>,
    gas_consumed: u64,
}

impl BlockContext {
    pub fn new(height: u64, time: DateTime<Utc>) -> Self {
        Self {
            height,
            time,
            events: Vec::new(),
            gas_consumed: 0,
        }
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn block_time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Move to the next block, keeping collected events and gas
    pub fn advance(&mut self, height: u64, time: DateTime<Utc>) {
        self.height = height;
        self.time = time;
    }

    pub fn emit(&mut self, event: GameEvent) {
        tracing::trace!(height = self.height, event_type = event.event_type(), "Emitting event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn consume_gas(&mut self, amount: u64, descriptor: &str) {
        tracing::trace!(amount, descriptor, "Consuming gas");
        self.gas_consumed = self.gas_consumed.saturating_add(amount);
    }

    pub fn refund_gas(&mut self, amount: u64, descriptor: &str) {
        tracing::trace!(amount, descriptor, "Refunding gas");
        self.gas_consumed = self.gas_consumed.saturating_sub(amount);
    }

    pub fn gas_consumed(&self) -> u64 {
        self.gas_consumed
    }
}
