use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::models::tenders;

/// Result of checking a candidate bid against the decrement rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Admission {
    Accepted,
    Rejected(String),
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted)
    }
}

/// The decrement a tender enforces, if live bidding is on and a positive decrement is set.
pub fn active_decrement(tender: &tenders::Model) -> Option<Decimal> {
    if !tender.live_bidding_enabled {
        return None;
    }
    tender.min_bid_decrement.filter(|d| *d > Decimal::ZERO)
}

/// Largest amount the next bid may have, given the current lowest submitted bid.
pub fn max_allowed(lowest: Decimal, decrement: Decimal) -> Decimal {
    lowest - decrement
}

/// Check `grand_total` against the lowest of the other submitted bids on the tender.
///
/// The first bid on a tender is unconstrained, and a bid exactly `decrement` below the
/// current lowest is accepted.
pub fn admit(grand_total: Decimal, tender: &tenders::Model, lowest: Option<Decimal>) -> Admission {
    let Some(decrement) = active_decrement(tender) else {
        return Admission::Accepted;
    };
    let Some(lowest) = lowest else {
        return Admission::Accepted;
    };

    let max_allowed = max_allowed(lowest, decrement);
    if grand_total > max_allowed {
        Admission::Rejected(format!(
            "bid must be at least {} below current lowest bid {}; maximum allowed is {}",
            decrement.normalize(),
            lowest.normalize(),
            max_allowed.normalize(),
        ))
    } else {
        Admission::Accepted
    }
}

/// Per-tender exclusive sections for bid admission.
///
/// A gate is created on first use and dropped from the map once nobody holds or waits
/// on it.
#[derive(Default)]
pub struct BidGates {
    gates: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl BidGates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `tender_id`.
    pub async fn enter(&self, tender_id: Uuid) -> GateGuard<'_> {
        let gate = {
            let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
            gates.entry(tender_id).or_default().clone()
        };
        let guard = gate.lock_owned().await;
        GateGuard {
            gates: self,
            tender_id,
            guard: Some(guard),
        }
    }

    /// Number of tenders with a live gate.
    pub fn len(&self) -> usize {
        self.gates.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct GateGuard<'a> {
    gates: &'a BidGates,
    tender_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        // Release the tender lock before deciding whether the gate is still in use.
        drop(self.guard.take());
        let mut gates = self.gates.gates.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(gate) = gates.get(&self.tender_id) {
            if Arc::strong_count(gate) == 1 {
                gates.remove(&self.tender_id);
            }
        }
    }
}
