use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::bidding::{self, Admission};
use super::visibility::{SystemAccess, Viewer};
use super::{Engine, require_procurement, require_supplier};
use crate::clock::Clock;
use crate::error::EngineError;
use crate::models::DocStatus;
use crate::models::bids::{Bid, BidFilter, CreateBid};
use crate::models::tenders::{Tender, TenderStatus};
use crate::store::{StoreError, TenderStore};

/// What a bidder may know about the live-bidding state of a tender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BidFloor {
    pub tender_id: Uuid,
    pub live_bidding_enabled: bool,
    pub min_bid_decrement: Option<Decimal>,
    pub lowest_bid: Option<Decimal>,
    /// Largest amount the next bid may have, when the decrement rule applies.
    pub max_allowed: Option<Decimal>,
    pub submitted_bids: usize,
}

impl<S: TenderStore, C: Clock> Engine<S, C> {
    /// Check a candidate bid against the tender's decrement rule.
    ///
    /// Read-only: this neither takes the tender's admission gate nor persists anything.
    /// [`Engine::submit_bid`] runs the same check inside the gate.
    pub async fn validate_bid(&self, candidate: &Bid, tender_id: Uuid) -> Result<Admission, EngineError> {
        let tender = self.tender_as_system(SystemAccess::grant(), tender_id).await?;
        let (admission, _) = self.check_admission(candidate, &tender).await?;
        Ok(admission)
    }

    /// Create a draft bid on a tender the caller's supplier can see.
    pub async fn create_bid(
        &self,
        viewer: &Viewer,
        tender_id: Uuid,
        input: CreateBid,
    ) -> Result<Bid, EngineError> {
        let supplier_id = require_supplier(viewer)?;
        let tender = self.tender_for(viewer, tender_id).await?;
        self.ensure_open_for_bids(&tender)?;
        if input.grand_total <= Decimal::ZERO {
            return Err(EngineError::validation("Bid amount must be greater than zero"));
        }

        let bid = Bid {
            id: Uuid::new_v4(),
            tender_id,
            supplier_id,
            grand_total: input.grand_total,
            doc_status: DocStatus::Draft,
            created_at: self.clock.now(),
            submitted_at: None,
        };
        let bid = self.store.insert_bid(bid).await?;
        info!(bid_id = %bid.id, tender_id = %tender_id, supplier_id = %supplier_id, "draft bid created");
        Ok(bid)
    }

    /// Admit and submit a draft bid.
    ///
    /// Reading the current lowest bid, checking the decrement and persisting the bid
    /// happen inside the tender's admission gate. The store re-checks the floor when it
    /// persists; if another writer moved it the check runs once more against the new
    /// floor, and a second conflict is reported to the caller as `Conflict`.
    pub async fn submit_bid(&self, viewer: &Viewer, bid_id: Uuid) -> Result<Bid, EngineError> {
        let supplier_id = require_supplier(viewer)?;
        let bid = self.load_bid(bid_id).await?;
        if bid.supplier_id != supplier_id {
            return Err(EngineError::permission("You can only submit your own bids"));
        }
        if bid.doc_status != DocStatus::Draft {
            return Err(EngineError::validation("Only draft bids can be submitted"));
        }

        let _gate = self.gates.enter(bid.tender_id).await;
        let tender = self.tender_for(viewer, bid.tender_id).await?;
        self.ensure_open_for_bids(&tender)?;

        let mut retried = false;
        loop {
            let (admission, lowest) = self.check_admission(&bid, &tender).await?;
            if let Admission::Rejected(reason) = admission {
                warn!(bid_id = %bid.id, tender_id = %bid.tender_id, "bid rejected: {reason}");
                return Err(EngineError::Validation(reason));
            }

            match self.store.submit_bid(bid.id, lowest, self.clock.now()).await {
                Ok(submitted) => {
                    info!(bid_id = %submitted.id, tender_id = %submitted.tender_id, grand_total = %submitted.grand_total, "bid submitted");
                    return Ok(submitted);
                }
                Err(StoreError::Conflict(msg)) if !retried => {
                    warn!(bid_id = %bid.id, "bid admission raced another writer, retrying: {msg}");
                    retried = true;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Withdraw a submitted bid.
    pub async fn cancel_bid(&self, viewer: &Viewer, bid_id: Uuid) -> Result<Bid, EngineError> {
        let supplier_id = require_supplier(viewer)?;
        let bid = self.load_bid(bid_id).await?;
        if bid.supplier_id != supplier_id {
            return Err(EngineError::permission("You can only withdraw your own bids"));
        }
        if bid.doc_status != DocStatus::Submitted {
            return Err(EngineError::validation("Only submitted bids can be cancelled"));
        }

        let _gate = self.gates.enter(bid.tender_id).await;
        let cancelled = self.store.cancel_bid(bid_id).await?;
        info!(bid_id = %bid_id, tender_id = %cancelled.tender_id, "bid cancelled");
        Ok(cancelled)
    }

    /// A bid, for its supplier or for procurement.
    pub async fn bid_for(&self, viewer: &Viewer, bid_id: Uuid) -> Result<Bid, EngineError> {
        let bid = self.load_bid(bid_id).await?;
        let is_owner = viewer.supplier_id() == Some(bid.supplier_id);
        if !is_owner && viewer.system_access().is_none() {
            return Err(EngineError::permission("You can only view your own bids"));
        }
        Ok(bid)
    }

    /// All bids of the caller's supplier.
    pub async fn my_bids(&self, viewer: &Viewer) -> Result<Vec<Bid>, EngineError> {
        let supplier_id = require_supplier(viewer)?;
        let filter = BidFilter {
            supplier_id: Some(supplier_id),
            ..Default::default()
        };
        Ok(self.store.list_bids(filter).await?)
    }

    /// All bids on a tender. Procurement only.
    pub async fn tender_bids(&self, viewer: &Viewer, tender_id: Uuid) -> Result<Vec<Bid>, EngineError> {
        let access = require_procurement(viewer)?;
        self.tender_as_system(access, tender_id).await?;
        let filter = BidFilter {
            tender_id: Some(tender_id),
            ..Default::default()
        };
        Ok(self.store.list_bids(filter).await?)
    }

    /// Current lowest bid and next allowed amount, for anyone who can see the tender.
    pub async fn bid_floor(&self, viewer: &Viewer, tender_id: Uuid) -> Result<BidFloor, EngineError> {
        let tender = self.tender_for(viewer, tender_id).await?;
        let submitted = self
            .store
            .list_bids(BidFilter {
                tender_id: Some(tender_id),
                doc_status: Some(DocStatus::Submitted),
                ..Default::default()
            })
            .await?;

        let lowest_bid = submitted.iter().map(|b| b.grand_total).min();
        let decrement = bidding::active_decrement(&tender.header);
        let max_allowed = match (lowest_bid, decrement) {
            (Some(lowest), Some(decrement)) => Some(bidding::max_allowed(lowest, decrement)),
            _ => None,
        };

        Ok(BidFloor {
            tender_id,
            live_bidding_enabled: tender.header.live_bidding_enabled,
            min_bid_decrement: decrement,
            lowest_bid,
            max_allowed,
            submitted_bids: submitted.len(),
        })
    }

    async fn check_admission(
        &self,
        candidate: &Bid,
        tender: &Tender,
    ) -> Result<(Admission, Option<Decimal>), EngineError> {
        let lowest = self
            .store
            .lowest_submitted_bid(tender.id(), candidate.id)
            .await?;
        Ok((bidding::admit(candidate.grand_total, &tender.header, lowest), lowest))
    }

    fn ensure_open_for_bids(&self, tender: &Tender) -> Result<(), EngineError> {
        let header = &tender.header;
        if header.doc_status != DocStatus::Submitted {
            return Err(EngineError::validation("This tender is not accepting bids"));
        }
        if header.status == TenderStatus::Closed {
            return Err(EngineError::validation("This tender is closed for bidding"));
        }
        if header
            .submission_deadline
            .is_some_and(|deadline| deadline < self.clock.now())
        {
            return Err(EngineError::validation("The submission deadline has passed"));
        }
        Ok(())
    }

    async fn load_bid(&self, bid_id: Uuid) -> Result<Bid, EngineError> {
        self.store
            .get_bid(bid_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("Bid {bid_id} not found")))
    }
}
