use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::{Engine, aggregation, require_procurement, status};
use crate::clock::Clock;
use crate::error::EngineError;
use crate::models::DocStatus;
use crate::models::tender_items;
use crate::models::tenders::{self, SaveTender, Tender, TenderItemInput, TenderStatus};
use crate::store::TenderStore;

use super::visibility::Viewer;

impl<S: TenderStore, C: Clock> Engine<S, C> {
    /// Rebuild derived fields and enforce the publishing preconditions.
    pub fn recompute_aggregates(&self, tender: Tender) -> Result<Tender, EngineError> {
        aggregation::recompute(tender, self.clock.now(), &self.config)
    }

    /// Create a draft tender owned by the calling procurement user.
    pub async fn create_tender(
        &self,
        viewer: &Viewer,
        input: SaveTender,
    ) -> Result<Tender, EngineError> {
        require_procurement(viewer)?;
        let owner_id = viewer
            .user_id()
            .ok_or_else(|| EngineError::permission("Only procurement users can do this"))?;
        let now = self.clock.now();
        let id = Uuid::new_v4();

        let status = input
            .submission_deadline
            .map(|deadline| status::target_status(deadline, now, self.config.fence_days()))
            .unwrap_or(TenderStatus::Active);

        let header = tenders::Model {
            id,
            owner_id,
            rfq_subject: input.rfq_subject,
            rfq_description: input.rfq_description,
            category: input.category,
            published_on_website: input.published_on_website,
            publish_date: None,
            submission_deadline: input.submission_deadline,
            status,
            doc_status: DocStatus::Draft,
            live_bidding_enabled: input.live_bidding_enabled,
            min_bid_decrement: input.min_bid_decrement,
            total_budget: Decimal::ZERO,
            total_quantity: Decimal::ZERO,
            created_at: now,
            updated_at: None,
        };
        let tender = Tender {
            header,
            items: build_items(id, input.items),
            invited_suppliers: dedup(input.invited_suppliers),
        };

        let tender = self.recompute_aggregates(tender)?;
        let saved = self.store.save_tender(tender).await?;
        info!(tender_id = %saved.id(), published = saved.header.published_on_website, "tender created");
        Ok(saved)
    }

    /// Replace the content of a draft tender.
    ///
    /// `status`, `doc_status`, `publish_date` and the owner carry over from the stored
    /// tender; everything derived is recomputed.
    pub async fn update_tender(
        &self,
        viewer: &Viewer,
        tender_id: Uuid,
        input: SaveTender,
    ) -> Result<Tender, EngineError> {
        let access = require_procurement(viewer)?;
        let existing = self.tender_as_system(access, tender_id).await?;
        if existing.header.doc_status != DocStatus::Draft {
            return Err(EngineError::validation("Only draft tenders can be edited"));
        }

        let header = tenders::Model {
            rfq_subject: input.rfq_subject,
            rfq_description: input.rfq_description,
            category: input.category,
            published_on_website: input.published_on_website,
            submission_deadline: input.submission_deadline,
            live_bidding_enabled: input.live_bidding_enabled,
            min_bid_decrement: input.min_bid_decrement,
            updated_at: Some(self.clock.now()),
            ..existing.header
        };
        let tender = Tender {
            header,
            items: build_items(tender_id, input.items),
            invited_suppliers: dedup(input.invited_suppliers),
        };

        let tender = self.recompute_aggregates(tender)?;
        let saved = self.store.save_tender(tender).await?;
        info!(tender_id = %tender_id, "tender updated");
        Ok(saved)
    }

    pub async fn delete_tender(&self, viewer: &Viewer, tender_id: Uuid) -> Result<(), EngineError> {
        let access = require_procurement(viewer)?;
        let existing = self.tender_as_system(access, tender_id).await?;
        if existing.header.doc_status != DocStatus::Draft {
            return Err(EngineError::validation("Only draft tenders can be deleted"));
        }
        if !self.store.delete_tender(tender_id).await? {
            return Err(EngineError::not_found(format!("Tender {tender_id} not found")));
        }
        info!(tender_id = %tender_id, "tender deleted");
        Ok(())
    }

    /// Draft → Submitted. Bids are only accepted on submitted tenders.
    pub async fn submit_tender(&self, viewer: &Viewer, tender_id: Uuid) -> Result<Tender, EngineError> {
        let access = require_procurement(viewer)?;
        let existing = self.tender_as_system(access, tender_id).await?;
        if existing.header.doc_status != DocStatus::Draft {
            return Err(EngineError::validation("Only draft tenders can be submitted"));
        }
        if existing.items.is_empty() {
            return Err(EngineError::validation(
                "Add at least one item before submitting the tender",
            ));
        }

        self.store
            .set_tender_doc_status(tender_id, DocStatus::Draft, DocStatus::Submitted)
            .await?;
        info!(tender_id = %tender_id, "tender submitted");
        self.tender_as_system(access, tender_id).await
    }

    /// Submitted → Cancelled.
    pub async fn cancel_tender(&self, viewer: &Viewer, tender_id: Uuid) -> Result<Tender, EngineError> {
        let access = require_procurement(viewer)?;
        let existing = self.tender_as_system(access, tender_id).await?;
        if existing.header.doc_status != DocStatus::Submitted {
            return Err(EngineError::validation("Only submitted tenders can be cancelled"));
        }

        self.store
            .set_tender_doc_status(tender_id, DocStatus::Submitted, DocStatus::Cancelled)
            .await?;
        info!(tender_id = %tender_id, "tender cancelled");
        self.tender_as_system(access, tender_id).await
    }

    /// Explicitly reopen a closed tender, optionally moving its deadline.
    ///
    /// The status is re-derived from the (new) deadline, which must lie in the future.
    pub async fn reopen_tender(
        &self,
        viewer: &Viewer,
        tender_id: Uuid,
        new_deadline: Option<DateTime<Utc>>,
    ) -> Result<Tender, EngineError> {
        let access = require_procurement(viewer)?;
        let mut tender = self.tender_as_system(access, tender_id).await?;
        if tender.header.status != TenderStatus::Closed {
            return Err(EngineError::validation("Only closed tenders can be reopened"));
        }
        if tender.header.doc_status == DocStatus::Cancelled {
            return Err(EngineError::validation("Cancelled tenders cannot be reopened"));
        }

        let now = self.clock.now();
        let deadline = new_deadline
            .or(tender.header.submission_deadline)
            .filter(|deadline| *deadline > now)
            .ok_or_else(|| {
                EngineError::validation("Set a submission deadline in the future to reopen")
            })?;

        if tender.header.submission_deadline != Some(deadline) {
            tender.header.submission_deadline = Some(deadline);
            tender.header.updated_at = Some(now);
            self.store.save_tender(tender).await?;
        }

        let target = status::target_status(deadline, now, self.config.fence_days());
        self.store
            .set_tender_status(tender_id, TenderStatus::Closed, target)
            .await?;
        info!(tender_id = %tender_id, to = ?target, "tender reopened");
        self.tender_as_system(access, tender_id).await
    }
}

fn build_items(tender_id: Uuid, inputs: Vec<TenderItemInput>) -> Vec<tender_items::Model> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(position, input)| tender_items::Model {
            id: Uuid::new_v4(),
            tender_id,
            idx: position as i32 + 1,
            item_code: input.item_code,
            qty: input.qty,
            uom: input.uom,
            unit_budget: input.unit_budget,
            conversion_factor: input.conversion_factor,
            budget_amount: None,
            budget_as_stock_uom: None,
        })
        .collect()
}

fn dedup(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
    ids
}
