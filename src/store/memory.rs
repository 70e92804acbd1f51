use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, StoreResult, TenderFilter, TenderStore};
use crate::models::DocStatus;
use crate::models::bids::{Bid, BidFilter};
use crate::models::rfq_queries;
use crate::models::suppliers;
use crate::models::tenders::{Tender, TenderStatus};
use crate::models::users::{self, CreateUserFromAuth};

#[derive(Default)]
struct Inner {
    tenders: HashMap<Uuid, Tender>,
    bids: HashMap<Uuid, Bid>,
    users: HashMap<Uuid, users::Model>,
    suppliers: HashMap<Uuid, suppliers::Model>,
    categories: HashMap<String, Vec<String>>,
    queries: HashMap<Uuid, rfq_queries::Model>,
}

impl Inner {
    fn lowest_submitted(&self, tender_id: Uuid, excluding: Uuid) -> Option<Decimal> {
        self.bids
            .values()
            .filter(|b| {
                b.tender_id == tender_id && b.id != excluding && b.doc_status == DocStatus::Submitted
            })
            .map(|b| b.grand_total)
            .min()
    }
}

/// In-process store. Every operation takes one lock, so each call is atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an RFQ category with its allowed item groups.
    pub async fn add_category(&self, name: &str, item_groups: &[&str]) {
        let mut inner = self.inner.write().await;
        inner.categories.insert(
            name.to_string(),
            item_groups.iter().map(|g| g.to_string()).collect(),
        );
    }

    /// Overwrite a user's role. Role administration lives outside the portal.
    pub async fn set_role(&self, user_id: Uuid, role: users::Roles) {
        let mut inner = self.inner.write().await;
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.role = role;
        }
    }
}

impl TenderStore for MemoryStore {
    async fn get_tender(&self, id: Uuid) -> StoreResult<Option<Tender>> {
        Ok(self.inner.read().await.tenders.get(&id).cloned())
    }

    async fn list_tenders(&self, filter: TenderFilter) -> StoreResult<Vec<Tender>> {
        let inner = self.inner.read().await;
        let mut tenders: Vec<Tender> = inner
            .tenders
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tenders.sort_by_key(|t| (t.header.created_at, t.header.id));
        Ok(tenders)
    }

    async fn save_tender(&self, mut tender: Tender) -> StoreResult<Tender> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.tenders.get(&tender.id()) {
            tender.header.status = existing.header.status;
            tender.header.doc_status = existing.header.doc_status;
        }
        inner.tenders.insert(tender.id(), tender.clone());
        Ok(tender)
    }

    async fn delete_tender(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let removed = inner.tenders.remove(&id).is_some();
        if removed {
            inner.bids.retain(|_, b| b.tender_id != id);
            inner.queries.retain(|_, q| q.tender_id != id);
        }
        Ok(removed)
    }

    async fn set_tender_status(
        &self,
        id: Uuid,
        expected: TenderStatus,
        next: TenderStatus,
    ) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let tender = inner
            .tenders
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("Tender {id} not found")))?;
        if tender.header.status != expected {
            return Err(StoreError::Conflict(format!(
                "Tender {id} status changed concurrently"
            )));
        }
        tender.header.status = next;
        Ok(())
    }

    async fn set_tender_doc_status(
        &self,
        id: Uuid,
        expected: DocStatus,
        next: DocStatus,
    ) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let tender = inner
            .tenders
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("Tender {id} not found")))?;
        if tender.header.doc_status != expected {
            return Err(StoreError::Conflict(format!(
                "Tender {id} was modified concurrently"
            )));
        }
        tender.header.doc_status = next;
        Ok(())
    }

    async fn get_bid(&self, id: Uuid) -> StoreResult<Option<Bid>> {
        Ok(self.inner.read().await.bids.get(&id).cloned())
    }

    async fn list_bids(&self, filter: BidFilter) -> StoreResult<Vec<Bid>> {
        let inner = self.inner.read().await;
        let mut bids: Vec<Bid> = inner
            .bids
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        bids.sort_by_key(|b| (b.created_at, b.id));
        Ok(bids)
    }

    async fn insert_bid(&self, bid: Bid) -> StoreResult<Bid> {
        let mut inner = self.inner.write().await;
        inner.bids.insert(bid.id, bid.clone());
        Ok(bid)
    }

    async fn lowest_submitted_bid(
        &self,
        tender_id: Uuid,
        excluding: Uuid,
    ) -> StoreResult<Option<Decimal>> {
        Ok(self.inner.read().await.lowest_submitted(tender_id, excluding))
    }

    async fn submit_bid(
        &self,
        bid_id: Uuid,
        expected_floor: Option<Decimal>,
        at: DateTime<Utc>,
    ) -> StoreResult<Bid> {
        let mut inner = self.inner.write().await;
        let bid = inner
            .bids
            .get(&bid_id)
            .ok_or_else(|| StoreError::NotFound(format!("Bid {bid_id} not found")))?;
        if bid.doc_status != DocStatus::Draft {
            return Err(StoreError::Conflict(format!(
                "Bid {bid_id} is no longer a draft"
            )));
        }
        if inner.lowest_submitted(bid.tender_id, bid_id) != expected_floor {
            return Err(StoreError::Conflict(
                "The lowest bid changed while your bid was being checked".to_string(),
            ));
        }

        let bid = inner
            .bids
            .get_mut(&bid_id)
            .ok_or_else(|| StoreError::NotFound(format!("Bid {bid_id} not found")))?;
        bid.doc_status = DocStatus::Submitted;
        bid.submitted_at = Some(at);
        Ok(bid.clone())
    }

    async fn cancel_bid(&self, bid_id: Uuid) -> StoreResult<Bid> {
        let mut inner = self.inner.write().await;
        let bid = inner
            .bids
            .get_mut(&bid_id)
            .ok_or_else(|| StoreError::NotFound(format!("Bid {bid_id} not found")))?;
        if bid.doc_status != DocStatus::Submitted {
            return Err(StoreError::Conflict(format!(
                "Bid {bid_id} is not submitted"
            )));
        }
        bid.doc_status = DocStatus::Cancelled;
        Ok(bid.clone())
    }

    async fn find_or_create_user(&self, input: CreateUserFromAuth) -> StoreResult<users::Model> {
        let mut inner = self.inner.write().await;
        let user = inner.users.entry(input.id).or_insert_with(|| users::Model {
            id: input.id,
            email: input.email,
            display_name: input.display_name,
            role: input.role,
            created_at: Utc::now(),
        });
        Ok(user.clone())
    }

    async fn supplier_for_user(&self, user_id: Uuid) -> StoreResult<Option<suppliers::Model>> {
        let inner = self.inner.read().await;
        Ok(inner
            .suppliers
            .values()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn insert_supplier(&self, supplier: suppliers::Model) -> StoreResult<suppliers::Model> {
        let mut inner = self.inner.write().await;
        if inner
            .suppliers
            .values()
            .any(|s| s.user_id == supplier.user_id || s.email == supplier.email)
        {
            return Err(StoreError::Conflict("Email already registered".to_string()));
        }
        inner.suppliers.insert(supplier.id, supplier.clone());
        Ok(supplier)
    }

    async fn category_item_groups(&self, category: &str) -> StoreResult<Vec<String>> {
        let inner = self.inner.read().await;
        Ok(inner.categories.get(category).cloned().unwrap_or_default())
    }

    async fn insert_query(&self, query: rfq_queries::Model) -> StoreResult<rfq_queries::Model> {
        let mut inner = self.inner.write().await;
        inner.queries.insert(query.id, query.clone());
        Ok(query)
    }

    async fn get_query(&self, id: Uuid) -> StoreResult<Option<rfq_queries::Model>> {
        Ok(self.inner.read().await.queries.get(&id).cloned())
    }

    async fn list_queries(
        &self,
        tender_id: Uuid,
        supplier_id: Option<Uuid>,
    ) -> StoreResult<Vec<rfq_queries::Model>> {
        let inner = self.inner.read().await;
        let mut queries: Vec<rfq_queries::Model> = inner
            .queries
            .values()
            .filter(|q| q.tender_id == tender_id && supplier_id.is_none_or(|s| q.supplier_id == s))
            .cloned()
            .collect();
        queries.sort_by_key(|q| (q.created_at, q.id));
        Ok(queries)
    }

    async fn update_query(&self, query: rfq_queries::Model) -> StoreResult<rfq_queries::Model> {
        let mut inner = self.inner.write().await;
        if !inner.queries.contains_key(&query.id) {
            return Err(StoreError::NotFound(format!("Query {} not found", query.id)));
        }
        inner.queries.insert(query.id, query.clone());
        Ok(query)
    }
}
