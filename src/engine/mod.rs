//! Tender lifecycle and bid admission.
//!
//! [`Engine`] is the only entry point the HTTP layer and the background sweeper use.
//! Every operation takes the caller's [`Viewer`] explicitly; reads that skip the
//! visibility check require a [`SystemAccess`] value.

pub mod aggregation;
pub mod bidding;
mod bids;
mod queries;
pub mod status;
mod tenders;
pub mod visibility;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::suppliers::{self, RegisterVendor};
use crate::models::tenders::Tender;
use crate::models::users::{CreateUserFromAuth, UserResponse};
use crate::store::{StoreError, TenderFilter, TenderStore};

pub use bidding::{Admission, BidGates};
pub use bids::BidFloor;
pub use status::SweepReport;
pub use visibility::{PortalUser, SystemAccess, Viewer, can_view};

pub struct Engine<S, C = SystemClock> {
    store: S,
    clock: C,
    config: EngineConfig,
    gates: BidGates,
}

impl<S: TenderStore, C: Clock> Engine<S, C> {
    pub fn new(store: S, clock: C, config: EngineConfig) -> Self {
        Self {
            store,
            clock,
            config,
            gates: BidGates::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn gates(&self) -> &BidGates {
        &self.gates
    }

    // ── Identity ──

    /// The stored profile of an authenticated portal user, created on first sight.
    pub async fn profile(&self, input: CreateUserFromAuth) -> Result<UserResponse, EngineError> {
        let user = self.store.find_or_create_user(input).await?;
        let supplier = self.store.supplier_for_user(user.id).await?;

        Ok(UserResponse {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            supplier_id: supplier.map(|s| s.id),
        })
    }

    /// Build the viewer for an authenticated portal user.
    pub async fn resolve_viewer(&self, input: CreateUserFromAuth) -> Result<Viewer, EngineError> {
        let profile = self.profile(input).await?;

        Ok(Viewer::Portal(PortalUser {
            user_id: profile.id,
            supplier_id: profile.supplier_id,
            role: profile.role,
        }))
    }

    /// Register a supplier company for the calling portal user.
    pub async fn register_vendor(
        &self,
        viewer: &Viewer,
        email: &str,
        input: RegisterVendor,
    ) -> Result<suppliers::Model, EngineError> {
        let Viewer::Portal(user) = viewer else {
            return Err(EngineError::permission("Sign in to register as a vendor"));
        };
        if user.supplier_id.is_some() {
            return Err(EngineError::validation("Email already registered"));
        }
        if input.company_name.trim().is_empty() {
            return Err(EngineError::validation("Company name is required"));
        }
        if input.contact_person.trim().is_empty() {
            return Err(EngineError::validation("Contact person is required"));
        }

        let supplier = suppliers::Model {
            id: Uuid::new_v4(),
            user_id: user.user_id,
            supplier_name: input.company_name.trim().to_string(),
            contact_person: input.contact_person.trim().to_string(),
            email: email.to_string(),
            phone: input.phone,
            tax_id: input.gst,
            created_at: self.clock.now(),
        };

        match self.store.insert_supplier(supplier).await {
            Ok(supplier) => {
                info!(supplier_id = %supplier.id, user_id = %user.user_id, "vendor registered");
                Ok(supplier)
            }
            Err(StoreError::Conflict(_)) => Err(EngineError::validation("Email already registered")),
            Err(e) => Err(e.into()),
        }
    }

    // ── Visibility ──

    /// Whether `viewer` may read the tender. Unknown ids are `NotFound`.
    pub async fn can_view(&self, viewer: &Viewer, tender_id: Uuid) -> Result<bool, EngineError> {
        let tender = self.load_tender(tender_id).await?;
        Ok(viewer.system_access().is_some() || can_view(viewer, &tender))
    }

    /// Fetch a tender for `viewer`, checking visibility before anything is returned.
    pub async fn tender_for(&self, viewer: &Viewer, tender_id: Uuid) -> Result<Tender, EngineError> {
        if let Some(access) = viewer.system_access() {
            return self.tender_as_system(access, tender_id).await;
        }

        let tender = self.load_tender(tender_id).await?;
        if !can_view(viewer, &tender) {
            return Err(EngineError::permission(
                "You are not authorized to view this tender",
            ));
        }
        Ok(tender)
    }

    /// Fetch a tender without a visibility check.
    pub async fn tender_as_system(
        &self,
        _access: SystemAccess,
        tender_id: Uuid,
    ) -> Result<Tender, EngineError> {
        self.load_tender(tender_id).await
    }

    /// Every tender `viewer` may read.
    pub async fn visible_tenders(&self, viewer: &Viewer) -> Result<Vec<Tender>, EngineError> {
        if viewer.system_access().is_some() {
            return Ok(self.store.list_tenders(TenderFilter::All).await?);
        }

        let filter = match viewer.supplier_id() {
            Some(supplier_id) => TenderFilter::VisibleToSupplier(supplier_id),
            None => TenderFilter::Published,
        };
        let tenders = self.store.list_tenders(filter).await?;
        Ok(tenders.into_iter().filter(|t| can_view(viewer, t)).collect())
    }

    async fn load_tender(&self, tender_id: Uuid) -> Result<Tender, EngineError> {
        self.store
            .get_tender(tender_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("Tender {tender_id} not found")))
    }

    // ── Status sweep ──

    /// Advance the status of every published tender as of `now`.
    ///
    /// Each tender is written with a compare-and-set on the status it was read with. A
    /// tender that fails (concurrent edit, store error) is logged and skipped; only a
    /// failure to list tenders aborts the pass.
    pub async fn run_status_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, EngineError> {
        let tenders = self.store.list_tenders(TenderFilter::Published).await?;
        let mut report = SweepReport::default();

        for tender in tenders {
            let header = &tender.header;
            let Some(next) = status::next_status(header, now, &self.config) else {
                report.unchanged += 1;
                continue;
            };

            match self.store.set_tender_status(header.id, header.status, next).await {
                Ok(()) => {
                    info!(tender_id = %header.id, from = ?header.status, to = ?next, "tender status advanced");
                    report.updated += 1;
                }
                Err(e) => {
                    warn!(tender_id = %header.id, "skipping tender in status sweep: {e}");
                    report.skipped += 1;
                }
            }
        }

        info!(
            updated = report.updated,
            skipped = report.skipped,
            unchanged = report.unchanged,
            "status sweep finished"
        );
        Ok(report)
    }
}

pub(crate) fn require_supplier(viewer: &Viewer) -> Result<Uuid, EngineError> {
    match viewer {
        Viewer::Anonymous => Err(EngineError::permission("Sign in as a supplier to continue")),
        Viewer::Portal(user) => user.supplier_id.ok_or_else(|| {
            EngineError::permission("Register your company as a vendor to continue")
        }),
    }
}

pub(crate) fn require_procurement(viewer: &Viewer) -> Result<SystemAccess, EngineError> {
    viewer
        .system_access()
        .ok_or_else(|| EngineError::permission("Only procurement users can do this"))
}
