use serde::Serialize;
use uuid::Uuid;

use crate::models::tenders::Tender;
use crate::models::users::Roles;

/// The identity an engine call is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewer {
    Anonymous,
    Portal(PortalUser),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortalUser {
    pub user_id: Uuid,
    /// The supplier company this user acts for, if registered.
    pub supplier_id: Option<Uuid>,
    pub role: Roles,
}

impl Viewer {
    pub fn supplier(user_id: Uuid, supplier_id: Uuid) -> Self {
        Viewer::Portal(PortalUser {
            user_id,
            supplier_id: Some(supplier_id),
            role: Roles::Supplier,
        })
    }

    pub fn procurement(user_id: Uuid) -> Self {
        Viewer::Portal(PortalUser {
            user_id,
            supplier_id: None,
            role: Roles::Procurement,
        })
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Portal(user) => Some(user.user_id),
        }
    }

    pub fn supplier_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Portal(user) => user.supplier_id,
        }
    }

    /// Elevated read access for procurement staff and admins.
    pub fn system_access(&self) -> Option<SystemAccess> {
        match self {
            Viewer::Portal(PortalUser {
                role: Roles::Procurement | Roles::Admin,
                ..
            }) => Some(SystemAccess::grant()),
            _ => None,
        }
    }
}

/// Capability to read tenders and bids without a visibility check.
///
/// Only obtainable from a procurement/admin [`Viewer`] or from inside the engine for
/// its own background work, so elevated reads are always visible at the call site.
#[derive(Debug, Clone, Copy)]
pub struct SystemAccess {
    _private: (),
}

impl SystemAccess {
    pub(crate) fn grant() -> Self {
        Self { _private: () }
    }
}

/// Decide whether `viewer` may read `tender`. First match wins:
/// published tenders are public, anonymous viewers see nothing else, and portal users
/// see invite-only tenders their supplier was invited to.
pub fn can_view(viewer: &Viewer, tender: &Tender) -> bool {
    if tender.header.published_on_website {
        return true;
    }

    match viewer {
        Viewer::Anonymous => false,
        Viewer::Portal(user) => user
            .supplier_id
            .is_some_and(|supplier_id| tender.is_invited(supplier_id)),
    }
}
