use tracing::info;
use uuid::Uuid;

use super::visibility::Viewer;
use super::{Engine, require_procurement, require_supplier};
use crate::clock::Clock;
use crate::error::EngineError;
use crate::models::rfq_queries::{self, CreateQuery, QueryStatus, UpdateQuery};
use crate::store::TenderStore;

impl<S: TenderStore, C: Clock> Engine<S, C> {
    /// Item groups allowed by an RFQ category. Blank or unknown names yield nothing.
    pub async fn category_item_groups(&self, category: &str) -> Result<Vec<String>, EngineError> {
        let category = category.trim();
        if category.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.category_item_groups(category).await?)
    }

    /// A supplier asks a question about a tender it can see.
    pub async fn ask_query(
        &self,
        viewer: &Viewer,
        tender_id: Uuid,
        input: CreateQuery,
    ) -> Result<rfq_queries::Model, EngineError> {
        let supplier_id = require_supplier(viewer)?;
        self.tender_for(viewer, tender_id).await?;
        if input.question.trim().is_empty() {
            return Err(EngineError::validation("Question cannot be empty"));
        }

        let query = rfq_queries::Model {
            id: Uuid::new_v4(),
            tender_id,
            supplier_id,
            question: input.question.trim().to_string(),
            response: None,
            status: QueryStatus::Pending,
            created_at: self.clock.now(),
            answered_at: None,
        };
        let query = self.store.insert_query(query).await?;
        info!(query_id = %query.id, tender_id = %tender_id, "rfq query raised");
        Ok(query)
    }

    /// Queries on a tender: all of them for procurement, the caller's own otherwise.
    pub async fn tender_queries(
        &self,
        viewer: &Viewer,
        tender_id: Uuid,
    ) -> Result<Vec<rfq_queries::Model>, EngineError> {
        if let Some(access) = viewer.system_access() {
            self.tender_as_system(access, tender_id).await?;
            return Ok(self.store.list_queries(tender_id, None).await?);
        }

        let supplier_id = require_supplier(viewer)?;
        self.tender_for(viewer, tender_id).await?;
        Ok(self.store.list_queries(tender_id, Some(supplier_id)).await?)
    }

    /// Procurement answers or re-statuses a query.
    ///
    /// A response cannot be saved while the query is still `Pending`.
    pub async fn answer_query(
        &self,
        viewer: &Viewer,
        query_id: Uuid,
        input: UpdateQuery,
    ) -> Result<rfq_queries::Model, EngineError> {
        require_procurement(viewer)?;
        let mut query = self
            .store
            .get_query(query_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("Query {query_id} not found")))?;

        if let Some(response) = input.response {
            query.response = Some(response);
        }
        if let Some(status) = input.status {
            query.status = status;
        }

        let has_response = query
            .response
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());
        if has_response && query.status == QueryStatus::Pending {
            return Err(EngineError::validation(
                "Please change status to 'Answered' before saving the response.",
            ));
        }
        query.answered_at = match query.status {
            QueryStatus::Answered => query.answered_at.or(Some(self.clock.now())),
            QueryStatus::Pending => None,
        };

        let query = self.store.update_query(query).await?;
        info!(query_id = %query.id, status = ?query.status, "rfq query updated");
        Ok(query)
    }
}
