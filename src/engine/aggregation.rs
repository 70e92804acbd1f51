use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::tenders::Tender;

/// Recompute a tender's derived fields before it is persisted.
///
/// Line item amounts and header totals are always rebuilt from the unit budgets and
/// quantities; whatever was in the derived fields before is discarded. Publishing
/// requires a subject and a description and stamps `publish_date` the first time.
/// Running this on its own output changes nothing.
pub fn recompute(
    mut tender: Tender,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<Tender, EngineError> {
    let tender_id = tender.header.id;

    for (position, item) in tender.items.iter_mut().enumerate() {
        let row = position + 1;
        if item.item_code.trim().is_empty() {
            return Err(EngineError::validation(format!(
                "Item code is required on row {row}"
            )));
        }
        if item.qty.is_some_and(|q| q.is_sign_negative()) {
            return Err(EngineError::validation(format!(
                "Quantity cannot be negative on row {row}"
            )));
        }
        if item.unit_budget.is_some_and(|b| b.is_sign_negative()) {
            return Err(EngineError::validation(format!(
                "Budget cannot be negative on row {row}"
            )));
        }

        item.tender_id = tender_id;
        item.idx = row as i32;
        item.budget_amount = match (item.unit_budget, item.qty) {
            (Some(budget), Some(qty)) => Some(checked_product(budget, qty, row)?),
            _ => None,
        };
        item.budget_as_stock_uom = match (item.unit_budget, item.conversion_factor) {
            (Some(budget), Some(factor)) => Some(checked_product(budget, factor, row)?),
            _ => None,
        };
    }

    let mut total_budget = Decimal::ZERO;
    let mut total_quantity = Decimal::ZERO;
    for item in &tender.items {
        if let Some(amount) = item.budget_amount {
            total_budget = total_budget
                .checked_add(amount)
                .ok_or_else(|| EngineError::validation("Total budget is too large"))?;
        }
        total_quantity = total_quantity
            .checked_add(item.qty.unwrap_or(Decimal::ZERO))
            .ok_or_else(|| EngineError::validation("Total quantity is too large"))?;
    }

    let header = &mut tender.header;
    header.total_budget = total_budget;
    header.total_quantity = total_quantity;

    if header.min_bid_decrement.is_some_and(|d| d.is_sign_negative()) {
        return Err(EngineError::validation(
            "Minimum bid decrement cannot be negative",
        ));
    }
    if header.live_bidding_enabled && header.min_bid_decrement.is_none() {
        header.min_bid_decrement = config.default_min_bid_decrement;
    }

    if header.published_on_website {
        if is_blank(header.rfq_subject.as_deref()) {
            return Err(EngineError::validation(
                "RFQ Subject is mandatory when publishing on website",
            ));
        }
        if is_blank(header.rfq_description.as_deref()) {
            return Err(EngineError::validation(
                "RFQ Description is mandatory when publishing on website",
            ));
        }
        if header.publish_date.is_none() {
            header.publish_date = Some(now);
        }
    }

    Ok(tender)
}

fn checked_product(a: Decimal, b: Decimal, row: usize) -> Result<Decimal, EngineError> {
    a.checked_mul(b).ok_or_else(|| {
        EngineError::validation(format!("Budget amount is too large on row {row}"))
    })
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
