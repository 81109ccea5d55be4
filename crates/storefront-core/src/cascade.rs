//! # Item Delete Plan
//!
//! Decides which invoices go away together with a deleted item.
//!
//! ## Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DELETE item 7                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  For every invoice linked to item 7 (counts taken BEFORE removal):     │
//! │                                                                         │
//! │   invoice 10: items {7}       count 1 ──► destroy invoice,             │
//! │                                           its invoice_items and        │
//! │                                           its transactions             │
//! │   invoice 11: items {7, 8}    count 2 ──► keep invoice                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Remove every invoice_item row of item 7, then item 7 itself           │
//! │                                                                         │
//! │  Invoice 11 survives with only item 8.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The plan is pure; `storefront-db` applies it inside one transaction.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::CASCADE_MAX_INVOICE_ITEMS;

/// One invoice_item row of the item being deleted, with the distinct item
/// count of its invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceLink {
    pub invoice_item_id: i64,
    pub invoice_id: i64,
    /// Distinct items on the invoice, the deleted item included.
    pub item_count: i64,
}

/// What deleting one item removes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletePlan {
    pub item_id: i64,
    /// Invoices destroyed with all their invoice_items and transactions.
    pub invoices_to_delete: Vec<i64>,
    /// Invoices that only lose the item's join rows.
    pub invoices_kept: Vec<i64>,
    /// The item's own invoice_item rows.
    pub invoice_items_to_remove: Vec<i64>,
}

impl DeletePlan {
    /// True when the item is not on any invoice.
    pub fn is_item_only(&self) -> bool {
        self.invoices_to_delete.is_empty() && self.invoice_items_to_remove.is_empty()
    }
}

/// Whether an invoice holding `item_count` distinct items is destroyed when
/// one of them is deleted.
pub fn invoice_goes_with_item(item_count: i64) -> bool {
    item_count <= CASCADE_MAX_INVOICE_ITEMS
}

/// Builds the delete plan for `item_id` from its invoice links.
///
/// Output ids are sorted and deduplicated.
pub fn plan_item_deletion(item_id: i64, links: &[InvoiceLink]) -> DeletePlan {
    let mut doomed = BTreeSet::new();
    let mut kept = BTreeSet::new();
    let mut rows = BTreeSet::new();

    for link in links {
        rows.insert(link.invoice_item_id);
        if invoice_goes_with_item(link.item_count) {
            doomed.insert(link.invoice_id);
        } else {
            kept.insert(link.invoice_id);
        }
    }

    DeletePlan {
        item_id,
        invoices_to_delete: doomed.into_iter().collect(),
        invoices_kept: kept.into_iter().collect(),
        invoice_items_to_remove: rows.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(invoice_item_id: i64, invoice_id: i64, item_count: i64) -> InvoiceLink {
        InvoiceLink {
            invoice_item_id,
            invoice_id,
            item_count,
        }
    }

    #[test]
    fn test_sole_item_invoice_is_deleted() {
        let plan = plan_item_deletion(7, &[link(100, 10, 1)]);

        assert_eq!(plan.invoices_to_delete, vec![10]);
        assert!(plan.invoices_kept.is_empty());
        assert_eq!(plan.invoice_items_to_remove, vec![100]);
    }

    #[test]
    fn test_shared_invoice_is_kept() {
        let plan = plan_item_deletion(7, &[link(100, 10, 1), link(101, 11, 2)]);

        assert_eq!(plan.invoices_to_delete, vec![10]);
        assert_eq!(plan.invoices_kept, vec![11]);
        assert_eq!(plan.invoice_items_to_remove, vec![100, 101]);
    }

    #[test]
    fn test_repeated_rows_on_one_invoice() {
        // Same item invoiced twice on invoice 12: still one distinct item.
        let plan = plan_item_deletion(7, &[link(102, 12, 1), link(103, 12, 1)]);

        assert_eq!(plan.invoices_to_delete, vec![12]);
        assert_eq!(plan.invoice_items_to_remove, vec![102, 103]);
    }

    #[test]
    fn test_item_without_invoices() {
        let plan = plan_item_deletion(7, &[]);
        assert!(plan.is_item_only());
        assert_eq!(plan.item_id, 7);
    }

    #[test]
    fn test_threshold() {
        assert!(invoice_goes_with_item(0));
        assert!(invoice_goes_with_item(1));
        assert!(!invoice_goes_with_item(2));
    }
}
