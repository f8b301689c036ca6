//! Homepage category ordering.

use crate::documents::{collections, CategoryOrderDoc, CATEGORY_ORDER_ID};
use crate::error::CatalogResult;
use coursedb_store::Store;

/// Returns the configured category order.
///
/// Falls back to `["all"]` when no ordering has been saved yet.
pub fn category_order(store: &Store) -> CatalogResult<Vec<String>> {
    let doc = store
        .collection::<CategoryOrderDoc>(collections::CATEGORY_ORDER)
        .find_one(|d| d.id == CATEGORY_ORDER_ID)?;
    Ok(doc.map(|d| d.order).unwrap_or_else(|| vec!["all".to_string()]))
}

/// Replaces the category order.
pub fn set_category_order(store: &Store, order: Vec<String>) -> CatalogResult<()> {
    let doc = CategoryOrderDoc::new(order);
    store
        .collection::<CategoryOrderDoc>(collections::CATEGORY_ORDER)
        .replace_one(|d| d.id == CATEGORY_ORDER_ID, &doc, true)?;
    Ok(())
}
