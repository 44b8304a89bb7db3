//! # Report Module
//!
//! CSV rendering for the export surface. Each function takes already
//! fetched rows and returns the full document as a `String`, headers
//! included, so callers decide where the bytes go (file, HTTP response,
//! clipboard).
//!
//! Formatting rules:
//! - Monetary columns are plain two-decimal values ("10.00"), no symbol
//! - Absent optionals render as the empty string
//! - Timestamps use `YYYY-MM-DD HH:MM:SS` in UTC

use csv::Writer;

use crate::error::{CoreError, CoreResult};
use crate::types::{Payment, Product, Sale};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders products as CSV with header
/// `ID,Name,Category,Price,Cost,Quantity,In Stock`.
///
/// ## Example
/// ```rust,ignore
/// let csv = products_csv(&repo.list().await?)?;
/// std::fs::write("inventory.csv", csv)?;
/// ```
pub fn products_csv(products: &[Product]) -> CoreResult<String> {
    let mut writer = Writer::from_writer(Vec::new());

    writer.write_record(["ID", "Name", "Category", "Price", "Cost", "Quantity", "In Stock"])?;

    for product in products {
        writer.write_record([
            product.id.as_str(),
            product.name.as_str(),
            product.category.as_deref().unwrap_or(""),
            &product.price().to_decimal_string(),
            &product.cost_price().to_decimal_string(),
            &product.quantity.to_string(),
            if product.in_stock { "true" } else { "false" },
        ])?;
    }

    finish(writer)
}

/// Renders sales as CSV with header `ID,Date,Total Amount,Status`.
pub fn sales_csv(sales: &[Sale]) -> CoreResult<String> {
    let mut writer = Writer::from_writer(Vec::new());

    writer.write_record(["ID", "Date", "Total Amount", "Status"])?;

    for sale in sales {
        writer.write_record([
            sale.id.as_str(),
            &sale.created_at.format(TIMESTAMP_FORMAT).to_string(),
            &sale.total_amount().to_decimal_string(),
            sale.status.as_str(),
        ])?;
    }

    finish(writer)
}

/// Renders payments as CSV with header
/// `ID,Sale ID,Amount,Currency,Method,Status,Date`.
pub fn payments_csv(payments: &[Payment]) -> CoreResult<String> {
    let mut writer = Writer::from_writer(Vec::new());

    writer.write_record(["ID", "Sale ID", "Amount", "Currency", "Method", "Status", "Date"])?;

    for payment in payments {
        writer.write_record([
            payment.id.as_str(),
            payment.sale_id.as_deref().unwrap_or(""),
            &payment.amount().to_decimal_string(),
            payment.currency.as_str(),
            payment.method.as_str(),
            payment.status.as_str(),
            &payment.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ])?;
    }

    finish(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> CoreResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::Report(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CoreError::Report(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
