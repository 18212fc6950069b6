//! CSV rendering for back-office exports.
//!
//! Output contract: one header line plus one line per record (N records →
//! N+1 lines), every field quoted, embedded quotes doubled.

use emberpos_inventory::InventoryItem;
use emberpos_orders::Order;

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| quote(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render a header and rows as CSV text.
pub fn write_csv(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(line(
        &header.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
    ));
    for row in rows {
        lines.push(line(row));
    }
    lines.join("\n")
}

/// Orders export, one row per order.
pub fn orders_to_csv(orders: &[Order]) -> String {
    let rows: Vec<Vec<String>> = orders
        .iter()
        .map(|o| {
            vec![
                o.order_number().to_string(),
                o.status().as_str().to_string(),
                o.total_cents().to_string(),
                o.instructions().to_string(),
                o.cancel_reason().unwrap_or_default().to_string(),
                o.created_at().to_rfc3339(),
            ]
        })
        .collect();

    write_csv(
        &["order_number", "status", "total_cents", "instructions", "cancel_reason", "created_at"],
        &rows,
    )
}

/// Inventory export, one row per item.
pub fn inventory_to_csv(items: &[InventoryItem]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|i| {
            vec![
                i.name().to_string(),
                i.stock().to_string(),
                i.unit().to_string(),
            ]
        })
        .collect();

    write_csv(&["name", "stock", "unit"], &rows)
}
