//! `emberpos-reports`: CSV export and sales summaries for the back office.

pub mod csv;
pub mod sales;

pub use csv::{inventory_to_csv, orders_to_csv, write_csv};
pub use sales::{daily_sales, DailySales};
