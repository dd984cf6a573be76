//! fdl-rs
//!
//! A lightweight Rust library for retrieving, aggregating, storing, and
//! visualizing openFDA drug-label data. Pairs with the `fdl` CLI.
//!
//! ### Features
//! - Fetch all labels of a manufacturer, paging through the 99-record API cap
//!   with a fixed inter-request delay
//! - Extract a tidy row per label: generic name, route, effective year,
//!   ingredient count, manufacturer
//! - Average ingredient count per year, or per year and administration route
//! - Save rows/aggregates as CSV or JSON; render SVG/PNG line or bar charts
//!
//! ### Example
//! ```no_run
//! use fdl_rs::{Client, stats, storage, viz};
//! use fdl_rs::viz::ChartKind;
//!
//! let client = Client::default();
//! let rows = client.fetch("AstraZeneca")?;
//! storage::save_csv(&rows, "astrazeneca_labels.csv")?;
//! let summaries = stats::average_by_year(&rows);
//! viz::plot_summaries(&summaries, "ingredients.png", 1000, 600, ChartKind::Line)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod models;
pub mod stats;
pub mod storage;
pub mod viz;

pub use api::{Client, PagePlan};
pub use models::{GroupKey, LabelRow, SearchPage};
pub use stats::IngredientSummary;
