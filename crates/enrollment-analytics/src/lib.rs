//! Analytics engine for academic enrollment dashboards.
//!
//! The heart of the crate is [`analytics`]: a purely synchronous set of
//! aggregation functions that turn a flat list of enrollment records into the
//! KPIs, time series, distributions, rankings, and textual insights a
//! dashboard renders. [`import`] feeds it from spreadsheet exports and
//! [`store`] abstracts the relational backend that owns the records between
//! requests.

pub mod analytics;
pub mod config;
pub mod error;
pub mod import;
pub mod store;
pub mod telemetry;
