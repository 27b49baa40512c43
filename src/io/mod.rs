//! Input/output helpers.
//!
//! - CSV ingest into an untrusted raw table (`ingest`)
//! - fuzzy header resolution (`columns`)
//! - liberal JSON transport parsing and serialization (`transport`)

pub mod columns;
pub mod ingest;
pub mod transport;

pub use columns::*;
pub use ingest::*;
pub use transport::*;
