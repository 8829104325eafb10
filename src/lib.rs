//! Inspection reports for stationary pressure vessels (TNS) and gas
//! installations (GZ).
//!
//! Reports are kept in a local JSON store, edited step by step, rendered as a
//! print-ready document and exported to PDF.

pub mod domain;
pub use domain::{
    Config, Editor, Field, FieldError, Report, ReportId, ReportKind, Status, StatusCounts, Step,
};

/// Local persistence of the report collection.
pub mod storage;
pub use storage::{FileStore, KeyValueStore, MemoryStore, ReportStore, StoreError};

pub mod render;
pub use render::{Document, render};

pub mod export;
pub mod extract;
