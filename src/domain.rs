//! Domain models for inspection reports.
//!
//! This module contains the report record and its two variants, field
//! addressing, status classification, the step editor and configuration.

/// The report record, its identity and shared header.
pub mod report;
pub use report::{Details, Header, Report, ReportId, ReportKind};

/// Pressure vessel (TNS) specific data.
pub mod vessel;
pub use vessel::{MeasurementPoint, Measurements, VesselDetails};

/// Gas installation (GZ) specific data.
pub mod gas;
pub use gas::{CheckResult, ChecklistItem, GasDetails, TightnessResult};

/// Addressing individual report fields by name.
pub mod field;
pub use field::{Field, FieldError};

mod lenient;

mod status;
pub use status::{EXPIRY_WARNING_DAYS, Status, StatusCounts};

/// Per-variant step content.
pub mod steps;
pub use steps::{CannedConclusion, FieldSpec, Input, StepContent};

/// The multi-step report editor.
pub mod editor;
pub use editor::{Editor, Position, Step, StepError};

mod config;
pub use config::Config;
