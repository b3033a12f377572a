//! celltab-core - UI-agnostic sheet document model + storage.

pub mod document;
pub mod error;
pub mod names;
pub mod storage;

pub use document::{CellContents, CellValue, Sheet};
pub use error::{Result, SheetError};
pub use names::NamePolicy;

pub use celltab_engine::error::EvalError;
