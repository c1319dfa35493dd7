#![forbid(unsafe_code)]

//! Bidirectional synchronization between a yedoc graph and a two-sheet
//! workbook for bulk human editing.
//!
//! Export flattens the ownership tree into an indent-positioned object sheet
//! and a relations sheet; import diffs the edited sheets against the
//! pre-export statistics snapshot and replays the structural deltas
//! (create / rename / re-parent / retype / delete) onto the graph.

pub mod error;
pub mod export;
pub mod import;
pub mod session;
pub mod workbook;

pub use error::{Error, Result};
pub use export::{ExportedWorkbook, SheetMode, export_workbook};
pub use import::{IdRemap, ReconcileReport, import_objects_and_hierarchy, import_relations};
pub use session::{
    AutoConfirm, BulkEditOptions, DetachedHost, EditGate, GateFn, SpreadsheetHost, apply_workbook,
    manage_graph_data,
};
pub use workbook::{
    EMPTY_GROUP_PLACEHOLDER, NAME_ID_SEPARATOR, OBJECTS_HEADER, OBJECTS_SHEET, RELATIONS_HEADER,
    RELATIONS_SHEET, SheetData, WorkbookData, read_workbook, write_workbook,
};

#[cfg(test)]
mod tests;
