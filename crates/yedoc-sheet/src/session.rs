//! The bulk-edit session: export, hand off to a human, import.
//!
//! The session blocks on a confirmation gate between writing the template
//! and reading it back; declining aborts the whole operation with the graph
//! untouched. The host application is closed again on every exit path.

use std::path::{Path, PathBuf};

use yedoc_core::Graph;

use crate::error::{Error, Result};
use crate::export::{ExportedWorkbook, SheetMode, export_workbook};
use crate::import::{IdRemap, ReconcileReport, import_objects_and_hierarchy, import_relations};
use crate::workbook::{OBJECTS_SHEET, RELATIONS_SHEET, read_workbook, write_workbook};

/// The human-driven edit-and-save step, reduced to a yes/no gate. The wait is
/// unbounded; there is no timeout.
pub trait EditGate {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Gate that proceeds immediately. For scripted pipelines and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl EditGate for AutoConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

/// Gate around any yes/no callback.
pub struct GateFn<F: FnMut(&str) -> bool>(pub F);

impl<F: FnMut(&str) -> bool> EditGate for GateFn<F> {
    fn confirm(&mut self, message: &str) -> bool {
        (self.0)(message)
    }
}

/// Control surface of the desktop application that edits workbooks. The
/// application itself is out of scope; only these three operations matter to
/// the session.
pub trait SpreadsheetHost {
    fn open(&mut self, path: &Path) -> Result<()>;
    fn is_running(&self) -> bool;
    fn terminate(&mut self) -> Result<()>;
}

/// Host stand-in for environments where the workbook is edited out-of-band
/// (or not at all).
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

impl SpreadsheetHost for DetachedHost {
    fn open(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn is_running(&self) -> bool {
        false
    }

    fn terminate(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BulkEditOptions {
    pub mode: SheetMode,
    /// Workbook path; a temp-dir default when absent.
    pub workbook_path: Option<PathBuf>,
}

impl Default for BulkEditOptions {
    fn default() -> Self {
        Self {
            mode: SheetMode::ObjectsAndHierarchy,
            workbook_path: None,
        }
    }
}

/// Closes the host when the session ends, whichever way it ends.
struct HostGuard<'a> {
    host: &'a mut dyn SpreadsheetHost,
    opened: bool,
}

impl<'a> HostGuard<'a> {
    fn open(&mut self, path: &Path) -> Result<()> {
        self.host.open(path)?;
        self.opened = true;
        Ok(())
    }
}

impl Drop for HostGuard<'_> {
    fn drop(&mut self) {
        if self.opened {
            let _ = self.host.terminate();
        }
    }
}

/// Runs one full bulk-edit round-trip over `graph`.
///
/// The workbook file is owned by exactly one session at a time: a still
/// running host instance is terminated before the template is rewritten,
/// since the format cannot survive two writers.
pub fn manage_graph_data(
    graph: &mut Graph,
    host: &mut dyn SpreadsheetHost,
    gate: &mut dyn EditGate,
    options: BulkEditOptions,
) -> Result<ReconcileReport> {
    if options.mode == SheetMode::ObjectData {
        return Err(Error::Unsupported {
            feature: "object data reconciliation".to_string(),
        });
    }
    if host.is_running() {
        host.terminate()?;
    }

    let exported = export_workbook(graph, options.mode)?;
    let path = options
        .workbook_path
        .unwrap_or_else(|| std::env::temp_dir().join("yedoc_bulk_edit.xlsx"));
    write_workbook(&exported.workbook, &path)?;

    let mut guard = HostGuard {
        host,
        opened: false,
    };
    guard.open(&path)?;

    if !gate.confirm("Edit the workbook, save it, then confirm to apply the changes.") {
        return Err(Error::Aborted);
    }

    let edited = read_workbook(&path)?;
    apply_workbook(graph, &exported, &edited, options.mode)
}

/// The import half, usable directly when the workbook was produced and edited
/// out-of-band.
pub fn apply_workbook(
    graph: &mut Graph,
    exported: &ExportedWorkbook,
    edited: &crate::workbook::WorkbookData,
    mode: SheetMode,
) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();
    match mode {
        SheetMode::ObjectsAndHierarchy => {
            let sheet = edited.sheet(OBJECTS_SHEET).ok_or(Error::MissingSheet {
                name: OBJECTS_SHEET.to_string(),
            })?;
            import_objects_and_hierarchy(graph, &exported.snapshot, sheet, &mut report)?;
        }
        SheetMode::Relations => {
            let sheet = edited.sheet(RELATIONS_SHEET).ok_or(Error::MissingSheet {
                name: RELATIONS_SHEET.to_string(),
            })?;
            let remap = IdRemap::new();
            import_relations(graph, &exported.snapshot, &remap, sheet, &mut report)?;
        }
        SheetMode::ObjectData => {
            return Err(Error::Unsupported {
                feature: "object data reconciliation".to_string(),
            });
        }
    }
    Ok(report)
}
