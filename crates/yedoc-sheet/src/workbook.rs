//! In-memory tabular model and the `.xlsx` adapters around it.
//!
//! The reconciliation engine itself only ever sees [`SheetData`] grids; the
//! workbook format is an edge concern kept to `read_workbook` /
//! `write_workbook`.

use std::path::Path;

use crate::error::{Error, Result};

pub const OBJECTS_SHEET: &str = "Objects_and_Groups";
pub const RELATIONS_SHEET: &str = "Relations";

/// Instructional header placed in cell (1,1) of the objects sheet.
pub const OBJECTS_HEADER: &str =
    "Object names below: indent one column per nesting level. Ids are managed automatically - do not edit.";

pub const RELATIONS_HEADER: [&str; 4] = ["Node 1", "Node 2", "Edge Label", "Owning Group"];

/// Row inserted under a group with no children, so the group still reads back
/// as a container (indentation is the only structural signal in the sheet).
pub const EMPTY_GROUP_PLACEHOLDER: &str = "<EMPTY>";

/// Separates a display name from its structural id when the bare name would
/// be ambiguous.
pub const NAME_ID_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    pub name: String,
    /// Cell grid, row-major, no header/data distinction at this layer.
    pub rows: Vec<Vec<String>>,
}

impl SheetData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookData {
    pub sheets: Vec<SheetData>,
}

impl WorkbookData {
    pub fn sheet(&self, name: &str) -> Option<&SheetData> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut SheetData> {
        self.sheets.iter_mut().find(|sheet| sheet.name == name)
    }
}

/// Writes the workbook to disk, replacing any existing file.
pub fn write_workbook(workbook: &WorkbookData, path: &Path) -> Result<()> {
    let mut book = umya_spreadsheet::new_file();
    for (index, sheet) in workbook.sheets.iter().enumerate() {
        if index == 0 {
            // `new_file` seeds one sheet; rename it instead of leaving an
            // empty "Sheet1" behind.
            if let Some(worksheet) = book.get_sheet_by_name_mut("Sheet1") {
                worksheet.set_name(sheet.name.clone());
            }
        } else {
            book.new_sheet(sheet.name.clone())
                .map_err(Error::workbook)?;
        }
        let Some(worksheet) = book.get_sheet_by_name_mut(&sheet.name) else {
            return Err(Error::workbook(format!("sheet '{}' vanished", sheet.name)));
        };
        for (row_index, row) in sheet.rows.iter().enumerate() {
            for (col_index, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                worksheet
                    .get_cell_mut(((col_index + 1) as u32, (row_index + 1) as u32))
                    .set_value(value.clone());
            }
        }
    }
    umya_spreadsheet::writer::xlsx::write(&book, path).map_err(Error::workbook)?;
    Ok(())
}

/// Loads a workbook from disk into the in-memory grid model. Trailing empty
/// cells and rows are trimmed.
pub fn read_workbook(path: &Path) -> Result<WorkbookData> {
    if !path.is_file() {
        return Err(Error::Core(yedoc_core::Error::FileNotFound {
            path: path.to_path_buf(),
        }));
    }
    let book = umya_spreadsheet::reader::xlsx::read(path).map_err(Error::workbook)?;
    let mut workbook = WorkbookData::default();
    for worksheet in book.get_sheet_collection() {
        let mut sheet = SheetData::new(worksheet.get_name());
        let highest_row = worksheet.get_highest_row();
        let highest_column = worksheet.get_highest_column();
        for row_index in 1..=highest_row {
            let mut row: Vec<String> = (1..=highest_column)
                .map(|col_index| worksheet.get_value((col_index, row_index)))
                .collect();
            while row.last().is_some_and(String::is_empty) {
                row.pop();
            }
            sheet.rows.push(row);
        }
        while sheet.rows.last().is_some_and(Vec::is_empty) {
            sheet.rows.pop();
        }
        workbook.sheets.push(sheet);
    }
    Ok(workbook)
}
