#![forbid(unsafe_code)]

//! Programmatic yEd GraphML documents.
//!
//! This facade re-exports the document object model from `yedoc-core` and,
//! behind the default-on `sheet` feature, the spreadsheet bulk-editing engine
//! from `yedoc-sheet`.
//!
//! ```
//! use yedoc::Graph;
//!
//! # fn demo() -> yedoc::Result<()> {
//! let mut graph = Graph::new();
//! let a = graph.add_node("a")?;
//! let b = graph.add_node("b")?;
//! graph.add_edge(a, b)?;
//! let text = graph.stringify();
//! assert!(text.contains("<graphml"));
//! # Ok(())
//! # }
//! ```

pub use yedoc_core::*;

#[cfg(feature = "sheet")]
pub mod sheet {
    //! Spreadsheet export and reconciliation.
    pub use yedoc_sheet::*;
}
