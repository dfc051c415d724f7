//! Output generation for built reports.
//!
//! # Submodules
//!
//! - [`json`]: Writes a [`Report`](crate::report::Report) as JSON for the chart frontend
//! - [`markdown`]: Renders a report as Markdown tables for reading
//!
//! # Output Structure
//!
//! One file per reported category, named after its slug:
//!
//! ```text
//! json_output_dir/
//! ├── all.json
//! └── sports.json
//!
//! markdown_output_dir/
//! ├── all.md
//! └── sports.md
//! ```

pub mod json;
pub mod markdown;
