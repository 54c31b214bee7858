//! glotx - i18n string extraction codemod
//!
//! glotx rewrites strings marked with a delimiter pattern (`"___Save___"` by
//! default) into translation calls such as `t("Save")`, adds the import and
//! acquisition statements the calls need, and collects the extracted values
//! for a translation file. JavaScript, TypeScript, JSX and Vue single-file
//! components are supported.
//!
//! ## Module Structure
//!
//! - `core`: Pure text transform of one file (see [`core::transform_source`])
//! - `batch`: Reading files and running the transform over many of them
//! - `scanner`: Source file discovery
//! - `config`: Configuration file loading and parsing
//! - `writer`: Extracted strings JSON output
//! - `cli`: Command-line interface layer
//! - `utils`: Shared position utilities

pub mod batch;
pub mod cli;
pub mod config;
pub mod core;
pub mod scanner;
pub mod utils;
pub mod writer;
