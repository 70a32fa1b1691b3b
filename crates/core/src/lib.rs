//! Rewrites OpenAPI documents into normal form.
//!
//! Inline definitions that a code generator would want to name (objects with
//! properties, string enums, arrays of those, request bodies, responses and
//! parameters) are promoted into `components` and replaced by references.
//!
//! ```no_run
//! use normapi_core::openapi::{flatten, load_path, to_string, Format};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = load_path(std::path::Path::new("api.yaml"))?;
//! flatten(&mut doc)?;
//! println!("{}", to_string(&doc, Format::Yaml)?);
//! # Ok(())
//! # }
//! ```

pub mod openapi;
