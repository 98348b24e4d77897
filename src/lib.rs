//! apexdoc — rebuild the namespace / class / method hierarchy of a reference
//! manual that was flattened to plain text.
//!
//! The input is one string, optionally carrying `[PAGE_n]` ... `[/PAGE_n]`
//! markers around each page. Hierarchy is recovered purely from heading lines
//! (`System Namespace`, `Database Class`, `public static ... insert(...)`,
//! `Insert Statement`) by scanning nested byte spans of that one buffer.
//!
//! ```no_run
//! let text = std::fs::read_to_string("apex_reference.txt").unwrap();
//! let doc = apexdoc::parse(&text);
//! for ns in &doc.namespaces {
//!     println!("{} ({} classes)", ns.name, ns.classes.len());
//! }
//! ```

pub mod clean;
pub mod document;
pub mod extract;
pub mod model;
pub mod pages;
pub mod patterns;
pub mod render;
pub mod scanner;
pub mod signature;

pub use document::{parse, parse_with};
pub use model::{Class, Document, Method, Namespace, PageRange, Parameter, Statement};
pub use patterns::{ConfigError, PatternConfig, Patterns};
