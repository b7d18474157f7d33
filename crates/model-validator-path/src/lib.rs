//! model-validator-path - address parsing and resolution for model-level
//! validation.
//!
//! An address is a dotted path into a JSON document with optional bracket
//! groups for array access:
//!
//! - `user.name` - object fields
//! - `user.contacts[]` - the whole array
//! - `user.contacts[0]` - a single element
//! - `user.contacts[*].value` - every element
//!
//! Addresses are compiled once with [`Address::parse`] and resolved against
//! data with [`resolve`]. Wildcard segments expand into one [`Target`] per
//! element, each carrying its concrete address (`user.contacts[1].value`).
//!
//! # Example
//!
//! ```
//! use model_validator_path::{resolve, Address};
//! use serde_json::json;
//!
//! let data = json!({"titles": ["Mr.", ""]});
//! let address = Address::parse("titles[*]").unwrap();
//! let resolution = resolve(&address, &data);
//! assert_eq!(resolution.targets.len(), 2);
//! assert_eq!(resolution.targets[1].address, "titles[1]");
//! ```

mod parser;
mod resolve;
mod types;

pub use parser::parse_address;
pub use resolve::{resolve, Miss, Resolution, Target};
pub use types::{render_segments, Address, AddressError, Segment};
