//! Dynamic variable resolution for JSON filter trees.
//!
//! A filter is a nested JSON object whose keys are field names or operators
//! (`_eq`, `_in`, `_and`, ...). Leaf values may hold dynamic variable tokens
//! such as `$NOW(-1 day)` or `$CURRENT_USER.department.id` that only make
//! sense at query time. [`parse_filter`] walks the tree and produces a new one
//! with those tokens replaced by concrete values.
//!
//! # Examples
//!
//! ```
//! use dynfilter::{parse_filter, Accountability, Filter, ParseContext};
//! use serde_json::json;
//!
//! let filter: Filter = r#"{"owner": {"_in": ["$CURRENT_USER", 5]}}"#.parse().unwrap();
//! let accountability = Accountability::new(Some("u1"), None);
//!
//! let resolved = parse_filter(Some(&filter), Some(&accountability), &ParseContext::default())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(resolved.into_value(), json!({"owner": {"_in": ["u1", 5]}}));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adjust;
pub mod context;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod resolve;
pub mod variable;

pub use adjust::{adjust_date, DateAdjustment};
pub use context::{Accountability, ParseContext};
pub use error::{Error, Result};
pub use filter::{Filter, FilterKey, LogicalOperator, MULTI_VALUE_OPERATORS};
pub use lookup::get;
pub use resolve::{parse_filter, FilterResolver, MAX_FILTER_DEPTH};
pub use variable::{is_dynamic_variable, DynamicVariable};
