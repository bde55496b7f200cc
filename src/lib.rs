//! # SmallAny: Type-Erased Values with Small Object Optimization
//!
//! [`SmallAny`] holds a single value of any `'static` type. Values that fit its inline space are
//! stored inside the container, larger or over-aligned ones on the heap. What the container can
//! do with the value besides storing it is chosen per container type, through a list of
//! [features](crate::features), and checked when the program is built.
//!
//! ## Core Concept
//!
//! `Box<dyn Any>` always heap-allocates and offers nothing beyond downcasting. [`SmallAny`]
//! avoids the allocation for small values, and lets a container type require that every stored
//! type can be compared, hashed, printed or added. Each stored type gets one shared
//! [`Table`] of operations per container configuration, built on first use.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! smallany = "0.1"
//! ```
//!
//! Basic usage:
//!
//! ```rust
//! use smallany::SmallAny;
//!
//! // 16 bytes of inline space
//! let mut value: SmallAny<16> = SmallAny::new(42u32);
//! assert!(value.inplace());
//! assert_eq!(value.downcast_ref::<u32>(), Some(&42));
//!
//! // Large values go to the heap
//! value.set([0u64; 8]);
//! assert!(!value.inplace());
//!
//! // Wrong type
//! assert!(value.cast_ref::<u32>().is_err());
//! ```
//!
//! ## Features
//!
//! The second type parameter lists the container's features, innermost last:
//!
//! ```rust
//! use std::collections::HashMap;
//! use smallany::SmallAny;
//! use smallany::features::{StrictEq, StrictHash};
//!
//! type Key = SmallAny<16, StrictEq<StrictHash>>;
//!
//! let mut map = HashMap::new();
//! map.insert(Key::from("one"), 1);
//! map.insert(Key::from("two"), 2);
//! assert_eq!(map[&Key::from("two")], 2);
//! ```
//!
//! Keys of a map should all hold the same type: comparing values of different types panics.
//!
//! See the [`features`] module for the full list.
//!
//! ## Logging
//!
//! Building an operation table emits a `trace` record through the [`log`] facade.

#![deny(missing_docs)]
#![deny(clippy::as_conversions)]

mod error;
pub mod features;
mod smallany;
pub mod space;
mod table;
mod type_name;
pub mod variant;

pub use crate::error::Error;
pub use crate::features::{Admits, Features};
pub use crate::smallany::SmallAny;
pub use crate::table::Table;
pub use crate::type_name::type_name;
