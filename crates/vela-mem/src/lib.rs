//! Growable contiguous arrays with explicit control over allocation and element
//! lifetimes.
//!
//! [`RawBlock`] owns uninitialized storage and nothing else. [`DynArray`] sits on top of
//! a single block and is the only layer that constructs and drops elements.

mod macros;
mod errors;
mod global_alloc;
mod slot_ptr;

pub mod capacity_policy;
pub mod raw_block;
pub mod vec_types;

pub use errors::CapacityError;
pub use global_alloc::{GlobalAlloc, GLOBAL_ALLOC};
pub use capacity_policy::{CapacityPolicy, Doubling, Fixed};
pub use raw_block::RawBlock;
pub use slot_ptr::SlotPtr;
pub use vec_types::{DynArray, FixedArray, Iter, IterMut};

pub type Result<T> = core::result::Result<T, CapacityError>;
