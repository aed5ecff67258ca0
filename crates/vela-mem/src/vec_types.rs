mod iter;
mod dyn_array;

pub use iter::{Iter, IterMut};
pub use dyn_array::{DynArray, FixedArray};
