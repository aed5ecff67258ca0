#![allow(dead_code)]

use std::{
    cell::Cell,
    rc::Rc,
};

/// Counts constructions and drops of [`Tracked`] values.
#[derive(Clone, Default)]
pub struct Ledger {
    live: Rc<Cell<isize>>,
    drops: Rc<Cell<usize>>,
}

impl Ledger {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn make(&self, value: i32) -> Tracked {
        self.live.set(self.live.get() + 1);
        Tracked {
            value,
            ledger: self.clone(),
        }
    }

    pub fn live(&self) -> isize {
        self.live.get()
    }

    pub fn drops(&self) -> usize {
        self.drops.get()
    }
}

/// A value that reports its lifetime to a [`Ledger`].
pub struct Tracked {
    pub value: i32,
    ledger: Ledger,
}

impl Clone for Tracked {

    fn clone(&self) -> Self {
        self.ledger.make(self.value)
    }
}

impl Drop for Tracked {

    fn drop(&mut self) {
        self.ledger.live.set(self.ledger.live.get() - 1);
        self.ledger.drops.set(self.ledger.drops.get() + 1);
    }
}

impl PartialEq<i32> for Tracked {

    fn eq(&self, other: &i32) -> bool {
        self.value == *other
    }
}

impl core::fmt::Debug for Tracked {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Clones successfully `budget` times, then panics.
pub struct Fragile {
    pub value: i32,
    budget: Rc<Cell<usize>>,
}

impl Fragile {

    pub fn new(value: i32, budget: &Rc<Cell<usize>>) -> Self {
        Self {
            value,
            budget: budget.clone(),
        }
    }
}

impl Clone for Fragile {

    fn clone(&self) -> Self {
        let left = self.budget.get();
        if left == 0 {
            panic!("clone budget exhausted");
        }
        self.budget.set(left - 1);
        Self {
            value: self.value,
            budget: self.budget.clone(),
        }
    }
}

pub fn values<T: AsRef<[Tracked]>>(array: &T) -> Vec<i32> {
    array.as_ref().iter().map(|t| t.value).collect()
}
