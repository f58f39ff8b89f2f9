use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{DealError, Result};

/// Fixed, ordered list of claimable options.
///
/// Absolute indices are stable for the lifetime of the pool.
#[derive(Debug, Clone)]
pub struct OptionPool<O> {
    options: Vec<O>,
    index: HashMap<O, usize>,
}

impl<O> OptionPool<O>
where
    O: Clone + Eq + Hash + Debug,
{
    /// Build a pool; the same option twice is rejected.
    pub fn new(options: Vec<O>) -> Result<Self> {
        let mut index = HashMap::with_capacity(options.len());
        for (abs, option) in options.iter().enumerate() {
            if index.insert(option.clone(), abs).is_some() {
                return Err(DealError::DuplicateOption { option: format!("{:?}", option) });
            }
        }
        Ok(Self { options, index })
    }

    pub fn index_of(&self, option: &O) -> Option<usize> {
        self.index.get(option).copied()
    }

    pub fn contains(&self, option: &O) -> bool {
        self.index.contains_key(option)
    }
}

impl<O> OptionPool<O> {
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, abs: usize) -> Option<&O> {
        self.options.get(abs)
    }

    pub fn options(&self) -> &[O] {
        &self.options
    }
}
