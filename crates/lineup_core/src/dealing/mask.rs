//! Absolute/relative index bijection.
//!
//! A mask is the ascending list of absolute pool indices a dealer can
//! currently see. The relative position of an option is its rank in that
//! list, which is also its row in the dealer's view.

use crate::error::{DealError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mask {
    indices: Vec<usize>,
}

impl Mask {
    /// All of `0..len`, in order.
    pub fn full(len: usize) -> Self {
        Self { indices: (0..len).collect() }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, abs: usize) -> bool {
        self.indices.binary_search(&abs).is_ok()
    }

    pub fn absolute_at(&self, rel: usize) -> Option<usize> {
        self.indices.get(rel).copied()
    }

    pub fn relative_of(&self, abs: usize) -> Option<usize> {
        self.indices.binary_search(&abs).ok()
    }

    /// Remove `abs`, returning the relative position it occupied.
    pub fn retire(&mut self, abs: usize) -> Result<usize> {
        match self.indices.binary_search(&abs) {
            Ok(rel) => {
                self.indices.remove(rel);
                Ok(rel)
            }
            Err(_) => Err(DealError::InvariantViolation(format!(
                "retire of index {} which is not in the mask",
                abs
            ))),
        }
    }

    /// Reinsert `abs` at its sorted position, returning that relative position.
    pub fn restore(&mut self, abs: usize) -> Result<usize> {
        match self.indices.binary_search(&abs) {
            Ok(_) => Err(DealError::InvariantViolation(format!(
                "restore of index {} which is already in the mask",
                abs
            ))),
            Err(rel) => {
                self.indices.insert(rel, abs);
                Ok(rel)
            }
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}
