//! Streaming median over a growing multiset of finite values.
//!
//! `lower` is a max-heap holding the smaller half, `upper` a min-heap holding
//! the larger half. Invariant: `lower.len() == upper.len()` or
//! `lower.len() == upper.len() + 1`, and every element of `lower` is `<=`
//! every element of `upper`. Insert is O(log n), median is O(1).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use serde::Deserialize;

/// Even-count rule for the two middle elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianRule {
    /// Mean of the two middle elements.
    #[default]
    Average,
    /// Sum of the two middle elements. Legacy behaviour, kept only for
    /// clients that depend on it.
    Sum,
}

#[derive(Debug, Clone, Default)]
pub struct MedianHeap {
    lower: BinaryHeap<OrderedFloat<f64>>,
    upper: BinaryHeap<Reverse<OrderedFloat<f64>>>,
}

impl MedianHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, v: f64) {
        let v = OrderedFloat(v);
        match self.lower.peek() {
            Some(&top) if v > top => self.upper.push(Reverse(v)),
            _ => self.lower.push(v),
        }

        if self.lower.len() > self.upper.len() + 1 {
            if let Some(x) = self.lower.pop() {
                self.upper.push(Reverse(x));
            }
        } else if self.upper.len() > self.lower.len() {
            if let Some(Reverse(x)) = self.upper.pop() {
                self.lower.push(x);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lower.len() + self.upper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// `None` only when empty.
    pub fn median(&self, rule: MedianRule) -> Option<f64> {
        let lo = self.lower.peek()?.into_inner();
        if self.lower.len() > self.upper.len() {
            return Some(lo);
        }
        let hi = self.upper.peek()?.0.into_inner();
        Some(match rule {
            MedianRule::Average => lo / 2.0 + hi / 2.0,
            MedianRule::Sum => lo + hi,
        })
    }
}
