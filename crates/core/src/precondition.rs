// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Precondition evaluation: tree-path existence assertions.
//!
//! Agents gate themselves on a conjunction of assertions over the
//! document tree. Evaluation has no side effects; an agent whose
//! assertions do not hold is a guaranteed no-op for the tick, which is
//! what makes repeated invocation safe.

use crate::talk::Talk;
use serde_json::Value;

/// One assertion over a slash-separated tree path, e.g. `"daemon"`,
/// `"ec2/host"`, `"request/index"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assertion {
    /// At least one node matches the path.
    Exists(&'static str),
    /// No node matches the path.
    Absent(&'static str),
}

impl Assertion {
    /// Evaluate against a serialized document.
    pub fn holds(&self, doc: &Value) -> bool {
        match self {
            Assertion::Exists(path) => node_exists(doc, path),
            Assertion::Absent(path) => !node_exists(doc, path),
        }
    }
}

/// A conjunction of assertions.
#[derive(Debug, Clone, Copy)]
pub struct Required<'a> {
    assertions: &'a [Assertion],
}

impl<'a> Required<'a> {
    pub fn new(assertions: &'a [Assertion]) -> Self {
        Self { assertions }
    }

    /// True when every assertion holds on the talk.
    pub fn satisfied_by(&self, talk: &Talk) -> bool {
        let doc = talk.to_value();
        self.assertions.iter().all(|a| a.holds(&doc))
    }
}

/// Walk the tree along `path`. Arrays are traversed element-wise, so
/// `"archive/index"` matches when any archived record carries an index.
/// A present-but-null node counts as absent.
fn node_exists(doc: &Value, path: &str) -> bool {
    let mut current: Vec<&Value> = vec![doc];
    for segment in path.split('/') {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Object(map) => {
                    if let Some(child) = map.get(segment) {
                        next.push(child);
                    }
                }
                Value::Array(items) => {
                    for item in items {
                        if let Value::Object(map) = item {
                            if let Some(child) = map.get(segment) {
                                next.push(child);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        if next.is_empty() {
            return false;
        }
        current = next;
    }
    current.iter().any(|v| !v.is_null())
}

#[cfg(test)]
#[path = "precondition_tests.rs"]
mod tests;
