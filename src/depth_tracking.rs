//! Depth accounting for the host-object bridge (`ser.rs`/`de.rs`).
//!
//! Adapted from the teacher's `DepthTracker`: serde's `Serializer` trait is
//! driven incrementally (`serialize_seq` then one `serialize_element` call
//! per item, with no upfront view of the whole tree), so depth can't be
//! measured by simple recursion the way [`crate::encoder`] and
//! [`crate::decoder`] measure it against an explicit `Value` tree or a
//! length-prefixed byte stream. Instead we keep a stack of "how many more
//! child slots are open at this nesting level" counters: pushing a new
//! counter on entering a container, decrementing the top counter for every
//! value written (leaf or container), and popping counters that hit zero.
//! The stack's length at any instant is the current nesting depth.

use crate::error::{Error, ErrorKind};

/// What kind of container slot is being opened, and how many child slots it
/// has.
#[derive(Clone, Copy, Debug)]
pub enum ContainerStart {
    /// A `List` or `Tuple` with `len` elements.
    Seq(usize),
    /// A `Dict` built from a genuine `serde` map, with `len` entries; each
    /// entry consumes two child slots (key, then value), matching how
    /// `serde`'s `SerializeMap` visits them via `serialize_key` +
    /// `serialize_value`.
    Map(usize),
    /// A `Dict` built from a struct's (or struct variant's) `len` fields.
    /// Unlike [`ContainerStart::Map`], only the field *value* passes through
    /// the tracked serializer — `StructSerializer::serialize_field` writes
    /// the `&'static str` field name directly into the `Value` tree without
    /// ever calling [`DepthTracker::update`] for it — so each field consumes
    /// exactly one child slot, not two.
    Fields(usize),
    /// A single-entry `Dict` wrapping exactly one inner value: the variant
    /// name is written directly (no `update()` call for it, same reasoning
    /// as [`ContainerStart::Fields`]), and exactly one more `update()` call
    /// follows for the wrapped value.
    Tagged,
}

#[derive(Clone, Debug, Default)]
pub struct DepthTracker {
    tracking: Vec<u32>,
    bound: usize,
}

impl DepthTracker {
    pub fn new(bound: usize) -> Self {
        Self {
            tracking: Vec::new(),
            bound,
        }
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.tracking.len()
    }

    /// Account for writing one value (leaf or container). Call this before
    /// descending into a container's children.
    pub fn update(&mut self, start: Option<ContainerStart>) -> Result<(), Error> {
        if let Some(v) = self.tracking.last_mut() {
            *v -= 1;
        }

        match start {
            Some(ContainerStart::Seq(len)) => self.tracking.push(len as u32),
            Some(ContainerStart::Map(len)) => self.tracking.push(2 * len as u32),
            Some(ContainerStart::Fields(len)) => self.tracking.push(len as u32),
            Some(ContainerStart::Tagged) => self.tracking.push(1),
            None => (),
        }

        if self.tracking.len() > self.bound {
            return Err(Error::new(ErrorKind::DepthExceeded));
        }

        self.purge_zeros();
        Ok(())
    }

    fn purge_zeros(&mut self) {
        while matches!(self.tracking.last(), Some(0)) {
            self.tracking.pop();
        }
    }

    /// Drop a depth level before all of its children have been seen, for
    /// sequences/maps of unknown length that over-reserved a placeholder
    /// slot count.
    pub fn early_end(&mut self) {
        self.tracking.pop();
        self.purge_zeros();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_values_never_nest() {
        let mut t = DepthTracker::new(256);
        for _ in 0..10 {
            t.update(None).unwrap();
            assert_eq!(t.depth(), 0);
        }
    }

    #[test]
    fn nested_seqs_increase_then_decrease_depth() {
        let mut t = DepthTracker::new(256);
        t.update(Some(ContainerStart::Seq(1))).unwrap();
        assert_eq!(t.depth(), 1);
        t.update(Some(ContainerStart::Seq(1))).unwrap();
        assert_eq!(t.depth(), 2);
        t.update(None).unwrap();
        assert_eq!(t.depth(), 0);
    }

    #[test]
    fn exceeding_bound_fails() {
        let mut t = DepthTracker::new(2);
        t.update(Some(ContainerStart::Seq(1))).unwrap();
        t.update(Some(ContainerStart::Seq(1))).unwrap();
        assert_eq!(
            t.update(Some(ContainerStart::Seq(1))).unwrap_err().kind(),
            ErrorKind::DepthExceeded
        );
    }

    /// Simulates `serialize_struct(len=2)` followed by its two fields: the
    /// field names never call `update`, only the two field values do. The
    /// stack must fully unwind back to depth 0, the same as it would for
    /// any other two-child container.
    #[test]
    fn a_two_field_struct_fully_unwinds_back_to_zero() {
        let mut t = DepthTracker::new(256);
        t.update(Some(ContainerStart::Fields(2))).unwrap();
        assert_eq!(t.depth(), 1);
        t.update(None).unwrap(); // field 1's value
        t.update(None).unwrap(); // field 2's value
        assert_eq!(t.depth(), 0);
    }

    /// Many sibling structs processed one after another (as in a flat
    /// `Vec<Struct>`) must not accumulate stale frames: depth should return
    /// to the same baseline after each one.
    #[test]
    fn sibling_structs_leave_no_residue() {
        let mut t = DepthTracker::new(4);
        for _ in 0..1000 {
            t.update(Some(ContainerStart::Fields(3))).unwrap();
            t.update(None).unwrap();
            t.update(None).unwrap();
            t.update(None).unwrap();
            assert_eq!(t.depth(), 0);
        }
    }

    /// Simulates a newtype-variant wrapper (`Tagged`, one entry) immediately
    /// followed by the one value it wraps.
    #[test]
    fn tagged_wrapper_around_a_single_value_fully_unwinds() {
        let mut t = DepthTracker::new(256);
        t.update(Some(ContainerStart::Tagged)).unwrap();
        assert_eq!(t.depth(), 1);
        t.update(None).unwrap();
        assert_eq!(t.depth(), 0);
    }

    /// Simulates a struct-variant wrapper: `Tagged` (the single-entry dict)
    /// immediately followed by `Fields(len)` (the wrapped struct's fields).
    #[test]
    fn tagged_wrapper_around_a_struct_fully_unwinds() {
        let mut t = DepthTracker::new(256);
        t.update(Some(ContainerStart::Tagged)).unwrap();
        t.update(Some(ContainerStart::Fields(2))).unwrap();
        t.update(None).unwrap();
        t.update(None).unwrap();
        assert_eq!(t.depth(), 0);
    }
}
