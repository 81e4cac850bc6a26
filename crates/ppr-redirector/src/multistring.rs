//! Double-null-terminated name lists
//!
//! Enumeration calls return several strings in one buffer: each followed by a
//! terminator, the list followed by one more. An empty list is two
//! terminators. [`MultiStringBuilder`] appends whole names while they still fit
//! in the caller's capacity and stops at the first one that does not, so the
//! result never contains a partial name and always fits the destination.

use crate::encoding::ProfileChar;

/// A finished multi-string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiString<C> {
    units: Vec<C>,
    count: usize,
    total: usize,
    truncated: bool,
}

impl<C: ProfileChar> MultiString<C> {
    /// The list, including every terminator.
    pub fn as_units(&self) -> &[C] {
        &self.units
    }

    /// Length in units, including every terminator.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the list holds no names.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Names included in the list.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Names offered to the builder, including those that did not fit.
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Whether some names were left out for lack of space.
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Split back into names, mainly for diagnostics and tests.
    pub fn names(&self) -> Vec<String> {
        self.units
            .split(|&c| c == C::NUL)
            .filter(|name| !name.is_empty())
            .map(C::decode)
            .collect()
    }
}

/// Capacity-aware builder for [`MultiString`].
#[derive(Debug, Clone)]
pub struct MultiStringBuilder<C> {
    units: Vec<C>,
    capacity: usize,
    count: usize,
    total: usize,
    truncated: bool,
}

impl<C: ProfileChar> MultiStringBuilder<C> {
    /// Create a builder for a destination of `capacity` units.
    pub fn new(capacity: usize) -> Self {
        Self {
            units: Vec::new(),
            capacity,
            count: 0,
            total: 0,
            truncated: false,
        }
    }

    /// Append one name if it fits together with its terminator and the final
    /// list terminator.
    ///
    /// Once a name has been rejected every later name is rejected too. Empty
    /// names are skipped because they would end the list early.
    pub fn push(&mut self, name: &[C]) -> bool {
        if name.is_empty() {
            return false;
        }

        self.total += 1;
        if self.truncated {
            return false;
        }

        if self.units.len() + name.len() + 2 > self.capacity {
            self.truncated = true;
            return false;
        }

        self.units.extend_from_slice(name);
        self.units.push(C::NUL);
        self.count += 1;
        true
    }

    /// Append engine text, converting it to units first.
    pub fn push_str(&mut self, name: &str) -> bool {
        self.push(&C::encode(name))
    }

    /// Terminate the list.
    pub fn finish(mut self) -> MultiString<C> {
        if self.units.is_empty() {
            self.units.push(C::NUL);
        }
        self.units.push(C::NUL);

        MultiString {
            units: self.units,
            count: self.count,
            total: self.total,
            truncated: self.truncated,
        }
    }
}

impl<C: ProfileChar> MultiString<C> {
    /// Build a list from engine text names.
    pub fn from_names<'a, I>(names: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = MultiStringBuilder::new(capacity);
        for name in names {
            builder.push_str(name);
        }
        builder.finish()
    }
}
