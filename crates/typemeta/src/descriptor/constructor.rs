// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Zero-argument constructors.

use std::any::Any;
use std::fmt;

fn construct_default<T: Any + Default>() -> Box<dyn Any> {
    Box::new(T::default())
}

/// Type-erased factory producing a default-initialized, heap-owned instance.
#[derive(Clone, Copy)]
pub struct ConstructorDescriptor {
    factory: fn() -> Box<dyn Any>,
}

impl ConstructorDescriptor {
    /// Constructor backed by `T::default()`.
    pub fn of<T: Any + Default>() -> Self {
        Self {
            factory: construct_default::<T>,
        }
    }

    /// Create a new instance; the caller owns it.
    pub fn construct(&self) -> Box<dyn Any> {
        (self.factory)()
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConstructorDescriptor")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_default() {
        let ctor = ConstructorDescriptor::of::<Vec<String>>();
        let instance = ctor.construct();
        assert_eq!(instance.downcast_ref::<Vec<String>>(), Some(&Vec::new()));

        let other = ctor.construct();
        assert!(other.downcast_ref::<String>().is_none());
    }
}
