// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TypeIdentity: the `(name, hash)` address of a registered type.
//!
//! The hash is computed by applying MD5 to the UTF-8 bytes of the type name
//! and keeping the first 8 bytes (little endian). It only depends on the name,
//! so identities are stable across runs, builds and platforms.
//!
//! # Example
//!
//! ```rust
//! use typemeta::TypeIdentity;
//!
//! let id = TypeIdentity::new("int32");
//! assert_eq!(id.name(), "int32");
//! assert_eq!(id, TypeIdentity::new("int32"));
//! assert_eq!(id.hash(), TypeIdentity::compute_hash("int32"));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable `(name, hash)` pair naming a registered type.
///
/// Equality, hashing and ordering are by `(hash, name)`.
#[derive(Clone)]
pub struct TypeIdentity {
    name: String,
    hash: u64,
}

impl TypeIdentity {
    /// Create an identity from a type name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = Self::compute_hash(&name);
        Self { name, hash }
    }

    /// Compute the 64-bit identity hash of a type name.
    ///
    /// 1. MD5 over the name bytes (16 bytes)
    /// 2. Truncate to the first 8 bytes
    /// 3. Interpret as little endian `u64`
    pub fn compute_hash(name: &str) -> u64 {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(name.as_bytes());
        let result = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 64-bit identity hash.
    pub const fn hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.name == other.name
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
        self.name.hash(state);
    }
}

impl PartialOrd for TypeIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hash
            .cmp(&other.hash)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdentity({}, {:016x})", self.name, self.hash)
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
