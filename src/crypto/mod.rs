// Copyright (c) 2025 - Cowboy AI, LLC.

//! Cryptographic primitives for signature verification
//!
//! Verification only; the core never signs or issues anything. Every key
//! handle is scoped to the single call that needs it and all low-level
//! errors collapse to `false`, so no error state outlives an operation.

pub mod verify;

pub use verify::{verify_raw_signature, verify_with_issuer, HashAlgorithm};
