//! Oxips: IPS binary patch encoding, decoding, and diffing in Rust.
//!
//! The crate provides:
//! - A pure-Rust IPS codec and differ (`ips`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use oxips::ips::{self, Patch};
//!
//! let source = b"hello old world";
//! let target = b"hello new world";
//!
//! let patch = ips::diff(source, target).unwrap();
//! let encoded = patch.encode();
//!
//! let decoded = Patch::decode(&encoded).unwrap();
//! assert_eq!(decoded.apply_copy(source), target);
//! ```

pub mod io;
pub mod ips;

#[cfg(feature = "cli")]
pub mod cli;
