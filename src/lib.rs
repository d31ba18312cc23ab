//! # rustyie — a declarative, schema-driven codec for tagged protocol messages
//!
//! This crate implements the IE composition/dispatch engine shared by
//! telecom and data protocols that frame their messages as tagged,
//! length-delimited, or otherwise schema-described binary (or JSON-like
//! text) structures — Diameter, GTP, ASN.1/BER, and Protobuf varints all
//! shape messages this way, each with its own wire-level conventions
//! layered on the same core: typed Information Elements (IEs) composed
//! into Sequence/Set/Choice containers, with a single schema driving
//! encode, decode, length calculation, printing, and structural copy.
//!
//! The octet codec ([`octet`]) is the primary, most fully specified flavor;
//! [`ber`], [`varint`], and [`json`] are secondary wire-format
//! implementations covering the same IE/field vocabulary for BER, Protobuf,
//! and JSON-like text respectively.
//!
//! ## Building a message type
//!
//! A message type is a plain struct of [`field::Mandatory`]/
//! [`field::Optional`]/[`field::MultiField`]-wrapped IEs, with hand-written
//! `encode`/`decode` methods that drive an [`octet::Encoder`]/
//! [`octet::Decoder`] field by field, in schema declaration order:
//!
//! ```
//! use rustyie::field::Mandatory;
//! use rustyie::ie::Value;
//! use rustyie::meta::{Meta, TagSpec};
//! use rustyie::octet::{Decoder, Encoder};
//!
//! struct Header {
//!     version: Mandatory<Value<1>>,
//! }
//!
//! impl Header {
//!     fn encode(&self, enc: &mut Encoder<'_>) -> rustyie::error::Result<()> {
//!         enc.mandatory("version", Meta::tag(TagSpec::new(1, 0x01)), &self.version)
//!     }
//!
//!     fn decode(&mut self, dec: &mut Decoder<'_>) -> rustyie::error::Result<()> {
//!         dec.mandatory("version", Meta::tag(TagSpec::new(1, 0x01)), &mut self.version)
//!     }
//! }
//!
//! let mut buf = [0u8; 2];
//! let mut header = Header { version: Mandatory::new() };
//! header.version.get_mut().set(3);
//! Encoder::new(&mut buf).mandatory("version", Meta::tag(TagSpec::new(1, 0x01)), &header.version).unwrap();
//! assert_eq!(buf, [0x01, 3]);
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod alloc;
pub mod ber;
pub mod buffer;
pub mod choice;
pub mod config;
pub mod copy;
pub mod error;
pub mod field;
pub mod ie;
pub mod json;
pub mod length;
pub mod meta;
pub mod octet;
pub mod padding;
pub mod printer;
pub mod sequence;
pub mod set;
pub mod varint;

pub use choice::{Alternatives, Choice};
pub use config::Config;
pub use copy::Copyable;
pub use error::{Error, ErrorContext, Result};
pub use field::{Mandatory, MultiField, Optional};
pub use ie::{BitString, Ie, IeKind, Null, OctetString, Value};
pub use octet::{Decoder, Encoder};
pub use padding::{Padding, PaddingMode};
pub use set::{SetMember, SetSchema};

/// Crate version, re-exported for runtime capability negotiation between
/// peers running different builds of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default inline capacity for a multi-field before it spills to an
/// allocator (§4.2: "`INPLACE = max` when bounded, or `MIN` when
/// unbounded"). Message types with a known small bound should prefer that
/// bound directly over this default.
pub const DEFAULT_MULTI_FIELD_INPLACE: usize = 4;
