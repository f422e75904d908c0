//! `urlid` turns 128 bit content hashes and numeric entity IDs into short, URL safe
//! strings and back.
//!
//! Every encoding uses one 64 symbol alphabet, a permutation of `[a-z0-9A-Z-_]`, so
//! the strings can go straight into a URL path segment without percent-encoding.
//!
//! - [`Hash128`] is a 128 bit hash with a canonical 32 digit hex form, and a base 64
//!   URL form of at most 22 symbols.
//! - [`Codec`] obfuscates `u64` database IDs into opaque link tokens so that
//!   sequential IDs don't look sequential. It is a bijection with public math, a
//!   deterrent against casual enumeration and not encryption.
//! - [`Field`] wraps an ID so that Serde emits the token and Diesel stores the integer.
//!
//! The alphabet and the link ID parameters are part of the token format. Set them
//! once per process with [`Config::set_global`] before anything encodes, and never
//! change them once tokens are out in the wild.
//!
//! # Usage
//!
//! ## Hashes
//!
//! ```
//! use urlid_rs::{is_valid_format, Hash128};
//!
//! let hash = Hash128::of(b"some content");
//! let hex = hash.to_hex();
//! assert!(is_valid_format(&hex));
//! assert_eq!(hex.parse::<Hash128>().unwrap(), hash);
//!
//! let token = hash.encode_url();
//! assert!(token.len() <= 22);
//! assert_eq!(Hash128::decode_url(&token).unwrap(), hash);
//! ```
//!
//! ## Link IDs
//!
//! ```
//! use urlid_rs::{Codec, Config};
//!
//! let codec = Codec::new(&Config::new());
//! let encoded = codec.encode(12345);
//! let decoded = codec.decode(&encoded).unwrap();
//! assert_eq!(encoded, "yNQRDJ52kpKxxX");
//! assert_eq!(decoded, 12345);
//! ```
//!
//! ## Generic `Field` API
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug)]
//! pub struct ExampleIdMarker;
//! impl urlid_rs::TypeMarker for ExampleIdMarker {
//!     fn name() -> &'static str { "example" }
//! }
//!
//! type ExampleId = urlid_rs::Field<ExampleIdMarker>;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Example {
//!     pub id: ExampleId,
//! }
//!
//! let obj = Example { id: ExampleId::new(12345) };
//! let obj_str = serde_json::to_string(&obj).unwrap();
//! assert_eq!(obj_str, "{\"id\":\"yNQRDJ52kpKxxX\"}");
//!
//! let back: Example = serde_json::from_str(&obj_str).unwrap();
//! assert_eq!(back.id.id(), 12345);
//! ```

mod alphabet;
pub mod cipher;
mod codec;
mod config;
mod error;
mod field;
mod hash;
pub mod radix;

pub use alphabet::{Alphabet, BASE};
pub use codec::Codec;
pub use config::{Config, ConfigError, DEFAULT_ADDEND, DEFAULT_MULTIPLIERS, DEFAULT_SHIFT};
pub use error::Error;
pub use field::{Field, TypeMarker};
pub use hash::{is_valid_format, Hash128, HASH_SEED};
