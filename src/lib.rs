#![no_std]
#![warn(rust_2018_idioms, unreachable_pub, missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
//! A mutable, in-place URI container that strictly adheres to IETF
//! [RFC 3986].
//!
//! A [`Url`] stores a URI in its canonical ASCII form in one contiguous,
//! zero-terminated buffer, partitioned into the eight syntactic components
//! (scheme, user, password, host, port, path, query, fragment). Components
//! are read in place and mutated by splicing the buffer, so a `Url` never
//! holds more than one allocation; path segments and query parameters can
//! additionally be inserted, removed and replaced element by element.
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//!
//! # Examples
//!
//! ```
//! use urlbuf::Url;
//!
//! let mut url = Url::parse("http://user@example.com/a/b?k=v#frag")?;
//! assert_eq!(url.scheme(), "http");
//! assert_eq!(url.encoded_host(), "example.com");
//! assert_eq!(url.encoded_path(), "/a/b");
//!
//! url.set_user("")?;
//! url.set_fragment("")?;
//! url.append_param("page", Some("1"))?;
//! assert_eq!(url.as_str(), "http://example.com/a/b?k=v&page=1");
//! # Ok::<_, urlbuf::Error>(())
//! ```
//!
//! # Crate features
//!
//! - `std` (default): enables `std::error::Error` for [`Error`].
//! - `serde`: serialization as the encoded string and deserialization
//!   through [`Url::parse`].

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod buffer;
mod error;
mod fmt;
mod index;
mod ip;
mod params;
mod parser;
mod parts;
mod segments;
mod url;

/// Utilities for percent-encoding.
pub mod encoding;

pub use crate::{
    error::{Error, ErrorKind},
    params::{Param, Params},
    parts::HostKind,
    segments::Segments,
    url::Url,
};
