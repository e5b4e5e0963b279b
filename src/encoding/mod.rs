//! Percent-encoding utilities.

pub(crate) mod table;

use alloc::{
    borrow::Cow,
    string::{FromUtf8Error, String},
    vec::Vec,
};
use core::{cmp::Ordering, hash, str};
use ref_cast::{ref_cast_custom, RefCastCustom};

use crate::error::{Error, Result};
pub(crate) use table::Table;

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Decodes a percent-encoded octet, assuming that the bytes are hexadecimal.
fn decode_octet(hi: u8, lo: u8) -> u8 {
    debug_assert!(hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit());
    OCTET_TABLE_HI[hi as usize] | OCTET_TABLE_LO[lo as usize]
}

/// Checks that every byte of `s` is either allowed by the table or part of a
/// well-formed percent-encoded octet.
///
/// The error index points at the first offending byte.
pub(crate) fn validate(s: &[u8], table: &Table) -> Result<()> {
    let mut i = 0;
    while i < s.len() {
        let x = s[i];
        if x == b'%' && table.allows_pct_encoded() {
            if i + 2 >= s.len()
                || !(table::HEXDIG.allows(s[i + 1]) && table::HEXDIG.allows(s[i + 2]))
            {
                return Err(Error::invalid_part(i));
            }
            i += 3;
        } else if table.allows(x) {
            i += 1;
        } else {
            return Err(Error::invalid_part(i));
        }
    }
    Ok(())
}

/// Returns the exact number of bytes [`encode_to`] writes for `s`.
pub(crate) fn encoded_size(s: &[u8], table: &Table) -> usize {
    s.iter()
        .map(|&x| if table.allows(x) { 1 } else { 3 })
        .sum()
}

/// Percent-encodes `s` into `dst`, which must be exactly
/// [`encoded_size`] bytes wide. Never writes a NUL byte.
pub(crate) fn encode_to(dst: &mut [u8], s: &[u8], table: &Table) {
    let mut i = 0;
    for &x in s {
        if table.allows(x) {
            dst[i] = x;
            i += 1;
        } else {
            dst[i] = b'%';
            dst[i + 1] = HEX_DIGITS[(x >> 4) as usize];
            dst[i + 2] = HEX_DIGITS[(x & 0xf) as usize];
            i += 3;
        }
    }
    debug_assert_eq!(i, dst.len());
}

/// Decodes a percent-encoded string, assuming that the string is properly
/// encoded. Returns `None` when no octet needs decoding.
pub(crate) fn decode(s: &[u8]) -> Option<Vec<u8>> {
    // Skip bytes that are not '%'.
    let mut i = s.iter().position(|&x| x == b'%')?;

    let mut buf = Vec::with_capacity(s.len());
    buf.extend_from_slice(&s[..i]);

    while i < s.len() {
        let x = s[i];
        if x == b'%' {
            buf.push(decode_octet(s[i + 1], s[i + 2]));
            i += 3;
        } else {
            buf.push(x);
            i += 1;
        }
    }
    Some(buf)
}

fn next_decoded(s: &[u8], i: &mut usize) -> Option<u8> {
    let x = *s.get(*i)?;
    if x == b'%' && *i + 2 < s.len() {
        let out = decode_octet(s[*i + 1], s[*i + 2]);
        *i += 3;
        Some(out)
    } else {
        *i += 1;
        Some(x)
    }
}

/// Compares two possibly percent-encoded byte strings by their decoded
/// octets. Used for query-key lookup.
pub(crate) fn key_equal(a: &[u8], b: &[u8]) -> bool {
    let (mut i, mut j) = (0, 0);
    loop {
        match (next_decoded(a, &mut i), next_decoded(b, &mut j)) {
            (Some(x), Some(y)) if x == y => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Bytes to splice into a part: either raw (pre-validated) or to be
/// percent-encoded through a table on the way in.
pub(crate) struct Fill<'a> {
    src: &'a [u8],
    table: Option<&'static Table>,
}

impl<'a> Fill<'a> {
    pub(crate) fn raw(src: &'a [u8]) -> Self {
        Fill { src, table: None }
    }

    pub(crate) fn encoded(src: &'a [u8], table: &'static Table) -> Self {
        Fill {
            src,
            table: Some(table),
        }
    }

    pub(crate) fn src(&self) -> &'a [u8] {
        self.src
    }

    pub(crate) fn table(&self) -> Option<&'static Table> {
        self.table
    }

    pub(crate) fn len(&self) -> usize {
        match self.table {
            Some(t) => encoded_size(self.src, t),
            None => self.src.len(),
        }
    }

    pub(crate) fn write(&self, dst: &mut [u8]) {
        match self.table {
            Some(t) => encode_to(dst, self.src, t),
            None => dst.copy_from_slice(self.src),
        }
    }
}

/// Percent-encoded string slices.
///
/// Component getters return `&EStr` wherever the stored bytes may contain
/// percent-encoded octets; call [`decode`](Self::decode) to obtain the
/// original data.
///
/// # Comparison
///
/// `EStr` slices are compared [lexicographically](Ord#lexicographical-comparison)
/// by their byte values. Normalization is **not** performed prior to
/// comparison.
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct EStr {
    inner: str,
}

impl EStr {
    /// Converts a string slice to an `EStr` slice assuming validity.
    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Self;

    /// An empty `EStr` slice.
    pub const EMPTY: &'static Self = Self::new_validated("");

    /// Converts validated ASCII bytes to an `EStr` slice.
    pub(crate) fn from_ascii(s: &[u8]) -> &Self {
        debug_assert!(s.is_ascii());
        // SAFETY: The caller (the container) only stores validated ASCII.
        Self::new_validated(unsafe { str::from_utf8_unchecked(s) })
    }

    /// Yields the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the length of the `EStr` slice in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the `EStr` slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Decodes the `EStr` slice.
    ///
    /// This method allocates only when the slice contains any
    /// percent-encoded octet.
    ///
    /// # Examples
    ///
    /// ```
    /// use urlbuf::Url;
    ///
    /// let url = Url::parse("//example.com/%C2%A1Hola%21")?;
    /// let path = url.encoded_path();
    /// assert_eq!(path.as_str(), "/%C2%A1Hola%21");
    /// assert_eq!(path.decode().into_string_lossy(), "/¡Hola!");
    /// # Ok::<_, urlbuf::Error>(())
    /// ```
    #[must_use]
    pub fn decode(&self) -> Decode<'_> {
        match decode(self.inner.as_bytes()) {
            Some(vec) => Decode::Owned(vec),
            None => Decode::Borrowed(self.as_str()),
        }
    }
}

impl AsRef<str> for EStr {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl PartialEq for EStr {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl PartialEq<str> for EStr {
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl PartialEq<EStr> for str {
    fn eq(&self, other: &EStr) -> bool {
        self == &other.inner
    }
}

impl PartialEq<&str> for EStr {
    fn eq(&self, other: &&str) -> bool {
        &self.inner == *other
    }
}

impl Eq for EStr {}

impl hash::Hash for EStr {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl PartialOrd for EStr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EStr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl Default for &EStr {
    /// Creates an empty `EStr` slice.
    fn default() -> Self {
        EStr::EMPTY
    }
}

/// A wrapper of percent-decoded bytes.
///
/// This enum is created by [`EStr::decode`].
#[derive(Clone, Debug)]
pub enum Decode<'a> {
    /// No percent-encoded octets are decoded.
    Borrowed(&'a str),
    /// One or more percent-encoded octets are decoded.
    Owned(Vec<u8>),
}

impl<'a> Decode<'a> {
    /// Returns a reference to the decoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Borrowed(s) => s.as_bytes(),
            Self::Owned(vec) => vec,
        }
    }

    /// Consumes this `Decode` and yields the underlying decoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Cow<'a, [u8]> {
        match self {
            Self::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
            Self::Owned(vec) => Cow::Owned(vec),
        }
    }

    /// Converts the decoded bytes to a string.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the bytes are not valid UTF-8.
    pub fn into_string(self) -> core::result::Result<Cow<'a, str>, FromUtf8Error> {
        match self {
            Self::Borrowed(s) => Ok(Cow::Borrowed(s)),
            Self::Owned(vec) => String::from_utf8(vec).map(Cow::Owned),
        }
    }

    /// Converts the decoded bytes to a string, replacing invalid UTF-8
    /// sequences.
    #[must_use]
    pub fn into_string_lossy(self) -> Cow<'a, str> {
        match self.into_string() {
            Ok(string) => string,
            Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        }
    }
}
