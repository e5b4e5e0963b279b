//! The mutable URI container.

use crate::{
    buffer::IndexedRef,
    encoding::{self, table, Decode, EStr, Fill},
    error::{Error, Result},
    parser,
    parts::{self, HostKind, PartsBuf, UrlParts},
};

/// A mutable, in-place URI.
///
/// A `Url` owns a single contiguous buffer holding the canonical ASCII form
/// of an [RFC 3986] URI reference, partitioned into its syntactic components.
/// Every component can be read, replaced or cleared individually; path
/// segments and query parameters additionally support element-level
/// mutation. All mutations splice the buffer in place.
///
/// Raw (`set_encoded_*`) setters take input that is already percent-encoded
/// and validate it; plain setters percent-encode their input. Passing an
/// empty string to a setter removes the component, cascading where the
/// grammar requires it (removing the last authority component also removes
/// the `//`).
///
/// [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
///
/// # Examples
///
/// ```
/// use urlbuf::Url;
///
/// let mut url = Url::parse("http://example.com/over/there")?;
/// url.set_scheme("https")?;
/// url.set_port_number(8042)?;
/// url.set_query("name=ferret")?;
/// assert_eq!(url.as_str(), "https://example.com:8042/over/there?name=ferret");
///
/// url.set_host("")?;
/// assert_eq!(url.as_str(), "https://:8042/over/there?name=ferret");
/// url.set_port("")?;
/// assert_eq!(url.as_str(), "https:/over/there?name=ferret");
/// # Ok::<_, urlbuf::Error>(())
/// ```
#[derive(Clone)]
pub struct Url {
    pub(crate) pts: PartsBuf,
}

impl Default for Url {
    /// Creates an empty URL.
    fn default() -> Url {
        Url::new()
    }
}

fn count(s: &[u8], b: u8) -> usize {
    s.iter().filter(|&&x| x == b).count()
}

impl Url {
    /// Creates an empty URL.
    ///
    /// No allocation happens until the first mutation.
    #[must_use]
    pub const fn new() -> Url {
        Url {
            pts: PartsBuf::new(),
        }
    }

    /// Parses a URI reference.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidPart`](crate::ErrorKind::InvalidPart)
    /// when the input does not match the `URI-reference` grammar; the error
    /// index points into the input.
    pub fn parse(s: &str) -> Result<Url> {
        let mut url = Url::new();
        url.set_url(s)?;
        Ok(url)
    }

    /// Replaces the entire content by reparsing, keeping the allocation when
    /// it is large enough.
    pub fn set_url(&mut self, s: &str) -> Result<()> {
        let pt = parser::parse_url(s.as_bytes())?;
        self.pts.copy_all(&pt, s.as_bytes())
    }

    /// Returns the stored URI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        EStr::from_ascii(self.pts.get_range(parts::SCHEME, parts::COUNT)).as_str()
    }

    /// Returns the scheme-through-port prefix, e.g. `http://example.com:80`.
    #[must_use]
    pub fn encoded_origin(&self) -> &str {
        EStr::from_ascii(self.pts.get_range(parts::SCHEME, parts::PATH)).as_str()
    }

    /// Replaces everything up to the path with a reparsed
    /// `scheme://authority` prefix. An empty input removes both.
    pub fn set_encoded_origin(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.pts.clear(parts::SCHEME, parts::PATH);
            return Ok(());
        }
        let pt = parser::parse_origin(s.as_bytes())?;
        let src = IndexedRef::new(&pt.index, s.as_bytes());
        self.pts.copy(src, &pt.data, parts::SCHEME, parts::PATH)
    }

    /// Returns `true` if no component is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pts.index().is_empty()
    }

    /// Returns the length of the stored URI in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pts.buf.len()
    }

    /// Usable capacity of the buffer in bytes, excluding the terminator
    /// slot.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pts.buf.capacity()
    }

    /// Pre-sizes the buffer for `additional` more bytes.
    ///
    /// Growth never over-allocates: repeated single-byte growth reallocates
    /// each time, so reserve up front when the final size is known.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.pts.buf.reserve_more(additional)
    }

    /// Removes every component, keeping the allocation.
    pub fn clear(&mut self) {
        self.pts.clear_all();
    }

    // -------- scheme --------

    /// Returns the scheme, without its trailing `:`.
    #[must_use]
    pub fn scheme(&self) -> &str {
        let s = self.pts.get(parts::SCHEME);
        EStr::from_ascii(&s[..s.len().saturating_sub(1)]).as_str()
    }

    /// Returns `true` if a scheme is present.
    #[must_use]
    pub fn has_scheme(&self) -> bool {
        !self.pts.get(parts::SCHEME).is_empty()
    }

    /// Sets the scheme. An empty input removes it.
    pub fn set_scheme(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.pts.clear(parts::SCHEME, parts::USER);
            return Ok(());
        }
        parser::parse_scheme(s.as_bytes())?;
        let dst = self.pts.buf.resize(parts::SCHEME, s.len() + 1)?;
        dst[..s.len()].copy_from_slice(s.as_bytes());
        dst[s.len()] = b':';
        self.pts.assert_invariants();
        Ok(())
    }

    /// Lower-cases the scheme in place, touching nothing else.
    pub fn normalize_scheme(&mut self) {
        self.pts.buf.part_mut(parts::SCHEME).make_ascii_lowercase();
    }

    // -------- authority --------

    /// Returns `true` if an authority is present, even an empty one (`//`).
    #[must_use]
    pub fn has_authority(&self) -> bool {
        self.pts.index().length(parts::USER, parts::PATH) > 0
    }

    /// Returns the authority, without the leading `//`.
    #[must_use]
    pub fn encoded_authority(&self) -> &str {
        let s = self.pts.get_range(parts::USER, parts::PATH);
        let s = s.strip_prefix(b"//").unwrap_or(s);
        EStr::from_ascii(s).as_str()
    }

    /// Reparses and replaces the whole authority (`user:pass@host:port`,
    /// without `//`). An empty input removes the authority.
    pub fn set_encoded_authority(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.pts.clear(parts::USER, parts::PATH);
            return Ok(());
        }
        let pt = parser::parse_authority(s.as_bytes())?;
        let src = IndexedRef::new(&pt.index, s.as_bytes());
        self.pts
            .copy_with_prefix(src, &pt.data, b"//", parts::USER, parts::PATH)
    }

    // -------- userinfo --------

    /// Returns `true` if a userinfo is present: there is content after the
    /// `//`, or a `@` terminates an empty one.
    #[must_use]
    pub fn has_userinfo(&self) -> bool {
        self.pts.index().len_of(parts::USER) > 2 || self.pts.index().len_of(parts::PASSWORD) > 0
    }

    /// Returns the userinfo (`user[:password]`), without `//` and `@`.
    #[must_use]
    pub fn encoded_userinfo(&self) -> &EStr {
        let s = self.pts.get_range(parts::USER, parts::HOST);
        let s = s.strip_prefix(b"//").unwrap_or(s);
        let s = s.strip_suffix(b"@").unwrap_or(s);
        EStr::from_ascii(s)
    }

    /// Returns the decoded userinfo.
    #[must_use]
    pub fn userinfo(&self) -> Decode<'_> {
        self.encoded_userinfo().decode()
    }

    /// Sets the userinfo from already-encoded bytes; the first `:` splits
    /// user from password. An empty input removes the userinfo and, if no
    /// host or port remains, the whole authority.
    pub fn set_encoded_userinfo(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return self.remove_userinfo();
        }
        let bytes = s.as_bytes();
        let ui = parser::parse_userinfo(bytes)?;

        // Describe the input's two halves: the password half keeps its ":".
        let mut pt = UrlParts::new();
        pt.index.split(parts::SCHEME, 0);
        pt.index.split(parts::USER, ui.user);
        pt.index
            .split(parts::PASSWORD, if ui.has_password { bytes.len() - ui.user } else { 0 });
        for i in parts::HOST..parts::COUNT {
            pt.index.split(i, 0);
        }

        let user_old = self.pts.index().len_of(parts::USER);
        let pass_old = self.pts.index().len_of(parts::PASSWORD);
        self.reserve_growth(&[
            (user_old, 2 + ui.user),
            (pass_old, bytes.len() - ui.user + 1),
        ])?;

        let dst = self.pts.buf.resize(parts::USER, 2 + ui.user)?;
        dst[..2].copy_from_slice(b"//");
        dst[2..].copy_from_slice(&bytes[..ui.user]);

        // The "@" boundary rides in as the suffix of the password part.
        let src = IndexedRef::new(&pt.index, bytes);
        self.pts
            .buf
            .copy_with_suffix(src, b"@", parts::PASSWORD, parts::HOST)?;
        self.pts.assert_invariants();
        Ok(())
    }

    /// Percent-encodes and sets the userinfo. The first `:` of the input
    /// separates user from password.
    pub fn set_userinfo(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return self.remove_userinfo();
        }
        match s.split_once(':') {
            Some((user, password)) => self.splice_userinfo(
                Fill::encoded(user.as_bytes(), table::USER),
                Some(Fill::encoded(password.as_bytes(), table::USERINFO)),
            ),
            None => self.splice_userinfo(Fill::encoded(s.as_bytes(), table::USER), None),
        }
    }

    fn splice_userinfo(&mut self, user: Fill<'_>, password: Option<Fill<'_>>) -> Result<()> {
        let user_new = 2 + user.len();
        // ":password@" or a bare "@".
        let pass_new = match &password {
            Some(f) => 2 + f.len(),
            None => 1,
        };
        self.reserve_growth(&[
            (self.pts.index().len_of(parts::USER), user_new),
            (self.pts.index().len_of(parts::PASSWORD), pass_new),
        ])?;

        let dst = self.pts.buf.resize(parts::USER, user_new)?;
        dst[..2].copy_from_slice(b"//");
        user.write(&mut dst[2..]);

        let dst = self.pts.buf.resize(parts::PASSWORD, pass_new)?;
        if let Some(f) = password {
            dst[0] = b':';
            f.write(&mut dst[1..pass_new - 1]);
        }
        dst[pass_new - 1] = b'@';
        self.pts.assert_invariants();
        Ok(())
    }

    fn remove_userinfo(&mut self) -> Result<()> {
        if !self.has_authority() {
            return Ok(());
        }
        if self.pts.index().length(parts::HOST, parts::PATH) == 0 {
            self.pts.clear(parts::USER, parts::PATH);
        } else {
            let dst = self.pts.buf.resize_range(parts::USER, parts::HOST, 2)?;
            dst.copy_from_slice(b"//");
            self.pts.assert_invariants();
        }
        Ok(())
    }

    // -------- user and password --------

    /// Returns the user, without the leading `//`.
    #[must_use]
    pub fn encoded_user(&self) -> &EStr {
        let s = self.pts.get(parts::USER);
        EStr::from_ascii(s.strip_prefix(b"//").unwrap_or(s))
    }

    /// Returns the decoded user.
    #[must_use]
    pub fn user(&self) -> Decode<'_> {
        self.encoded_user().decode()
    }

    /// Sets the user half of the userinfo from already-encoded bytes.
    pub fn set_encoded_user(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return self.remove_user();
        }
        encoding::validate(s.as_bytes(), table::USER)?;
        self.splice_user(Fill::raw(s.as_bytes()))
    }

    /// Percent-encodes and sets the user half of the userinfo.
    pub fn set_user(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return self.remove_user();
        }
        self.splice_user(Fill::encoded(s.as_bytes(), table::USER))
    }

    fn splice_user(&mut self, f: Fill<'_>) -> Result<()> {
        let user_new = 2 + f.len();
        let user_old = self.pts.index().len_of(parts::USER);
        let password = self.pts.index().len_of(parts::PASSWORD);
        self.reserve_growth(&[(user_old, user_new), (password, password.max(1))])?;

        let dst = self.pts.buf.resize(parts::USER, user_new)?;
        dst[..2].copy_from_slice(b"//");
        f.write(&mut dst[2..]);

        // The "@" boundary lives at the tail of the password part.
        if password == 0 {
            self.pts.buf.resize(parts::PASSWORD, 1)?[0] = b'@';
        }
        self.pts.assert_invariants();
        Ok(())
    }

    fn remove_user(&mut self) -> Result<()> {
        if !self.has_authority() {
            return Ok(());
        }
        if self.pts.index().len_of(parts::PASSWORD) == 1 {
            // The peer is empty; the bare "@" goes too.
            self.pts.clear(parts::PASSWORD, parts::HOST);
        }
        if self.pts.index().len_of(parts::PASSWORD) == 0
            && self.pts.index().length(parts::HOST, parts::PATH) == 0
        {
            self.pts.clear(parts::USER, parts::PATH);
        } else {
            let dst = self.pts.buf.resize(parts::USER, 2)?;
            dst.copy_from_slice(b"//");
            self.pts.assert_invariants();
        }
        Ok(())
    }

    /// Returns the password, without its `:` and `@` delimiters.
    #[must_use]
    pub fn encoded_password(&self) -> &EStr {
        let s = self.pts.get(parts::PASSWORD);
        let s = s.strip_suffix(b"@").unwrap_or(s);
        EStr::from_ascii(s.strip_prefix(b":").unwrap_or(s))
    }

    /// Returns the decoded password.
    #[must_use]
    pub fn password(&self) -> Decode<'_> {
        self.encoded_password().decode()
    }

    /// Sets the password half of the userinfo from already-encoded bytes.
    pub fn set_encoded_password(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return self.remove_password();
        }
        encoding::validate(s.as_bytes(), table::USERINFO)?;
        self.splice_password(Fill::raw(s.as_bytes()))
    }

    /// Percent-encodes and sets the password half of the userinfo.
    pub fn set_password(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return self.remove_password();
        }
        self.splice_password(Fill::encoded(s.as_bytes(), table::USERINFO))
    }

    fn splice_password(&mut self, f: Fill<'_>) -> Result<()> {
        let pass_new = 2 + f.len();
        let user = self.pts.index().len_of(parts::USER);
        self.reserve_growth(&[
            (user, user.max(2)),
            (self.pts.index().len_of(parts::PASSWORD), pass_new),
        ])?;

        if user == 0 {
            self.pts.buf.resize(parts::USER, 2)?.copy_from_slice(b"//");
        }
        let dst = self.pts.buf.resize(parts::PASSWORD, pass_new)?;
        dst[0] = b':';
        f.write(&mut dst[1..pass_new - 1]);
        dst[pass_new - 1] = b'@';
        self.pts.assert_invariants();
        Ok(())
    }

    fn remove_password(&mut self) -> Result<()> {
        if self.pts.index().len_of(parts::PASSWORD) == 0 {
            return Ok(());
        }
        if self.pts.index().len_of(parts::USER) > 2 {
            // A user remains; keep its "@".
            self.pts.buf.resize(parts::PASSWORD, 1)?[0] = b'@';
            self.pts.assert_invariants();
        } else {
            self.pts.clear(parts::PASSWORD, parts::HOST);
            self.drop_bare_authority();
        }
        Ok(())
    }

    // -------- host --------

    /// Returns the classification of the current host.
    #[must_use]
    pub fn host_kind(&self) -> HostKind {
        self.pts.data.host
    }

    /// Returns `true` if a non-empty host is present.
    #[must_use]
    pub fn has_host(&self) -> bool {
        !self.pts.get(parts::HOST).is_empty()
    }

    /// Returns the host as stored, brackets included for IP literals.
    #[must_use]
    pub fn encoded_host(&self) -> &EStr {
        EStr::from_ascii(self.pts.get(parts::HOST))
    }

    /// Returns the decoded host.
    #[must_use]
    pub fn host(&self) -> Decode<'_> {
        self.encoded_host().decode()
    }

    /// Sets the host from already-encoded bytes: a bracketed IP literal, an
    /// IPv4 address, or a percent-encoded registered name. An empty input
    /// removes the host and, with it, an authority reduced to `//`.
    pub fn set_encoded_host(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.remove_host();
            return Ok(());
        }
        let kind = parser::parse_hostname(s.as_bytes())?;
        self.splice_host(Fill::raw(s.as_bytes()), kind, false)
    }

    /// Classifies and sets a plain host.
    ///
    /// IP addresses are stored verbatim — a bare IPv6 address gains its
    /// brackets — and anything else is stored as a percent-encoded
    /// registered name. An empty input removes the host.
    pub fn set_host(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.remove_host();
            return Ok(());
        }
        let kind = parser::parse_plain_hostname(s.as_bytes())?;
        match kind {
            HostKind::RegName => self.splice_host(
                Fill::encoded(s.as_bytes(), table::REG_NAME),
                kind,
                false,
            ),
            HostKind::Ipv6 if !s.starts_with('[') => {
                self.splice_host(Fill::raw(s.as_bytes()), kind, true)
            }
            _ => self.splice_host(Fill::raw(s.as_bytes()), kind, false),
        }
    }

    fn splice_host(&mut self, f: Fill<'_>, kind: HostKind, brackets: bool) -> Result<()> {
        let host_new = f.len() + if brackets { 2 } else { 0 };
        let user = self.pts.index().len_of(parts::USER);
        self.reserve_growth(&[
            (user, user.max(2)),
            (self.pts.index().len_of(parts::HOST), host_new),
        ])?;

        if user == 0 {
            // Materialize "//" with empty user and password halves.
            self.pts.buf.resize(parts::USER, 2)?.copy_from_slice(b"//");
        }
        let dst = self.pts.buf.resize(parts::HOST, host_new)?;
        if brackets {
            dst[0] = b'[';
            f.write(&mut dst[1..host_new - 1]);
            dst[host_new - 1] = b']';
        } else {
            f.write(dst);
        }
        self.pts.data.host = kind;
        self.pts.assert_invariants();
        Ok(())
    }

    fn remove_host(&mut self) {
        self.pts.clear(parts::HOST, parts::PORT);
        self.drop_bare_authority();
    }

    /// Removes an authority that is nothing but its `//`.
    fn drop_bare_authority(&mut self) {
        if self.pts.index().len_of(parts::USER) == 2
            && self.pts.index().length(parts::PASSWORD, parts::PATH) == 0
        {
            self.pts.clear(parts::USER, parts::PATH);
        }
    }

    // -------- port --------

    /// Returns `true` if a port is present, even an empty one (`:`).
    #[must_use]
    pub fn has_port(&self) -> bool {
        !self.pts.get(parts::PORT).is_empty()
    }

    /// Returns the port digits, without the leading `:`.
    #[must_use]
    pub fn port(&self) -> &str {
        let s = self.pts.get(parts::PORT);
        EStr::from_ascii(s.strip_prefix(b":").unwrap_or(s)).as_str()
    }

    /// Parses the port as a number. Returns `None` when the port is absent,
    /// empty, or does not fit a `u16`.
    #[must_use]
    pub fn port_number(&self) -> Option<u16> {
        let s = self.port();
        if s.is_empty() {
            None
        } else {
            s.parse().ok()
        }
    }

    /// Sets the port from decimal digits. An empty input removes the port
    /// and, with it, an authority reduced to `//`.
    pub fn set_port(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.pts.clear(parts::PORT, parts::PATH);
            self.drop_bare_authority();
            return Ok(());
        }
        if !parser::match_port(s.as_bytes()) {
            let i = s
                .bytes()
                .position(|x| !x.is_ascii_digit())
                .unwrap_or_default();
            return Err(Error::invalid_part(i));
        }

        let user = self.pts.index().len_of(parts::USER);
        self.reserve_growth(&[
            (user, user.max(2)),
            (self.pts.index().len_of(parts::PORT), s.len() + 1),
        ])?;
        if user == 0 {
            self.pts.buf.resize(parts::USER, 2)?.copy_from_slice(b"//");
        }
        let dst = self.pts.buf.resize(parts::PORT, s.len() + 1)?;
        dst[0] = b':';
        dst[1..].copy_from_slice(s.as_bytes());
        self.pts.assert_invariants();
        Ok(())
    }

    /// Renders `port` in base 10 and sets it.
    pub fn set_port_number(&mut self, port: u16) -> Result<()> {
        let mut digits = [0u8; 5];
        let mut i = digits.len();
        let mut x = port;
        loop {
            i -= 1;
            digits[i] = b'0' + (x % 10) as u8;
            x /= 10;
            if x == 0 {
                break;
            }
        }
        self.set_port(EStr::from_ascii(&digits[i..]).as_str())
    }

    // -------- path --------

    /// Returns the path as stored.
    #[must_use]
    pub fn encoded_path(&self) -> &EStr {
        EStr::from_ascii(self.pts.get(parts::PATH))
    }

    /// Returns the decoded path.
    #[must_use]
    pub fn path(&self) -> Decode<'_> {
        self.encoded_path().decode()
    }

    /// Sets the path from already-encoded bytes.
    ///
    /// The accepted grammar depends on context: with an authority the path
    /// must be empty or absolute; without one it must not start with `//`;
    /// and with neither scheme nor authority its first segment must not
    /// contain a `:`.
    pub fn set_encoded_path(&mut self, s: &str) -> Result<()> {
        let bytes = s.as_bytes();
        if !bytes.is_empty() {
            if self.has_authority() {
                parser::parse_path_abempty(bytes)?;
            } else if bytes[0] == b'/' {
                parser::parse_path_absolute(bytes)?;
            } else if self.has_scheme() {
                parser::parse_path_rootless(bytes)?;
            } else {
                parser::parse_path_noscheme(bytes)?;
            }
        }
        let dst = self.pts.buf.resize(parts::PATH, bytes.len())?;
        dst.copy_from_slice(bytes);
        self.pts.data.nseg = count(bytes, b'/');
        self.pts.assert_invariants();
        Ok(())
    }

    /// Percent-encodes and sets the path. `/` separators are preserved; the
    /// same structural rules as [`set_encoded_path`](Self::set_encoded_path)
    /// apply.
    pub fn set_path(&mut self, s: &str) -> Result<()> {
        let bytes = s.as_bytes();
        self.check_path_shape(bytes)?;
        let f = Fill::encoded(bytes, table::PATH);
        let n = f.len();
        let dst = self.pts.buf.resize(parts::PATH, n)?;
        f.write(dst);
        self.pts.data.nseg = count(bytes, b'/');
        self.pts.assert_invariants();
        Ok(())
    }

    /// Structural path rules on raw bytes; the table encoding preserves the
    /// `/` and `:` bytes these rules depend on.
    fn check_path_shape(&self, s: &[u8]) -> Result<()> {
        if s.is_empty() {
            return Ok(());
        }
        if self.has_authority() {
            if s[0] != b'/' {
                return Err(Error::invalid_part(0));
            }
        } else if s[0] == b'/' {
            if s.get(1) == Some(&b'/') {
                return Err(Error::invalid_part(1));
            }
        } else if !self.has_scheme() {
            let first = s.iter().position(|&x| x == b'/').unwrap_or(s.len());
            if let Some(i) = s[..first].iter().position(|&x| x == b':') {
                return Err(Error::invalid_part(i));
            }
        }
        Ok(())
    }

    // -------- query --------

    /// Returns `true` if a query is present.
    #[must_use]
    pub fn has_query(&self) -> bool {
        !self.pts.get(parts::QUERY).is_empty()
    }

    /// Returns the query, without the leading `?`.
    #[must_use]
    pub fn encoded_query(&self) -> &EStr {
        let s = self.pts.get(parts::QUERY);
        EStr::from_ascii(s.strip_prefix(b"?").unwrap_or(s))
    }

    /// Returns the decoded query.
    #[must_use]
    pub fn query(&self) -> Decode<'_> {
        self.encoded_query().decode()
    }

    /// Sets the query from already-encoded bytes, without the `?`. An empty
    /// input removes the query.
    pub fn set_encoded_query(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.pts.clear(parts::QUERY, parts::FRAGMENT);
            return Ok(());
        }
        encoding::validate(s.as_bytes(), table::QUERY)?;
        self.splice_query(Fill::raw(s.as_bytes()))
    }

    /// Percent-encodes and sets the query. The `&`, `=` and other
    /// sub-delimiters are preserved.
    pub fn set_query(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.pts.clear(parts::QUERY, parts::FRAGMENT);
            return Ok(());
        }
        self.splice_query(Fill::encoded(s.as_bytes(), table::QUERY))
    }

    /// Sets the query from its stored form: empty, or `?` followed by the
    /// encoded query.
    pub fn set_query_part(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.pts.clear(parts::QUERY, parts::FRAGMENT);
            return Ok(());
        }
        let rest = s.strip_prefix('?').ok_or(Error::invalid_part(0))?;
        encoding::validate(rest.as_bytes(), table::QUERY)?;
        self.splice_query(Fill::raw(rest.as_bytes()))
    }

    fn splice_query(&mut self, f: Fill<'_>) -> Result<()> {
        let n = f.len();
        let dst = self.pts.buf.resize(parts::QUERY, n + 1)?;
        dst[0] = b'?';
        f.write(&mut dst[1..]);
        self.pts.data.nparam = 1 + count(&dst[1..], b'&');
        self.pts.assert_invariants();
        Ok(())
    }

    // -------- fragment --------

    /// Returns `true` if a fragment is present.
    #[must_use]
    pub fn has_fragment(&self) -> bool {
        !self.pts.get(parts::FRAGMENT).is_empty()
    }

    /// Returns the fragment, without the leading `#`.
    #[must_use]
    pub fn encoded_fragment(&self) -> &EStr {
        let s = self.pts.get(parts::FRAGMENT);
        EStr::from_ascii(s.strip_prefix(b"#").unwrap_or(s))
    }

    /// Returns the decoded fragment.
    #[must_use]
    pub fn fragment(&self) -> Decode<'_> {
        self.encoded_fragment().decode()
    }

    /// Sets the fragment from already-encoded bytes, without the `#`. An
    /// empty input removes the fragment.
    pub fn set_encoded_fragment(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.pts.clear(parts::FRAGMENT, parts::COUNT);
            return Ok(());
        }
        encoding::validate(s.as_bytes(), table::FRAGMENT)?;
        self.splice_fragment(Fill::raw(s.as_bytes()))
    }

    /// Percent-encodes and sets the fragment.
    pub fn set_fragment(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.pts.clear(parts::FRAGMENT, parts::COUNT);
            return Ok(());
        }
        self.splice_fragment(Fill::encoded(s.as_bytes(), table::FRAGMENT))
    }

    /// Sets the fragment from its stored form: empty, or `#` followed by
    /// the encoded fragment.
    pub fn set_fragment_part(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.pts.clear(parts::FRAGMENT, parts::COUNT);
            return Ok(());
        }
        let rest = s.strip_prefix('#').ok_or(Error::invalid_part(0))?;
        encoding::validate(rest.as_bytes(), table::FRAGMENT)?;
        self.splice_fragment(Fill::raw(rest.as_bytes()))
    }

    fn splice_fragment(&mut self, f: Fill<'_>) -> Result<()> {
        let n = f.len();
        let dst = self.pts.buf.resize(parts::FRAGMENT, n + 1)?;
        dst[0] = b'#';
        f.write(&mut dst[1..]);
        self.pts.assert_invariants();
        Ok(())
    }

    // -------- internal --------

    /// Reserves the summed growth of the given `(old, new)` part lengths,
    /// so that the splices that follow cannot fail however they interleave
    /// growing and shrinking.
    fn reserve_growth(&mut self, deltas: &[(usize, usize)]) -> Result<()> {
        let mut extra = 0usize;
        for &(old, new) in deltas {
            extra = extra
                .checked_add(new.saturating_sub(old))
                .ok_or(Error::too_large())?;
        }
        if extra > 0 {
            self.pts.buf.reserve_more(extra)?;
        }
        Ok(())
    }
}

impl PartialEq for Url {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Url {}

impl core::hash::Hash for Url {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl core::str::FromStr for Url {
    type Err = Error;

    fn from_str(s: &str) -> Result<Url> {
        Url::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Url {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Url {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let s = <alloc::borrow::Cow<'de, str> as serde::Deserialize>::deserialize(deserializer)?;
        Url::parse(&s).map_err(serde::de::Error::custom)
    }
}
