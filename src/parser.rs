//! Structural URI parsers.
//!
//! Each parser validates its input and produces a transient part-index
//! descriptor; the container then splices the validated bytes in. Delimiters
//! land in the part that owns them in the stored form, except that the
//! authority parser emits the user part without its `//` prefix, which the
//! caller supplies when copying.

use crate::{
    encoding::{self, table},
    error::{Error, Result},
    ip,
    parts::{self, HostKind, UrlParts},
};

struct Parser<'a> {
    buf: &'a [u8],
    pos: usize,
    mark: usize,
}

impl<'a> Parser<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Parser {
            buf,
            pos: 0,
            mark: 0,
        }
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.buf.len()
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
        debug_assert!(self.pos <= self.buf.len());
    }

    fn mark(&mut self) {
        self.mark = self.pos;
    }

    fn marked_len(&self) -> usize {
        self.pos - self.mark
    }

    fn marked(&self) -> &'a [u8] {
        &self.buf[self.mark..self.pos]
    }

    /// Advances over bytes the table allows, including well-formed
    /// percent-encoded octets when the table permits them.
    fn scan(&mut self, table: &table::Table) -> Result<()> {
        let s = self.buf;
        let mut i = self.pos;
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
                break;
            }
        }
        self.pos = i;
        Ok(())
    }

    fn read_str(&mut self, s: &[u8]) -> bool {
        let res = self.buf[self.pos..].starts_with(s);
        if res {
            self.skip(s.len());
        }
        res
    }

    fn read_digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(x) if x.is_ascii_digit()) {
            self.skip(1);
        }
        self.pos - start
    }
}

/// Stored-form lengths of the four authority parts, with the user part
/// counted without its `//` prefix.
#[derive(Default)]
struct AuthorityParts {
    user: usize,
    password: usize,
    host: usize,
    port: usize,
    kind: HostKind,
}

fn count(s: &[u8], b: u8) -> usize {
    s.iter().filter(|&&x| x == b).count()
}

fn parse_authority_inner(p: &mut Parser<'_>) -> Result<AuthorityParts> {
    let mut out = AuthorityParts::default();

    // Userinfo, reg-name, ":" and the port digits all draw from the
    // userinfo table; scan once and decide by what follows.
    p.mark();
    p.scan(table::USERINFO)?;

    if p.peek() == Some(b'@') {
        let span = p.marked();
        match span.iter().position(|&x| x == b':') {
            // ":<password>" plus the trailing "@".
            Some(i) => {
                out.user = i;
                out.password = span.len() - i + 1;
            }
            // A bare "@".
            None => {
                out.user = span.len();
                out.password = 1;
            }
        }
        p.skip(1);

        let host_start = p.pos;
        out.kind = read_host(p)?;
        out.host = p.pos - host_start;
        out.port = read_port(p);
    } else if p.marked_len() == 0 {
        // An IP literal, or an authority with no host.
        if let Some(kind) = read_ip_literal(p)? {
            out.host = p.pos - p.mark;
            out.kind = kind;
            out.port = read_port(p);
        }
    } else {
        // The whole span is scanned; split host and port on the colons.
        let span = p.marked();
        let host = match count(span, b':') {
            0 => span,
            1 => {
                let i = span.iter().position(|&x| x == b':').unwrap_or(0);
                for (k, &x) in span[i + 1..].iter().enumerate() {
                    if !x.is_ascii_digit() {
                        return Err(Error::invalid_part(p.mark + i + 1 + k));
                    }
                }
                out.port = span.len() - i;
                &span[..i]
            }
            _ => {
                let i = span.iter().position(|&x| x == b':').unwrap_or(0);
                return Err(Error::invalid_part(p.mark + i));
            }
        };
        out.host = host.len();
        out.kind = classify_parsed_host(host);
    }
    Ok(out)
}

fn classify_parsed_host(host: &[u8]) -> HostKind {
    if host.is_empty() {
        HostKind::None
    } else if ip::parse_v4(host).is_some() {
        HostKind::Ipv4
    } else {
        HostKind::RegName
    }
}

// The marked length must be zero when this function is called.
fn read_host(p: &mut Parser<'_>) -> Result<HostKind> {
    if let Some(kind) = read_ip_literal(p)? {
        return Ok(kind);
    }
    p.mark();
    p.scan(table::REG_NAME)?;
    Ok(classify_parsed_host(p.marked()))
}

fn read_ip_literal(p: &mut Parser<'_>) -> Result<Option<HostKind>> {
    if !p.read_str(b"[") {
        return Ok(None);
    }
    let open = p.pos - 1;
    let rest = &p.buf[p.pos..];
    let close = match rest.iter().position(|&x| x == b']') {
        Some(i) => i,
        None => return Err(Error::invalid_part(open)),
    };
    let kind = match classify_ip_literal(&rest[..close]) {
        Some(kind) => kind,
        None => return Err(Error::invalid_part(open)),
    };
    p.skip(close + 1);
    Ok(Some(kind))
}

/// Classifies the inside of a bracketed IP literal.
fn classify_ip_literal(inner: &[u8]) -> Option<HostKind> {
    if let Some(&v) = inner.first() {
        if v == b'v' || v == b'V' {
            // IPvFuture = "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )
            let dot = inner.iter().position(|&x| x == b'.')?;
            let (ver, addr) = (&inner[1..dot], &inner[dot + 1..]);
            let ok = !ver.is_empty()
                && ver.iter().all(|&x| table::HEXDIG.allows(x))
                && !addr.is_empty()
                && addr.iter().all(|&x| table::IPV_FUTURE.allows(x));
            return ok.then_some(HostKind::IpvFuture);
        }
    }
    ip::parse_v6(inner).map(|_| HostKind::Ipv6)
}

fn read_port(p: &mut Parser<'_>) -> usize {
    if p.read_str(b":") {
        1 + p.read_digits()
    } else {
        0
    }
}

/// Parses an optional scheme and an optional `//`-led authority.
fn parse_prefix(p: &mut Parser<'_>) -> Result<(usize, Option<AuthorityParts>)> {
    p.scan(table::SCHEME)?;

    let scheme_len = if p.peek() == Some(b':') {
        // Scheme starts with a letter.
        if p.pos != 0 && p.buf[0].is_ascii_alphabetic() {
            p.skip(1);
            p.pos
        } else {
            return Err(Error::invalid_part(0));
        }
    } else {
        // Whatever was scanned belongs to the path.
        p.pos = 0;
        0
    };

    let auth = if p.read_str(b"//") {
        Some(parse_authority_inner(p)?)
    } else {
        None
    };
    Ok((scheme_len, auth))
}

fn assemble(
    out: &mut UrlParts,
    scheme_len: usize,
    auth: &Option<AuthorityParts>,
    user_prefix: usize,
) {
    let empty = AuthorityParts::default();
    let a = auth.as_ref().unwrap_or(&empty);
    out.index.split(parts::SCHEME, scheme_len);
    out.index
        .split(parts::USER, if auth.is_some() { user_prefix + a.user } else { 0 });
    out.index.split(parts::PASSWORD, a.password);
    out.index.split(parts::HOST, a.host);
    out.index.split(parts::PORT, a.port);
    out.data.host = a.kind;
}

/// Parses a full URI reference into a part-index descriptor over the input.
pub(crate) fn parse_url(s: &[u8]) -> Result<UrlParts> {
    let mut p = Parser::new(s);
    let mut out = UrlParts::new();

    let (scheme_len, auth) = parse_prefix(&mut p)?;
    assemble(&mut out, scheme_len, &auth, 2);

    let path_start = p.pos;
    if auth.is_some() {
        // path-abempty: either empty or beginning with "/".
        p.scan(table::PATH)?;
        if p.pos != path_start && s[path_start] != b'/' {
            return Err(Error::invalid_part(path_start));
        }
    } else if scheme_len != 0 {
        p.scan(table::PATH)?;
    } else {
        // In a relative reference, the first path segment cannot contain
        // a colon character.
        p.scan(table::SEGMENT_NZ_NC)?;
        if p.peek() == Some(b':') {
            return Err(Error::invalid_part(p.pos));
        }
        p.scan(table::PATH)?;
    }
    out.index.split(parts::PATH, p.pos - path_start);
    out.data.nseg = count(&s[path_start..p.pos], b'/');

    if p.read_str(b"?") {
        let start = p.pos;
        p.scan(table::QUERY)?;
        out.index.split(parts::QUERY, 1 + p.pos - start);
        out.data.nparam = 1 + count(&s[start..p.pos], b'&');
    } else {
        out.index.split(parts::QUERY, 0);
    }

    if p.read_str(b"#") {
        let start = p.pos;
        p.scan(table::FRAGMENT)?;
        out.index.split(parts::FRAGMENT, 1 + p.pos - start);
    } else {
        out.index.split(parts::FRAGMENT, 0);
    }

    if p.has_remaining() {
        return Err(Error::invalid_part(p.pos));
    }
    Ok(out)
}

/// Parses `scheme://authority` with nothing after it.
pub(crate) fn parse_origin(s: &[u8]) -> Result<UrlParts> {
    let mut p = Parser::new(s);
    let mut out = UrlParts::new();

    let (scheme_len, auth) = parse_prefix(&mut p)?;
    if p.has_remaining() {
        return Err(Error::invalid_part(p.pos));
    }
    assemble(&mut out, scheme_len, &auth, 2);
    out.index.split(parts::PATH, 0);
    out.index.split(parts::QUERY, 0);
    out.index.split(parts::FRAGMENT, 0);
    Ok(out)
}

/// Parses a bare authority (`user:pass@host:port`, no `//`).
///
/// The returned descriptor's user part does not include the `//` prefix;
/// copy it in with [`copy_with_prefix`](crate::buffer::IndexedBuf::copy_with_prefix).
pub(crate) fn parse_authority(s: &[u8]) -> Result<UrlParts> {
    let mut p = Parser::new(s);
    let auth = parse_authority_inner(&mut p)?;
    if p.has_remaining() {
        return Err(Error::invalid_part(p.pos));
    }
    let mut out = UrlParts::new();
    assemble(&mut out, 0, &Some(auth), 0);
    out.index.split(parts::PATH, 0);
    out.index.split(parts::QUERY, 0);
    out.index.split(parts::FRAGMENT, 0);
    Ok(out)
}

/// The two halves of a validated, encoded userinfo.
pub(crate) struct UserinfoParts {
    /// Bytes before the first `:`.
    pub(crate) user: usize,
    /// Whether a `:` separator (and thus a password half) is present.
    pub(crate) has_password: bool,
}

/// Validates an encoded userinfo and locates the user/password split.
pub(crate) fn parse_userinfo(s: &[u8]) -> Result<UserinfoParts> {
    encoding::validate(s, table::USERINFO)?;
    Ok(match s.iter().position(|&x| x == b':') {
        Some(i) => UserinfoParts {
            user: i,
            has_password: true,
        },
        None => UserinfoParts {
            user: s.len(),
            has_password: false,
        },
    })
}

/// Validates an encoded scheme (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`).
pub(crate) fn parse_scheme(s: &[u8]) -> Result<()> {
    match s.first() {
        Some(x) if x.is_ascii_alphabetic() => {}
        _ => return Err(Error::invalid_part(0)),
    }
    encoding::validate(s, table::SCHEME)
}

/// Validates an already-encoded, non-empty host and classifies it.
pub(crate) fn parse_hostname(s: &[u8]) -> Result<HostKind> {
    if s.first() == Some(&b'[') {
        if s.last() == Some(&b']') {
            if let Some(kind) = classify_ip_literal(&s[1..s.len() - 1]) {
                return Ok(kind);
            }
        }
        return Err(Error::invalid_part(0));
    }
    if ip::parse_v4(s).is_some() {
        return Ok(HostKind::Ipv4);
    }
    encoding::validate(s, table::REG_NAME)?;
    Ok(HostKind::RegName)
}

/// Classifies a plain (unencoded) non-empty host.
///
/// `RegName` means the input must be percent-encoded before storage; a bare
/// IPv6 address is accepted and reported as `Ipv6`, for the caller to store
/// in its bracketed form. Only a malformed bracketed literal fails.
pub(crate) fn parse_plain_hostname(s: &[u8]) -> Result<HostKind> {
    if s.first() == Some(&b'[') {
        if s.last() == Some(&b']') {
            if let Some(kind) = classify_ip_literal(&s[1..s.len() - 1]) {
                return Ok(kind);
            }
        }
        return Err(Error::invalid_part(0));
    }
    if ip::parse_v4(s).is_some() {
        Ok(HostKind::Ipv4)
    } else if ip::parse_v6(s).is_some() {
        Ok(HostKind::Ipv6)
    } else {
        Ok(HostKind::RegName)
    }
}

/// `path-abempty = *( "/" segment )`
pub(crate) fn parse_path_abempty(s: &[u8]) -> Result<()> {
    encoding::validate(s, table::PATH)?;
    if !s.is_empty() && s[0] != b'/' {
        return Err(Error::invalid_part(0));
    }
    Ok(())
}

/// `path-absolute = "/" [ segment-nz *( "/" segment ) ]`
pub(crate) fn parse_path_absolute(s: &[u8]) -> Result<()> {
    encoding::validate(s, table::PATH)?;
    if s.first() != Some(&b'/') {
        return Err(Error::invalid_part(0));
    }
    if s.get(1) == Some(&b'/') {
        return Err(Error::invalid_part(1));
    }
    Ok(())
}

/// `path-rootless = segment-nz *( "/" segment )`
pub(crate) fn parse_path_rootless(s: &[u8]) -> Result<()> {
    encoding::validate(s, table::PATH)?;
    if s.is_empty() || s[0] == b'/' {
        return Err(Error::invalid_part(0));
    }
    Ok(())
}

/// `path-noscheme = segment-nz-nc *( "/" segment )`
pub(crate) fn parse_path_noscheme(s: &[u8]) -> Result<()> {
    parse_path_rootless(s)?;
    let first = s.iter().position(|&x| x == b'/').unwrap_or(s.len());
    if let Some(i) = s[..first].iter().position(|&x| x == b':') {
        return Err(Error::invalid_part(i));
    }
    Ok(())
}

/// `port = *DIGIT`
pub(crate) fn match_port(s: &[u8]) -> bool {
    s.iter().all(u8::is_ascii_digit)
}
