//! The eight-part URI container and its auxiliary counters.

use crate::{
    buffer::{IndexedBuf, IndexedRef},
    error::Result,
    index::PartIndex,
};

// Part identifiers. Every part's stored form owns its delimiters, which
// keeps all splices local when neighbors transition between empty and
// non-empty.
pub(crate) const SCHEME: usize = 0; // trailing ':'
pub(crate) const USER: usize = 1; // leading "//"
pub(crate) const PASSWORD: usize = 2; // leading ':', trailing '@'
pub(crate) const HOST: usize = 3;
pub(crate) const PORT: usize = 4; // leading ':'
pub(crate) const PATH: usize = 5;
pub(crate) const QUERY: usize = 6; // leading '?'
pub(crate) const FRAGMENT: usize = 7; // leading '#'
pub(crate) const COUNT: usize = 8;

/// Classification of the host bytes.
///
/// The kind decides whether percent-encoding applies when the host is
/// written: a registered name is encoded, the IP forms are stored verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HostKind {
    /// No host is present.
    #[default]
    None,
    /// An IPv4 address.
    Ipv4,
    /// An IPv6 address.
    Ipv6,
    /// An IP address of future version.
    IpvFuture,
    /// A registered name.
    RegName,
}

/// Counters carried alongside the part index.
///
/// `nseg` is the number of `/` bytes in the path; `nparam` follows the
/// query's separator count (`?` plus `&`). Both are derivable from the bytes
/// but cached, as the element iterators use them as stop conditions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PartsData {
    pub(crate) nseg: usize,
    pub(crate) nparam: usize,
    pub(crate) host: HostKind,
}

/// A transient part-index descriptor, the output of the structural parsers
/// and the source shape of cross-container copies.
#[derive(Clone, Copy, Debug)]
pub(crate) struct UrlParts {
    pub(crate) index: PartIndex<COUNT>,
    pub(crate) data: PartsData,
}

impl UrlParts {
    pub(crate) const fn new() -> Self {
        UrlParts {
            index: PartIndex::new(),
            data: PartsData {
                nseg: 0,
                nparam: 0,
                host: HostKind::None,
            },
        }
    }
}

/// The owning URI parts string: an indexed buffer over the eight parts that
/// keeps the auxiliary counters consistent across whole-part mutations.
///
/// Counter bookkeeping for the per-component setters lives in the façade;
/// this layer covers the operations that overwrite or drop whole parts.
#[derive(Clone)]
pub(crate) struct PartsBuf {
    pub(crate) buf: IndexedBuf<COUNT>,
    pub(crate) data: PartsData,
}

impl PartsBuf {
    pub(crate) const fn new() -> Self {
        PartsBuf {
            buf: IndexedBuf::new(),
            data: PartsData {
                nseg: 0,
                nparam: 0,
                host: HostKind::None,
            },
        }
    }

    pub(crate) fn index(&self) -> &PartIndex<COUNT> {
        self.buf.index()
    }

    pub(crate) fn get(&self, i: usize) -> &[u8] {
        self.buf.get(i)
    }

    pub(crate) fn get_range(&self, first: usize, last: usize) -> &[u8] {
        self.buf.get_range(first, last)
    }

    pub(crate) fn clear_all(&mut self) {
        self.buf.clear_all();
        self.data = PartsData::default();
    }

    pub(crate) fn clear(&mut self, first: usize, last: usize) {
        self.buf.clear(first, last);
        self.reset_counters(first, last);
        self.assert_invariants();
    }

    fn reset_counters(&mut self, first: usize, last: usize) {
        if first <= PATH && last > PATH {
            self.data.nseg = 0;
        }
        if first <= QUERY && last > QUERY {
            self.data.nparam = 0;
        }
        if first <= HOST && last > HOST {
            self.data.host = HostKind::None;
        }
    }

    fn adopt_counters(&mut self, src: &PartsData, first: usize, last: usize) {
        if first <= PATH && last > PATH {
            self.data.nseg = src.nseg;
        }
        if first <= QUERY && last > QUERY {
            self.data.nparam = src.nparam;
        }
        if first <= HOST && last > HOST {
            self.data.host = src.host;
        }
    }

    /// Replaces parts `first..last` from a foreign descriptor and payload,
    /// taking over the counters the overwritten parts govern.
    pub(crate) fn copy(
        &mut self,
        src: IndexedRef<'_, COUNT>,
        src_data: &PartsData,
        first: usize,
        last: usize,
    ) -> Result<()> {
        self.buf.copy(src, first, last)?;
        self.adopt_counters(src_data, first, last);
        self.assert_invariants();
        Ok(())
    }

    pub(crate) fn copy_with_prefix(
        &mut self,
        src: IndexedRef<'_, COUNT>,
        src_data: &PartsData,
        prefix: &[u8],
        first: usize,
        last: usize,
    ) -> Result<()> {
        self.buf.copy_with_prefix(src, prefix, first, last)?;
        self.adopt_counters(src_data, first, last);
        self.assert_invariants();
        Ok(())
    }

    pub(crate) fn copy_all(&mut self, src: &UrlParts, s: &[u8]) -> Result<()> {
        self.buf.copy_all(&src.index, s)?;
        self.data = src.data;
        self.assert_invariants();
        Ok(())
    }

    /// Verifies I1–I9 in debug builds by recomputing everything cached.
    pub(crate) fn assert_invariants(&self) {
        #[cfg(debug_assertions)]
        {
            self.buf.assert_terminated();

            let count = |part: usize, b: u8| self.get(part).iter().filter(|&&x| x == b).count();
            assert_eq!(self.data.nseg, count(PATH, b'/'));

            let query = self.get(QUERY);
            let expected = if query.is_empty() {
                0
            } else {
                usize::from(query[0] == b'?') + count(QUERY, b'&')
            };
            assert_eq!(self.data.nparam, expected);

            let scheme = self.get(SCHEME);
            assert!(scheme.is_empty() || scheme.ends_with(b":"));
            let user = self.get(USER);
            assert!(user.is_empty() || user.starts_with(b"//"));
            let password = self.get(PASSWORD);
            assert!(
                password.is_empty()
                    || password == b"@"
                    || (password.starts_with(b":") && password.ends_with(b"@"))
            );
            let port = self.get(PORT);
            assert!(port.is_empty() || port.starts_with(b":"));
            assert!(query.is_empty() || query.starts_with(b"?"));
            let fragment = self.get(FRAGMENT);
            assert!(fragment.is_empty() || fragment.starts_with(b"#"));

            if self.get(HOST).is_empty() {
                assert_eq!(self.data.host, HostKind::None);
            } else {
                assert_ne!(self.data.host, HostKind::None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (PartsBuf, UrlParts) {
        // "http://u:p@h:1/a/b?k=v#f"
        let bytes = b"http://u:p@h:1/a/b?k=v#f";
        let mut pt = UrlParts::new();
        pt.index.split(SCHEME, 5);
        pt.index.split(USER, 3);
        pt.index.split(PASSWORD, 3);
        pt.index.split(HOST, 1);
        pt.index.split(PORT, 2);
        pt.index.split(PATH, 4);
        pt.index.split(QUERY, 4);
        pt.index.split(FRAGMENT, 2);
        pt.data = PartsData {
            nseg: 2,
            nparam: 1,
            host: HostKind::RegName,
        };

        let mut pts = PartsBuf::new();
        pts.copy_all(&pt, bytes).unwrap();
        (pts, pt)
    }

    #[test]
    fn copy_all_adopts_counters() {
        let (pts, _) = sample();
        assert_eq!(pts.get(SCHEME), b"http:");
        assert_eq!(pts.get(USER), b"//u");
        assert_eq!(pts.get(PASSWORD), b":p@");
        assert_eq!(pts.get(HOST), b"h");
        assert_eq!(pts.get(PORT), b":1");
        assert_eq!(pts.get(PATH), b"/a/b");
        assert_eq!(pts.get(QUERY), b"?k=v");
        assert_eq!(pts.get(FRAGMENT), b"#f");
        assert_eq!(pts.data.nseg, 2);
        assert_eq!(pts.data.nparam, 1);
        assert_eq!(pts.data.host, HostKind::RegName);
    }

    #[test]
    fn clear_resets_owned_counters() {
        let (mut pts, _) = sample();
        pts.clear(PATH, QUERY + 1);
        assert_eq!(pts.data.nseg, 0);
        assert_eq!(pts.data.nparam, 0);
        assert_eq!(pts.data.host, HostKind::RegName);
        assert_eq!(pts.get_range(SCHEME, COUNT), b"http://u:p@h:1#f");

        pts.clear(USER, PATH);
        assert_eq!(pts.data.host, HostKind::None);
        assert_eq!(pts.get_range(SCHEME, COUNT), b"http:#f");
    }

    #[test]
    fn range_copy_takes_source_counters() {
        let (mut dst, _) = sample();
        let (src, _) = {
            let bytes = b"/x";
            let mut pt = UrlParts::new();
            pt.index.split(SCHEME, 0);
            pt.index.split(USER, 0);
            pt.index.split(PASSWORD, 0);
            pt.index.split(HOST, 0);
            pt.index.split(PORT, 0);
            pt.index.split(PATH, 2);
            pt.index.split(QUERY, 0);
            pt.index.split(FRAGMENT, 0);
            pt.data.nseg = 1;
            let mut pts = PartsBuf::new();
            pts.copy_all(&pt, bytes).unwrap();
            (pts, pt)
        };

        dst.copy(src.buf.as_ref(), &src.data, PATH, QUERY).unwrap();
        assert_eq!(dst.get(PATH), b"/x");
        assert_eq!(dst.data.nseg, 1);
        assert_eq!(dst.data.nparam, 1);
    }
}
