//! Query parameter iteration, lookup and element-level splices.

use core::{iter::FusedIterator, ops::Range};

use crate::{
    encoding::{self, table, EStr, Fill},
    error::Result,
    parts,
    url::Url,
};

/// One key–value element of the query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Param<'a> {
    /// The key, possibly empty.
    pub key: &'a EStr,
    /// The value; `None` when the element has no `=`.
    pub value: Option<&'a EStr>,
}

/// An iterator over the parameters of the query.
///
/// Separators follow the stored form: the first element owns the `?`, every
/// other element owns its `&`, and a `=` heads the value span.
///
/// This struct is created by [`Url::params`].
#[derive(Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Params<'a> {
    query: &'a [u8],
    front: usize,
    back: usize,
}

fn split_element(element: &[u8]) -> Param<'_> {
    // The separator byte has been stripped already.
    match element.iter().position(|&x| x == b'=') {
        Some(i) => Param {
            key: EStr::from_ascii(&element[..i]),
            value: Some(EStr::from_ascii(&element[i + 1..])),
        },
        None => Param {
            key: EStr::from_ascii(element),
            value: None,
        },
    }
}

impl<'a> Iterator for Params<'a> {
    type Item = Param<'a>;

    fn next(&mut self) -> Option<Param<'a>> {
        if self.front >= self.back {
            return None;
        }
        let start = self.front + 1;
        let stop = self.query[start..self.back]
            .iter()
            .position(|&x| x == b'&')
            .map_or(self.back, |i| start + i);
        self.front = stop;
        Some(split_element(&self.query[start..stop]))
    }
}

impl<'a> DoubleEndedIterator for Params<'a> {
    fn next_back(&mut self) -> Option<Param<'a>> {
        if self.front >= self.back {
            return None;
        }
        let sep = self.query[self.front + 1..self.back]
            .iter()
            .rposition(|&x| x == b'&')
            .map_or(self.front, |i| self.front + 1 + i);
        let element = &self.query[sep + 1..self.back];
        self.back = sep;
        Some(split_element(element))
    }
}

impl FusedIterator for Params<'_> {}

/// Returns the offset of the separator byte of element `i` of a stored
/// query (`?` for element 0, the `i`-th `&` otherwise), or the query length
/// when there are fewer elements.
fn param_offset(query: &[u8], i: usize) -> usize {
    if i == 0 {
        return 0;
    }
    let mut n = 0;
    for (k, &x) in query.iter().enumerate().skip(1) {
        if x == b'&' {
            n += 1;
            if n == i {
                return k;
            }
        }
    }
    query.len()
}

impl Url {
    /// Returns an iterator over the query parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use urlbuf::Url;
    ///
    /// let url = Url::parse("?a=1&b=&c")?;
    /// let params: Vec<_> = url.params().map(|p| (p.key.as_str(), p.value.map(|v| v.as_str()))).collect();
    /// assert_eq!(params, [("a", Some("1")), ("b", Some("")), ("c", None)]);
    /// # Ok::<_, urlbuf::Error>(())
    /// ```
    pub fn params(&self) -> Params<'_> {
        let query = self.pts.get(parts::QUERY);
        Params {
            query,
            front: 0,
            back: query.len(),
        }
    }

    /// Returns the number of query parameters.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.pts.data.nparam
    }

    /// Checks whether any parameter's key decodes equal to `key`.
    #[must_use]
    pub fn contains_param(&self, key: &str) -> bool {
        self.find_param(key).is_some()
    }

    /// Counts the parameters whose keys decode equal to `key`.
    #[must_use]
    pub fn count_params(&self, key: &str) -> usize {
        self.params()
            .filter(|p| encoding::key_equal(p.key.as_str().as_bytes(), key.as_bytes()))
            .count()
    }

    /// Returns the index of the first parameter whose key decodes equal to
    /// `key`.
    #[must_use]
    pub fn find_param(&self, key: &str) -> Option<usize> {
        self.params()
            .position(|p| encoding::key_equal(p.key.as_str().as_bytes(), key.as_bytes()))
    }

    /// Returns the value of the first parameter whose key decodes equal to
    /// `key`; a parameter without `=` yields the empty slice.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&EStr> {
        self.params()
            .find(|p| encoding::key_equal(p.key.as_str().as_bytes(), key.as_bytes()))
            .map(|p| p.value.unwrap_or(EStr::EMPTY))
    }

    /// Inserts an already-encoded parameter before parameter `i`;
    /// `i == param_count()` appends. `None` stores a key with no `=`.
    ///
    /// # Panics
    ///
    /// Panics if `i > param_count()`.
    pub fn insert_encoded_param(&mut self, i: usize, key: &str, value: Option<&str>) -> Result<()> {
        encoding::validate(key.as_bytes(), table::QUERY_KEY)?;
        if let Some(v) = value {
            encoding::validate(v.as_bytes(), table::QUERY_VALUE)?;
        }
        self.splice_param(i..i, Fill::raw(key.as_bytes()), value.map(|v| Fill::raw(v.as_bytes())))
    }

    /// Percent-encodes and inserts a parameter before parameter `i`. A `=`
    /// or `&` in the key and a `&` in the value are encoded, not treated as
    /// delimiters.
    ///
    /// # Panics
    ///
    /// Panics if `i > param_count()`.
    pub fn insert_param(&mut self, i: usize, key: &str, value: Option<&str>) -> Result<()> {
        self.splice_param(
            i..i,
            Fill::encoded(key.as_bytes(), table::QUERY_KEY),
            value.map(|v| Fill::encoded(v.as_bytes(), table::QUERY_VALUE)),
        )
    }

    /// Appends a parameter, encoding key and value.
    pub fn append_param(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        self.insert_param(self.param_count(), key, value)
    }

    /// Removes parameter `i`. Removing the last one removes the query.
    ///
    /// # Panics
    ///
    /// Panics if `i >= param_count()`.
    pub fn remove_param(&mut self, i: usize) -> Result<()> {
        self.remove_params(i..i + 1)
    }

    /// Removes the given range of parameters.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn remove_params(&mut self, range: Range<usize>) -> Result<()> {
        assert!(
            range.start <= range.end && range.end <= self.pts.data.nparam,
            "parameter range out of bounds"
        );
        if range.start == range.end {
            return Ok(());
        }
        self.splice_param_raw(range, None)
    }

    /// Replaces parameter `i` with an already-encoded parameter, preserving
    /// the parameter count.
    ///
    /// # Panics
    ///
    /// Panics if `i >= param_count()`.
    pub fn replace_encoded_param(&mut self, i: usize, key: &str, value: Option<&str>) -> Result<()> {
        encoding::validate(key.as_bytes(), table::QUERY_KEY)?;
        if let Some(v) = value {
            encoding::validate(v.as_bytes(), table::QUERY_VALUE)?;
        }
        self.splice_param(
            i..i + 1,
            Fill::raw(key.as_bytes()),
            value.map(|v| Fill::raw(v.as_bytes())),
        )
    }

    /// Percent-encodes a parameter and replaces parameter `i` with it.
    ///
    /// # Panics
    ///
    /// Panics if `i >= param_count()`.
    pub fn replace_param(&mut self, i: usize, key: &str, value: Option<&str>) -> Result<()> {
        self.splice_param(
            i..i + 1,
            Fill::encoded(key.as_bytes(), table::QUERY_KEY),
            value.map(|v| Fill::encoded(v.as_bytes(), table::QUERY_VALUE)),
        )
    }

    fn splice_param(&mut self, range: Range<usize>, key: Fill<'_>, value: Option<Fill<'_>>) -> Result<()> {
        assert!(
            range.start <= range.end && range.end <= self.pts.data.nparam,
            "parameter index out of bounds"
        );
        self.splice_param_raw(range, Some((key, value)))
    }

    /// The one splice behind every parameter mutation: replaces elements
    /// `range` with at most one new element.
    fn splice_param_raw(
        &mut self,
        range: Range<usize>,
        element: Option<(Fill<'_>, Option<Fill<'_>>)>,
    ) -> Result<()> {
        let nparam = self.pts.data.nparam;
        let q_off = self.pts.index().offset(parts::QUERY);
        let query = self.pts.get(parts::QUERY);
        let lo = param_offset(query, range.start);
        let hi = param_offset(query, range.end);

        let n = match &element {
            Some((key, value)) => {
                1 + key.len() + value.as_ref().map_or(0, |v| 1 + v.len())
            }
            None => 0,
        };
        let plan = self
            .pts
            .buf
            .reserve_change_part(parts::QUERY, q_off + lo, hi - lo, n)?;
        let win = self.pts.buf.change_part(plan);
        let element_is_some = element.is_some();
        if let Some((key, value)) = element {
            let sep = if range.start == 0 { b'?' } else { b'&' };
            let (head, rest) = win.split(1);
            head.copy(&[sep]);
            match value {
                Some(v) => {
                    let (k, rest) = rest.split(key.len());
                    k.fill(&key);
                    let (eq, vw) = rest.split(1);
                    eq.copy(b"=");
                    vw.fill(&v);
                }
                None => rest.fill(&key),
            }
        } else {
            win.copy(b"");
        }

        self.pts.data.nparam = nparam - (range.end - range.start) + usize::from(element_is_some);

        // The element now following the splice owns the wrong separator when
        // the splice touched the front.
        if range.start == 0 {
            let query_len = self.pts.index().len_of(parts::QUERY);
            if n < query_len {
                let at = q_off + n;
                let fix = if element_is_some { b'&' } else { b'?' };
                self.pts.buf.payload_mut()[at] = fix;
            }
        }
        self.pts.assert_invariants();
        Ok(())
    }
}
