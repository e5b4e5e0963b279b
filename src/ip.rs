//! IP address parsers as per RFC 3986.

use core::net::{Ipv4Addr, Ipv6Addr};

fn hex_val(x: u8) -> Option<u8> {
    match x {
        b'0'..=b'9' => Some(x - b'0'),
        b'a'..=b'f' => Some(x - b'a' + 10),
        b'A'..=b'F' => Some(x - b'A' + 10),
        _ => None,
    }
}

// dec-octet = DIGIT             ; 0-9
//           / %x31-39 DIGIT     ; 10-99
//           / "1" 2DIGIT        ; 100-199
//           / "2" %x30-34 DIGIT ; 200-249
//           / "25" %x30-35      ; 250-255
fn dec_octet(s: &[u8], i: &mut usize) -> Option<u8> {
    let first = *s.get(*i)?;
    if !first.is_ascii_digit() {
        return None;
    }
    *i += 1;
    if first == b'0' {
        // No octal forms: a leading zero ends the octet.
        return Some(0);
    }
    let mut x = u32::from(first - b'0');
    for _ in 0..2 {
        match s.get(*i) {
            Some(&d) if d.is_ascii_digit() => {
                x = x * 10 + u32::from(d - b'0');
                *i += 1;
            }
            _ => break,
        }
    }
    u8::try_from(x).ok()
}

/// Parses an IPv4 address, requiring the entire input to match.
///
/// `Ipv4Addr::from_str` is not used here: it accepts forms that RFC 3986
/// forbids and rejects none that it allows, but the error positions and the
/// partial-match behavior needed by the host classifier differ.
pub(crate) fn parse_v4(s: &[u8]) -> Option<Ipv4Addr> {
    let mut i = 0;
    let mut octets = [0u8; 4];
    for (k, octet) in octets.iter_mut().enumerate() {
        if k > 0 {
            if s.get(i) != Some(&b'.') {
                return None;
            }
            i += 1;
        }
        *octet = dec_octet(s, &mut i)?;
    }
    (i == s.len()).then(|| Ipv4Addr::from(octets))
}

/// Parses an IPv6 address, requiring the entire input to match.
pub(crate) fn parse_v6(s: &[u8]) -> Option<Ipv6Addr> {
    let mut segs = [0u16; 8];
    let mut n = 0;
    let mut ellipsis = None;
    let mut i = 0;

    if s.starts_with(b"::") {
        ellipsis = Some(0);
        i = 2;
    } else if s.first() == Some(&b':') {
        return None;
    }

    while n < 8 && i < s.len() {
        // A group of one to four hexadecimal digits.
        let start = i;
        let mut x: u16 = 0;
        while i < s.len() && i - start < 4 {
            match hex_val(s[i]) {
                Some(v) => {
                    x = (x << 4) | u16::from(v);
                    i += 1;
                }
                None => break,
            }
        }
        if i == start {
            return None;
        }
        match s.get(i) {
            None => {
                segs[n] = x;
                n += 1;
            }
            Some(&b':') => {
                segs[n] = x;
                n += 1;
                i += 1;
                if s.get(i) == Some(&b':') {
                    if ellipsis.is_some() {
                        return None;
                    }
                    ellipsis = Some(n);
                    i += 1;
                } else if i == s.len() {
                    // Trailing single colon.
                    return None;
                }
            }
            Some(&b'.') => {
                // Embedded IPv4 address fills the last two groups.
                if n > 6 {
                    return None;
                }
                let octets = parse_v4(&s[start..])?.octets();
                segs[n] = u16::from_be_bytes([octets[0], octets[1]]);
                segs[n + 1] = u16::from_be_bytes([octets[2], octets[3]]);
                n += 2;
                i = s.len();
            }
            Some(_) => return None,
        }
    }
    if i < s.len() {
        return None;
    }

    match ellipsis {
        None => (n == 8).then(|| segs.into()),
        Some(e) => {
            if n == 8 {
                // "::" must elide at least one group.
                return None;
            }
            for j in (e..n).rev() {
                segs[8 - (n - j)] = segs[j];
                segs[j] = 0;
            }
            Some(segs.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v4() {
        assert_eq!(Some(Ipv4Addr::new(127, 0, 0, 1)), parse_v4(b"127.0.0.1"));
        assert_eq!(
            Some(Ipv4Addr::new(255, 255, 255, 255)),
            parse_v4(b"255.255.255.255")
        );
        assert_eq!(Some(Ipv4Addr::new(0, 0, 0, 0)), parse_v4(b"0.0.0.0"));

        // out of range
        assert!(parse_v4(b"256.0.0.1").is_none());
        // too short
        assert!(parse_v4(b"255.0.0").is_none());
        // too long
        assert!(parse_v4(b"255.0.0.1.2").is_none());
        // no number between dots
        assert!(parse_v4(b"255.0..1").is_none());
        // octal
        assert!(parse_v4(b"255.0.0.01").is_none());
        assert!(parse_v4(b"255.0.0.00").is_none());
        assert!(parse_v4(b"255.0.00.0").is_none());
        // preceding dot
        assert!(parse_v4(b".0.0.0.0").is_none());
        // trailing dot
        assert!(parse_v4(b"0.0.0.0.").is_none());
    }

    #[test]
    fn v6() {
        assert_eq!(
            Some(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 0)),
            parse_v6(b"0:0:0:0:0:0:0:0")
        );
        assert_eq!(
            Some(Ipv6Addr::new(1, 2, 3, 4, 5, 6, 7, 8)),
            parse_v6(b"1:02:003:0004:0005:006:07:8")
        );

        assert_eq!(Some(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1)), parse_v6(b"::1"));
        assert_eq!(Some(Ipv6Addr::new(1, 0, 0, 0, 0, 0, 0, 0)), parse_v6(b"1::"));
        assert_eq!(Some(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 0)), parse_v6(b"::"));

        assert_eq!(
            Some(Ipv6Addr::new(0x2a02, 0x6b8, 0, 0, 0, 0, 0x11, 0x11)),
            parse_v6(b"2a02:6b8::11:11")
        );

        assert_eq!(
            Some(Ipv6Addr::new(0, 2, 3, 4, 5, 6, 7, 8)),
            parse_v6(b"::2:3:4:5:6:7:8")
        );
        assert_eq!(
            Some(Ipv6Addr::new(1, 2, 3, 4, 0, 6, 7, 8)),
            parse_v6(b"1:2:3:4::6:7:8")
        );
        assert_eq!(
            Some(Ipv6Addr::new(1, 2, 3, 4, 5, 6, 7, 0)),
            parse_v6(b"1:2:3:4:5:6:7::")
        );

        // only a colon
        assert!(parse_v6(b":").is_none());
        // too long group
        assert!(parse_v6(b"::00000").is_none());
        // too short
        assert!(parse_v6(b"1:2:3:4:5:6:7").is_none());
        // too long
        assert!(parse_v6(b"1:2:3:4:5:6:7:8:9").is_none());
        // triple colon
        assert!(parse_v6(b"1:2:::6:7:8").is_none());
        assert!(parse_v6(b"1:2:::").is_none());
        assert!(parse_v6(b":::6:7:8").is_none());
        assert!(parse_v6(b":::").is_none());
        // two double colons
        assert!(parse_v6(b"1:2::6::8").is_none());
        assert!(parse_v6(b"::6::8").is_none());
        assert!(parse_v6(b"1:2::6::").is_none());
        assert!(parse_v6(b"::2:6::").is_none());
        // `::` indicating zero groups of zeros
        assert!(parse_v6(b"::1:2:3:4:5:6:7:8").is_none());
        assert!(parse_v6(b"1:2:3:4::5:6:7:8").is_none());
        assert!(parse_v6(b"1:2:3:4:5:6:7:8::").is_none());
        // preceding colon
        assert!(parse_v6(b":1:2:3:4:5:6:7:8").is_none());
        // trailing colon
        assert!(parse_v6(b"1:2:3:4:5:6:7:8:").is_none());
    }

    #[test]
    fn v4_in_v6() {
        assert_eq!(
            Some(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 49152, 545)),
            parse_v6(b"::192.0.2.33")
        );
        assert_eq!(
            Some(Ipv6Addr::new(0, 0, 0, 0, 0, 0xffff, 49152, 545)),
            parse_v6(b"::FFFF:192.0.2.33")
        );
        assert_eq!(
            Some(Ipv6Addr::new(0x64, 0xff9b, 0, 0, 0, 0, 49152, 545)),
            parse_v6(b"64:ff9b::192.0.2.33")
        );
        assert_eq!(
            Some(Ipv6Addr::new(
                0x2001, 0xdb8, 0x122, 0xc000, 0x2, 0x2100, 49152, 545
            )),
            parse_v6(b"2001:db8:122:c000:2:2100:192.0.2.33")
        );

        // colon after v4
        assert!(parse_v6(b"::127.0.0.1:").is_none());
        // not enough groups
        assert!(parse_v6(b"1:2:3:4:5:127.0.0.1").is_none());
        // too many groups
        assert!(parse_v6(b"1:2:3:4:5:6:7:127.0.0.1").is_none());
    }
}
