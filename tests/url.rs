use urlbuf::{ErrorKind, HostKind, Url};

#[test]
fn build_from_empty() {
    let mut url = Url::new();
    assert!(url.is_empty());
    assert_eq!(url.as_str(), "");

    url.set_scheme("HTTPS").unwrap();
    assert_eq!(url.as_str(), "HTTPS:");
    url.normalize_scheme();
    assert_eq!(url.as_str(), "https:");
    assert_eq!(url.scheme(), "https");
}

#[test]
fn parse_components() {
    let url = Url::parse("http://a:b@x.y:8080/p/q?k=v#f").unwrap();
    assert_eq!(url.scheme(), "http");
    assert_eq!(url.encoded_user(), "a");
    assert_eq!(url.encoded_password(), "b");
    assert_eq!(url.encoded_userinfo(), "a:b");
    assert_eq!(url.encoded_host(), "x.y");
    assert_eq!(url.host_kind(), HostKind::RegName);
    assert_eq!(url.port(), "8080");
    assert_eq!(url.port_number(), Some(8080));
    assert_eq!(url.encoded_path(), "/p/q");
    assert_eq!(url.encoded_query(), "k=v");
    assert_eq!(url.encoded_fragment(), "f");
    assert_eq!(url.segment_count(), 2);
    assert_eq!(url.param_count(), 1);
    assert_eq!(url.encoded_authority(), "a:b@x.y:8080");
    assert_eq!(url.encoded_origin(), "http://a:b@x.y:8080");
}

#[test]
fn clear_user_then_password() {
    let mut url = Url::parse("http://a:b@x.y:8080/p/q?k=v#f").unwrap();

    url.set_user("").unwrap();
    // The "@" is retained because the password exists.
    assert_eq!(url.as_str(), "http://:b@x.y:8080/p/q?k=v#f");
    assert!(url.has_userinfo());

    url.set_password("").unwrap();
    assert_eq!(url.as_str(), "http://x.y:8080/p/q?k=v#f");
    assert!(!url.has_userinfo());
}

#[test]
fn append_segment_after_trailing_slash() {
    let mut url = Url::parse("http://x/").unwrap();
    assert!(url.segments().eq([""]));
    assert_eq!(url.segment_count(), 1);

    url.insert_encoded_segment(1, "a").unwrap();
    assert_eq!(url.encoded_path(), "/a");
    assert_eq!(url.segment_count(), 1);
    assert_eq!(url.as_str(), "http://x/a");
}

#[test]
fn query_only_reference() {
    let url = Url::parse("?a=1&b=&c").unwrap();
    assert_eq!(url.param_count(), 3);
    let params: Vec<_> = url
        .params()
        .map(|p| (p.key.as_str(), p.value.map(|v| v.as_str())))
        .collect();
    assert_eq!(params, [("a", Some("1")), ("b", Some("")), ("c", None)]);
}

#[test]
fn ipv6_host_gains_brackets() {
    let mut url = Url::new();
    url.set_host("2001:db8::1").unwrap();
    assert_eq!(url.as_str(), "//[2001:db8::1]");
    assert_eq!(url.host_kind(), HostKind::Ipv6);

    let reparsed = Url::parse(url.as_str()).unwrap();
    assert_eq!(reparsed.as_str(), url.as_str());
    assert_eq!(reparsed.host_kind(), HostKind::Ipv6);
}

#[test]
fn round_trip() {
    for s in [
        "",
        "https:",
        "http://example.com",
        "http://a:b@x.y:8080/p/q?k=v#f",
        "//u@",
        "//[v7.ab]:80",
        "ldap://[2001:db8::7]/c=GB?objectClass?one",
        "mailto:John.Doe@example.com",
        "urn:oasis:names:specification:docbook:dtd:xml:4.1.2",
        "foo://example.com:8042/over/there?name=ferret#nose",
        "?%20",
        "#f",
        "/a//b/",
    ] {
        let url = Url::parse(s).unwrap();
        assert_eq!(url.as_str(), s);
        let again = Url::parse(url.as_str()).unwrap();
        assert_eq!(again, url);
    }
}

#[test]
fn setter_idempotence() {
    let mut a = Url::parse("http://h/p?q#f").unwrap();
    let mut b = a.clone();

    b.set_host("other").unwrap();
    a.set_host("other").unwrap();
    a.set_host("other").unwrap();
    assert_eq!(a, b);

    a.set_query("x=1").unwrap();
    b.set_query("x=1").unwrap();
    b.set_query("x=1").unwrap();
    assert_eq!(a, b);

    a.set_user("").unwrap();
    b.set_user("").unwrap();
    b.set_user("").unwrap();
    assert_eq!(a, b);
}

#[test]
fn nonadjacent_setters_commute() {
    let mut a = Url::parse("http://h/p").unwrap();
    let mut b = a.clone();

    a.set_query("k=v").unwrap();
    a.set_fragment("frag").unwrap();
    b.set_fragment("frag").unwrap();
    b.set_query("k=v").unwrap();
    assert_eq!(a.as_str(), b.as_str());

    let mut a = Url::parse("//h").unwrap();
    let mut b = a.clone();
    a.set_scheme("x").unwrap();
    a.set_encoded_path("/p").unwrap();
    b.set_encoded_path("/p").unwrap();
    b.set_scheme("x").unwrap();
    assert_eq!(a.as_str(), b.as_str());
}

#[test]
fn decoded_setters_encode() {
    let mut url = Url::new();
    url.set_user("a b").unwrap();
    assert_eq!(url.encoded_user(), "a%20b");
    assert_eq!(url.user().into_string().unwrap(), "a b");

    url.set_password("p@ss:word").unwrap();
    assert_eq!(url.encoded_password(), "p%40ss:word");
    assert_eq!(url.password().into_string().unwrap(), "p@ss:word");

    url.set_host("www.example com").unwrap();
    assert_eq!(url.encoded_host(), "www.example%20com");
    assert_eq!(url.host_kind(), HostKind::RegName);

    url.set_path("/a b/c").unwrap();
    assert_eq!(url.encoded_path(), "/a%20b/c");
    assert_eq!(url.segment_count(), 2);

    url.set_query("k=v w").unwrap();
    assert_eq!(url.encoded_query(), "k=v%20w");

    url.set_fragment("x y").unwrap();
    assert_eq!(url.encoded_fragment(), "x%20y");
}

#[test]
fn encoded_setters_validate() {
    let mut url = Url::parse("http://h/p").unwrap();
    let before = url.as_str().to_owned();

    assert_eq!(
        url.set_scheme("1http").unwrap_err().kind(),
        ErrorKind::InvalidPart
    );
    assert_eq!(
        url.set_encoded_user("a b").unwrap_err().kind(),
        ErrorKind::InvalidPart
    );
    assert_eq!(
        url.set_encoded_user("a%2").unwrap_err().kind(),
        ErrorKind::InvalidPart
    );
    assert_eq!(
        url.set_encoded_host("a b").unwrap_err().kind(),
        ErrorKind::InvalidPart
    );
    assert_eq!(url.set_port("80a").unwrap_err().kind(), ErrorKind::InvalidPart);
    assert_eq!(
        url.set_encoded_query("#").unwrap_err().kind(),
        ErrorKind::InvalidPart
    );
    assert_eq!(
        url.set_host("[nope]").unwrap_err().kind(),
        ErrorKind::InvalidPart
    );
    // A failed setter leaves the container untouched.
    assert_eq!(url.as_str(), before);
}

#[test]
fn path_grammar_depends_on_context() {
    let mut url = Url::parse("http://h").unwrap();
    // With an authority the path must be empty or absolute.
    assert!(url.set_encoded_path("rel").is_err());
    url.set_encoded_path("/abs").unwrap();
    assert_eq!(url.as_str(), "http://h/abs");

    let mut url = Url::parse("http:").unwrap();
    url.set_encoded_path("rootless:ok").unwrap();
    assert_eq!(url.as_str(), "http:rootless:ok");
    // Without an authority the path cannot begin with "//".
    assert!(url.set_encoded_path("//x").is_err());

    let mut url = Url::new();
    // Without scheme or authority, no ":" in the first segment.
    assert!(url.set_encoded_path("a:b").is_err());
    url.set_encoded_path("a/b:c").unwrap();
    assert_eq!(url.as_str(), "a/b:c");
}

#[test]
fn authority_setter() {
    let mut url = Url::parse("http:/p").unwrap();
    url.set_encoded_authority("u:p@h:80").unwrap();
    assert_eq!(url.as_str(), "http://u:p@h:80/p");
    assert_eq!(url.encoded_user(), "u");
    assert_eq!(url.port(), "80");
    assert_eq!(url.host_kind(), HostKind::RegName);

    url.set_encoded_authority("127.0.0.1").unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1/p");
    assert_eq!(url.host_kind(), HostKind::Ipv4);
    assert!(!url.has_userinfo());

    url.set_encoded_authority("").unwrap();
    assert_eq!(url.as_str(), "http:/p");
    assert!(!url.has_authority());
    assert_eq!(url.host_kind(), HostKind::None);
}

#[test]
fn origin_setter() {
    let mut url = Url::parse("/p?q#f").unwrap();
    url.set_encoded_origin("https://example.com:8042").unwrap();
    assert_eq!(url.as_str(), "https://example.com:8042/p?q#f");

    url.set_encoded_origin("ftp:").unwrap();
    assert_eq!(url.as_str(), "ftp:/p?q#f");
    assert!(!url.has_authority());

    url.set_encoded_origin("").unwrap();
    assert_eq!(url.as_str(), "/p?q#f");
    assert!(Url::parse("x:y").unwrap().set_encoded_origin("http://h/p").is_err());
}

#[test]
fn userinfo_setter() {
    let mut url = Url::parse("//h").unwrap();
    url.set_encoded_userinfo("u:p%20w").unwrap();
    assert_eq!(url.as_str(), "//u:p%20w@h");

    url.set_userinfo("u2").unwrap();
    assert_eq!(url.as_str(), "//u2@h");
    assert_eq!(url.encoded_password(), "");

    url.set_encoded_userinfo("").unwrap();
    assert_eq!(url.as_str(), "//h");

    // Removing the userinfo of a host-less authority removes the authority.
    let mut url = Url::parse("//u:p@").unwrap();
    url.set_userinfo("").unwrap();
    assert_eq!(url.as_str(), "");
}

#[test]
fn user_and_password_synthesize_authority() {
    let mut url = Url::new();
    url.set_user("u").unwrap();
    assert_eq!(url.as_str(), "//u@");
    assert!(url.has_authority());

    let mut url = Url::new();
    url.set_password("p").unwrap();
    assert_eq!(url.as_str(), "//:p@");

    // Clearing the only contentful part drops the authority.
    url.set_password("").unwrap();
    assert_eq!(url.as_str(), "");
}

#[test]
fn host_setter_cascades() {
    let mut url = Url::parse("http://h:80/p").unwrap();
    url.set_host("").unwrap();
    // The port keeps the authority alive.
    assert_eq!(url.as_str(), "http://:80/p");
    assert_eq!(url.host_kind(), HostKind::None);

    url.set_port("").unwrap();
    assert_eq!(url.as_str(), "http:/p");
    assert!(!url.has_authority());

    let mut url = Url::parse("http://u@h/p").unwrap();
    url.set_host("").unwrap();
    // The userinfo keeps the authority alive.
    assert_eq!(url.as_str(), "http://u@/p");
}

#[test]
fn host_classification_on_set() {
    let mut url = Url::new();
    url.set_host("127.0.0.1").unwrap();
    assert_eq!(url.host_kind(), HostKind::Ipv4);
    assert_eq!(url.as_str(), "//127.0.0.1");

    url.set_host("[v7.ab]").unwrap();
    assert_eq!(url.host_kind(), HostKind::IpvFuture);
    assert_eq!(url.as_str(), "//[v7.ab]");

    url.set_host("127.0.0.256").unwrap();
    assert_eq!(url.host_kind(), HostKind::RegName);
    assert_eq!(url.as_str(), "//127.0.0.256");

    url.set_encoded_host("%61.example").unwrap();
    assert_eq!(url.host_kind(), HostKind::RegName);
    assert_eq!(url.host().into_string().unwrap(), "a.example");
}

#[test]
fn port_setters() {
    let mut url = Url::parse("//h").unwrap();
    url.set_port_number(0).unwrap();
    assert_eq!(url.as_str(), "//h:0");
    url.set_port_number(65535).unwrap();
    assert_eq!(url.as_str(), "//h:65535");
    url.set_port("8080").unwrap();
    assert_eq!(url.port_number(), Some(8080));

    // A port alone sustains an authority.
    let mut url = Url::new();
    url.set_port("80").unwrap();
    assert_eq!(url.as_str(), "//:80");
    url.set_port("").unwrap();
    assert_eq!(url.as_str(), "");

    // A bare ":" port parses and reads as empty.
    let url = Url::parse("//h:").unwrap();
    assert!(url.has_port());
    assert_eq!(url.port(), "");
    assert_eq!(url.port_number(), None);
}

#[test]
fn query_part_setters() {
    let mut url = Url::parse("/p").unwrap();
    url.set_query_part("?a&b").unwrap();
    assert_eq!(url.encoded_query(), "a&b");
    assert_eq!(url.param_count(), 2);

    assert!(url.set_query_part("a&b").is_err());

    url.set_query_part("").unwrap();
    assert!(!url.has_query());
    assert_eq!(url.param_count(), 0);

    url.set_fragment_part("#f").unwrap();
    assert_eq!(url.encoded_fragment(), "f");
    assert!(url.set_fragment_part("f").is_err());
    url.set_fragment_part("").unwrap();
    assert!(!url.has_fragment());
}

#[test]
fn clear_and_reuse() {
    let mut url = Url::parse("http://u@h:1/p?q#f").unwrap();
    let cap = url.capacity();
    url.clear();
    assert_eq!(url.as_str(), "");
    assert_eq!(url.capacity(), cap);
    assert_eq!(url.segment_count(), 0);
    assert_eq!(url.param_count(), 0);
    assert_eq!(url.host_kind(), HostKind::None);

    url.set_url("//new.example/x").unwrap();
    assert_eq!(url.as_str(), "//new.example/x");
}

#[test]
fn parse_failure_leaves_url_unchanged() {
    let mut url = Url::parse("http://h/p").unwrap();
    assert!(url.set_url("http://h :80").is_err());
    assert_eq!(url.as_str(), "http://h/p");
}

#[test]
fn display_and_from_str() {
    let url: Url = "http://h/p".parse().unwrap();
    assert_eq!(format!("{url}"), "http://h/p");
    let dbg = format!("{url:?}");
    assert!(dbg.contains("scheme") && dbg.contains("http"));
}
