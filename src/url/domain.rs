use url::Url;

/// Returns true if both URLs share scheme, host, and port
///
/// # Examples
///
/// ```
/// use ranksight::url::same_origin;
/// use url::Url;
///
/// let site = Url::parse("https://example.com/").unwrap();
/// assert!(same_origin(&site, &Url::parse("https://example.com/about").unwrap()));
/// assert!(!same_origin(&site, &Url::parse("http://example.com/about").unwrap()));
/// ```
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

/// Returns the root URL (`scheme://host[:port]/`) of the given URL's site
pub fn site_root(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}
