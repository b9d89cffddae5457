//! Helpers for building RFC 8288 `Link` headers the way GitHub emits them.

/// Build a `Link` header for page `page` of `last` pages of `base_url + path`.
///
/// Extra query parameters (e.g. `per_page=2`) are placed before `page`.
///
/// ```
/// use octocheck_test_utils::links::link_header;
///
/// let header = link_header("http://localhost:1234", "/items", "per_page=2", 1, 3);
/// assert!(header.contains(r#"<http://localhost:1234/items?per_page=2&page=2>; rel="next""#));
/// assert!(header.contains(r#"rel="last""#));
/// ```
pub fn link_header(base_url: &str, path: &str, extra_query: &str, page: u32, last: u32) -> String {
  let url = |target: u32| {
    if extra_query.is_empty() {
      format!("{base_url}{path}?page={target}")
    } else {
      format!("{base_url}{path}?{extra_query}&page={target}")
    }
  };

  let mut parts = Vec::new();
  if page > 1 {
    parts.push(format!("<{}>; rel=\"prev\"", url(page - 1)));
  }
  if page < last {
    parts.push(format!("<{}>; rel=\"next\"", url(page + 1)));
    parts.push(format!("<{}>; rel=\"last\"", url(last)));
  }
  if page > 1 {
    parts.push(format!("<{}>; rel=\"first\"", url(1)));
  }
  parts.join(", ")
}
