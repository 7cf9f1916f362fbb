//! Tag pattern matching
//!
//! Output subscriptions are expressed as patterns matched against input tags.
//! A `*` in the pattern matches any run of characters (including none);
//! everything else matches literally. Matching runs only during routing table
//! compilation.

/// Match a tag against a subscription pattern
///
/// # Example
///
/// ```
/// use relay_routing::tag_match;
///
/// assert!(tag_match("*", "serial.tty0"));
/// assert!(tag_match("serial.*", "serial.tty0"));
/// assert!(tag_match("*.tty0", "serial.tty0"));
/// assert!(!tag_match("http.*", "serial.tty0"));
/// ```
#[must_use]
pub fn tag_match(pattern: &str, tag: &str) -> bool {
    let pat = pattern.as_bytes();
    let txt = tag.as_bytes();

    // Iterative glob over '*' with backtracking to the last star
    let (mut p, mut t) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while t < txt.len() {
        if p < pat.len() && (pat[p] == txt[t]) {
            p += 1;
            t += 1;
        } else if p < pat.len() && pat[p] == b'*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    while p < pat.len() && pat[p] == b'*' {
        p += 1;
    }

    p == pat.len()
}
