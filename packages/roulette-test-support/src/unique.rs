use ulid::Ulid;

/// `{prefix}-{ulid}`.
///
/// ```
/// use roulette_test_support::unique_str;
///
/// let a = unique_str("session");
/// let b = unique_str("session");
/// assert_ne!(a, b);
/// assert!(a.starts_with("session-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// `count` distinct participant ids sharing one random suffix, named after
/// their position (`p0-…`, `p1-…`).
pub fn unique_participant_ids(count: usize) -> Vec<String> {
    let suffix = Ulid::new();
    (0..count).map(|i| format!("p{i}-{suffix}")).collect()
}
