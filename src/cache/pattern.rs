//! Glob Pattern Matching
//!
//! Redis-compatible subset used by `Keys` on the memory and file backends so
//! every backend returns the same key set for the same pattern:
//! `*` matches any run of characters (including none), `?` matches exactly one
//! character, everything else matches itself.

/// Returns true if `key` matches `pattern`.
pub fn glob_match(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();

    let (mut p, mut k) = (0, 0);
    // Position of the last `*` seen and the key index it was tried against
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, k));
                p += 1;
            }
            Some('?') => {
                p += 1;
                k += 1;
            }
            Some(c) if *c == key[k] => {
                p += 1;
                k += 1;
            }
            _ => match backtrack {
                // Let the last star swallow one more character and retry
                Some((star_p, star_k)) => {
                    p = star_p + 1;
                    k = star_k + 1;
                    backtrack = Some((star_p, star_k + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}
