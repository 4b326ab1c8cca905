//! Relative-path arithmetic for scope resolution.
//!
//! All paths handled here are project-relative and forward-slash normalized.
//! The project root directory is the empty string `""`. These functions are
//! pure; nothing in this module touches the filesystem.

/// Normalize a path to forward slashes with no `./` segments and no
/// trailing slash. Windows separators are accepted on input.
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// The directory a path belongs to.
///
/// A final segment with a file-type-looking suffix (a `.` after its first
/// character, e.g. `Button.tsx`) is treated as a file and stripped; anything
/// else — including dot-directories like `.github` and not-yet-created
/// extensionless paths — is treated as a directory itself. Root is `""`.
pub fn directory_of(path: &str) -> String {
    let norm = normalize(path);
    if norm.is_empty() {
        return norm;
    }
    let segs: Vec<&str> = norm.split('/').collect();
    let last = segs[segs.len() - 1];
    if looks_like_file(last) {
        segs[..segs.len() - 1].join("/")
    } else {
        norm
    }
}

/// Number of path segments in a normalized directory (0 for root).
pub fn segment_count(dir: &str) -> usize {
    if dir.is_empty() {
        0
    } else {
        dir.split('/').count()
    }
}

/// Whether `dir` equals `ancestor` or lies somewhere beneath it.
///
/// Compared segment-wise, so `apps/front` is not an ancestor of
/// `apps/frontend`.
pub fn is_within(dir: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return true;
    }
    if dir == ancestor {
        return true;
    }
    let anc: Vec<&str> = ancestor.split('/').collect();
    let sub: Vec<&str> = if dir.is_empty() {
        Vec::new()
    } else {
        dir.split('/').collect()
    };
    sub.len() > anc.len() && sub[..anc.len()] == anc[..]
}

/// Directory distance between two normalized directories.
///
/// Counts segments from each directory up to their deepest common ancestor
/// and sums both legs. Equal directories are 0, strict lineage is the depth
/// difference, and divergent directories (siblings, cousins) are the full
/// up-and-over walk.
pub fn distance_between(a: &str, b: &str) -> usize {
    let sa: Vec<&str> = if a.is_empty() {
        Vec::new()
    } else {
        a.split('/').collect()
    };
    let sb: Vec<&str> = if b.is_empty() {
        Vec::new()
    } else {
        b.split('/').collect()
    };
    let common = sa
        .iter()
        .zip(sb.iter())
        .take_while(|(x, y)| x == y)
        .count();
    (sa.len() - common) + (sb.len() - common)
}

fn looks_like_file(segment: &str) -> bool {
    segment.char_indices().any(|(i, c)| i > 0 && c == '.')
}
