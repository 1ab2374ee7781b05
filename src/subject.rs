//! Commit subject normalization.
//!
//! The same change usually carries a topic prefix such as `Cycles: ` in the
//! wide repository and none in the narrow one. Both sides are compared (and
//! patches are retitled) after dropping that prefix, so the helpers here are
//! shared by commit map building and patch rewriting.
//!
//! All functions operate on raw bytes. Case mapping only touches ASCII
//! letters, so subjects that are not valid UTF-8 pass through intact.

/// Literal prefix of the subject line in a `git format-patch` header.
pub const PATCH_SUBJECT_PREFIX: &[u8] = b"Subject: [PATCH] ";

/// Strip a topic prefix from `subject` and recapitalize what remains.
///
/// `subject` must start with `required_prefix` for anything to happen. The
/// remainder is then checked against `skip_prefixes` in order; on the first
/// match the topic is removed and the rest is capitalized (first character
/// upper case, everything after it lower case), and `required_prefix` is put
/// back in front. Without a matching topic the input is returned unchanged.
///
/// Capitalization flattens acronyms and embedded capitals: `Cycles: Fix BVH`
/// becomes `Fix bvh`. Both repositories are normalized the same way, so the
/// fingerprints still line up.
pub fn normalize<S: AsRef<[u8]>>(
    subject: &[u8],
    required_prefix: &[u8],
    skip_prefixes: &[S],
) -> Vec<u8> {
    let Some(rest) = subject.strip_prefix(required_prefix) else {
        return subject.to_vec();
    };

    let topic_free = skip_prefixes
        .iter()
        .find_map(|skip| rest.strip_prefix(skip.as_ref()));

    match topic_free {
        Some(text) => {
            let mut out = Vec::with_capacity(required_prefix.len() + text.len());
            out.extend_from_slice(required_prefix);
            out.extend(capitalize(text));
            out
        }
        None => subject.to_vec(),
    }
}

/// Normalize a bare commit subject for fingerprinting.
///
/// Applies [`normalize`] with no required prefix and then drops a single
/// trailing `.`.
pub fn normalize_for_fingerprint<S: AsRef<[u8]>>(subject: &[u8], skip_prefixes: &[S]) -> Vec<u8> {
    let mut out = normalize(subject, b"", skip_prefixes);
    if out.last() == Some(&b'.') {
        out.pop();
    }
    out
}

/// Normalize a `Subject: [PATCH] ...` header line, newline included.
///
/// A `.` sitting right before the line's `\n` is removed as well.
pub fn normalize_patch_subject<S: AsRef<[u8]>>(line: &[u8], skip_prefixes: &[S]) -> Vec<u8> {
    let mut out = normalize(line, PATCH_SUBJECT_PREFIX, skip_prefixes);
    if out.ends_with(b".\n") {
        let newline = out.len() - 1;
        out.remove(newline - 1);
    }
    out
}

fn capitalize(text: &[u8]) -> impl Iterator<Item = u8> + '_ {
    text.iter().enumerate().map(|(i, b)| {
        if i == 0 {
            b.to_ascii_uppercase()
        } else {
            b.to_ascii_lowercase()
        }
    })
}
