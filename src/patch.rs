//! # Patch Rewriting
//!
//! A patch exported from one repository names its files relative to that
//! repository's root. Before it can be applied on the other side, every path
//! under the accepted prefix has to be moved to the destination prefix, file
//! sections outside the accepted prefix have to go, and the subject loses its
//! topic prefix.
//!
//! The rewriter is a line transducer with two states. Each input line is
//! classified once ([`LineKind`]) and the matching transition decides what is
//! emitted and which state follows. Bytes that are not part of a rewritten
//! path token or the subject are copied through untouched.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::subject::{self, PATCH_SUBJECT_PREFIX};

/// Line introducing one file's diff.
pub const FILE_SECTION_MARKER: &[u8] = b"diff --git";

/// Line introducing the trailing signature block after the last file.
pub const PATCHSET_END_MARKER: &[u8] = b"-- ";

const OLD_FILE_MARKER: &[u8] = b"---";
const NEW_FILE_MARKER: &[u8] = b"+++";

/// Whether lines of the current file section are being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Keeping,
    Skipping,
}

/// Classification of a single patch line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Subject,
    FileSection,
    PatchsetEnd,
    FileHeader,
    Other,
}

impl LineKind {
    /// Classify `line`. Earlier kinds take precedence, so a `-- ` line is
    /// always the patchset end, never an old-file header.
    pub fn of(line: &[u8]) -> Self {
        if line.starts_with(PATCH_SUBJECT_PREFIX) {
            Self::Subject
        } else if line.starts_with(FILE_SECTION_MARKER) {
            Self::FileSection
        } else if line.starts_with(PATCHSET_END_MARKER) {
            Self::PatchsetEnd
        } else if line.starts_with(OLD_FILE_MARKER) || line.starts_with(NEW_FILE_MARKER) {
            Self::FileHeader
        } else {
            Self::Other
        }
    }
}

/// Rewrites the lines of a single-commit patch.
#[derive(Debug)]
pub struct PatchRewriter<'a, S> {
    accept_prefix: &'a [u8],
    replace_prefix: &'a [u8],
    skip_prefixes: &'a [S],
    accepted_section: Vec<u8>,
    state: State,
}

impl<'a, S: AsRef<[u8]>> PatchRewriter<'a, S> {
    /// Create a rewriter moving `accept_prefix` to `replace_prefix`.
    ///
    /// Both prefixes are repository-relative; a leading `/` is rejected.
    pub fn new(
        accept_prefix: &'a [u8],
        replace_prefix: &'a [u8],
        skip_prefixes: &'a [S],
    ) -> Result<Self> {
        for prefix in [accept_prefix, replace_prefix] {
            if prefix.first() == Some(&b'/') {
                return Err(Error::InvalidPrefix {
                    prefix: String::from_utf8_lossy(prefix).into_owned(),
                });
            }
        }

        let mut accepted_section = FILE_SECTION_MARKER.to_vec();
        accepted_section.extend_from_slice(b" a/");
        accepted_section.extend_from_slice(accept_prefix);

        Ok(Self {
            accept_prefix,
            replace_prefix,
            skip_prefixes,
            accepted_section,
            state: State::Keeping,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Feed one line (terminator included). Returns the line to emit, if any.
    pub fn step(&mut self, line: &[u8]) -> Option<Vec<u8>> {
        match LineKind::of(line) {
            LineKind::Subject => self.on_subject(line),
            LineKind::FileSection => self.on_file_section(line),
            LineKind::PatchsetEnd => self.on_patchset_end(line),
            LineKind::FileHeader => self.on_file_header(line),
            LineKind::Other => self.on_other(line),
        }
    }

    /// Rewrite a whole patch given as lines.
    pub fn rewrite<L: AsRef<[u8]>>(&mut self, lines: &[L]) -> Vec<Vec<u8>> {
        lines
            .iter()
            .filter_map(|line| self.step(line.as_ref()))
            .collect()
    }

    fn on_subject(&mut self, line: &[u8]) -> Option<Vec<u8>> {
        Some(subject::normalize_patch_subject(line, self.skip_prefixes))
    }

    fn on_file_section(&mut self, line: &[u8]) -> Option<Vec<u8>> {
        if line.starts_with(&self.accepted_section) {
            self.state = State::Keeping;
            Some(self.replace_path_prefix(line))
        } else {
            self.state = State::Skipping;
            None
        }
    }

    fn on_patchset_end(&mut self, line: &[u8]) -> Option<Vec<u8>> {
        self.state = State::Keeping;
        Some(line.to_vec())
    }

    fn on_file_header(&mut self, line: &[u8]) -> Option<Vec<u8>> {
        let line = self.replace_path_prefix(line);
        self.keeping().then_some(line)
    }

    fn on_other(&mut self, line: &[u8]) -> Option<Vec<u8>> {
        self.keeping().then(|| line.to_vec())
    }

    fn keeping(&self) -> bool {
        self.state == State::Keeping
    }

    /// Move `a/<accept>` and `b/<accept>` tokens under `replace`.
    ///
    /// Tokens are split on single spaces, so runs of spaces survive the
    /// round trip. The prefix match is textual: `a/srcfoo` matches `src`.
    fn replace_path_prefix(&self, line: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(line.len() + 16);
        for (i, token) in line.split(|&b| b == b' ').enumerate() {
            if i > 0 {
                out.push(b' ');
            }
            match self.split_path_token(token) {
                Some((side, rest)) => {
                    out.extend_from_slice(side);
                    out.extend_from_slice(self.replace_prefix);
                    out.extend_from_slice(rest);
                }
                None => out.extend_from_slice(token),
            }
        }
        out
    }

    fn split_path_token<'t>(&self, token: &'t [u8]) -> Option<(&'t [u8], &'t [u8])> {
        [&b"a/"[..], &b"b/"[..]].into_iter().find_map(|side| {
            token
                .strip_prefix(side)
                .and_then(|path| path.strip_prefix(self.accept_prefix))
                .map(|rest| (&token[..side.len()], rest))
        })
    }
}

/// Split `content` into lines, each keeping its `\n` terminator.
///
/// A final line without a terminator is returned as is, so joining the
/// result reproduces `content` exactly.
pub fn split_lines(content: &[u8]) -> Vec<&[u8]> {
    content.split_inclusive(|&b| b == b'\n').collect()
}

/// Rewrite the patch file at `path` in place.
pub fn rewrite_file<S: AsRef<[u8]>>(
    path: &Path,
    accept_prefix: &[u8],
    replace_prefix: &[u8],
    skip_prefixes: &[S],
) -> Result<()> {
    let mut rewriter = PatchRewriter::new(accept_prefix, replace_prefix, skip_prefixes)?;
    let content = fs::read(path)?;
    let lines = split_lines(&content);
    let before = lines.len();
    let rewritten = rewriter.rewrite(&lines);
    log::debug!(
        "Rewrote {}: kept {} of {} lines",
        path.display(),
        rewritten.len(),
        before
    );
    fs::write(path, rewritten.concat())?;
    Ok(())
}
