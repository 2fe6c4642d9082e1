use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Number of digits the frame index is zero-padded to.
pub const INDEX_WIDTH: usize = 5;

/// Session-unique naming scheme for staged frame files.
///
/// Frame `i` lives at `<base>-<i:05>.png`. The encoder reads the same
/// sequence through the printf-style [`FrameTemplate::pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTemplate {
    base: PathBuf,
}

impl FrameTemplate {
    /// Template rooted at an explicit base path (no uniqueness guarantee).
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Template under `dir` whose base name is `prefix` followed by a fresh
    /// v4 UUID, so concurrent sessions and earlier runs never collide.
    pub fn unique(dir: &Path, prefix: &str) -> Self {
        let id = uuid::Uuid::new_v4().simple();
        Self::from_base(dir.join(format!("{}{}", prefix, id)))
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path of the staged file for `index`. Pure; does not touch the disk.
    pub fn path_for_frame(&self, index: usize) -> PathBuf {
        let mut name = self.base.as_os_str().to_owned();
        name.push(format!("-{:0width$}.png", index, width = INDEX_WIDTH));
        PathBuf::from(name)
    }

    /// Image-sequence pattern handed to the encoder's `-i`.
    ///
    /// `%` in the base is doubled so the encoder expands only the frame
    /// index and reads exactly the files [`FrameTemplate::path_for_frame`]
    /// names.
    pub fn pattern(&self) -> OsString {
        let mut pattern = escape_percent(self.base.as_os_str());
        pattern.push(format!("-%0{}d.png", INDEX_WIDTH));
        pattern
    }
}

#[cfg(unix)]
fn escape_percent(s: &OsStr) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    let mut out = Vec::with_capacity(s.len());
    for &b in s.as_bytes() {
        if b == b'%' {
            out.push(b'%');
        }
        out.push(b);
    }
    OsString::from_vec(out)
}

#[cfg(not(unix))]
fn escape_percent(s: &OsStr) -> OsString {
    s.to_string_lossy().replace('%', "%%").into()
}
