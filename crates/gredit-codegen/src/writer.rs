//! Indenting line writer for generated source.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::ops::{Deref, DerefMut};
use std::path::Path;

use crate::error::CodegenError;

/// Writes lines of source text, prefixing each with the current indentation.
#[derive(Debug)]
pub struct CodeWriter<W> {
    out: W,
    level: usize,
}

impl<W: Write> CodeWriter<W> {
    /// Text prepended once per indentation level.
    pub const INDENT: &'static str = "  ";

    pub fn new(out: W) -> Self {
        Self { out, level: 0 }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Write one indented line.
    pub fn line(&mut self, text: impl fmt::Display) -> io::Result<()> {
        for _ in 0..self.level {
            self.out.write_all(Self::INDENT.as_bytes())?;
        }
        writeln!(self.out, "{text}")
    }

    /// Write an empty line (no indentation).
    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Write an indented `//` comment line.
    pub fn comment(&mut self, text: impl fmt::Display) -> io::Result<()> {
        self.line(format_args!("// {text}"))
    }

    /// Increase the indentation until the returned guard is dropped.
    pub fn indent(&mut self) -> Indent<'_, W> {
        self.level += 1;
        Indent { writer: self }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Guard returned by [`CodeWriter::indent`]. Dereferences to the writer and
/// restores the previous level when dropped.
#[derive(Debug)]
pub struct Indent<'a, W: Write> {
    writer: &'a mut CodeWriter<W>,
}

impl<W: Write> Deref for Indent<'_, W> {
    type Target = CodeWriter<W>;

    fn deref(&self) -> &Self::Target {
        self.writer
    }
}

impl<W: Write> DerefMut for Indent<'_, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.writer
    }
}

impl<W: Write> Drop for Indent<'_, W> {
    fn drop(&mut self) {
        self.writer.level -= 1;
    }
}

/// Run `render` against a buffered `inner` and flush once. Whatever is still
/// buffered after a failure is dropped without another flush attempt.
fn fill<W: Write, F>(inner: W, render: F) -> Result<(), CodegenError>
where
    F: FnOnce(&mut BufWriter<W>) -> Result<(), CodegenError>,
{
    let mut out = BufWriter::new(inner);
    let result = render(&mut out).and_then(|()| out.flush().map_err(CodegenError::from));
    let (inner, _unflushed) = out.into_parts();
    drop(inner);
    result
}

/// Create `path` and fill it through `render`.
///
/// The file is opened only once `render` is about to run, written through a
/// buffer and flushed once. If rendering or the flush fails the partial file
/// is removed.
pub(crate) fn write_artifact<F>(path: &Path, render: F) -> Result<(), CodegenError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), CodegenError>,
{
    let file = File::create(path).map_err(|source| CodegenError::WriteTargetUnavailable {
        path: path.display().to_string(),
        source,
    })?;

    if let Err(err) = fill(file, render) {
        match fs::remove_file(path) {
            Ok(()) => tracing::warn!(path = %path.display(), "discarded partial artifact"),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "could not remove partial artifact"
            ),
        }
        return Err(err);
    }
    Ok(())
}
