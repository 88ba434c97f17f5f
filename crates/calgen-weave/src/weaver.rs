//! Reassemble a scanned file around freshly rendered block contents and
//! replace it on disk.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::WeaveError;

/// Interleave hand-written spans with block contents:
/// `spans[0], contents[0], spans[1], …, spans[n]`.
///
/// Extra spans beyond `contents.len() + 1` are appended in order. Block
/// contents take the line ending of their opening marker, so a CRLF file
/// stays CRLF throughout.
pub fn assemble<S: AsRef<str>>(spans: &[String], contents: &[S]) -> String {
    let capacity = spans.iter().map(String::len).sum::<usize>()
        + contents.iter().map(|c| c.as_ref().len()).sum::<usize>();
    let mut out = String::with_capacity(capacity);

    for (idx, span) in spans.iter().enumerate() {
        out.push_str(span);
        if let Some(content) = contents.get(idx) {
            let content = content.as_ref();
            if span.ends_with("\r\n") {
                push_crlf(&mut out, content);
            } else {
                out.push_str(content);
            }
        }
    }
    out
}

fn push_crlf(out: &mut String, content: &str) {
    for line in content.split_inclusive('\n') {
        match line.strip_suffix('\n') {
            Some(body) => {
                out.push_str(body.strip_suffix('\r').unwrap_or(body));
                out.push_str("\r\n");
            }
            None => out.push_str(line),
        }
    }
}

/// Replace the contents of `path` with `content`.
///
/// With `atomic` set, the new text is written to a temporary file in the same
/// directory, given the original file's permissions, and renamed over the
/// target, so a failure leaves either the old or the new file. Otherwise the
/// file is truncated and rewritten in place.
pub fn write_file(path: &Path, content: &str, atomic: bool) -> Result<(), WeaveError> {
    if !atomic {
        return fs::write(path, content).map_err(|e| WeaveError::io(path, e));
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path).ok().map(|m| m.permissions());

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| WeaveError::io(parent, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| WeaveError::io(tmp.path(), e))?;
    if let Some(permissions) = permissions {
        fs::set_permissions(tmp.path(), permissions).map_err(|e| WeaveError::io(tmp.path(), e))?;
    }
    tmp.persist(path).map_err(|e| WeaveError::io(path, e.error))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Replaced file");
    Ok(())
}
