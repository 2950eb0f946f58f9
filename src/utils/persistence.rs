use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::errors::LedgerError;

const TMP_SUFFIX: &str = "tmp";

/// Reads every line of a flat file.
///
/// Lines are decoded one at a time; a line that is not valid UTF-8 is skipped
/// so the rest of the file still loads. A trailing `\r` is dropped.
pub fn read_lines(path: &Path) -> Result<Vec<String>, LedgerError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for (idx, raw) in reader.split(b'\n').enumerate() {
        let mut bytes = raw?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        match String::from_utf8(bytes) {
            Ok(line) => lines.push(line),
            Err(_) => warn!(
                path = %path.display(),
                line = idx + 1,
                "skipping line that is not valid UTF-8"
            ),
        }
    }
    Ok(lines)
}

/// Like [`read_lines`], but a missing file reads as empty. Other I/O failures propagate.
pub fn read_lines_if_present(path: &Path) -> Result<Vec<String>, LedgerError> {
    match read_lines(path) {
        Err(LedgerError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "file does not exist yet");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Reads a flat file, treating any I/O failure as "no data".
pub fn read_lines_or_empty(path: &Path) -> Vec<String> {
    read_lines_if_present(path).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "unable to read file");
        Vec::new()
    })
}

/// Overwrites `path` with `lines`, staging the content in a sibling temp file first.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<(), LedgerError> {
    let mut data = String::new();
    for line in lines {
        data.push_str(line);
        data.push('\n');
    }
    write_atomic(path, &data)
}

/// Appends a single newline-terminated line, creating the file when missing.
pub fn append_line(path: &Path, line: &str) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    file.flush()?;
    Ok(())
}

pub fn write_atomic(path: &Path, data: &str) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<(), LedgerError> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn tmp_path_keeps_existing_extension() {
        assert_eq!(
            tmp_path(Path::new("/data/totals.txt")),
            PathBuf::from("/data/totals.txt.tmp")
        );
        assert_eq!(
            tmp_path(Path::new("/data/expenses_bob")),
            PathBuf::from("/data/expenses_bob.tmp")
        );
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        assert!(read_lines_or_empty(&dir.path().join("absent")).is_empty());
    }

    #[test]
    fn write_then_append_preserves_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("file.txt");
        write_lines(&path, &["one".to_string(), "two".to_string()]).unwrap();
        append_line(&path, "three").unwrap();
        assert_eq!(read_lines(&path).unwrap(), vec!["one", "two", "three"]);
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn undecodable_line_is_skipped_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mixed.txt");
        fs::write(&path, b"first\r\nbad \xe9 byte\nlast").unwrap();
        assert_eq!(read_lines(&path).unwrap(), vec!["first", "last"]);
    }

    #[test]
    fn unreadable_path_is_an_error_when_present() {
        let dir = tempdir().unwrap();
        assert!(read_lines_if_present(&dir.path().join("absent")).unwrap().is_empty());
        // Opening a directory succeeds on some platforms but reading it fails.
        assert!(read_lines_if_present(dir.path()).is_err());
        assert!(read_lines_or_empty(dir.path()).is_empty());
    }
}
