//! Discovery of the active solver log inside a working directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{ConvError, Result};

/// Returns the first regular file in `dir` whose extension is `extension` and
/// whose name is not in `excluded`.
///
/// Entries are visited in the order the operating system lists them; when
/// several logs qualify, which one wins is not specified. `Ok(None)` means the
/// solver has not written a log yet.
pub fn locate_log<S: AsRef<str>>(
    dir: &Path,
    extension: &str,
    excluded: &[S],
) -> Result<Option<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| ConvError::io(dir, err))?;

    for entry in entries {
        let entry = entry.map_err(|err| ConvError::io(dir, err))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !has_extension(name, extension) {
            continue;
        }
        if excluded.iter().any(|reserved| reserved.as_ref() == name) {
            debug!("skipping reserved file `{name}`");
            continue;
        }
        let file_type = entry
            .file_type()
            .map_err(|err| ConvError::io(entry.path(), err))?;
        if file_type.is_file() {
            return Ok(Some(entry.path()));
        }
    }

    Ok(None)
}

/// Suffix match on `.<extension>`, so a file named just `.gst` qualifies too.
fn has_extension(name: &str, extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    name.strip_suffix(extension).is_some_and(|stem| stem.ends_with('.'))
}
