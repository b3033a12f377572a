//! Sheet file I/O.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Result, SheetError};
use crate::storage::{parse_tab, write_tab};

use super::state::Sheet;

impl Sheet {
    /// Create a sheet and load `path` if it exists; a missing path is
    /// remembered for the first save.
    pub fn with_file(path: Option<PathBuf>) -> Result<Sheet> {
        let mut sheet = Sheet::new();
        if let Some(path) = path {
            if path.exists() {
                sheet.load_file(&path)?;
            } else {
                sheet.file_path = Some(path);
            }
        }
        Ok(sheet)
    }

    /// Replace this sheet's contents with the cells stored in `path`.
    ///
    /// Entries are replayed through [`Sheet::set_contents_of_cell`], so a
    /// loaded sheet carries the same graph and values it would have if
    /// the entries had been typed in by hand. Nothing is committed unless
    /// the whole file replays cleanly; duplicate canonical names are
    /// rejected.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let entries = parse_tab(path)?;

        let mut loaded = Sheet::with_policy(self.policy.clone());
        let mut seen = HashSet::new();
        for entry in entries {
            let canonical =
                loaded
                    .canonical_name(&entry.name)
                    .map_err(|err| SheetError::Parse {
                        line: entry.line,
                        message: err.to_string(),
                    })?;
            if !seen.insert(canonical) {
                return Err(SheetError::Parse {
                    line: entry.line,
                    message: format!("duplicate cell '{}'", entry.name),
                });
            }
            loaded
                .set_contents_of_cell(&entry.name, &entry.contents)
                .map_err(|err| SheetError::Parse {
                    line: entry.line,
                    message: err.to_string(),
                })?;
        }

        loaded.file_path = Some(path.to_path_buf());
        loaded.modified = false;
        info!("loaded {} cell(s) from {}", loaded.len(), path.display());
        *self = loaded;
        Ok(())
    }

    /// Save to the current file path.
    pub fn save_file(&mut self) -> Result<()> {
        let path = self.file_path.clone().ok_or(SheetError::NoFilePath)?;
        self.save_file_as(&path)
    }

    /// Save to `path` and make it the current file path.
    pub fn save_file_as(&mut self, path: &Path) -> Result<()> {
        write_tab(path, self)?;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }
}
