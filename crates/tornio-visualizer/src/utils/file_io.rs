//! Program storage
//!
//! Programs are plain text, one instruction per line, stored by name. The
//! repository only moves text; [`ProgramLibrary`] puts the empty-input and
//! validation gate in front of it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tornio_core::constants::PROGRAM_EXTENSION;
use tornio_core::{Result, StorageError};
use tracing::{debug, info};

use crate::gcode::{parse_program, validate, Instruction};

/// Named program storage
pub trait ProgramRepository {
    /// Names of all stored programs, sorted
    fn list(&self) -> Result<Vec<String>>;

    /// Program text exactly as saved
    fn load(&self, name: &str) -> Result<String>;

    /// Store program text under `name`, replacing any previous version
    fn save(&self, name: &str, text: &str) -> Result<()>;
}

impl<R: ProgramRepository + ?Sized> ProgramRepository for &R {
    fn list(&self) -> Result<Vec<String>> {
        (**self).list()
    }

    fn load(&self, name: &str) -> Result<String> {
        (**self).load(name)
    }

    fn save(&self, name: &str, text: &str) -> Result<()> {
        (**self).save(name, text)
    }
}

/// Stores each program as `<dir>/<name>.<extension>`
#[derive(Debug, Clone)]
pub struct FileProgramRepository {
    dir: PathBuf,
    extension: String,
}

impl FileProgramRepository {
    /// Repository rooted at `dir` using the default `.gcode` extension
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: PROGRAM_EXTENSION.to_string(),
        }
    }

    /// Use a different file extension (without the dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a program name
    ///
    /// # Errors
    /// `StorageError::InvalidName` for names that are not a single path
    /// component.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::EmptyName.into());
        }
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(StorageError::InvalidName {
                name: name.to_string(),
            }
            .into());
        }
        Ok(self.dir.join(format!("{}.{}", name, self.extension)))
    }
}

impl ProgramRepository for FileProgramRepository {
    fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(self.dir.display().to_string(), e).into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| StorageError::io(self.dir.display().to_string(), e))?
                .path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        debug!("Found {} programs in {}", names.len(), self.dir.display());
        Ok(names)
    }

    fn load(&self, name: &str) -> Result<String> {
        let path = self.path_for(name)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound {
                name: name.trim().to_string(),
            }
            .into()),
            Err(e) => Err(StorageError::io(path.display().to_string(), e).into()),
        }
    }

    fn save(&self, name: &str, text: &str) -> Result<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)
            .map_err(|e| StorageError::io(self.dir.display().to_string(), e))?;
        fs::write(&path, text).map_err(|e| StorageError::io(path.display().to_string(), e))?;
        debug!("Wrote {} bytes to {}", text.len(), path.display());
        Ok(())
    }
}

/// Validating front end over a [`ProgramRepository`]
#[derive(Debug, Clone)]
pub struct ProgramLibrary<R> {
    repository: R,
}

impl<R: ProgramRepository> ProgramLibrary<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.repository.list()
    }

    pub fn load(&self, name: &str) -> Result<String> {
        self.repository.load(name)
    }

    /// Validate and store a program
    ///
    /// # Errors
    /// `StorageError::EmptyName` or `StorageError::EmptyProgram` for empty
    /// input, the first `GcodeError` of an invalid program, or the
    /// repository's own failure. Nothing is written unless all checks pass.
    pub fn save(&self, name: &str, text: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::EmptyName.into());
        }
        if text.trim().is_empty() {
            return Err(StorageError::EmptyProgram {
                name: name.to_string(),
            }
            .into());
        }
        validate(text)?;
        self.repository.save(name, text)?;
        info!("Saved program '{}'", name);
        Ok(())
    }

    /// Load a program and parse it into instructions
    pub fn load_instructions(&self, name: &str) -> Result<Vec<Instruction>> {
        let text = self.repository.load(name)?;
        Ok(parse_program(&text)?)
    }
}
