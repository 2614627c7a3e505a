// STD Dependencies -----------------------------------------------------------
use std::fmt;
use std::fs::{self, File};
use std::io::{Error as IOError, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;


// External Dependencies ------------------------------------------------------
use colored::Colorize;


// File / Command Error Abstractions ------------------------------------------
#[derive(Debug)]
pub struct FileError {
    pub io: IOError,
    pub path: PathBuf
}

impl FileError {
    pub fn new(io: IOError, path: PathBuf) -> Self {
        Self {
            io,
            path
        }
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "File \"{}\": {}", self.path.display(), self.io)
    }
}

#[derive(Debug)]
pub struct CommandError {
    pub command: String,
    pub path: Option<PathBuf>,
    pub stdout: String
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(path) = self.path.as_ref() {
            write!(
                f,
                "Failed to execute command \"{}\" on file \"{}\":\n\n{}\n{}{}",
                self.command,
                path.display(),
                "---".red(),
                self.stdout,
                "---".red()
            )
        } else {
            write!(
                f,
                "Failed to execute command \"{}\":\n\n{}\n{}{}",
                self.command,
                "---".red(),
                self.stdout,
                "---".red()
            )
        }
    }
}


// Terminal Logger ------------------------------------------------------------
pub struct Logger {
    silent: bool,
    output: Vec<String>
}

impl Logger {

    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            silent: false,
            output: Vec::new()
        }
    }

    pub fn format_error<S: Into<String>>(s: S) -> String {
        format!("       {} {}", "Error".bright_red(), s.into())
    }

    pub fn set_silent(&mut self) {
        self.silent = true;
    }

    pub fn log<S: Into<String>>(&mut self, s: S) {
        if !self.silent {
            self.output.push(s.into());
        }
    }

    pub fn warning<S: Into<String>>(&mut self, s: S) {
        if !self.silent {
            self.output.push(format!("     {} {}", "Warning".bright_yellow(), s.into()));
        }
    }

    pub fn info<S: Into<String>>(&mut self, s: S) {
        if !self.silent {
            self.output.push(format!("        {} {}", "Info".bright_blue(), s.into()));
        }
    }

    pub fn status<S: Into<String>, U: Into<String>>(&mut self, s: S, m: U) {
        if !self.silent {
            self.output.push(format!("{: >12} {}", s.into().bright_green(), m.into()));
        }
    }

    pub fn flush(&mut self) {
        if !self.output.is_empty() {
            println!("{}", self);
        }
        self.output.clear();
    }

    pub fn error<S: Into<String>>(&self, s: S) {
        if !self.output.is_empty() {
            println!("{}", self);
        }
        eprintln!("{}", s.into());
    }
}

impl fmt::Display for Logger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.output.join("\n"))
    }
}


// External Command Execution -------------------------------------------------
pub fn run_command(name: &str, args: &[String], path: Option<&Path>) -> Result<Vec<u8>, CommandError> {
    let display = if args.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, args.join(" "))
    };
    let output = Command::new(name).args(args).output().map_err(|err| {
        CommandError {
            command: display.clone(),
            path: path.map(PathBuf::from),
            stdout: err.to_string()
        }
    })?;
    if output.status.success() {
        Ok(output.stdout)

    } else {
        Err(CommandError {
            command: display,
            path: path.map(PathBuf::from),
            stdout: String::from_utf8_lossy(&output.stderr).to_string()
        })
    }
}


// Filesystem Helpers ---------------------------------------------------------
pub fn read_text_file(path: &Path) -> Result<String, FileError> {
    let mut file = File::open(path).map_err(|io| FileError::new(io, path.to_path_buf()))?;
    let mut text = String::new();
    file.read_to_string(&mut text).map_err(|io| FileError::new(io, path.to_path_buf()))?;
    Ok(text)
}

pub fn read_binary_file(path: &Path) -> Result<Vec<u8>, FileError> {
    fs::read(path).map_err(|io| FileError::new(io, path.to_path_buf()))
}

pub fn write_text_file(path: &Path, text: &str) -> Result<(), FileError> {
    let mut file = File::create(path).map_err(|io| FileError::new(io, path.to_path_buf()))?;
    file.write_all(text.as_bytes()).map_err(|io| FileError::new(io, path.to_path_buf()))
}

pub fn write_binary_file(path: &Path, bytes: &[u8]) -> Result<(), FileError> {
    let mut file = File::create(path).map_err(|io| FileError::new(io, path.to_path_buf()))?;
    file.write_all(bytes).map_err(|io| FileError::new(io, path.to_path_buf()))
}

pub fn copy_file(from: &Path, to: &Path) -> Result<(), FileError> {
    fs::copy(from, to).map(|_| ()).map_err(|io| FileError::new(io, from.to_path_buf()))
}

pub fn create_dir(path: &Path) -> Result<(), FileError> {
    fs::create_dir_all(path).map_err(|io| FileError::new(io, path.to_path_buf()))
}

pub fn remove_dir(path: &Path) -> Result<(), FileError> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|io| FileError::new(io, path.to_path_buf()))?;
    }
    Ok(())
}
