use std::fmt;
use std::path::{Path, PathBuf};

pub const MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug)]
pub enum DbUrlError {
    Empty,
    Unsupported { raw: String },
}

impl fmt::Display for DbUrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbUrlError::Empty => write!(f, "--db requires a non-empty value"),
            DbUrlError::Unsupported { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for DbUrlError {}

/// Turn a path or `sqlite:` URL into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: &str) -> Result<String, DbUrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DbUrlError::Empty);
    }
    if trimmed == MEMORY_URL || trimmed.starts_with("sqlite://") {
        return Ok(trimmed.to_string());
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    Ok(format!("sqlite://{}", absolute.display()))
}

/// Create the database file and its parent directories if missing.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == MEMORY_URL {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| DbUrlError::Unsupported {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(DbUrlError::Unsupported {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
