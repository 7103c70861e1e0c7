use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

/// File name of `path` without directories or extension, e.g. `lorenz_default`.
pub fn extract_base_name(path: &str) -> io::Result<&str> {
    Path::new(path)
        .file_stem()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unable to extract a base name from `{}`", path),
            )
        })
}

/// Builds (and creates) `out/<command>/<params base name>[/<date_time>]`.
pub fn build_output_path_with_date_time(
    params_path: &str,
    command: &str,
    datetime: Option<&str>,
) -> io::Result<PathBuf> {
    let mut directory_path: PathBuf = ["out", command, extract_base_name(params_path)?]
        .iter()
        .collect();
    if let Some(stamp) = datetime {
        directory_path.push(stamp);
    }
    std::fs::create_dir_all(&directory_path)?;
    Ok(directory_path)
}

pub fn date_time_string() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub fn maybe_date_time_string(enable: bool) -> Option<String> {
    if enable {
        Some(date_time_string())
    } else {
        None
    }
}

pub fn deserialize_from_json_file<T: DeserializeOwned>(path: &str) -> io::Result<T> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed to parse `{}`: {}", path, err),
        )
    })
}

/**
 * Store a path and prefix together, making it easy to generate a collection
 * of output files with the same prefix, but separate suffixes.
 */
#[derive(Debug, Clone)]
pub struct FilePrefix {
    pub directory_path: PathBuf,
    pub file_base: String,
}

impl FilePrefix {
    pub fn with_suffix(&self, suffix: &str) -> PathBuf {
        self.directory_path
            .join(format!("{}{}", self.file_base, suffix))
    }

    pub fn create_file_with_suffix(&self, suffix: &str) -> io::Result<BufWriter<File>> {
        Ok(BufWriter::new(File::create(self.with_suffix(suffix))?))
    }

    pub fn serialize_to_json_with_suffix<T: Serialize>(
        &self,
        suffix: &str,
        data: &T,
    ) -> io::Result<()> {
        let writer = self.create_file_with_suffix(suffix)?;
        serde_json::to_writer_pretty(writer, data).map_err(io::Error::from)
    }
}
