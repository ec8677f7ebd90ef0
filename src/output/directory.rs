//! Directory sink: one PNG per record plus a JSONL manifest

use crate::output::traits::{ManifestEntry, OutputResult, RecordSink};
use crate::record::Record;
use image::ImageFormat;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Writes records into a directory
///
/// Images are saved as `<index>-<id>.png` (`noid` when the record has no id).
/// The manifest is opened in append mode and indices continue after the
/// lines it already holds, so a second run into the same directory adds
/// files instead of overwriting the first run's images.
pub struct DirectorySink {
    directory: PathBuf,
    manifest: BufWriter<File>,
    first_index: usize,
    written: usize,
}

impl DirectorySink {
    /// Creates the directory if needed and opens the manifest
    pub fn create(directory: &Path, manifest_file: &str) -> OutputResult<Self> {
        fs::create_dir_all(directory)?;

        let manifest_path = directory.join(manifest_file);
        let first_index = existing_entries(&manifest_path)?;
        if first_index > 0 {
            tracing::info!(
                "Manifest {} already holds {} entries, continuing from there",
                manifest_path.display(),
                first_index
            );
        }

        let manifest = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&manifest_path)?;

        Ok(Self {
            directory: directory.to_path_buf(),
            manifest: BufWriter::new(manifest),
            first_index,
            written: 0,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Records written through this sink
    pub fn written(&self) -> usize {
        self.written
    }

    /// Index the next record will be stored under
    pub fn next_index(&self) -> usize {
        self.first_index + self.written
    }
}

/// Counts the non-blank lines of an existing manifest (0 if there is none)
fn existing_entries(path: &Path) -> OutputResult<usize> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content.lines().filter(|line| !line.trim().is_empty()).count()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e.into()),
    }
}

impl RecordSink for DirectorySink {
    fn write_record(&mut self, record: &Record) -> OutputResult<ManifestEntry> {
        let index = self.next_index();
        let file = image_file_name(index, record.id.as_deref());
        record
            .image
            .save_with_format(self.directory.join(&file), ImageFormat::Png)?;

        let entry = ManifestEntry::new(index, record, file);
        serde_json::to_writer(&mut self.manifest, &entry)?;
        self.manifest.write_all(b"\n")?;

        self.written += 1;
        Ok(entry)
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.manifest.flush()?;
        Ok(())
    }
}

/// Builds a file-system safe image name for a record
pub fn image_file_name(index: usize, id: Option<&str>) -> String {
    let stem: String = match id {
        Some(id) => id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect(),
        None => "noid".to_string(),
    };
    format!("{:05}-{}.png", index, stem)
}
