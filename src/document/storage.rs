//! Document file storage.
//!
//! Documents are stored flat under `{media_root}/documents/`, keeping the
//! uploaded file name. Name collisions are resolved by a sequential search:
//!
//! ```text
//! {media_root}/
//! ├── documents/
//! │   ├── report.pdf
//! │   ├── report_1.pdf
//! │   └── report_2.pdf
//! └── tmp/            (upload spools)
//! ```

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use futures::Stream;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use super::{CHUNK_SIZE, DOCUMENTS_DIR, FILE_NOT_FOUND, SPOOL_DIR};
use crate::{HealthDocsError, Result};

/// Storage for document files on the local filesystem.
#[derive(Debug, Clone)]
pub struct DocumentStorage {
    /// Media root directory.
    root: PathBuf,
    /// `{root}/documents`.
    documents_dir: PathBuf,
    /// `{root}/tmp`.
    spool_dir: PathBuf,
}

impl DocumentStorage {
    /// Create a new DocumentStorage under the given media root.
    ///
    /// The documents and spool directories are created if they don't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let documents_dir = root.join(DOCUMENTS_DIR);
        let spool_dir = root.join(SPOOL_DIR);

        std::fs::create_dir_all(&documents_dir)?;
        std::fs::create_dir_all(&spool_dir)?;

        Ok(Self {
            root,
            documents_dir,
            spool_dir,
        })
    }

    /// Get the media root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the directory holding document files.
    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    /// Get the directory holding upload spools.
    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    /// Strip any directory components from a client-supplied file name.
    ///
    /// Both `/` and `\` are treated as separators, since browsers on Windows
    /// may send either.
    pub fn base_name(name: &str) -> &str {
        name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name)
    }

    /// Build the candidate name for a naming attempt.
    ///
    /// Attempt 0 is the file name itself; attempt `n` inserts `_n` before
    /// the extension (`report.pdf` -> `report_2.pdf`).
    pub fn candidate_name(filename: &str, attempt: u32) -> String {
        if attempt == 0 {
            return filename.to_string();
        }

        let path = Path::new(filename);
        let stem = path
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or(filename);

        match path.extension().and_then(OsStr::to_str) {
            Some(ext) => format!("{stem}_{attempt}.{ext}"),
            None => format!("{stem}_{attempt}"),
        }
    }

    /// Create a new, previously unused file for the given name.
    ///
    /// Candidates are tried in order (`name`, `name_1`, `name_2`, ...); each is
    /// created exclusively, so a name taken by a concurrent upload is skipped
    /// rather than overwritten.
    pub async fn create_unique(&self, filename: &str) -> Result<(PathBuf, File)> {
        fs::create_dir_all(&self.documents_dir).await?;

        let mut attempt: u32 = 0;
        loop {
            let path = self
                .documents_dir
                .join(Self::candidate_name(filename, attempt));

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    attempt = attempt.checked_add(1).ok_or_else(|| {
                        HealthDocsError::Io(io::Error::new(
                            io::ErrorKind::AlreadyExists,
                            format!("no free name left for {filename}"),
                        ))
                    })?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Write a byte stream to a new file named after `filename`.
    ///
    /// The content is copied in chunks of [`CHUNK_SIZE`] bytes. On failure
    /// the partially written file is removed.
    ///
    /// # Returns
    ///
    /// The resolved path and the number of bytes written.
    pub async fn write_stream<R>(&self, filename: &str, reader: &mut R) -> Result<(PathBuf, u64)>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let (path, mut file) = self.create_unique(filename).await?;

        match copy_chunks(reader, &mut file).await {
            Ok(written) => Ok((path, written)),
            Err(e) => {
                drop(file);
                if let Err(cleanup) = fs::remove_file(&path).await {
                    tracing::warn!(
                        filepath = %path.display(),
                        error = %cleanup,
                        "Failed to remove partial upload"
                    );
                }
                Err(e.into())
            }
        }
    }

    /// Open a stored file for reading.
    ///
    /// # Returns
    ///
    /// The open file and its length in bytes.
    pub async fn open(&self, path: impl AsRef<Path>) -> Result<(File, u64)> {
        let path = path.as_ref();

        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(HealthDocsError::NotFound(FILE_NOT_FOUND.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(HealthDocsError::NotFound(FILE_NOT_FOUND.to_string()));
        }

        Ok((file, metadata.len()))
    }

    /// Delete a stored file.
    ///
    /// # Returns
    ///
    /// `true` if the file was deleted, `false` if it didn't exist
    pub async fn remove(&self, path: impl AsRef<Path>) -> Result<bool> {
        match fs::remove_file(path.as_ref()).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Copy everything from `reader` into `file` in fixed-size chunks.
async fn copy_chunks<R>(reader: &mut R, file: &mut File) -> io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut written: u64 = 0;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).await?;
        written += n as u64;
    }

    file.flush().await?;
    file.sync_all().await?;
    Ok(written)
}

/// Turn an open file into a stream of chunks for a response body.
pub fn read_chunks(file: File) -> impl Stream<Item = io::Result<Vec<u8>>> + Send + 'static {
    futures::stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Ok::<_, io::Error>(None);
        }
        buf.truncate(n);
        Ok(Some((buf, file)))
    })
}
