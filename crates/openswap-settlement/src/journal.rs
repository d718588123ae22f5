//! Durable status store: an append-only JSON-lines journal.
//!
//! Each line records one status write:
//!
//! ```text
//! {"seq":0,"maker":"0x..","hash":"0x..","status":"Executed","recordedAt":"..","checksum":".."}
//! ```
//!
//! `checksum` is SHA-256 over the sequence number, key and status. Replay on
//! open rebuilds the in-memory index and refuses to start on any gap,
//! checksum mismatch, unparsable line, or illegal transition. A journal that
//! cannot be trusted is never silently repaired.
//!
//! A batch whose append or sync fails is truncated back off the file before
//! the error is returned. If that truncation fails too, the store refuses
//! every later write.

use std::{
    collections::HashMap,
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use openswap_types::{OrderHash, Result, Status, StatusKey, SwapError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::status_store::{StatusStore, check_batch};

const CHECKSUM_TAG: &[u8] = b"openswap:status:v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JournalRecord {
    seq: u64,
    maker: Address,
    hash: OrderHash,
    status: Status,
    recorded_at: DateTime<Utc>,
    checksum: String,
}

impl JournalRecord {
    fn new(seq: u64, key: StatusKey, status: Status) -> Self {
        Self {
            seq,
            maker: key.maker,
            hash: key.hash,
            status,
            recorded_at: Utc::now(),
            checksum: checksum(seq, &key, status),
        }
    }

    fn key(&self) -> StatusKey {
        StatusKey::new(self.maker, self.hash)
    }
}

fn status_tag(status: Status) -> u8 {
    match status {
        Status::Open => 0,
        Status::Executed => 1,
        Status::Canceled => 2,
    }
}

fn checksum(seq: u64, key: &StatusKey, status: Status) -> String {
    let mut hasher = Sha256::new();
    hasher.update(CHECKSUM_TAG);
    hasher.update(seq.to_be_bytes());
    hasher.update(key.maker.as_slice());
    hasher.update(key.hash.as_bytes());
    hasher.update([status_tag(status)]);
    hex::encode(hasher.finalize())
}

/// Append target of a journal.
pub trait JournalSink: Write + Send {
    /// Current length in bytes.
    ///
    /// # Errors
    /// Any I/O error from the underlying medium.
    fn size(&mut self) -> io::Result<u64>;

    /// Make everything written so far durable.
    ///
    /// # Errors
    /// Any I/O error from the underlying medium.
    fn sync(&mut self) -> io::Result<()>;

    /// Cut the sink back to `len` bytes and make that durable.
    ///
    /// # Errors
    /// Any I/O error from the underlying medium.
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl JournalSink for File {
    fn size(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)?;
        self.sync_data()
    }
}

/// Status store backed by a journal file.
#[derive(Debug)]
pub struct FileStatusStore<F = File> {
    path: PathBuf,
    sink: F,
    entries: HashMap<StatusKey, Status>,
    next_seq: u64,
    poisoned: bool,
}

impl FileStatusStore {
    /// Open `path`, creating it if missing, and replay its contents.
    ///
    /// # Errors
    /// [`SwapError::Io`] if the file cannot be read or created, and
    /// [`SwapError::Storage`] if its contents fail verification.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, |file| file)
    }
}

impl<F: JournalSink> FileStatusStore<F> {
    /// Like [`FileStatusStore::open`], appending through `wrap(file)`.
    ///
    /// # Errors
    /// As for [`FileStatusStore::open`].
    pub fn open_with(path: impl AsRef<Path>, wrap: impl FnOnce(File) -> F) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut entries = HashMap::new();
        let mut next_seq = 0u64;
        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            for (idx, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let at = format!("{}:{}", path.display(), idx + 1);
                let record: JournalRecord = serde_json::from_str(&line)
                    .map_err(|e| SwapError::Storage(format!("{at}: unreadable record: {e}")))?;
                if record.seq != next_seq {
                    return Err(SwapError::Storage(format!(
                        "{at}: sequence {} where {next_seq} was expected",
                        record.seq
                    )));
                }
                let key = record.key();
                if checksum(record.seq, &key, record.status) != record.checksum {
                    return Err(SwapError::Storage(format!("{at}: checksum mismatch")));
                }
                check_batch(|k| entries.get(k).copied(), &[(key, record.status)])
                    .map_err(|e| SwapError::Storage(format!("{at}: {e}")))?;
                entries.insert(key, record.status);
                next_seq += 1;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::info!(
            path = %path.display(),
            records = next_seq,
            keys = entries.len(),
            "Status journal opened"
        );
        Ok(Self {
            path,
            sink: wrap(file),
            entries,
            next_seq,
            poisoned: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records replayed or appended so far.
    #[must_use]
    pub fn records(&self) -> u64 {
        self.next_seq
    }

    fn append(&mut self, buf: &[u8]) -> io::Result<()> {
        self.sink.write_all(buf)?;
        self.sink.flush()?;
        self.sink.sync()
    }

    /// Undo a failed append, returning the error to report.
    fn roll_back(&mut self, len: u64, cause: &io::Error) -> SwapError {
        match self.sink.truncate(len) {
            Ok(()) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %cause,
                    "Journal append failed, rolled back"
                );
                SwapError::Io(cause.to_string())
            }
            Err(err) => {
                self.poisoned = true;
                tracing::error!(
                    path = %self.path.display(),
                    error = %cause,
                    rollback_error = %err,
                    "Journal rollback failed, refusing further writes"
                );
                SwapError::Storage(format!(
                    "{}: append failed ({cause}) and rollback failed ({err})",
                    self.path.display()
                ))
            }
        }
    }
}

impl<F: JournalSink> StatusStore for FileStatusStore<F> {
    fn get(&self, key: &StatusKey) -> Option<Status> {
        self.entries.get(key).copied()
    }

    fn put_all(&mut self, entries: &[(StatusKey, Status)]) -> Result<()> {
        if self.poisoned {
            return Err(SwapError::Storage(format!(
                "{}: journal disabled after a failed rollback",
                self.path.display()
            )));
        }
        check_batch(|k| self.entries.get(k).copied(), entries)?;

        let mut buf = Vec::new();
        let mut seq = self.next_seq;
        for (key, status) in entries {
            serde_json::to_writer(&mut buf, &JournalRecord::new(seq, *key, *status))?;
            buf.push(b'\n');
            seq += 1;
        }
        let len = self.sink.size()?;
        if let Err(cause) = self.append(&buf) {
            return Err(self.roll_back(len, &cause));
        }

        self.entries.extend(entries.iter().copied());
        self.next_seq = seq;
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
