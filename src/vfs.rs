//! Virtual File Module
//!
//! The rendered file value handed to the protocol layer, and the reader
//! streaming its content from an offset.

use std::io::{self, Cursor, Read};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Permission bits reported for every virtual file.
pub const FILE_MODE: u32 = 0o777;

/// Owner and group reported for every virtual file.
pub const FILE_OWNER: &str = "tmpl";

// == Virtual File ==
/// A computed, non-persisted file: full name, rendered bytes and the
/// creation time of the data record it was rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualFile {
    name: String,
    content: Vec<u8>,
    modified: DateTime<Utc>,
}

impl VirtualFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>, modified: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            content,
            modified,
        }
    }

    /// Zero-size entry answering directory probes.
    pub fn probe(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new(), Utc::now())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn mode(&self) -> u32 {
        FILE_MODE
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Only empty entries report as directories.
    pub fn is_dir(&self) -> bool {
        self.content.is_empty()
    }

    pub fn owner(&self) -> &str {
        FILE_OWNER
    }

    pub fn group(&self) -> &str {
        FILE_OWNER
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// Metadata snapshot without the content.
    pub fn stat(&self) -> FileStat {
        FileStat {
            name: self.name.clone(),
            size: self.size(),
            mode: self.mode(),
            modified: self.modified,
            is_dir: self.is_dir(),
            owner: self.owner().to_string(),
            group: self.group().to_string(),
        }
    }
}

// == File Stat ==
/// Stat metadata of a virtual file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileStat {
    pub name: String,
    pub size: u64,
    pub mode: u32,
    pub modified: DateTime<Utc>,
    pub is_dir: bool,
    pub owner: String,
    pub group: String,
}

// == File Reader ==
/// Reader over a virtual file's content starting at an offset.
#[derive(Debug)]
pub struct FileReader {
    modified: DateTime<Utc>,
    cursor: Cursor<Vec<u8>>,
}

impl FileReader {
    /// Positions a reader at `offset`; the caller checks the bounds.
    pub(crate) fn new(file: VirtualFile, offset: u64) -> Self {
        let modified = file.modified();
        let mut cursor = Cursor::new(file.into_content());
        cursor.set_position(offset);
        Self { modified, cursor }
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> u64 {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position())
    }

    /// Consumes the reader, returning the unread bytes.
    pub fn into_remaining(self) -> Vec<u8> {
        let position = self.cursor.position() as usize;
        let mut content = self.cursor.into_inner();
        content.drain(..position.min(content.len()));
        content
    }
}

impl Read for FileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}
