// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Append-only file writer with retry-until-complete semantics

use std::{
	fs::{File, OpenOptions},
	io::{self, BufWriter, Write},
	path::{Path, PathBuf},
};

/// User-space write buffer in front of the file descriptor (64 KiB).
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Append-only file writer.
///
/// All operations are single-threaded by contract: only the consumer
/// thread touches a given instance. Writes loop until every byte is
/// accepted or an unrecoverable error occurs; byte accounting stays
/// consistent with what was actually handed to the writer.
#[derive(Debug)]
pub struct DurableFile {
	writer: Option<BufWriter<File>>,
	path: PathBuf,
	written_bytes: u64,
}

impl DurableFile {
	/// Open `path` in create-or-append mode.
	pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
		let path = path.into();
		let file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&path)?;
		Ok(Self {
			writer: Some(BufWriter::with_capacity(
				WRITE_BUFFER_SIZE,
				file,
			)),
			path,
			written_bytes: 0,
		})
	}

	/// Append `data`, retrying short writes while progress is being
	/// made. Returns the number of bytes accepted; on an unrecoverable
	/// error the bytes accepted so far are already accounted and the
	/// error is returned to the caller.
	pub fn write(
		&mut self,
		data: &[u8],
		flush_now: bool,
	) -> io::Result<usize> {
		let Some(writer) = self.writer.as_mut() else {
			return Err(io::Error::new(
				io::ErrorKind::NotConnected,
				"file already closed",
			));
		};

		let mut offset = 0;
		while offset < data.len() {
			match writer.write(&data[offset..]) {
				// a zero-length write that is not an error
				// means no progress can be made
				Ok(0) => {
					return Err(io::Error::new(
						io::ErrorKind::WriteZero,
						"no progress on write",
					));
				}
				Ok(n) => {
					offset += n;
					self.written_bytes += n as u64;
				}
				Err(e)
					if e.kind()
						== io::ErrorKind::Interrupted =>
				{
					continue;
				}
				Err(e) => return Err(e),
			}
		}

		if flush_now {
			writer.flush()?;
		}
		Ok(offset)
	}

	/// Force buffered data to the OS.
	pub fn flush(&mut self) -> io::Result<()> {
		match self.writer.as_mut() {
			Some(writer) => writer.flush(),
			None => Ok(()),
		}
	}

	/// Flush and close the underlying file. Safe to call more than
	/// once; writes after close fail without panicking.
	pub fn close(&mut self) -> io::Result<()> {
		if let Some(mut writer) = self.writer.take() {
			writer.flush()?;
		}
		Ok(())
	}

	/// Rename the on-disk file to `new_path`. Intended to be called
	/// after [`close`]; safe on an already-closed file.
	///
	/// [`close`]: DurableFile::close
	pub fn rename(&self, new_path: impl AsRef<Path>) -> io::Result<()> {
		std::fs::rename(&self.path, new_path)
	}

	/// Total bytes ever accepted by this file.
	#[inline]
	pub fn written_bytes(&self) -> u64 {
		self.written_bytes
	}

	/// Path this file was opened at.
	#[inline]
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl Drop for DurableFile {
	fn drop(&mut self) {
		// BufWriter flushes on drop as well, this just surfaces the
		// intent
		let _ = self.close();
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use scrawl_testing::tempdir::temp_dir;

	use super::*;

	#[test]
	fn test_write_and_accounting() {
		temp_dir(|dir| {
			let path = dir.join("durable.log");
			let mut file = DurableFile::open(&path)?;
			assert_eq!(file.write(b"hello ", false)?, 6);
			assert_eq!(file.write(b"world\n", true)?, 6);
			assert_eq!(file.written_bytes(), 12);

			assert_eq!(fs::read_to_string(&path)?, "hello world\n");
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_append_mode_preserves_content() {
		temp_dir(|dir| {
			let path = dir.join("durable.log");
			{
				let mut file = DurableFile::open(&path)?;
				file.write(b"first\n", true)?;
			}
			{
				let mut file = DurableFile::open(&path)?;
				file.write(b"second\n", true)?;
				// accounting is per-instance, not per-file
				assert_eq!(file.written_bytes(), 7);
			}
			assert_eq!(
				fs::read_to_string(&path)?,
				"first\nsecond\n"
			);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_close_is_idempotent() {
		temp_dir(|dir| {
			let path = dir.join("durable.log");
			let mut file = DurableFile::open(&path)?;
			file.write(b"data", false)?;
			file.close()?;
			file.close()?;
			assert!(file.write(b"late", false).is_err());
			assert_eq!(file.written_bytes(), 4);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_rename_after_close() {
		temp_dir(|dir| {
			let path = dir.join("durable.log");
			let rolled = dir.join("durable.log.1");
			let mut file = DurableFile::open(&path)?;
			file.write(b"rolled away\n", true)?;
			file.close()?;
			file.rename(&rolled)?;

			assert!(!path.exists());
			assert_eq!(
				fs::read_to_string(&rolled)?,
				"rolled away\n"
			);
			Ok(())
		})
		.unwrap();
	}
}
