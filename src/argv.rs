//
// Copyright (c) 2019 Reyk Floeter <contact@reykfloeter.com>
//
// Permission to use, copy, modify, and distribute this software for any
// purpose with or without fee is hereby granted, provided that the above
// copyright notice and this permission notice appear in all copies.
//
// THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHOR DISCLAIMS ALL WARRANTIES
// WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
// MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHOR BE LIABLE FOR
// ANY SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
// WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN
// ACTION OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF
// OR IN CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.
//

//! Foreign argument vectors.
//!
//! An [`ArgBatch`] owns one null-terminated buffer per argument plus the
//! contiguous pointer array handed to a C `main`. The array carries a
//! trailing null pointer, so `argv[argc] == NULL` as C expects. Every buffer
//! is released when the batch is dropped.

use std::ffi::{CStr, CString, OsStr};
use std::ptr;

use libc::{c_char, c_int};

use crate::error::ArgvError;

/// Acquires the null-terminated buffer for one argument.
///
/// `arg` never contains a NUL byte; the batch rejects those before asking.
pub trait BufferSource {
    fn acquire(&mut self, index: usize, arg: &[u8]) -> Result<CString, ArgvError>;
}

/// Heap buffers that report allocation failure instead of aborting.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapBuffers;

impl BufferSource for HeapBuffers {
    fn acquire(&mut self, index: usize, arg: &[u8]) -> Result<CString, ArgvError> {
        let len = arg.len() + 1;
        let mut buf = Vec::new();

        buf.try_reserve_exact(len)
            .map_err(|_| ArgvError::Allocation { index, len })?;
        buf.extend_from_slice(arg);

        // The spare byte reserved above holds the terminator.
        CString::new(buf).map_err(|err| ArgvError::InteriorNul {
            index,
            position: err.nul_position(),
        })
    }
}

#[derive(Debug)]
pub struct ArgBatch {
    buffers: Vec<CString>,
    argv: Vec<*const c_char>,
}

impl ArgBatch {
    pub fn new<I, S>(args: I) -> Result<Self, ArgvError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Self::with_source(args, &mut HeapBuffers)
    }

    /// Builds the batch, acquiring each buffer from `source` in order.
    /// On error every buffer acquired so far is dropped.
    pub fn with_source<I, S, B>(args: I, source: &mut B) -> Result<Self, ArgvError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
        B: BufferSource + ?Sized,
    {
        let mut buffers = Vec::new();

        for (index, arg) in args.into_iter().enumerate() {
            let bytes = os_bytes(index, arg.as_ref())?;
            if let Some(position) = bytes.iter().position(|&b| b == 0) {
                return Err(ArgvError::InteriorNul { index, position });
            }
            buffers.push(source.acquire(index, bytes)?);
        }

        if buffers.is_empty() {
            return Err(ArgvError::Empty);
        }
        if c_int::try_from(buffers.len()).is_err() {
            return Err(ArgvError::TooMany {
                count: buffers.len(),
            });
        }

        let len = buffers.len() + 1;
        let mut argv = Vec::new();
        argv.try_reserve_exact(len)
            .map_err(|_| ArgvError::ArrayAllocation { len })?;
        argv.extend(buffers.iter().map(|arg| arg.as_ptr()));
        argv.push(ptr::null());

        Ok(ArgBatch { buffers, argv })
    }

    pub fn argc(&self) -> c_int {
        // Bounded by the check in `with_source`.
        self.buffers.len() as c_int
    }

    /// Pointer to the first of `argc() + 1` entries, the last one null.
    /// Valid for as long as the batch is alive.
    pub fn as_ptr(&self) -> *const *const c_char {
        self.argv.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CStr> {
        self.buffers.iter().map(|arg| arg.as_c_str())
    }
}

#[cfg(unix)]
fn os_bytes(_index: usize, arg: &OsStr) -> Result<&[u8], ArgvError> {
    use std::os::unix::ffi::OsStrExt;

    Ok(arg.as_bytes())
}

#[cfg(not(unix))]
fn os_bytes(index: usize, arg: &OsStr) -> Result<&[u8], ArgvError> {
    arg.to_str()
        .map(str::as_bytes)
        .ok_or(ArgvError::NotUnicode { index })
}
