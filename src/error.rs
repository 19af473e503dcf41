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

use std::str::Utf8Error;

use thiserror::Error;

// sysexits(3)
pub const EX_USAGE: i32 = 64;
pub const EX_DATAERR: i32 = 65;
pub const EX_OSERR: i32 = 71;

/// Failure to turn the process arguments into a foreign argument vector.
/// The entry point is never invoked once one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgvError {
    #[error("empty argument vector, expected a program name at index 0")]
    Empty,
    #[error("argument {index} contains a NUL byte at offset {position}")]
    InteriorNul { index: usize, position: usize },
    #[error("argument {index} is not valid unicode")]
    NotUnicode { index: usize },
    #[error("too many arguments: {count}")]
    TooMany { count: usize },
    #[error("cannot allocate {len} bytes for argument {index}")]
    Allocation { index: usize, len: usize },
    #[error("cannot allocate argument array of {len} entries")]
    ArrayAllocation { len: usize },
}

impl ArgvError {
    /// Exit status reserved for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ArgvError::Empty => EX_USAGE,
            ArgvError::InteriorNul { .. }
            | ArgvError::NotUnicode { .. }
            | ArgvError::TooMany { .. } => EX_DATAERR,
            ArgvError::Allocation { .. } | ArgvError::ArrayAllocation { .. } => EX_OSERR,
        }
    }
}

/// Errors raised by the JSON control bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("cannot encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("request contains a NUL byte at offset {0}")]
    InteriorNul(usize),
    #[error("runtime returned a null reply")]
    NullReply,
    #[error("reply is not valid utf-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
    #[error("cannot decode reply: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("runtime error {code}: {msg}")]
    Runtime { code: i32, msg: String },
}
