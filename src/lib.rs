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

//! Launcher for the workerd native library.
//!
//! The binary forwards its argument vector to `workerd_main` and exits with
//! whatever it returns. [`bridge`] wraps the library's JSON control calls
//! for embedders.

pub mod argv;
pub mod bridge;
pub mod entry;
pub mod error;
pub mod launcher;
pub mod telemetry;

pub use argv::{ArgBatch, BufferSource, HeapBuffers};
pub use bridge::{JsonBridge, WorkerdState};
pub use entry::{EntryPoint, ForeignMain, MainFn, Workerd};
pub use error::{ArgvError, BridgeError};
pub use launcher::{Launcher, BANNER};
pub use telemetry::init_tracing;
