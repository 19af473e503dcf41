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

use libc::{c_char, c_int};

use crate::argv::ArgBatch;

/// C `main` calling convention.
pub type MainFn = unsafe extern "C" fn(c_int, *const *const c_char) -> c_int;

extern "C" {
    fn workerd_main(argc: c_int, argv: *const *const c_char) -> c_int;
}

/// Something that can be handed a foreign argument vector and returns an
/// exit status. The launcher calls it exactly once per run.
pub trait EntryPoint {
    fn invoke(&self, batch: &ArgBatch) -> c_int;
}

/// The `workerd_main` symbol of the linked native library.
#[derive(Debug, Default, Clone, Copy)]
pub struct Workerd;

impl EntryPoint for Workerd {
    fn invoke(&self, batch: &ArgBatch) -> c_int {
        unsafe { workerd_main(batch.argc(), batch.as_ptr()) }
    }
}

/// Any other foreign function with a C `main` signature.
#[derive(Debug, Clone, Copy)]
pub struct ForeignMain(MainFn);

impl ForeignMain {
    /// # Safety
    ///
    /// `main` must only read `argc` arguments plus the null terminator and
    /// must not keep any of the pointers after it returns.
    pub unsafe fn new(main: MainFn) -> Self {
        ForeignMain(main)
    }
}

impl EntryPoint for ForeignMain {
    fn invoke(&self, batch: &ArgBatch) -> c_int {
        unsafe { (self.0)(batch.argc(), batch.as_ptr()) }
    }
}

impl<F> EntryPoint for F
where
    F: Fn(c_int, *const *const c_char) -> c_int,
{
    fn invoke(&self, batch: &ArgBatch) -> c_int {
        self(batch.argc(), batch.as_ptr())
    }
}
