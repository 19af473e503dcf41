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

use std::ffi::OsStr;

use tracing::debug;

use crate::argv::{ArgBatch, BufferSource, HeapBuffers};
use crate::entry::EntryPoint;
use crate::error::ArgvError;

/// Printed once on stderr before the entry point runs.
pub const BANNER: &str = "rworkerd: handing over to workerd_main";

/// Forwards an argument vector to an entry point and hands back its result.
#[derive(Debug)]
pub struct Launcher<E, B = HeapBuffers> {
    entry: E,
    source: B,
}

impl<E: EntryPoint> Launcher<E> {
    pub fn new(entry: E) -> Self {
        Launcher {
            entry,
            source: HeapBuffers,
        }
    }
}

impl<E: EntryPoint, B: BufferSource> Launcher<E, B> {
    pub fn with_source(entry: E, source: B) -> Self {
        Launcher { entry, source }
    }

    /// Marshals `args` and invokes the entry point once.
    ///
    /// The returned integer is whatever the entry point returned, untouched.
    /// If marshaling fails the entry point is not called. The buffers are
    /// released before this returns, or while unwinding if the entry point
    /// panics.
    pub fn run<I, S>(&mut self, args: I) -> Result<i32, ArgvError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let batch = ArgBatch::with_source(args, &mut self.source)?;

        debug!(argc = batch.argc(), "invoking entry point");
        let code = self.entry.invoke(&batch);
        drop(batch);
        debug!(code, "entry point returned");

        Ok(code)
    }

    pub fn entry(&self) -> &E {
        &self.entry
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::ffi::{CStr, CString};

    use libc::{c_char, c_int};

    use super::*;
    use crate::error::{EX_OSERR, EX_USAGE};

    /// Records every call and returns a fixed code.
    struct Recorder {
        code: c_int,
        calls: Cell<usize>,
        seen: RefCell<Vec<String>>,
        terminated: Cell<bool>,
    }

    impl Recorder {
        fn returning(code: c_int) -> Self {
            Recorder {
                code,
                calls: Cell::new(0),
                seen: RefCell::new(Vec::new()),
                terminated: Cell::new(false),
            }
        }
    }

    impl EntryPoint for Recorder {
        fn invoke(&self, batch: &ArgBatch) -> c_int {
            self.calls.set(self.calls.get() + 1);

            let argc = batch.argc() as usize;
            let argv = batch.as_ptr();
            let mut seen = self.seen.borrow_mut();
            seen.clear();
            unsafe {
                for i in 0..argc {
                    seen.push(CStr::from_ptr(*argv.add(i)).to_string_lossy().into_owned());
                }
                self.terminated.set((*argv.add(argc)).is_null());
            }

            self.code
        }
    }

    struct FailSecond;

    impl BufferSource for FailSecond {
        fn acquire(&mut self, index: usize, arg: &[u8]) -> Result<CString, ArgvError> {
            if index == 1 {
                return Err(ArgvError::Allocation {
                    index,
                    len: arg.len() + 1,
                });
            }
            HeapBuffers.acquire(index, arg)
        }
    }

    #[test]
    fn forwards_arguments_in_order() {
        let mut launcher = Launcher::new(Recorder::returning(0));

        let code = launcher.run(["prog", "--flag", "value"]).unwrap();

        assert_eq!(code, 0);
        assert_eq!(launcher.entry().calls.get(), 1);
        assert_eq!(*launcher.entry().seen.borrow(), ["prog", "--flag", "value"]);
        assert!(launcher.entry().terminated.get());
    }

    #[test]
    fn propagates_failure_code_verbatim() {
        let mut launcher = Launcher::new(Recorder::returning(2));

        assert_eq!(launcher.run(["prog", "--bad"]), Ok(2));
    }

    #[test]
    fn identity_for_any_result() {
        for code in [0, 1, 2, 127, 255, 256, -1, c_int::MAX, c_int::MIN] {
            let mut launcher = Launcher::new(Recorder::returning(code));
            assert_eq!(launcher.run(["prog"]), Ok(code));
        }
    }

    #[test]
    fn repeated_runs_agree() {
        let mut launcher = Launcher::new(|argc: c_int, _argv: *const *const c_char| argc + 40);

        let first = launcher.run(["prog", "x"]);
        let second = launcher.run(["prog", "x"]);

        assert_eq!(first, Ok(42));
        assert_eq!(first, second);
    }

    #[test]
    fn empty_vector_never_reaches_entry_point() {
        let mut launcher = Launcher::new(Recorder::returning(0));
        let args: [&str; 0] = [];

        let err = launcher.run(args).unwrap_err();

        assert_eq!(err, ArgvError::Empty);
        assert_eq!(err.exit_code(), EX_USAGE);
        assert_eq!(launcher.entry().calls.get(), 0);
    }

    #[test]
    fn embedded_nul_never_reaches_entry_point() {
        let mut launcher = Launcher::new(Recorder::returning(0));

        let err = launcher.run(["prog", "a\0b"]).unwrap_err();

        assert_eq!(err, ArgvError::InteriorNul { index: 1, position: 1 });
        assert_eq!(launcher.entry().calls.get(), 0);
    }

    #[test]
    fn allocation_failure_never_reaches_entry_point() {
        let mut launcher = Launcher::with_source(Recorder::returning(0), FailSecond);

        let err = launcher.run(["prog", "--flag"]).unwrap_err();

        assert_eq!(err, ArgvError::Allocation { index: 1, len: 7 });
        assert_eq!(err.exit_code(), EX_OSERR);
        assert_eq!(launcher.entry().calls.get(), 0);
    }

    #[test]
    fn panicking_entry_point_unwinds_through_run() {
        let mut launcher = Launcher::new(|_: c_int, _: *const *const c_char| -> c_int {
            panic!("entry point failed")
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            launcher.run(["prog"])
        }));

        assert!(result.is_err());
    }
}
