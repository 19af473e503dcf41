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

//! Client side of the native library's JSON control interface.
//!
//! Requests are `{"method": ..., "args": "<json>"}` objects passed as a C
//! string. The library answers with a heap string it owns, which has to be
//! handed back to its own free function. Replies carry `code` (0 on
//! success) and, depending on the method, `msg`, `state` and `error`.

use std::ffi::{CStr, CString};
use std::ptr::NonNull;

use libc::c_char;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BridgeError;

pub type JsonCallFn = unsafe extern "C" fn(*const c_char) -> *const c_char;
pub type FreeFn = unsafe extern "C" fn(*const c_char);

extern "C" {
    #[link_name = "workerdGoRuntimeJsonCall"]
    fn workerd_json_call(json: *const c_char) -> *const c_char;
    #[link_name = "workerdGoFreeHeapStrPtr"]
    fn workerd_free_str(ptr: *const c_char);
}

/// A request understood by the runtime.
pub trait Method: Serialize {
    const NAME: &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitRuntime {
    /// Where the runtime posts worker events. Empty disables reporting.
    #[serde(rename = "reportURL")]
    pub report_url: String,
}

impl Method for InitRuntime {
    const NAME: &'static str = "initRuntime";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkerd {
    pub id: String,
    pub directory: String,
    pub config_file: String,
    pub socket_addr: String,
}

impl Method for CreateWorkerd {
    const NAME: &'static str = "createWorkerd";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestroyWorkerd {
    pub id: String,
}

impl Method for DestroyWorkerd {
    const NAME: &'static str = "destroyWorkerd";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryWorkerd {
    pub id: String,
}

impl Method for QueryWorkerd {
    const NAME: &'static str = "queryWorkerd";
}

#[derive(Serialize)]
struct Envelope<'a> {
    method: &'a str,
    args: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reply {
    pub code: i32,
    pub msg: Option<String>,
    pub state: Option<i32>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerdState {
    Running,
    Failed(Option<String>),
}

impl From<Reply> for WorkerdState {
    fn from(reply: Reply) -> Self {
        let error = reply.error.filter(|e| !e.is_empty());
        match (reply.state, error) {
            (Some(0) | None, None) => WorkerdState::Running,
            (_, error) => WorkerdState::Failed(error),
        }
    }
}

/// Reply string owned by the native library, freed on drop.
struct HeapReply {
    ptr: NonNull<c_char>,
    free: FreeFn,
}

impl HeapReply {
    fn as_c_str(&self) -> &CStr {
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
    }
}

impl Drop for HeapReply {
    fn drop(&mut self) {
        unsafe { (self.free)(self.ptr.as_ptr()) }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JsonBridge {
    call: JsonCallFn,
    free: FreeFn,
}

impl JsonBridge {
    /// Binds the linked library's entry points.
    pub fn workerd() -> Self {
        JsonBridge {
            call: workerd_json_call,
            free: workerd_free_str,
        }
    }

    /// # Safety
    ///
    /// `call` must return either null or a NUL-terminated string that stays
    /// valid until it is passed to `free`.
    pub unsafe fn new(call: JsonCallFn, free: FreeFn) -> Self {
        JsonBridge { call, free }
    }

    /// Sends a raw request and returns the reply text.
    pub fn call_raw(&self, request: &str) -> Result<String, BridgeError> {
        let request =
            CString::new(request).map_err(|err| BridgeError::InteriorNul(err.nul_position()))?;

        let ptr = unsafe { (self.call)(request.as_ptr()) };
        let reply = NonNull::new(ptr as *mut c_char)
            .map(|ptr| HeapReply {
                ptr,
                free: self.free,
            })
            .ok_or(BridgeError::NullReply)?;

        let text = reply.as_c_str().to_str()?;
        Ok(text.to_owned())
    }

    pub fn call<M: Method>(&self, args: &M) -> Result<Reply, BridgeError> {
        let args = serde_json::to_string(args).map_err(BridgeError::Encode)?;
        let request = serde_json::to_string(&Envelope {
            method: M::NAME,
            args,
        })
        .map_err(BridgeError::Encode)?;

        debug!(method = M::NAME, "json call");
        let text = self.call_raw(&request)?;
        let reply: Reply = serde_json::from_str(&text).map_err(BridgeError::Decode)?;

        if reply.code != 0 {
            warn!(method = M::NAME, code = reply.code, "runtime rejected call");
            return Err(BridgeError::Runtime {
                code: reply.code,
                msg: reply.msg.unwrap_or_default(),
            });
        }

        Ok(reply)
    }

    pub fn init_runtime(&self, report_url: impl Into<String>) -> Result<(), BridgeError> {
        self.call(&InitRuntime {
            report_url: report_url.into(),
        })
        .map(|_| ())
    }

    pub fn create_workerd(&self, request: &CreateWorkerd) -> Result<(), BridgeError> {
        self.call(request).map(|_| ())
    }

    pub fn destroy_workerd(&self, id: impl Into<String>) -> Result<(), BridgeError> {
        self.call(&DestroyWorkerd { id: id.into() }).map(|_| ())
    }

    pub fn query_workerd(&self, id: impl Into<String>) -> Result<WorkerdState, BridgeError> {
        self.call(&QueryWorkerd { id: id.into() })
            .map(WorkerdState::from)
    }
}
