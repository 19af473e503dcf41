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

#![cfg(workerd_stub)]

use rworkerd::bridge::{CreateWorkerd, JsonBridge, Method, WorkerdState};
use rworkerd::BridgeError;
use serde::Serialize;

#[derive(Serialize)]
struct ReloadWorkerd {
    id: String,
}

impl Method for ReloadWorkerd {
    const NAME: &'static str = "reloadWorkerd";
}

#[test]
fn lifecycle_against_linked_library() -> Result<(), BridgeError> {
    let bridge = JsonBridge::workerd();

    bridge.init_runtime("http://127.0.0.1:3000/workerd_report")?;
    bridge.create_workerd(&CreateWorkerd {
        id: "af00b595-81fd-4602-aa36-6f49b912cec7".into(),
        directory: "samples/helloworld".into(),
        config_file: "config.capnp".into(),
        socket_addr: "127.0.0.1:8060".into(),
    })?;
    assert_eq!(
        bridge.query_workerd("af00b595-81fd-4602-aa36-6f49b912cec7")?,
        WorkerdState::Running
    );
    bridge.destroy_workerd("af00b595-81fd-4602-aa36-6f49b912cec7")?;
    Ok(())
}

#[test]
fn unknown_method_is_a_runtime_error() {
    let bridge = JsonBridge::workerd();

    let err = bridge
        .call(&ReloadWorkerd { id: "w1".into() })
        .unwrap_err();

    assert!(matches!(err, BridgeError::Runtime { code: -1, .. }), "{err}");
}
