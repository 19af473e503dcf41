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

use std::env;

use glob::glob;

fn main() {
    println!("cargo:rerun-if-env-changed=WORKERD_LIB_DIR");
    println!("cargo:rerun-if-env-changed=WORKERD_LIB_NAME");
    println!("cargo:rerun-if-env-changed=WORKERD_LINK_KIND");
    println!("cargo:rustc-check-cfg=cfg(workerd_stub)");

    if let Some(dir) = env_value("WORKERD_LIB_DIR") {
        let name = env_value("WORKERD_LIB_NAME").unwrap_or_else(|| "workerd".to_string());
        let kind = env_value("WORKERD_LINK_KIND").unwrap_or_else(|| "dylib".to_string());

        println!("cargo:rustc-link-search=native={}", dir);
        println!("cargo:rustc-link-lib={}={}", kind, name);
        return;
    }

    // No native library given, link the bundled stand-in instead.
    let mut files = Vec::new();

    for file in glob("native/*.c").expect("workerd_stub") {
        if let Ok(file) = file {
            println!("cargo:rerun-if-changed={}", file.display());
            files.push(file.to_string_lossy().to_string());
        }
    }

    cc::Build::new()
        .files(&files)
        .flag_if_supported("-Wno-unused-parameter")
        .compile("workerd_stub");

    println!("cargo:rustc-cfg=workerd_stub");
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
