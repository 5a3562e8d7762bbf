//! Node.js core modules.
//!
//! Imports of these never need a dependency declaration.

const NODE_BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Returns true if `name` (a package name, not a full specifier) is a Node
/// built-in. Anything under the `node:` scheme counts.
pub fn is_builtin(name: &str) -> bool {
    name.starts_with("node:") || NODE_BUILTINS.binary_search(&name).is_ok()
}
