//! Build metadata and host API version accessors.
//! The generated version.rs from the build script is included here so the
//! CLI and the unit host vocabulary share a single source of truth.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Fallback used when the manifest metadata could not be read at build time
const DEFAULT_HOST_API_VERSION: u32 = 20261018;

/// Host vocabulary version exposed to units through `host_api_version()`
pub fn get_host_api_version() -> u32 {
    HOST_API_VERSION.parse().unwrap_or(DEFAULT_HOST_API_VERSION)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// Long version text for `--version`
pub fn long_version() -> String {
    format!(
        "{} (host api {}, built {}, git {})",
        env!("CARGO_PKG_VERSION"),
        get_host_api_version(),
        build_time(),
        git_hash()
    )
}
