//! Version string utilities for rugsafe binaries.
//!
//! The macro must be used because env vars are resolved per-crate at compile time.

/// Generate a version string with the git revision emitted by the calling
/// crate's vergen build script.
///
/// Returns format: "0.1.0+abc1234" or "0.1.0+abc1234-dirty", or the bare
/// package version when no revision was emitted
///
/// # Example
/// ```ignore
/// use rugsafe_base::get_version;
/// let version: &'static str = get_version!();
/// ```
#[macro_export]
macro_rules! get_version {
    () => {{
        use std::sync::OnceLock;
        static VERSION: OnceLock<&'static str> = OnceLock::new();

        *VERSION.get_or_init(|| {
            let base = env!("CARGO_PKG_VERSION");
            let sha = match option_env!("VERGEN_GIT_SHA") {
                Some(sha) if !sha.is_empty() && sha != "VERGEN_IDEMPOTENT_OUTPUT" => sha,
                _ => return base,
            };
            let sha_short = if sha.len() > 7 { &sha[..7] } else { sha };
            let dirty = option_env!("VERGEN_GIT_DIRTY")
                .map(|d| if d == "true" { "-dirty" } else { "" })
                .unwrap_or("");
            let version: &'static str =
                Box::leak(format!("{}+{}{}", base, sha_short, dirty).into_boxed_str());
            version
        })
    }};
}
