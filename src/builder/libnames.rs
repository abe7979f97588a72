//! Library name extraction.
//!
//! On Windows the installed `.lib` files carry version suffixes
//! (`opencv_core490.lib`), so the real names are read from the lib
//! directory. Elsewhere the names are synthesized from the module list.

use std::collections::BTreeSet;
use std::path::Path;

use crate::core::platform::{Os, Platform};
use crate::util::fs::list_file_stems;

/// Prefix shared by every OpenCV module library.
pub const LIB_NAME_PREFIX: &str = "opencv_";

/// Library identifiers for `modules` installed in `lib_path`.
///
/// A Windows library matches a module only when its name starts with
/// `opencv_<module>`, so `core` does not pick up a library that merely
/// contains "core". If the directory cannot be listed the synthesized
/// names are returned instead.
pub fn extract_lib_names(
    modules: &BTreeSet<String>,
    lib_path: &Path,
    platform: &Platform,
) -> BTreeSet<String> {
    match platform.os {
        Os::Windows => match list_file_stems(lib_path, platform.os.static_lib_extension()) {
            Ok(stems) => stems
                .into_iter()
                .filter(|stem| stem.starts_with(LIB_NAME_PREFIX))
                .filter(|stem| {
                    modules
                        .iter()
                        .any(|m| stem.starts_with(&format!("{}{}", LIB_NAME_PREFIX, m)))
                })
                .collect(),
            Err(e) => {
                tracing::debug!("Falling back to synthesized library names: {:#}", e);
                synthesize(modules)
            }
        },
        Os::Darwin | Os::Linux => synthesize(modules),
    }
}

fn synthesize(modules: &BTreeSet<String>) -> BTreeSet<String> {
    modules
        .iter()
        .map(|m| format!("{}{}", LIB_NAME_PREFIX, m))
        .collect()
}
