//! Build configuration.
//!
//! A [`BuildConfig`] is the validated description of one OpenCV build: the
//! upstream release tag, the selected modules and the linkage mode. It is
//! created either from CLI flags or from a declarative config file such as
//! `.github/opencv-config.json`:
//!
//! ```json
//! { "version": "4.9.0", "build_list": "core,imgproc,dnn", "shared": "OFF" }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use crate::core::errors::CiError;

/// Default location of the declarative config file, relative to the workspace.
pub const DEFAULT_CONFIG_PATH: &str = ".github/opencv-config.json";

/// Delimiter used when modules are written as a single list.
pub const MODULE_DELIMITER: char = ',';

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+(?:[-.][0-9A-Za-z.]+)?$").expect("version regex is valid")
});

static MODULES_HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{64}$").expect("modules hash regex is valid"));

static MODULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("module regex is valid"));

/// Static or shared linkage, spelled `OFF`/`ON` as in `BUILD_SHARED_LIBS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Linkage {
    #[default]
    Static,
    Shared,
}

impl Linkage {
    /// The CMake boolean for `BUILD_SHARED_LIBS`.
    pub fn as_flag(&self) -> &'static str {
        match self {
            Linkage::Static => "OFF",
            Linkage::Shared => "ON",
        }
    }
}

impl FromStr for Linkage {
    type Err = CiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ON" => Ok(Linkage::Shared),
            "OFF" => Ok(Linkage::Static),
            other => Err(CiError::config(format!(
                "`shared` must be ON or OFF, got `{}`",
                other
            ))),
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// Validated description of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    version: String,
    modules: BTreeSet<String>,
    linkage: Linkage,
    namespace: Option<String>,
}

impl BuildConfig {
    /// Create a config from an explicit module collection.
    ///
    /// Module order is irrelevant and duplicates collapse.
    pub fn new<I, S>(version: &str, modules: I, linkage: Linkage) -> Result<Self, CiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let version = validate_version(version)?;
        let set = parse_modules(modules)?;

        Ok(BuildConfig {
            version: version.to_string(),
            modules: set,
            linkage,
            namespace: None,
        })
    }

    /// Create a config from a comma-joined module list.
    pub fn from_build_list(
        version: &str,
        build_list: &str,
        linkage: Linkage,
    ) -> Result<Self, CiError> {
        Ok(BuildConfig {
            version: validate_version(version)?.to_string(),
            modules: parse_build_list(build_list)?,
            linkage,
            namespace: None,
        })
    }

    /// Set the cache namespace. Blank namespaces count as absent.
    pub fn with_namespace(mut self, namespace: Option<&str>) -> Self {
        self.namespace = namespace
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .map(str::to_string);
        self
    }

    /// Load and validate a config file (JSON, or TOML by extension).
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        let raw = RawConfig::parse(path, &contents)?;
        let config = raw.into_config().map_err(|e| match e {
            CiError::ConfigParse { message, .. } => CiError::ConfigParse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })?;

        tracing::debug!(
            "Loaded config from {}: {} [{}] shared={}",
            path.display(),
            config.version,
            config.build_list(),
            config.linkage
        );
        Ok(config)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Modules in canonical (sorted, deduplicated) order.
    pub fn modules(&self) -> &BTreeSet<String> {
        &self.modules
    }

    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Canonical comma-joined module list.
    pub fn build_list(&self) -> String {
        self.modules
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Check a release tag, returning it trimmed.
pub fn validate_version(version: &str) -> Result<&str, CiError> {
    let version = version.trim();
    if version.is_empty() {
        return Err(CiError::config("`version` is empty"));
    }
    if !VERSION_RE.is_match(version) {
        return Err(CiError::config(format!(
            "`{}` is not an OpenCV release tag (expected e.g. 4.9.0)",
            version
        )));
    }
    Ok(version)
}

/// Check a modules hash, returning it trimmed.
///
/// The hash becomes a directory name under the install root, so only the
/// lowercase hex SHA-256 that `compute-key` emits is accepted.
pub fn validate_modules_hash(hash: &str) -> Result<&str, CiError> {
    let hash = hash.trim();
    if !MODULES_HASH_RE.is_match(hash) {
        return Err(CiError::config(format!(
            "`{}` is not a modules hash (expected 64 lowercase hex digits)",
            hash
        )));
    }
    Ok(hash)
}

/// Canonical module set. Blank entries are skipped and duplicates collapse.
pub fn parse_modules<I, S>(modules: I) -> Result<BTreeSet<String>, CiError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = BTreeSet::new();
    for module in modules {
        let module = module.as_ref().trim();
        if module.is_empty() {
            continue;
        }
        if !MODULE_RE.is_match(module) {
            return Err(CiError::config(format!("invalid module name `{}`", module)));
        }
        set.insert(module.to_string());
    }
    if set.is_empty() {
        return Err(CiError::config("`build_list` names no modules"));
    }
    Ok(set)
}

/// Canonical module set from a comma-joined list.
pub fn parse_build_list(build_list: &str) -> Result<BTreeSet<String>, CiError> {
    parse_modules(build_list.split(MODULE_DELIMITER))
}

/// On-disk shape of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    version: Option<String>,
    opencv_version: Option<String>,
    build_list: Option<RawBuildList>,
    shared: Option<RawShared>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBuildList {
    Joined(String),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawShared {
    Bool(bool),
    Text(String),
}

impl RawConfig {
    fn parse(path: &Path, contents: &str) -> Result<Self, CiError> {
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let parsed = if is_toml {
            toml::from_str(contents).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(contents).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| CiError::ConfigParse {
            path: Some(path.to_path_buf()),
            message,
        })
    }

    fn into_config(self) -> Result<BuildConfig, CiError> {
        let version = [self.version, self.opencv_version]
            .into_iter()
            .flatten()
            .find(|v| !v.trim().is_empty())
            .unwrap_or_default();

        let linkage = match self.shared {
            None => Linkage::Static,
            Some(RawShared::Bool(true)) => Linkage::Shared,
            Some(RawShared::Bool(false)) => Linkage::Static,
            Some(RawShared::Text(text)) if text.trim().is_empty() => Linkage::Static,
            Some(RawShared::Text(text)) => text.parse()?,
        };

        match self.build_list {
            Some(RawBuildList::Joined(list)) => {
                BuildConfig::from_build_list(&version, &list, linkage)
            }
            Some(RawBuildList::List(items)) => BuildConfig::new(&version, items, linkage),
            None => BuildConfig::new(&version, Vec::<String>::new(), linkage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_modules_are_canonical() {
        let config =
            BuildConfig::from_build_list("4.9.0", "dnn,core,,imgproc,core", Linkage::Static)
                .unwrap();
        assert_eq!(config.build_list(), "core,dnn,imgproc");
        assert_eq!(config.modules().len(), 3);
    }

    #[test]
    fn test_rejects_empty_modules() {
        let err = BuildConfig::from_build_list("4.9.0", " , ", Linkage::Static).unwrap_err();
        assert!(err.to_string().contains("names no modules"));
    }

    #[test]
    fn test_rejects_bad_version() {
        assert!(BuildConfig::from_build_list("", "core", Linkage::Static).is_err());
        assert!(BuildConfig::from_build_list("latest", "core", Linkage::Static).is_err());
        assert!(BuildConfig::from_build_list("4.0.0-rc", "core", Linkage::Static).is_ok());
        assert!(BuildConfig::from_build_list("4.10.0", "core", Linkage::Static).is_ok());
    }

    #[test]
    fn test_rejects_bad_module_name() {
        let err = BuildConfig::from_build_list("4.9.0", "core,../x", Linkage::Static).unwrap_err();
        assert!(err.to_string().contains("invalid module name"));
    }

    #[test]
    fn test_validate_modules_hash() {
        let hash = "a".repeat(64);
        assert_eq!(validate_modules_hash(&format!(" {} ", hash)).unwrap(), hash);

        let upper = "A".repeat(64);
        let nested = format!("{}/x", hash);
        let bad_hashes: [&str; 5] = ["", "abc", "../../outside", &upper, &nested];
        for bad in bad_hashes {
            let err = validate_modules_hash(bad).unwrap_err();
            assert!(matches!(err, CiError::ConfigParse { .. }), "accepted `{}`", bad);
        }
    }

    #[test]
    fn test_linkage_parse() {
        assert_eq!("on".parse::<Linkage>().unwrap(), Linkage::Shared);
        assert_eq!("OFF".parse::<Linkage>().unwrap(), Linkage::Static);
        assert!("yes".parse::<Linkage>().is_err());
        assert_eq!(Linkage::default().as_flag(), "OFF");
    }

    #[test]
    fn test_namespace_blank_is_absent() {
        let config = BuildConfig::from_build_list("4.9.0", "core", Linkage::Static)
            .unwrap()
            .with_namespace(Some("  "));
        assert_eq!(config.namespace(), None);
    }

    #[test]
    fn test_load_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("opencv-config.json");
        std::fs::write(
            &path,
            r#"{"opencv_version": "4.9.0", "build_list": "imgproc,core", "shared": "on"}"#,
        )
        .unwrap();

        let config = BuildConfig::load(&path).unwrap();
        assert_eq!(config.version(), "4.9.0");
        assert_eq!(config.build_list(), "core,imgproc");
        assert_eq!(config.linkage(), Linkage::Shared);
    }

    #[test]
    fn test_load_json_defaults_to_static() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("opencv-config.json");
        std::fs::write(&path, r#"{"version": "4.9.0", "build_list": ["dnn", "core"]}"#).unwrap();

        let config = BuildConfig::load(&path).unwrap();
        assert_eq!(config.linkage(), Linkage::Static);
        assert_eq!(config.build_list(), "core,dnn");
    }

    #[test]
    fn test_load_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("opencv.toml");
        std::fs::write(
            &path,
            "version = \"4.8.1\"\nbuild_list = \"core\"\nshared = true\n",
        )
        .unwrap();

        let config = BuildConfig::load(&path).unwrap();
        assert_eq!(config.version(), "4.8.1");
        assert_eq!(config.linkage(), Linkage::Shared);
    }

    #[test]
    fn test_load_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("opencv-config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = BuildConfig::load(&path).unwrap_err();
        let ci = err.downcast_ref::<CiError>().unwrap();
        assert!(matches!(ci, CiError::ConfigParse { path: Some(_), .. }));
    }

    #[test]
    fn test_load_invalid_shared_carries_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("opencv-config.json");
        std::fs::write(
            &path,
            r#"{"version": "4.9.0", "build_list": "core", "shared": "maybe"}"#,
        )
        .unwrap();

        let err = BuildConfig::load(&path).unwrap_err();
        match err.downcast_ref::<CiError>().unwrap() {
            CiError::ConfigParse { path: Some(p), message } => {
                assert_eq!(p, &path);
                assert!(message.contains("MAYBE"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
