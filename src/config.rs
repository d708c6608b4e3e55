use std::{
    env,
    ffi::OsStr,
    path::{Path, PathBuf},
    vec::Vec,
};

/// Environment variable listing resource roots, in the platform's path list syntax
pub const RESOURCE_PATH_ENV: &str = "BEANWIRE_RESOURCE_PATH";

/// Config for configuration resource lookup
/// ## Fields
/// - `roots`:
///   Directories searched in order for a relative resource path, the first match wins.
///
///   Absolute resource paths are used as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub roots: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roots: Vec::from([PathBuf::from(".")]),
        }
    }
}

impl Config {
    /// Reads roots from [`RESOURCE_PATH_ENV`], falls back to [`Config::default`] if it's unset or empty
    #[must_use]
    pub fn from_env() -> Self {
        env::var_os(RESOURCE_PATH_ENV).map_or_else(Self::default, |paths| Self::from_paths(&paths))
    }

    /// Parses a path list like `conf:/etc/app`, falls back to [`Config::default`] if it has no entries
    #[must_use]
    pub fn from_paths(paths: &OsStr) -> Self {
        let roots: Vec<_> = env::split_paths(paths).filter(|root| !root.as_os_str().is_empty()).collect();
        if roots.is_empty() {
            return Self::default();
        }
        Self { roots }
    }

    #[inline]
    #[must_use]
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.roots.push(root.as_ref().to_path_buf());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    use std::{env, ffi::OsString, path::PathBuf, vec::Vec};

    #[test]
    fn test_from_paths() {
        let paths = env::join_paths(["conf", "/etc/fruit"]).unwrap();

        assert_eq!(Config::from_paths(&paths).roots, [PathBuf::from("conf"), PathBuf::from("/etc/fruit")]);
        assert_eq!(Config::from_paths(&OsString::new()), Config::default());
    }

    #[test]
    fn test_with_root() {
        let config = Config { roots: Vec::new() }.with_root("resources").with_root("fallback");

        assert_eq!(config.roots, [PathBuf::from("resources"), PathBuf::from("fallback")]);
    }
}
