//! # Locator
//!
//! Maps a browser and host platform to the on-disk history database.
//! Path construction is pure over ([`OsFamily`], [`EnvSnapshot`]); only the
//! Firefox profile scan and the final existence check touch the filesystem.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::ProfileSelection;
use crate::parsers::browser::Browser;

const FIREFOX_PROFILE_SUFFIX: &str = ".default-release";
const FIREFOX_PLACES_FILE: &str = "places.sqlite";
const FIREFOX_PROFILES_INI: &str = "profiles.ini";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    MacOs,
    /// Linux and every other Unix-like host.
    Other,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else if cfg!(target_os = "macos") {
            OsFamily::MacOs
        } else {
            OsFamily::Other
        }
    }
}

/// The environment values path construction depends on.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    pub home: Option<PathBuf>,
    pub local_app_data: Option<PathBuf>,
    pub app_data: Option<PathBuf>,
}

impl EnvSnapshot {
    pub fn capture() -> Self {
        Self {
            home: dirs::home_dir(),
            local_app_data: non_empty_var("LOCALAPPDATA"),
            app_data: non_empty_var("APPDATA"),
        }
    }

    /// Snapshot with only a home directory, as on macOS and Linux.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
            ..Self::default()
        }
    }
}

fn non_empty_var(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v: &OsString| !v.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("{0} is not available")]
    MissingEnv(&'static str),
    #[error("firefox profiles directory not found: {0}")]
    NoProfilesRoot(PathBuf),
    #[error("no *.default-release profile under {0}")]
    NoDefaultProfile(PathBuf),
    #[error("history database not found: {0}")]
    MissingDatabase(PathBuf),
    #[error("io error listing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn home(env: &EnvSnapshot) -> Result<&Path, LocateError> {
    env.home.as_deref().ok_or(LocateError::MissingEnv("home directory"))
}

pub fn chrome_history_path(os: OsFamily, env: &EnvSnapshot) -> Result<PathBuf, LocateError> {
    let path = match os {
        OsFamily::Windows => env
            .local_app_data
            .as_deref()
            .ok_or(LocateError::MissingEnv("LOCALAPPDATA"))?
            .join("Google")
            .join("Chrome")
            .join("User Data")
            .join("Default")
            .join("History"),
        OsFamily::MacOs => home(env)?
            .join("Library")
            .join("Application Support")
            .join("Google")
            .join("Chrome")
            .join("Default")
            .join("History"),
        OsFamily::Other => home(env)?
            .join(".config")
            .join("google-chrome")
            .join("Default")
            .join("History"),
    };
    Ok(path)
}

pub fn firefox_profiles_root(os: OsFamily, env: &EnvSnapshot) -> Result<PathBuf, LocateError> {
    let path = match os {
        OsFamily::Windows => env
            .app_data
            .as_deref()
            .ok_or(LocateError::MissingEnv("APPDATA"))?
            .join("Mozilla")
            .join("Firefox")
            .join("Profiles"),
        OsFamily::MacOs => home(env)?
            .join("Library")
            .join("Application Support")
            .join("Firefox")
            .join("Profiles"),
        OsFamily::Other => home(env)?.join(".mozilla").join("firefox"),
    };
    Ok(path)
}

/// Resolves the history database for `browser`, failing when it is not on disk.
pub fn locate(
    browser: Browser,
    os: OsFamily,
    env: &EnvSnapshot,
    selection: ProfileSelection,
) -> Result<PathBuf, LocateError> {
    let path = match browser {
        Browser::Chrome => chrome_history_path(os, env)?,
        Browser::Firefox => {
            let root = firefox_profiles_root(os, env)?;
            if !root.is_dir() {
                return Err(LocateError::NoProfilesRoot(root));
            }
            find_default_release_profile(&root, selection)?.join(FIREFOX_PLACES_FILE)
        }
    };

    if !path.is_file() {
        return Err(LocateError::MissingDatabase(path));
    }
    debug!("{} history database at {}", browser.short_name(), path.display());
    Ok(path)
}

/// Picks one `*.default-release` directory under `root`.
///
/// Directory listing order is not stable, so candidates are sorted and the
/// `profiles.ini` default (install section first, then `Default=1`) wins when
/// it names one of them.
pub fn find_default_release_profile(
    root: &Path,
    selection: ProfileSelection,
) -> Result<PathBuf, LocateError> {
    let entries = std::fs::read_dir(root).map_err(|source| LocateError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(FIREFOX_PROFILE_SUFFIX))
        .collect();
    candidates.sort();

    if candidates.is_empty() {
        return Err(LocateError::NoDefaultProfile(root.to_path_buf()));
    }
    if candidates.len() > 1 {
        debug!(
            "{} profiles match {FIREFOX_PROFILE_SUFFIX}: {}",
            candidates.len(),
            candidates.join(", ")
        );
    }

    let chosen = match selection {
        ProfileSelection::InstallDefault => read_profiles_ini(root)
            .and_then(|ini| ini.preferred(&candidates))
            .unwrap_or(&candidates[0]),
        ProfileSelection::FirstMatch => &candidates[0],
    };
    Ok(root.join(chosen))
}

/// `profiles.ini` lives next to the profiles on Linux and one level up
/// (beside `Profiles/`) on Windows and macOS.
fn read_profiles_ini(root: &Path) -> Option<ProfilesIni> {
    let mut locations = vec![root.join(FIREFOX_PROFILES_INI)];
    if let Some(parent) = root.parent() {
        locations.push(parent.join(FIREFOX_PROFILES_INI));
    }
    locations.into_iter().find_map(|path| {
        let text = std::fs::read_to_string(&path).ok()?;
        debug!("using {}", path.display());
        Some(ProfilesIni::parse(&text))
    })
}

/// Default-profile hints from `profiles.ini`, reduced to directory names.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProfilesIni {
    pub install_defaults: Vec<String>,
    pub marked_defaults: Vec<String>,
}

impl ProfilesIni {
    pub fn parse(text: &str) -> Self {
        let mut ini = ProfilesIni::default();
        let mut section = String::new();
        let mut profile = PendingProfile::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                profile.finish(&mut ini);
                section = name.trim().to_string();
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if section.starts_with("Install") && key == "Default" {
                ini.install_defaults.push(last_component(value));
            } else if section.starts_with("Profile") {
                match key {
                    "Path" => profile.path = Some(last_component(value)),
                    "Default" => profile.is_default = value == "1",
                    _ => {}
                }
            }
        }
        profile.finish(&mut ini);
        ini
    }

    fn preferred<'a>(&self, candidates: &'a [String]) -> Option<&'a String> {
        self.install_defaults
            .iter()
            .chain(self.marked_defaults.iter())
            .find_map(|name| candidates.iter().find(|c| *c == name))
    }
}

#[derive(Default)]
struct PendingProfile {
    path: Option<String>,
    is_default: bool,
}

impl PendingProfile {
    fn finish(&mut self, ini: &mut ProfilesIni) {
        let path = self.path.take();
        if std::mem::take(&mut self.is_default) {
            if let Some(path) = path {
                ini.marked_defaults.push(path);
            }
        }
    }
}

fn last_component(value: &str) -> String {
    value
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(value)
        .to_string()
}
