use std::fs;
use std::path::{Path, PathBuf};

pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Short host name, used to keep snapshots apart when the data directory
/// is shared between machines (NFS home directories).
pub fn hostname() -> String {
    fs::read_to_string("/proc/sys/kernel/hostname")
        .or_else(|_| fs::read_to_string("/etc/hostname"))
        .ok()
        .and_then(|name| clean_hostname(&name))
        .unwrap_or_else(|| "localhost".to_string())
}

fn clean_hostname(raw: &str) -> Option<String> {
    let name = raw.trim().split('.').next()?.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Default snapshot directory (~/.local/share/jig/<host> on Linux).
pub fn default_state_dir() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "jig")?;
    Some(dirs.data_dir().join(hostname()))
}

/// Default config file (~/.config/jig/config.toml on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "jig")?;
    Some(dirs.config_dir().join("config.toml"))
}

/// True when the effective user is root, so nothing needs elevating.
pub fn is_root() -> bool {
    rustix::process::geteuid().is_root()
}

pub fn tool_available(path: &Path) -> bool {
    path.exists()
}
