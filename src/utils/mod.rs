use crate::errors::{ControlError, ControlResult};
use std::path::PathBuf;
use std::process::Command;
use tracing::Level;
use which::which;

#[cfg(windows)]
const ADB_EXECUTE_FILE_NAME: &'static str = "adb.exe";
#[cfg(not(windows))]
const ADB_EXECUTE_FILE_NAME: &'static str = "adb";

#[cfg(windows)]
const MAESTRO_EXECUTE_FILE_NAME: &'static str = "maestro.exe";
#[cfg(not(windows))]
const MAESTRO_EXECUTE_FILE_NAME: &'static str = "maestro";

const RNEXUS_ADB_PATH: &'static str = "RNEXUS_ADB_PATH";
const RNEXUS_MAESTRO_PATH: &'static str = "RNEXUS_MAESTRO_PATH";

pub fn adb_path() -> ControlResult<PathBuf> {
    let adb_env = std::env::var(RNEXUS_ADB_PATH);
    if adb_env.is_ok() {
        Ok(PathBuf::from(adb_env.unwrap()))
    } else {
        match which(ADB_EXECUTE_FILE_NAME) {
            Ok(path) => Ok(path),
            Err(_) => Err(ControlError::tool_unavailable("adb")),
        }
    }
}

pub fn maestro_path() -> ControlResult<PathBuf> {
    let maestro_env = std::env::var(RNEXUS_MAESTRO_PATH);
    if maestro_env.is_ok() {
        Ok(PathBuf::from(maestro_env.unwrap()))
    } else {
        match which(MAESTRO_EXECUTE_FILE_NAME) {
            Ok(path) => Ok(path),
            Err(_) => Err(ControlError::tool_unavailable("maestro")),
        }
    }
}

/// 获取本机adb客户端的版本信息（`adb version` 输出的第一行）
pub fn adb_version() -> ControlResult<String> {
    let path = adb_path()?;
    let output = Command::new(path).arg("version").output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.lines().next() {
        Some(line) => Ok(line.trim().to_string()),
        None => Err(ControlError::parse_error("Empty Adb Version Output")),
    }
}

/// 获取本机maestro客户端的版本信息
pub fn maestro_version() -> ControlResult<String> {
    let path = maestro_path()?;
    let output = Command::new(path).arg("--version").output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

pub fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .try_init();
}
