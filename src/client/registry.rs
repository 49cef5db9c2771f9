use crate::beans::{AdbDeviceInfo, DeviceState};
use crate::errors::{ControlError, ControlResult};
use crate::utils::adb_path;
use log::info;
use std::process::Command;

/// 列出所有已连接的 ADB 设备。
///
/// # 返回值
/// 设备列表（可能为空，无设备不算错误）；adb不可用时返回ToolUnavailable。
pub fn list_devices() -> ControlResult<Vec<AdbDeviceInfo>> {
    let adb = adb_path()?;
    let output = Command::new(adb)
        .arg("devices")
        .output()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ControlError::tool_unavailable("adb"),
            _ => ControlError::Io(e),
        })?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let devices = parse_devices_output(&stdout);
    info!("Found {} Attached Device(s)", devices.len());
    Ok(devices)
}

/// 仅保留处于 `device` 状态（已授权且在线）的设备
pub fn connected_devices() -> ControlResult<Vec<AdbDeviceInfo>> {
    let devices = list_devices()?;
    Ok(devices
        .into_iter()
        .filter(|d| d.state.is_connected())
        .collect())
}

/// 将用户输入解析为设备列表中的一项。
///
/// # 参数
/// - `devices`: 当前设备列表。
/// - `query`: 字面序列号，或列表下标（从0开始）。
///
/// # 返回值
/// 先按序列号精确匹配，再按下标取值；两者都未命中返回DeviceNotFound。
pub fn select_device<'a>(
    devices: &'a [AdbDeviceInfo],
    query: &str,
) -> ControlResult<&'a AdbDeviceInfo> {
    if let Some(device) = devices.iter().find(|d| d.serial == query) {
        return Ok(device);
    }
    if let Ok(index) = query.parse::<usize>() {
        if let Some(device) = devices.get(index) {
            return Ok(device);
        }
    }
    Err(ControlError::device_not_found(query))
}

/// 解析 `adb devices` 的输出表格，跳过表头、空行与daemon启动提示
fn parse_devices_output(raw: &str) -> Vec<AdbDeviceInfo> {
    let mut devices = vec![];
    for line in raw.lines() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with("List of devices") || line.starts_with('*') {
            continue;
        }
        let mut parts = line.split('\t');
        let serial = match parts.next() {
            Some(serial) if !serial.trim().is_empty() => serial.trim(),
            _ => continue,
        };
        let state = match parts.next() {
            Some(state) => DeviceState::from_str(state),
            None => continue,
        };
        devices.push(AdbDeviceInfo::new(serial.to_string(), state));
    }
    devices
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
List of devices attached
emulator-5554\tdevice
192.168.1.20:5555\toffline
0123456789ABCDEF\tunauthorized

";

    #[test]
    fn test_parse_devices_output() {
        let devices = parse_devices_output(SAMPLE);
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].serial, "emulator-5554");
        assert_eq!(devices[0].state, DeviceState::Device);
        assert_eq!(devices[1].state, DeviceState::Offline);
        assert_eq!(devices[2].state, DeviceState::Unauthorized);
    }

    #[test]
    fn test_parse_skips_daemon_banner() {
        let raw = "* daemon not running; starting now at tcp:5037\n\
                   * daemon started successfully\n\
                   List of devices attached\n\
                   emulator-5554\tdevice\n";
        let devices = parse_devices_output(raw);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].serial, "emulator-5554");
    }

    #[test]
    fn test_parse_empty_table() {
        let devices = parse_devices_output("List of devices attached\n\n");
        assert!(devices.is_empty());
    }

    #[test]
    fn test_select_device_by_serial() {
        let devices = parse_devices_output(SAMPLE);
        let device = select_device(&devices, "emulator-5554").unwrap();
        assert_eq!(device.serial, "emulator-5554");
    }

    #[test]
    fn test_select_device_by_index() {
        let devices = parse_devices_output(SAMPLE);
        let device = select_device(&devices, "1").unwrap();
        assert_eq!(device.serial, "192.168.1.20:5555");
    }

    #[test]
    fn test_select_device_miss() {
        let devices = parse_devices_output(SAMPLE);
        let err = select_device(&devices, "nonexistent").unwrap_err();
        assert_eq!(err.error_code(), "DEVICE_NOT_FOUND");
        let err = select_device(&devices, "9").unwrap_err();
        assert_eq!(err.error_code(), "DEVICE_NOT_FOUND");
    }
}
