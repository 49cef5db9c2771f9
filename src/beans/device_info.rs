use std::collections::HashMap;
use std::fmt::Display;

/// 设备连接状态枚举（`adb devices` 输出的第二列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceState {
    Device,
    Offline,
    Unauthorized,
    Unknown,
}

impl Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            DeviceState::Device => "device",
            DeviceState::Offline => "offline",
            DeviceState::Unauthorized => "unauthorized",
            DeviceState::Unknown => "unknown",
        };
        write!(f, "{}", str)
    }
}

impl DeviceState {
    /// 从字符串解析连接状态
    pub fn from_str(s: &str) -> Self {
        match s.trim() {
            "device" => DeviceState::Device,
            "offline" => DeviceState::Offline,
            "unauthorized" => DeviceState::Unauthorized,
            _ => DeviceState::Unknown,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, DeviceState::Device)
    }
}

#[derive(Debug, Clone)]
pub struct AdbDeviceInfo {
    pub serial: String,
    pub state: DeviceState,
    pub properties: HashMap<String, String>,
}

impl AdbDeviceInfo {
    pub fn new(serial: String, state: DeviceState) -> AdbDeviceInfo {
        AdbDeviceInfo {
            serial,
            state,
            properties: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_state_display() {
        assert_eq!(DeviceState::Device.to_string(), "device");
        assert_eq!(DeviceState::Unauthorized.to_string(), "unauthorized");
    }

    #[test]
    fn test_device_state_from_str() {
        assert_eq!(DeviceState::from_str("device"), DeviceState::Device);
        assert_eq!(DeviceState::from_str("offline"), DeviceState::Offline);
        assert_eq!(DeviceState::from_str("recovery"), DeviceState::Unknown);
    }

    #[test]
    fn test_is_connected() {
        assert!(DeviceState::Device.is_connected());
        assert!(!DeviceState::Offline.is_connected());
    }
}
