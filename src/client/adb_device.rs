use crate::beans::{AdbDeviceInfo, AppInfo, DeviceState};
use crate::ctl_ensure;
use crate::errors::{ControlError, ControlResult};
use crate::utils::adb_path;
use image::{io::Reader as ImageReader, RgbImage};
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Output};

static BATTERY_LEVEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"level: (\d+)").unwrap());
static BATTERY_STATUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"status: (\d+)").unwrap());
static SCREEN_SIZE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Physical size: (\d+x\d+)").unwrap());
static WLAN_IP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"inet (\d+\.\d+\.\d+\.\d+)").unwrap());
static GETPROP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]: \[([^\]]*)\]").unwrap());
static VERSION_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"versionName=(\S+)").unwrap());
static PACKAGE_PATH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"package:(.+)").unwrap());
static PERMISSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"android\.permission\.([A-Z_]+)").unwrap());

/// AdbDevice结构体代表一台通过 `adb -s <serial>` 操作的设备。
///
/// 所有操作都以参数向量方式构造命令行，绝不做shell字符串拼接。
#[derive(Debug, Clone)]
pub struct AdbDevice {
    pub serial: String,
}

impl AdbDevice {
    pub fn new(serial: &str) -> Self {
        Self {
            serial: serial.to_string(),
        }
    }

    /// 执行一条adb命令并返回原始输出。
    ///
    /// # 参数
    /// - `args`: `adb -s <serial>` 之后的全部参数。
    ///
    /// # 返回值
    /// 进程输出（不检查退出码，语义由调用方判断），adb缺失时返回ToolUnavailable。
    fn exec(&self, args: &[&str]) -> ControlResult<Output> {
        let adb = adb_path()?;
        let mut cmd = Command::new(adb);
        cmd.arg("-s");
        cmd.arg(&self.serial);
        for x in args {
            cmd.arg(x);
        }
        info!("{:?}", &cmd);
        cmd.output().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ControlError::tool_unavailable("adb"),
            _ => ControlError::Io(e),
        })
    }

    /// 执行adb命令并返回标准输出文本
    pub fn adb_output(&self, args: &[&str]) -> ControlResult<String> {
        let output = self.exec(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// 在设备上执行Shell命令，并返回命令的输出。
    ///
    /// # 参数
    /// - `command`: 要执行的Shell命令及其参数，逐项传递。
    pub fn shell(&self, command: &[&str]) -> ControlResult<String> {
        let mut args = vec!["shell"];
        args.extend_from_slice(command);
        self.adb_output(&args)
    }

    pub fn shell_trim(&self, command: &[&str]) -> ControlResult<String> {
        let output = self.shell(command)?;
        Ok(output.trim().to_string())
    }

    /// adb get-state => device
    pub fn get_state(&self) -> ControlResult<String> {
        let output = self.adb_output(&["get-state"])?;
        Ok(output.trim().to_string())
    }

    pub fn getprop(&self, key: &str) -> ControlResult<String> {
        self.shell_trim(&["getprop", key])
    }

    pub fn get_sdk_version(&self) -> ControlResult<String> {
        self.getprop("ro.build.version.sdk")
    }

    pub fn get_android_version(&self) -> ControlResult<String> {
        self.getprop("ro.build.version.release")
    }

    pub fn get_device_model(&self) -> ControlResult<String> {
        self.getprop("ro.product.model")
    }

    pub fn get_device_manufacturer(&self) -> ControlResult<String> {
        self.getprop("ro.product.manufacturer")
    }

    /// 获取完整的系统属性表。
    ///
    /// # 返回值
    /// `getprop` 输出按 `[key]: [value]` 逐行解析得到的键值表。
    pub fn device_properties(&self) -> ControlResult<HashMap<String, String>> {
        let output = self.shell(&["getprop"])?;
        let mut properties = HashMap::new();
        for line in output.lines() {
            if let Some(captures) = GETPROP_RE.captures(line) {
                let key = captures.get(1).map_or("", |m| m.as_str());
                let value = captures.get(2).map_or("", |m| m.as_str());
                properties.insert(key.to_string(), value.to_string());
            }
        }
        Ok(properties)
    }

    /// 汇总设备当前状态与完整属性表。
    ///
    /// # 返回值
    /// 带属性缓存的设备信息，`properties` 为 `device_properties` 的完整快照。
    pub fn device_info(&self) -> ControlResult<AdbDeviceInfo> {
        let state = DeviceState::from_str(&self.get_state()?);
        let mut info = AdbDeviceInfo::new(self.serial.clone(), state);
        info.properties = self.device_properties()?;
        Ok(info)
    }

    /// 读取电池电量百分比（dumpsys battery）
    pub fn battery_level(&self) -> ControlResult<u8> {
        let output = self.shell(&["dumpsys", "battery"])?;
        if let Some(captures) = BATTERY_LEVEL_RE.captures(&output) {
            let level = captures.get(1).map_or("", |m| m.as_str());
            return Ok(level.parse::<u8>()?);
        }
        Err(ControlError::parse_error("Battery Level Not Found"))
    }

    /// 读取电池充电状态，未知状态码归为 "Unknown"
    pub fn battery_status(&self) -> ControlResult<&'static str> {
        let output = self.shell(&["dumpsys", "battery"])?;
        let code = BATTERY_STATUS_RE
            .captures(&output)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .unwrap_or(-1);
        Ok(battery_status_name(code))
    }

    /// 读取物理屏幕分辨率（wm size），例如 "1080x2400"
    pub fn screen_resolution(&self) -> ControlResult<String> {
        let output = self.shell(&["wm", "size"])?;
        if let Some(captures) = SCREEN_SIZE_RE.captures(&output) {
            return Ok(captures.get(1).unwrap().as_str().to_string());
        }
        Err(ControlError::parse_error("Physical Size Not Found"))
    }

    pub fn wlan_ip(&self) -> ControlResult<String> {
        let output = self.shell(&["ip", "addr", "show", "wlan0"])?;
        if let Some(captures) = WLAN_IP_RE.captures(&output) {
            return Ok(captures.get(1).unwrap().as_str().to_string());
        }
        Err(ControlError::parse_error("Wlan Ip Not Found"))
    }

    /// 截取设备屏幕。
    ///
    /// 先在设备侧落盘，经临时目录拉取到本机后删除设备侧文件。
    ///
    /// # 返回值
    /// 解码后的RGB图像。
    pub fn screenshot(&self) -> ControlResult<RgbImage> {
        let src = "/sdcard/screen.png";
        self.shell(&["screencap", "-p", src])?;
        let tmpdir = tempfile::tempdir()?;
        let target_path = tmpdir.path().join("screen.png");
        info!("Pull Image To {:#?}", &target_path);
        self.pull(src, &target_path)?;
        self.shell(&["rm", src])?;

        let image = ImageReader::open(&target_path)?.decode()?;
        Ok(image.into_rgb8())
    }

    /// 录制设备屏幕并保存为本机mp4文件。
    ///
    /// 依赖 `screenrecord --time-limit` 在设备侧阻塞到时长结束，
    /// 随后拉取并删除设备侧文件。
    ///
    /// # 参数
    /// - `duration_secs`: 录制时长，screenrecord允许的范围是 1..=180 秒。
    /// - `local`: 本机输出路径。
    pub fn record_screen(&self, duration_secs: u32, local: &Path) -> ControlResult<()> {
        ctl_ensure!(
            (1..=180).contains(&duration_secs),
            ControlError::invalid_input(format!(
                "Record Duration Must Be 1..=180 Seconds, Got {}",
                duration_secs
            ))
        );
        let src = "/sdcard/screenrecord.mp4";
        self.shell(&[
            "screenrecord",
            "--time-limit",
            &duration_secs.to_string(),
            src,
        ])?;
        self.pull(src, local)?;
        self.shell(&["rm", src])?;
        info!("Record Screen {}s To {:#?}", duration_secs, local);
        Ok(())
    }

    /// 从设备拉取文件到本机
    pub fn pull(&self, remote: &str, local: &Path) -> ControlResult<()> {
        let local_str = local
            .to_str()
            .ok_or_else(|| ControlError::invalid_input("Local Path Is Not Valid UTF-8"))?;
        let output = self.exec(&["pull", remote, local_str])?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || stderr.to_lowercase().contains("error") {
            error!("Pull {:#?} Failed >> {:#?}", remote, stderr);
            return Err(ControlError::command_failed(
                format!("adb pull {}", remote),
                stderr.to_string(),
            ));
        }
        info!("Pull {} To {} Success", remote, local_str);
        Ok(())
    }

    /// 推送本机文件到设备
    pub fn push(&self, local: &Path, remote: &str) -> ControlResult<()> {
        ctl_ensure!(
            local.exists(),
            ControlError::invalid_input(format!("Local File Not Found: {}", local.display()))
        );
        let local_str = local
            .to_str()
            .ok_or_else(|| ControlError::invalid_input("Local Path Is Not Valid UTF-8"))?;
        let output = self.exec(&["push", local_str, remote])?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || stderr.to_lowercase().contains("error") {
            return Err(ControlError::command_failed(
                format!("adb push {}", local_str),
                stderr.to_string(),
            ));
        }
        info!("Push {} To {} Success", local_str, remote);
        Ok(())
    }

    /// 安装APK，来源可以是本地路径或 http(s) 链接。
    ///
    /// # 参数
    /// - `path_or_url`: APK的本地路径或下载地址。
    ///
    /// # 返回值
    /// 安装输出中缺少 `Success` 时视为失败。
    pub fn install(&self, path_or_url: &str) -> ControlResult<()> {
        let tmpdir = tempfile::tempdir()?;
        let target_path = if path_or_url.starts_with("http://")
            || path_or_url.starts_with("https://")
        {
            let mut resp =
                reqwest::blocking::get(path_or_url).map_err(ControlError::from_display)?;
            let mut buffer = Vec::new();
            resp.read_to_end(&mut buffer)
                .map_err(ControlError::from_display)?;
            let temp_apk = tmpdir.path().join("tmp001.apk");
            let mut fd = File::create(&temp_apk)?;
            fd.write_all(&buffer)?;
            fd.flush()?;
            info!(
                "Save Http/s File <{:#?}> => dst: <{:#?}>",
                &path_or_url, &temp_apk
            );
            temp_apk
        } else {
            Path::new(path_or_url).to_path_buf()
        };
        ctl_ensure!(
            target_path.exists(),
            ControlError::invalid_input(format!("Apk File Not Found: {}", target_path.display()))
        );
        let target_str = target_path
            .to_str()
            .ok_or_else(|| ControlError::invalid_input("Apk Path Is Not Valid UTF-8"))?;
        let output = self.adb_output(&["install", "-r", target_str])?;
        if !output.contains("Success") {
            return Err(ControlError::command_failed(
                format!("adb install -r {}", target_str),
                output,
            ));
        }
        info!("Install Apk Success >> <{:#?}>", &path_or_url);
        Ok(())
    }

    pub fn uninstall(&self, package_name: &str) -> ControlResult<()> {
        let output = self.adb_output(&["uninstall", package_name])?;
        if !output.contains("Success") {
            return Err(ControlError::command_failed(
                format!("adb uninstall {}", package_name),
                output,
            ));
        }
        Ok(())
    }

    /// 列出已安装包名，可选大小写不敏感过滤
    pub fn list_packages(&self, filter: Option<&str>) -> ControlResult<Vec<String>> {
        let output = self.shell(&["pm", "list", "packages"])?;
        let mut packages = vec![];
        for line in output.lines() {
            if let Some(package) = line.strip_prefix("package:") {
                let package = package.trim();
                match filter {
                    Some(f) if !package.to_lowercase().contains(&f.to_lowercase()) => {}
                    _ => packages.push(package.to_string()),
                }
            }
        }
        Ok(packages)
    }

    /// 查询应用的版本、安装路径与声明权限。
    ///
    /// # 返回值
    /// 包未安装时返回None。
    pub fn app_info(&self, package_name: &str) -> ControlResult<Option<AppInfo>> {
        let installed = self.list_packages(None)?;
        if !installed.iter().any(|p| p == package_name) {
            return Ok(None);
        }
        let mut app_info = AppInfo::new(package_name);

        let dump = self.shell(&["dumpsys", "package", package_name])?;
        if let Some(cap) = VERSION_NAME_RE.captures(&dump) {
            app_info.version_name = Some(cap.get(1).unwrap().as_str().to_string());
        }
        let mut permissions = vec![];
        for cap in PERMISSION_RE.captures_iter(&dump) {
            let permission = cap.get(1).unwrap().as_str().to_string();
            if !permissions.contains(&permission) {
                permissions.push(permission);
            }
        }
        permissions.sort();
        app_info.permissions = permissions;

        let path_output = self.shell(&["pm", "path", package_name])?;
        if let Some(cap) = PACKAGE_PATH_RE.captures(&path_output) {
            app_info.path = Some(cap.get(1).unwrap().as_str().trim().to_string());
        }
        Ok(Some(app_info))
    }

    pub fn app_start(&self, package_name: &str) -> ControlResult<String> {
        self.shell(&[
            "monkey",
            "-p",
            package_name,
            "-c",
            "android.intent.category.LAUNCHER",
            "1",
        ])
    }

    pub fn app_stop(&self, package_name: &str) -> ControlResult<String> {
        self.shell(&["am", "force-stop", package_name])
    }

    pub fn clear_app_data(&self, package_name: &str) -> ControlResult<()> {
        let output = self.shell(&["pm", "clear", package_name])?;
        if !output.contains("Success") {
            return Err(ControlError::command_failed(
                format!("pm clear {}", package_name),
                output,
            ));
        }
        Ok(())
    }

    /// 发送文本输入，空格按adb input的约定替换为 `%s`
    pub fn send_text(&self, text: &str) -> ControlResult<String> {
        let escaped = text.replace(' ', "%s");
        self.shell(&["input", "text", &escaped])
    }

    pub fn keyevent(&self, keycode: &str) -> ControlResult<String> {
        self.shell(&["input", "keyevent", keycode])
    }

    pub fn tap(&self, x: i32, y: i32) -> ControlResult<String> {
        self.shell(&["input", "tap", &x.to_string(), &y.to_string()])
    }

    pub fn swipe(
        &self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        duration_ms: i32,
    ) -> ControlResult<String> {
        self.shell(&[
            "input",
            "swipe",
            &x1.to_string(),
            &y1.to_string(),
            &x2.to_string(),
            &y2.to_string(),
            &duration_ms.to_string(),
        ])
    }

    /// 读取最近若干行logcat（`-d` 一次性转储）
    pub fn logcat(&self, lines: u32, filter: Option<&str>) -> ControlResult<String> {
        let lines_str = lines.to_string();
        let mut args = vec!["logcat", "-d", "-T", lines_str.as_str()];
        if let Some(filter) = filter {
            args.push(filter);
        }
        self.shell(&args)
    }

    /// 重启设备，可选进入 recovery / bootloader 模式
    pub fn reboot(&self, mode: Option<&str>) -> ControlResult<()> {
        match mode {
            Some(mode) => self.adb_output(&["reboot", mode])?,
            None => self.adb_output(&["reboot"])?,
        };
        info!("Reboot Command Sent To {:#?}", &self.serial);
        Ok(())
    }
}

/// dumpsys battery 状态码对照表
fn battery_status_name(code: i32) -> &'static str {
    match code {
        2 => "Charging",
        3 => "Discharging",
        4 => "Not charging",
        5 => "Full",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_status_name() {
        assert_eq!(battery_status_name(2), "Charging");
        assert_eq!(battery_status_name(5), "Full");
        assert_eq!(battery_status_name(-1), "Unknown");
        assert_eq!(battery_status_name(42), "Unknown");
    }

    #[test]
    fn test_getprop_regex() {
        let line = "[ro.product.model]: [Pixel 7]";
        let cap = GETPROP_RE.captures(line).unwrap();
        assert_eq!(cap.get(1).unwrap().as_str(), "ro.product.model");
        assert_eq!(cap.get(2).unwrap().as_str(), "Pixel 7");
    }

    #[test]
    fn test_battery_regexes() {
        let dump =
            "Current Battery Service state:\n  AC powered: false\n  level: 87\n  status: 3\n";
        let cap = BATTERY_LEVEL_RE.captures(dump).unwrap();
        assert_eq!(cap.get(1).unwrap().as_str(), "87");
        let cap = BATTERY_STATUS_RE.captures(dump).unwrap();
        assert_eq!(cap.get(1).unwrap().as_str(), "3");
    }

    #[test]
    fn test_screen_size_regex() {
        let output = "Physical size: 1080x2400\n";
        let cap = SCREEN_SIZE_RE.captures(output).unwrap();
        assert_eq!(cap.get(1).unwrap().as_str(), "1080x2400");
    }
}
