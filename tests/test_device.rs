#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rnexus::{AdbDevice, DeviceState};

// 环境变量是进程级的，串行化所有改动它的测试。
static ENV_LOCK: Mutex<()> = Mutex::new(());

// pull时创建目标文件，get-state/getprop返回固定输出，其余一律成功。
fn fake_adb(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let body = "#!/bin/sh\n\
for last; do :; done\n\
case \"$*\" in\n\
  *\" pull \"*) : > \"$last\"; echo \"1 file pulled\" ;;\n\
  *\" get-state\"*) echo \"device\" ;;\n\
  *\" shell getprop\"*) printf '[ro.product.model]: [Pixel 7]\\n[ro.build.version.sdk]: [33]\\n' ;;\n\
  *) echo \"ok\" ;;\n\
esac\n\
exit 0\n";
    let path = dir.join("adb");
    std::fs::write(&path, body).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[test]
fn test_record_screen_pulls_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("RNEXUS_ADB_PATH", fake_adb(dir.path()));
    let device = AdbDevice::new("emulator-5554");
    let target = dir.path().join("clip.mp4");
    let result = device.record_screen(5, &target);
    std::env::remove_var("RNEXUS_ADB_PATH");
    result.unwrap();
    assert!(target.exists());
}

#[test]
fn test_record_screen_rejects_bad_duration() {
    let device = AdbDevice::new("emulator-5554");
    let err = device
        .record_screen(0, Path::new("/tmp/clip.mp4"))
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
    let err = device
        .record_screen(181, Path::new("/tmp/clip.mp4"))
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
}

#[test]
fn test_device_info_fills_properties() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("RNEXUS_ADB_PATH", fake_adb(dir.path()));
    let info = AdbDevice::new("emulator-5554").device_info();
    std::env::remove_var("RNEXUS_ADB_PATH");
    let info = info.unwrap();
    assert_eq!(info.serial, "emulator-5554");
    assert_eq!(info.state, DeviceState::Device);
    assert_eq!(
        info.properties.get("ro.product.model").map(String::as_str),
        Some("Pixel 7")
    );
    assert_eq!(
        info.properties
            .get("ro.build.version.sdk")
            .map(String::as_str),
        Some("33")
    );
}
