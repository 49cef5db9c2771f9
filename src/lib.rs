pub mod beans;
pub mod client;
pub mod errors;
pub mod utils;

pub use beans::{
    Action, AdbDeviceInfo, AppInfo, BatchSummary, DeviceState, ExecutionResult, Flow, Locator,
};
pub use client::{connected_devices, list_devices, select_device, AdbDevice, BatchRunner};
pub use errors::{ControlError, ControlResult};
pub use utils::{adb_path, maestro_path};
