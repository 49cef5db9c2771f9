pub(crate) mod action;
pub(crate) mod app_info;
pub(crate) mod device_info;
pub(crate) mod execution;
pub(crate) mod flow;

pub use action::{Action, Locator};
pub use app_info::AppInfo;
pub use device_info::{AdbDeviceInfo, DeviceState};
pub use execution::{BatchSummary, ExecutionResult};
pub use flow::Flow;
