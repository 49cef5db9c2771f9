pub mod adb_device;
pub mod batch_runner;
pub mod registry;

pub use adb_device::AdbDevice;
pub use batch_runner::BatchRunner;
pub use registry::{connected_devices, list_devices, select_device};
