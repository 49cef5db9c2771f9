use crate::beans::{BatchSummary, ExecutionResult};
use crate::client::registry;
use crate::errors::{ControlError, ControlResult};
use crate::utils::maestro_path;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process::Command;

/// 批量执行器：持有流文件目录与可选的目标设备。
///
/// 会话状态（当前设备、当前目录）全部显式存放在这里，由调用方传递，
/// 不存在任何全局隐式状态。执行器本身在多次调用之间不积累状态。
#[derive(Debug, Clone)]
pub struct BatchRunner {
    flow_dir: PathBuf,
    device: Option<String>,
}

impl BatchRunner {
    pub fn new<P: Into<PathBuf>>(flow_dir: P) -> BatchRunner {
        BatchRunner {
            flow_dir: flow_dir.into(),
            device: None,
        }
    }

    /// 指定目标设备序列号，后续执行追加 `--device <serial>`
    pub fn with_device(mut self, serial: &str) -> BatchRunner {
        self.device = Some(serial.to_string());
        self
    }

    pub fn flow_dir(&self) -> &Path {
        &self.flow_dir
    }

    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    /// 执行单个流文件。
    ///
    /// # 参数
    /// - `flow_path`: 流文件路径。
    ///
    /// # 返回值
    /// 测试失败（非零退出码）记录在结果里而不是作为错误抛出；
    /// maestro缺失返回ToolUnavailable，流文件缺失返回FlowNotFound。
    pub fn run_one(&self, flow_path: &Path) -> ControlResult<ExecutionResult> {
        if !flow_path.exists() {
            return Err(ControlError::flow_not_found(
                flow_path.display().to_string(),
            ));
        }
        let maestro = maestro_path()?;
        let mut cmd = Command::new(maestro);
        cmd.arg("test");
        if let Some(device) = &self.device {
            cmd.arg("--device");
            cmd.arg(device);
        }
        cmd.arg(flow_path);
        info!("{:?}", &cmd);
        let output = cmd.output().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ControlError::tool_unavailable("maestro"),
            _ => ControlError::Io(e),
        })?;

        let flow_name = flow_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| flow_path.display().to_string());
        let passed = output.status.success();
        if passed {
            info!("Maestro Flow Passed >> {:#?}", &flow_name);
        } else {
            error!(
                "Maestro Flow Failed >> {:#?}, Exit Status {:#?}",
                &flow_name, &output.status
            );
        }
        Ok(ExecutionResult::new(
            &flow_name,
            self.device.as_deref(),
            passed,
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
        ))
    }

    /// 顺序执行流目录下的全部 `*.yaml` 文件。
    ///
    /// # 返回值
    /// 各流的通过/失败汇总。单个流失败不会中断批次，空目录返回零计数。
    pub fn run_all(&self) -> ControlResult<BatchSummary> {
        let mut summary = BatchSummary::default();
        for entry in std::fs::read_dir(&self.flow_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().map_or(false, |ext| ext == "yaml") {
                let result = self.run_one(&path)?;
                summary.record(result);
            }
        }
        info!(
            "Batch Finished >> {} Passed, {} Failed",
            summary.passed, summary.failed
        );
        Ok(summary)
    }

    /// 以maestro自带的并发模式执行整个流目录。
    ///
    /// # 参数
    /// - `device_count`: 期望并发的设备数，超出已连接数量时收缩到实际数量。
    ///
    /// # 返回值
    /// maestro单次调用的聚合结果；没有任何已连接设备时返回NoDevices。
    /// 并发完全委托给外部工具（`-c` 标志），本进程不做任何线程调度。
    pub fn run_parallel(&self, device_count: usize) -> ControlResult<ExecutionResult> {
        let connected = registry::connected_devices()?;
        if connected.is_empty() {
            return Err(ControlError::NoDevices);
        }
        let shards = device_count.clamp(1, connected.len());
        if shards < device_count {
            warn!(
                "Requested {} Devices But Only {} Connected, Clamp To {}",
                device_count,
                connected.len(),
                shards
            );
        }
        let maestro = maestro_path()?;
        let mut cmd = Command::new(maestro);
        cmd.arg("test");
        cmd.arg("-c");
        cmd.arg(shards.to_string());
        cmd.arg(&self.flow_dir);
        info!("{:?}", &cmd);
        let output = cmd.output().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ControlError::tool_unavailable("maestro"),
            _ => ControlError::Io(e),
        })?;

        let dir_name = self.flow_dir.display().to_string();
        let passed = output.status.success();
        if passed {
            info!("Parallel Batch Passed >> {:#?}", &dir_name);
        } else {
            error!("Parallel Batch Failed >> {:#?}", &dir_name);
        }
        Ok(ExecutionResult::new(
            &dir_name,
            None,
            passed,
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
        ))
    }
}
