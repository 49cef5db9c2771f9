use chrono::{DateTime, Utc};

/// 单次 (流, 设备) 执行的记录，创建后不可变
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub flow_name: String,
    pub device: Option<String>,
    pub passed: bool,
    pub output: String,
    pub error_output: String,
    pub finished_at: DateTime<Utc>,
}

impl ExecutionResult {
    pub fn new(
        flow_name: &str,
        device: Option<&str>,
        passed: bool,
        output: String,
        error_output: String,
    ) -> ExecutionResult {
        ExecutionResult {
            flow_name: flow_name.to_string(),
            device: device.map(|d| d.to_string()),
            passed,
            output,
            error_output,
            finished_at: Utc::now(),
        }
    }
}

/// 一批执行结果的汇总，由结果推导而来，不做持久化
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub passed: usize,
    pub failed: usize,
    pub failed_flows: Vec<String>,
    pub results: Vec<ExecutionResult>,
}

impl BatchSummary {
    pub fn record(&mut self, result: ExecutionResult) {
        if result.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
            self.failed_flows.push(result.flow_name.clone());
        }
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
