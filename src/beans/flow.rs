use crate::beans::action::Action;
use crate::errors::{ControlError, ControlResult};
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// 一条Maestro流：目标应用标识加上有序的动作列表。
///
/// 构造时即要求appId，因此序列化结果永远带有文件头。
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    app_id: String,
    actions: Vec<Action>,
}

impl Flow {
    pub fn new<S: Into<String>>(app_id: S) -> Flow {
        Flow {
            app_id: app_id.into(),
            actions: Vec::new(),
        }
    }

    /// 追加一个动作并返回更新后的流。
    ///
    /// # 参数
    /// - `action`: 要追加的动作。
    ///
    /// # 返回值
    /// 返回持有新动作的流，原值被消耗，不存在共享可变状态。
    pub fn with_action(mut self, action: Action) -> Flow {
        self.actions.push(action);
        self
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// 按Maestro期望的语法序列化整条流。
    ///
    /// 文件头 `appId: <id>`，分隔线 `---`，随后按插入顺序逐条写出动作。
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("appId: {}\n", self.app_id));
        out.push_str("---\n");
        for action in &self.actions {
            action.serialize_into(&mut out, 0);
        }
        out
    }

    /// 将流写入目标文件。
    ///
    /// # 参数
    /// - `path`: 目标文件路径。
    ///
    /// # 返回值
    /// 成功时返回空结果；appId含换行等破坏语法的字符时返回InvalidInput，
    /// 权限或路径问题返回IO错误。文件句柄在所有退出路径上都会关闭。
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> ControlResult<()> {
        if self.app_id.contains('\n') || self.app_id.contains('\r') {
            return Err(ControlError::invalid_input(
                "App Id Must Not Contain Line Breaks",
            ));
        }
        let path = path.as_ref();
        let mut file = File::create(path)?;
        file.write_all(self.serialize().as_bytes())?;
        file.flush()?;
        info!("Write Flow For {:#?} To {:#?}", &self.app_id, path);
        Ok(())
    }
}
