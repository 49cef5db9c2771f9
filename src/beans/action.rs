/// UI元素定位方式：文本、元素ID或屏幕坐标
#[derive(Debug, Clone, PartialEq)]
pub enum Locator {
    Text(String),
    Id(String),
    Point(i32, i32),
}

impl Locator {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Locator::Text(text.into())
    }

    pub fn id<S: Into<String>>(id: S) -> Self {
        Locator::Id(id.into())
    }

    pub fn point(x: i32, y: i32) -> Self {
        Locator::Point(x, y)
    }

    /// 以 `text:` / `id:` / `point:` 映射形式写出定位字段
    pub(crate) fn write_fields(&self, out: &mut String, indent: usize) {
        let pad = " ".repeat(indent);
        match self {
            Locator::Text(text) => {
                out.push_str(&format!("{}text: {}\n", pad, yaml_quote(text)));
            }
            Locator::Id(id) => {
                out.push_str(&format!("{}id: {}\n", pad, yaml_quote(id)));
            }
            Locator::Point(x, y) => {
                out.push_str(&format!("{}point: \"{},{}\"\n", pad, x, y));
            }
        }
    }
}

/// Maestro流中的单个UI步骤。
///
/// 封闭枚举：新增动作种类时编译器会强制补全序列化分支。
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LaunchApp,
    TapOn(Locator),
    InputText {
        text: String,
        id: Option<String>,
    },
    Swipe {
        start: (i32, i32),
        end: (i32, i32),
    },
    Wait(f64),
    PressBack,
    AssertVisible(Locator),
    If {
        visible: Locator,
        then_actions: Vec<Action>,
        else_actions: Vec<Action>,
    },
    RunFlow {
        when_visible: Option<Locator>,
        commands: Vec<Action>,
    },
    RunScript(String),
    TakeScreenshot(String),
}

impl Action {
    /// 将单个动作序列化到输出缓冲区。
    ///
    /// # 参数
    /// - `out`: 输出缓冲区。
    /// - `indent`: 当前列表项 `- ` 前的空格数，嵌套动作逐层加深。
    pub(crate) fn serialize_into(&self, out: &mut String, indent: usize) {
        let pad = " ".repeat(indent);
        match self {
            Action::LaunchApp => {
                out.push_str(&format!("{}- launchApp\n", pad));
            }
            Action::TapOn(locator) => {
                out.push_str(&format!("{}- tapOn:\n", pad));
                locator.write_fields(out, indent + 4);
            }
            Action::InputText { text, id } => {
                out.push_str(&format!("{}- inputText:\n", pad));
                out.push_str(&format!("{}    text: {}\n", pad, yaml_quote(text)));
                if let Some(id) = id {
                    out.push_str(&format!("{}    id: {}\n", pad, yaml_quote(id)));
                }
            }
            Action::Swipe { start, end } => {
                out.push_str(&format!("{}- swipe:\n", pad));
                out.push_str(&format!("{}    start: \"{},{}\"\n", pad, start.0, start.1));
                out.push_str(&format!("{}    end: \"{},{}\"\n", pad, end.0, end.1));
            }
            Action::Wait(seconds) => {
                out.push_str(&format!("{}- wait: {}\n", pad, format_seconds(*seconds)));
            }
            Action::PressBack => {
                out.push_str(&format!("{}- pressBack\n", pad));
            }
            Action::AssertVisible(locator) => {
                out.push_str(&format!("{}- assertVisible:\n", pad));
                locator.write_fields(out, indent + 4);
            }
            Action::If {
                visible,
                then_actions,
                else_actions,
            } => {
                out.push_str(&format!("{}- if:\n", pad));
                write_condition(out, visible, indent + 4);
                out.push_str(&format!("{}  then:\n", pad));
                for action in then_actions {
                    action.serialize_into(out, indent + 4);
                }
                if !else_actions.is_empty() {
                    out.push_str(&format!("{}  else:\n", pad));
                    for action in else_actions {
                        action.serialize_into(out, indent + 4);
                    }
                }
            }
            Action::RunFlow {
                when_visible,
                commands,
            } => {
                out.push_str(&format!("{}- runFlow:\n", pad));
                if let Some(locator) = when_visible {
                    out.push_str(&format!("{}    when:\n", pad));
                    write_condition(out, locator, indent + 8);
                }
                out.push_str(&format!("{}    commands:\n", pad));
                for action in commands {
                    action.serialize_into(out, indent + 8);
                }
            }
            Action::RunScript(file) => {
                out.push_str(&format!("{}- runScript: {}\n", pad, yaml_quote(file)));
            }
            Action::TakeScreenshot(name) => {
                out.push_str(&format!("{}- takeScreenshot: {}\n", pad, yaml_quote(name)));
            }
        }
    }
}

/// 写出 `visible:` 条件。文本定位内联引用，其余以嵌套映射展开。
fn write_condition(out: &mut String, locator: &Locator, indent: usize) {
    let pad = " ".repeat(indent);
    match locator {
        Locator::Text(text) => {
            out.push_str(&format!("{}visible: {}\n", pad, yaml_quote(text)));
        }
        other => {
            out.push_str(&format!("{}visible:\n", pad));
            other.write_fields(out, indent + 4);
        }
    }
}

/// 等待秒数按裸数字输出，整数值不带小数点
fn format_seconds(seconds: f64) -> String {
    if seconds.fract() == 0.0 && seconds.is_finite() {
        format!("{}", seconds as i64)
    } else {
        format!("{}", seconds)
    }
}

/// 带引号的YAML标量，转义反斜杠与双引号
pub(crate) fn yaml_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' {
            quoted.push_str("\\\"");
        } else if c == '\\' {
            quoted.push_str("\\\\");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('"');
    quoted
}
