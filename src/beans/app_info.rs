#[derive(Debug, PartialEq, Ord, PartialOrd, Eq)]
pub struct AppInfo {
    pub package_name: String,
    pub version_name: Option<String>,
    pub path: Option<String>,
    pub permissions: Vec<String>,
}

impl AppInfo {
    pub fn new(package_name: &str) -> AppInfo {
        Self {
            package_name: package_name.to_string(),
            version_name: None,
            path: None,
            permissions: vec![],
        }
    }
}
