use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    pub data: Option<String>,
    pub timeout: Option<u64>,
    pub page_size: Option<usize>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub export: Option<String>,
    pub no_color: Option<bool>,
    pub yoe_policy: Option<String>,
    pub require_mapped_role: Option<bool>,
    pub overflow_bucket: Option<bool>,
    pub last_updated: Option<bool>,
    pub last_updated_url: Option<String>,
    pub search: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub role: Option<String>,
    /// "MIN-MAX", years
    pub yoe: Option<String>,
    /// "MIN-MAX", lakhs
    #[serde(alias = "total")]
    pub salary: Option<String>,
    #[serde(alias = "include_interview_exp")]
    pub with_interview_exp: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".compboard").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

pub fn default_config_yaml() -> String {
    r#"# compboard config
#
# Location (default):
#   ~/.compboard/config.yml

# Data source: a local JSON file or an http(s) URL serving the offers array
data: ./data/parsed_comps.json
timeout: 10

# Output (optional)
# output: ./dashboard.json
# output_format: json
# export: ./comparison.json
page_size: 10
no_color: false

# Validation
# truthy: yoe 0 is rejected; numeric: any number is accepted
yoe_policy: truthy
require_mapped_role: true

# Charts
# Add a "200+" histogram bucket instead of dropping totals above the last bucket
overflow_bucket: false

# "Last updated" lookup against the data repository's commit history
last_updated: false
# last_updated_url: https://api.github.com/repos/kuutsav/leetcode-compensation/commits?sha=master&path=data&per_page=1

# Initial filters
# search: ""
# company: ""
# location: ""
# role: ""
# yoe: "0-30"
# salary: "1-200"
# with_interview_exp: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses() {
        let cfg: ConfigFile = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(cfg.page_size, Some(10));
        assert_eq!(cfg.yoe_policy.as_deref(), Some("truthy"));
        assert_eq!(cfg.require_mapped_role, Some(true));
        assert_eq!(cfg.salary, None);
    }

    #[test]
    fn missing_file_is_allowed_only_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yml");
        assert_eq!(load_config(&path, true).unwrap(), ConfigFile::default());
        assert!(load_config(&path, false).unwrap_err().contains("not found"));
    }

    #[test]
    fn ensure_default_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        ensure_default_config_file(&path).unwrap();
        std::fs::write(&path, "page_size: 25\nsalary: \"10-50\"\n").unwrap();
        ensure_default_config_file(&path).unwrap();
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.page_size, Some(25));
        assert_eq!(cfg.salary.as_deref(), Some("10-50"));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "page_size: [").unwrap();
        assert!(load_config(&path, false).unwrap_err().contains("failed to parse"));
    }
}
