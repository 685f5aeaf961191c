use std::fs;
use std::path::{Path, PathBuf};

use crate::core::RawProfile;
use crate::error::PlannerError;

use super::ProfileSource;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(ConfigFormat::Json),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }
}

/// Profile read from a JSON or YAML file, chosen by extension.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProfileSource for ConfigFile {
    fn read_profile(&mut self) -> Result<RawProfile, PlannerError> {
        let contents = fs::read_to_string(&self.path)?;
        let raw = parse_config(&self.path, &contents)?;
        log::info!(
            "loaded profile from {} ({} children)",
            self.path.display(),
            raw.children.len()
        );
        Ok(raw)
    }
}

/// Parses config text; `path` only selects the format.
pub fn parse_config(path: &Path, contents: &str) -> Result<RawProfile, PlannerError> {
    match ConfigFormat::from_path(path) {
        Some(ConfigFormat::Json) => Ok(serde_json::from_str(contents)?),
        Some(ConfigFormat::Yaml) => Ok(serde_yaml::from_str(contents)?),
        None => Err(PlannerError::UnsupportedConfigFormat(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validate_profile;

    const YAML: &str = "\
current_age: 35
retirement_age: 60
life_expectancy: 90
current_corpus: 5000000
pre_retirement_return: 10
post_retirement_return: 7
inflation: 6
monthly_expenses: 50000
children:
  - current_age: 5
    school_fee: 100000
    school_fee_increase: 10
    fee_increase_frequency: 2
    graduation_fee: 1000000
    marriage_cost: 2000000
    marriage_age: 28
";

    #[test]
    fn yaml_and_json_configs_validate_to_the_same_plan() {
        let from_yaml = parse_config(Path::new("plan.YML"), YAML).expect("yaml should parse");

        let json = r#"{
          "current_age": 35, "retirement_age": 60, "life_expectancy": 90,
          "current_corpus": 5000000, "pre_retirement_return": 10,
          "post_retirement_return": 7, "inflation": 6, "monthly_expenses": 50000,
          "children": [{
            "current_age": 5, "school_fee": 100000, "school_fee_increase": 10,
            "fee_increase_frequency": 2, "graduation_fee": 1000000,
            "marriage_cost": 2000000, "marriage_age": 28
          }]
        }"#;
        let from_json = parse_config(Path::new("plan.json"), json).expect("json should parse");

        let yaml_plan = validate_profile(&from_yaml).expect("valid yaml profile");
        let json_plan = validate_profile(&from_json).expect("valid json profile");
        assert_eq!(yaml_plan, json_plan);
        assert_eq!(yaml_plan.children[0].marriage_age, 28);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = parse_config(Path::new("plan.toml"), "").expect_err("must reject");
        assert!(matches!(err, PlannerError::UnsupportedConfigFormat(_)));
        assert!(err.to_string().contains("plan.toml"));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = parse_config(Path::new("plan.json"), "{ not json").expect_err("must reject");
        assert!(matches!(err, PlannerError::Json(_)));
    }

    #[test]
    fn reads_profile_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "retirement-planner-config-{}.yaml",
            std::process::id()
        ));
        fs::write(&path, YAML).expect("write temp config");

        let raw = ConfigFile::new(&path).read_profile();
        let _ = fs::remove_file(&path);

        let raw = raw.expect("config should load");
        assert_eq!(raw.current_age, Some(35));
        assert_eq!(raw.children.len(), 1);
    }
}
