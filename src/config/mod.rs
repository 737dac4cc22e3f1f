use crate::core::engine::RiskThresholds;
use crate::models::Severity;
use crate::output::ReportFormat;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_CONTENT: &str = r#"# phiscan.toml

# Paths to include in the scan.
# If omitted, it defaults to ["src"]
# scope = ["src"]

# Paths to exclude from the scan.
# These can be directories (including subdirectories) or specific files.
# If omitted, it defaults to ["node_modules", "dist"]
# exclude = ["node_modules", "dist", "build"]

# Minimum severity level of PHI detectors to *run* during a scan.
# Only detectors with this severity or higher will be executed.
# Options: "critical", "warning", "info" (case-insensitive)
# If omitted, it defaults to "info" (run all detectors).
# min_severity = "info"

# Output format for the report.
# Options: "json", "md" (or "markdown"), "sarif"
# If omitted, it defaults to "md".
# output_format = "md"

# Explicitly exclude specific PHI detectors by ID.
# Run `phiscan detectors` to see all available detector IDs.
# exclude_detectors = ["phone-number", "email"]

# Additional hostnames to trust as compliant egress targets, on top of
# the built-in allow-list. Entries starting with "*." trust any
# subdomain of the suffix. Entries can never remove built-in domains.
# trusted_domains = ["api.internal.example", "*.myhospital.org"]

# Risk classification thresholds.
# Defaults preserve the standard classification: 3 or more sensitive
# data categories near an untrusted call is high risk, 1-2 is medium,
# and a model safety score below 80 draws a recommendation.
[thresholds]
# high_risk_categories = 3
# safety_score_threshold = 80
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scope: Vec<PathBuf>,
    #[serde(default = "default_exclude")]
    pub exclude: Vec<PathBuf>,
    #[serde(default)]
    pub min_severity: Severity,
    #[serde(default, rename = "output_format")]
    pub format: ReportFormat,
    #[serde(default)]
    pub exclude_detectors: Vec<String>,
    #[serde(default)]
    pub trusted_domains: Vec<String>,
    #[serde(default)]
    pub thresholds: RiskThresholds,
}

fn default_exclude() -> Vec<PathBuf> {
    vec![PathBuf::from("node_modules"), PathBuf::from("dist")]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scope: Vec::new(),
            exclude: default_exclude(),
            min_severity: Severity::default(),
            format: ReportFormat::default(),
            exclude_detectors: Vec::new(),
            trusted_domains: Vec::new(),
            thresholds: RiskThresholds::default(),
        }
    }
}

pub fn load_config(
    scope: Option<Vec<PathBuf>>,
    min_severity: Option<String>,
    format: Option<String>,
    exclude_detectors: Option<Vec<String>>,
    config_path: Option<PathBuf>,
) -> Config {
    let default_path = PathBuf::from("phiscan.toml");
    let config_path = config_path.unwrap_or(default_path);

    let config = if !config_path.exists() {
        Config::default()
    } else {
        let content = match fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!(
                    "Error reading config file '{}': {}",
                    config_path.display(),
                    e
                );
                std::process::exit(1);
            }
        };
        match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Error parsing config file '{}': {}",
                    config_path.display(),
                    e
                );
                std::process::exit(1);
            }
        }
    };

    // CLI detector exclusions extend the config file list.
    let final_exclude_detectors = {
        let mut from_config = config.exclude_detectors.clone();
        if let Some(cli_exclusions) = exclude_detectors {
            from_config.extend(cli_exclusions);
        }
        from_config
    };

    Config {
        scope: scope.unwrap_or(config.scope),
        exclude: config.exclude.clone(),
        min_severity: min_severity.map_or(config.min_severity, |s| {
            s.parse().unwrap_or_else(|e| {
                eprintln!("Warning: {}. Using default severity.", e);
                Severity::default()
            })
        }),
        format: format.map_or(config.format, |s| {
            s.parse().unwrap_or_else(|e| {
                eprintln!("Warning: {}. Using default format.", e);
                ReportFormat::default()
            })
        }),
        exclude_detectors: final_exclude_detectors,
        trusted_domains: config.trusted_domains,
        thresholds: config.thresholds,
    }
}

pub fn initialize_config_file(config_path_override: Option<&Path>) -> Result<(), String> {
    let default_path = Path::new("phiscan.toml");
    let config_path = config_path_override.unwrap_or(default_path);

    if config_path.exists() {
        println!("INFO: '{}' already exists.", config_path.display());
        Ok(())
    } else {
        println!(
            "Creating default config file at '{}'",
            config_path.display()
        );
        match fs::File::create(config_path) {
            Ok(mut file) => match file.write_all(DEFAULT_CONFIG_CONTENT.as_bytes()) {
                Ok(_) => {
                    println!(
                        "SUCCESS: Created default '{}' configuration file.",
                        config_path.display()
                    );
                    Ok(())
                }
                Err(e) => Err(format!(
                    "Error writing to '{}': {}",
                    config_path.display(),
                    e
                )),
            },
            Err(e) => Err(format!("Error creating '{}': {}", config_path.display(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_content_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_CONTENT).unwrap();
        assert!(config.scope.is_empty());
        assert_eq!(config.min_severity, Severity::Info);
        assert_eq!(config.thresholds.high_risk_categories, 3);
        assert_eq!(config.thresholds.safety_score_threshold, 80);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            min_severity = "critical"
            trusted_domains = ["*.myhospital.org"]

            [thresholds]
            high_risk_categories = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.min_severity, Severity::Critical);
        assert_eq!(config.trusted_domains, vec!["*.myhospital.org"]);
        assert_eq!(config.thresholds.high_risk_categories, 2);
        assert_eq!(config.thresholds.safety_score_threshold, 80);
        assert_eq!(config.exclude, default_exclude());
    }
}
