use clap::{Parser, Subcommand};
use phiscan::config::{initialize_config_file, load_config, Config};
use phiscan::core::assembler::{egress_analysis, model_safety, static_analysis};
use phiscan::core::context::ScanContext;
use phiscan::core::engine::ScanEngine;
use phiscan::core::registry::DetectorRegistry;
use phiscan::core::version;
use phiscan::output;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "phiscan")]
#[command(about = "PHI Static Analysis and Egress Audit Tool for Healthcare Codebases")]
#[command(version = version())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Init,
    Scan {
        #[arg(short, long)]
        scope: Option<Vec<PathBuf>>,

        /// Scan mode: static, egress, or model-safety
        #[arg(short, long, default_value = "static")]
        mode: String,

        #[arg(long)]
        min_severity: Option<String>,

        #[arg(short, long)]
        format: Option<String>,

        #[arg(short, long, value_name = "REPORT_FILE_NAME")]
        output: Option<PathBuf>,

        #[arg(short, long, value_name = "PATH_TO_CONFIG")]
        config: Option<PathBuf>,

        #[arg(long, value_name = "DETECTOR_ID")]
        exclude_detector: Option<Vec<String>>,
    },
    Detectors {
        #[arg(short, long)]
        severity: Option<String>,

        #[arg(short, long)]
        details: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => match initialize_config_file(None) {
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error during initialization: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Scan {
            scope,
            mode,
            min_severity,
            format,
            output,
            config,
            exclude_detector,
        } => {
            let config = load_config(scope, min_severity, format, exclude_detector, config);
            run_scan(&config, &mode, output);
        }

        Commands::Detectors { severity, details } => {
            let registry = DetectorRegistry::with_built_ins();

            if let Some(detector_id) = details {
                if let Some(detector) = registry.get(&detector_id) {
                    println!("{}", detector);
                } else {
                    eprintln!("Error: Detector with ID '{}' not found.", detector_id);
                }
                return;
            }

            let detectors = if let Some(sev_str) = &severity {
                match sev_str.parse() {
                    Ok(sev) => {
                        println!("\nAvailable detectors filtered by severity: {}", sev);
                        registry.get_by_severity(&sev)
                    }
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        eprintln!("Acceptable values: critical, warning, info");
                        std::process::exit(1);
                    }
                }
            } else {
                println!("\nAvailable detectors (Total: {}):", registry.count());
                registry.get_all()
            };

            if detectors.is_empty() {
                println!("No detectors found");
            } else {
                for detector in detectors {
                    println!(
                        "({}) - {}: {}",
                        detector.severity, detector.id, detector.name,
                    );
                }
            }
        }
    }
}

fn run_scan(config: &Config, mode: &str, output_path: Option<PathBuf>) {
    let scope = if config.scope.is_empty() {
        vec![PathBuf::from("src")]
    } else {
        config.scope.clone()
    };

    let mut context = ScanContext::new();
    if let Err(e) = context.load_files(&scope, &config.exclude) {
        eprintln!("Error loading files: {}", e);
        std::process::exit(1);
    }

    if context.files.is_empty() {
        eprintln!("No scannable files found in scope.");
        std::process::exit(1);
    }

    println!("Scanning {} files", context.files.len());

    let project: BTreeMap<String, String> = context
        .files
        .iter()
        .map(|f| (f.path_display(), f.content.clone()))
        .collect();

    match mode {
        "static" | "egress" => {
            let engine = ScanEngine::new(config);
            let mut report = if mode == "static" {
                static_analysis(&engine, &project)
            } else {
                egress_analysis(&engine, &project)
            };

            report = report
                .with_comment("This analysis was performed with the phiscan PHI Static Analysis Tool.")
                .with_footnote(
                    "Note: Pattern-based detection is heuristic. Findings require human review \
                     and do not constitute compliance certification.",
                );
            let total_findings = report.issues_found;
            report.add_metadata("Version:", version());
            report.add_metadata(
                "Timestamp:",
                &chrono::Utc::now().format("%d/%m/%Y %H:%M:%S").to_string(),
            );
            report.add_metadata("Total Findings:", &total_findings.to_string());

            if let Err(e) = output::generate_report(&report, &config.format, output_path) {
                eprintln!("Error generating report: {}", e);
                std::process::exit(1);
            }
        }
        "model-safety" => {
            let grade = model_safety(&project);
            match serde_json::to_string_pretty(&grade) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error generating report: {}", e);
                    std::process::exit(1);
                }
            }
        }
        other => {
            eprintln!("Error: Invalid scan mode '{}'.", other);
            eprintln!("Acceptable values: static, egress, model-safety");
            std::process::exit(1);
        }
    }
}
