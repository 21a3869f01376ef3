use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::io::Write;
use std::path::PathBuf;

use vmlaunch_inventory::design_loader;
use vmlaunch_inventory::orchestrator::{compile_and_render, generate_inventory, OutputFormat};

/// Compiles a VM launch design into an Ansible inventory
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the design document (YAML export of the design workbook)
    #[arg(short, long)]
    design: PathBuf,

    /// Output path for the generated inventory
    #[arg(short, long, default_value = "inventory.yml")]
    output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Print the inventory to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Starting inventory generation");
    info!("Design file: {:?}", args.design);

    let summary = if args.stdout {
        let design = design_loader::load_design(&args.design)?;
        let (rendered, summary) = compile_and_render(&design, args.format)?;
        std::io::stdout()
            .write_all(rendered.as_bytes())
            .wrap_err("Failed to write inventory to stdout")?;
        summary
    } else {
        info!("Output file: {:?}", args.output);
        generate_inventory(&args.design, &args.output, args.format)?
    };

    info!(
        "Inventory generation completed: {} VMs on {} hosts across {} groups",
        summary.vms, summary.hosts, summary.groups
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["vmlaunch-inventory", "--design", "design.yaml"]);

        assert_eq!(args.design, PathBuf::from("design.yaml"));
        assert_eq!(args.output, PathBuf::from("inventory.yml"));
        assert_eq!(args.format, OutputFormat::Yaml);
        assert!(!args.stdout);
        assert!(!args.verbose);
    }

    #[test]
    fn test_format_and_verbose_args() {
        let args = Args::parse_from([
            "vmlaunch-inventory",
            "-d",
            "design.yaml",
            "-o",
            "out/inventory.json",
            "--format",
            "json",
            "-v",
        ]);

        assert_eq!(args.output, PathBuf::from("out/inventory.json"));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.verbose);
    }

    #[test]
    fn test_stdout_conflicts_with_output() {
        let result = Args::try_parse_from([
            "vmlaunch-inventory",
            "--design",
            "design.yaml",
            "--output",
            "inventory.yml",
            "--stdout",
        ]);
        assert!(result.is_err());
    }
}
