use crate::config::toml_config::{MonitoringConfig, TestkitConfig};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "rsdroid-testkit")]
#[command(about = "Stage test fixtures and run backend disposal leak probes")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Resource root containing the `assets/` directory
    #[arg(long)]
    pub assets_dir: Option<String>,

    /// Directory under which scratch directories are created
    #[arg(long)]
    pub cache_dir: Option<String>,

    /// Enable system monitoring (CPU, memory, descriptors)
    #[arg(long)]
    pub monitor: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Copy one asset into its scratch directory and print the path
    Stage {
        name: String,
    },
    /// Open, query and close the backend repeatedly
    ProbeDisposal {
        #[command(flatten)]
        probe: ProbeArgs,
    },
    /// Stage the asset repeatedly without opening the backend
    ProbeStaging {
        #[command(flatten)]
        probe: ProbeArgs,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct ProbeArgs {
    #[arg(long)]
    pub asset: Option<String>,

    #[arg(long)]
    pub iterations: Option<usize>,

    /// Scalar query issued on every disposal iteration
    #[arg(long)]
    pub query: Option<String>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CliConfig {
    /// Loads the configuration file (if any) and applies command line overrides.
    pub fn resolve(&self) -> Result<TestkitConfig> {
        let mut config = match &self.config {
            Some(path) => TestkitConfig::from_file(path)?,
            None => TestkitConfig::default(),
        };

        if let Some(dir) = &self.assets_dir {
            config.fixtures.assets_dir = dir.clone();
        }
        if let Some(dir) = &self.cache_dir {
            config.fixtures.cache_dir = dir.clone();
        }
        if self.monitor {
            let log_level = config.monitoring.take().and_then(|m| m.log_level);
            config.monitoring = Some(MonitoringConfig {
                enabled: true,
                log_level,
            });
        }

        if let Command::ProbeDisposal { probe } | Command::ProbeStaging { probe } = &self.command {
            if let Some(asset) = &probe.asset {
                config.probe.asset = Some(asset.clone());
            }
            if let Some(iterations) = probe.iterations {
                config.probe.iterations = Some(iterations);
            }
            if let Some(query) = &probe.query {
                config.probe.query = Some(query.clone());
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = CliConfig::parse_from([
            "rsdroid-testkit",
            "--cache-dir",
            "/tmp/cache",
            "--monitor",
            "probe-disposal",
            "--iterations",
            "7",
            "--asset",
            "other.anki2",
        ]);

        let config = cli.resolve().unwrap();

        assert_eq!(config.fixtures.cache_dir, "/tmp/cache");
        assert!(config.monitoring_enabled());
        let probe = config.probe_settings();
        assert_eq!(probe.iterations, 7);
        assert_eq!(probe.asset, "other.anki2");
    }

    #[test]
    fn stage_subcommand_takes_a_name() {
        let cli = CliConfig::parse_from(["rsdroid-testkit", "stage", "collection.anki2"]);
        assert!(matches!(cli.command, Command::Stage { ref name } if name == "collection.anki2"));
    }
}
