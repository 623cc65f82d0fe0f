use clap::Parser;
use rsdroid_testkit::config::{Command, ProbeArgs};
use rsdroid_testkit::utils::logger;
use rsdroid_testkit::utils::validation::{validate_log_level, Validate};
use rsdroid_testkit::{
    CliConfig, DirAssets, FixtureError, FixtureStager, LeakProbe, ProbeReport, SqliteBackend,
    TestkitConfig,
};

fn main() {
    let cli = CliConfig::parse();

    // resolved before logging starts so the configured level applies; an
    // invalid level is reported by validation below
    let config = cli.resolve();
    let log_level = config
        .as_ref()
        .ok()
        .and_then(|c| c.log_level())
        .filter(|level| validate_log_level("monitoring.log_level", level).is_ok());

    if cli.log_json {
        logger::init_json_logger(cli.verbose, log_level);
    } else {
        logger::init_cli_logger(cli.verbose, log_level);
    }

    tracing::info!("Starting rsdroid-testkit");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.and_then(|config| run(&cli, &config)) {
        tracing::error!(
            "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }
}

fn run(cli: &CliConfig, config: &TestkitConfig) -> Result<(), FixtureError> {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e);
    }

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let stager = FixtureStager::new(DirAssets::new(config.assets_dir()), config.cache_dir())
        .with_retry_policy(config.retry_policy());

    match &cli.command {
        Command::Stage { name } => {
            let (path, stats) = stager.stage(name)?;
            tracing::info!(
                "📁 Staged {} ({} bytes, {}KB/s)",
                name,
                stats.bytes,
                stats.speed_kb_per_sec
            );
            println!("{}", path.display());
        }
        Command::ProbeDisposal { probe } => {
            let report = LeakProbe::new(&stager, config.probe_settings())
                .with_monitoring(monitor_enabled)
                .run_disposal::<SqliteBackend>()?;
            print_report(&report, probe)?;
        }
        Command::ProbeStaging { probe } => {
            let report = LeakProbe::new(&stager, config.probe_settings())
                .with_monitoring(monitor_enabled)
                .run_staging()?;
            print_report(&report, probe)?;
        }
    }

    Ok(())
}

fn print_report(report: &ProbeReport, args: &ProbeArgs) -> Result<(), FixtureError> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("📋 Probe Summary:");
    println!("  Kind: {:?}", report.kind);
    println!("  Asset: {}", report.asset);
    println!(
        "  Iterations: {}/{}",
        report.iterations_completed, report.iterations_requested
    );
    if let Some(value) = report.last_scalar {
        println!("  Last query result: {}", value);
    }
    match report.fd_growth() {
        Some(growth) => println!(
            "  Open descriptors: {:?} -> {:?} ({:+})",
            report.fds_before, report.fds_after, growth
        ),
        None => println!("  Open descriptors: unavailable on this platform"),
    }
    if let Some(peak) = report.peak_memory_mb {
        println!("  Peak memory: {}MB", peak);
    }
    println!("  Elapsed: {}ms", report.elapsed_ms);
    Ok(())
}
