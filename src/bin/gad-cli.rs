use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::PathBuf;

use gadmanager_lib::config::AppConfig;
use gadmanager_lib::horcm::{HorcmGenerator, LunEntry, VspParams};
use gadmanager_lib::pair_engine::predicates::{holds_latest_data, legal_operations};
use gadmanager_lib::pair_engine::types::{AccessMode, PairStatus, StorageSide};
use gadmanager_lib::pair_engine::EXAMPLE_PAIRDISPLAY;
use gadmanager_lib::progress::CopyState;
use gadmanager_lib::PairManager;

#[derive(Parser)]
#[command(name = "gad-cli")]
#[command(about = "GAD pair status, command generation and HORCM config CLI", long_about = None)]
struct Cli {
    /// Pairdisplay dump file (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the expected pairdisplay output format and exit
    #[arg(long)]
    show_example: bool,

    /// Emit the parsed snapshot as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Pair index from the status table
    #[arg(short, long)]
    pair: Option<usize>,

    /// Operation to generate the command for
    /// (split_left, split_right, swap_left_to_right, swap_right_to_left, resync)
    #[arg(short, long)]
    operation: Option<String>,

    /// Record a copy-progress sample, PAIR_ID=PERCENT (repeatable)
    #[arg(long = "progress", value_name = "PAIR_ID=PERCENT")]
    progress: Vec<String>,

    /// HORCM configuration generator mode
    #[arg(long)]
    horcm: bool,

    #[arg(long)]
    server_ip: Option<String>,

    #[arg(long)]
    vsp1_serial: Option<String>,

    #[arg(long)]
    vsp1_ip: Option<String>,

    #[arg(long)]
    vsp2_serial: Option<String>,

    #[arg(long)]
    vsp2_ip: Option<String>,

    /// LUN entry as GROUP,NAME,LDEV (repeatable)
    #[arg(long = "lun", value_name = "GROUP,NAME,LDEV")]
    luns: Vec<String>,

    /// Directory to save horcm10.conf / horcm20.conf into
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.show_example {
        println!("Example of the expected pairdisplay output format:");
        println!();
        println!("{EXAMPLE_PAIRDISPLAY}");
        return Ok(());
    }

    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    if cli.horcm {
        return run_horcm(&cli, &config);
    }

    if !cli.progress.is_empty() {
        return run_progress(&cli, &config);
    }

    let raw = read_dump(&cli)?;
    let mut manager = PairManager::new(&config);

    match manager.refresh_from_dump(&raw) {
        Ok(count) => println!("✅ Parsed {count} pair(s)"),
        Err(e) => {
            eprintln!("❌ Failed to analyze output: {e}");
            std::process::exit(1);
        }
    }

    if let Some(operation) = &cli.operation {
        let index = cli
            .pair
            .ok_or_else(|| anyhow::anyhow!("Missing required argument: --pair"))?;
        let pair = manager
            .pair(index)
            .ok_or_else(|| anyhow::anyhow!("No pair with index {index} (parsed {})", manager.pairs().len()))?;

        println!();
        println!("📋 Command for '{operation}' on {}:", pair.pair_id());
        println!();
        println!("{}", manager.command_for_operation(pair, operation));
        return Ok(());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(manager.pairs())?);
        return Ok(());
    }

    print_status_table(&manager);
    Ok(())
}

fn read_dump(cli: &Cli) -> anyhow::Result<String> {
    match &cli.input {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Input file does not exist: {path:?}");
            }
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

fn print_status_table(manager: &PairManager) {
    for (index, pair) in manager.pairs().iter().enumerate() {
        println!();
        println!("🔗 [{index}] {} - {}", pair.group, pair.name);
        print_side("L", &pair.left);
        print_side("R", &pair.right);

        let ops = legal_operations(pair);
        if ops.is_empty() {
            println!("   Actions: (none)");
        } else {
            println!("   Actions: {}", ops.join(", "));
        }
    }
}

fn print_side(label: &str, side: &StorageSide) {
    let marker = if holds_latest_data(side) {
        // A PAIR side (or an error-suspended blocked side) is in sync with
        // its peer rather than ahead of it.
        if side.status == PairStatus::Pair
            || (side.status == PairStatus::Psue && side.rw_status == AccessMode::Blocked)
        {
            "✓ Synced Data"
        } else {
            "✓ Latest Data"
        }
    } else {
        ""
    };

    println!(
        "   {label} VSP ({serial})  LDEV: {ldev:<6} {role:<5} {status:<4} {rw:<3} {instance:<6} {marker}",
        serial = side.serial_number,
        ldev = side.ldev_number,
        role = side.role,
        status = side.status,
        rw = side.rw_status,
        instance = side.instance,
    );
}

fn run_progress(cli: &Cli, config: &AppConfig) -> anyhow::Result<()> {
    let mut manager = PairManager::new(config);

    let mut pair_ids = Vec::new();
    for sample in &cli.progress {
        let (pair_id, percent) = sample
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Invalid progress sample '{sample}', expected PAIR_ID=PERCENT"))?;
        let percent: u8 = percent
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid percent in '{sample}'"))?;
        manager.record_progress(pair_id, percent)?;
        pair_ids.push(pair_id.to_string());
    }

    println!("📊 Copy progress:");
    for pair_id in &pair_ids {
        let status = manager.copy_status(pair_id);

        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("   {prefix:<28} [{bar:40.cyan/blue}] {pos:>3}/100")?
                .progress_chars("#>-"),
        );
        pb.set_prefix(pair_id.clone());
        pb.set_position(u64::from(status.percent));
        pb.abandon();

        let state = match status.state {
            CopyState::Unknown => "UNKNOWN",
            CopyState::Copying => "COPYING",
            CopyState::Completed => "COMPLETED",
        };
        let estimate = status
            .estimated_end
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        println!("   {pair_id:<28} {state:<10} ETA: {estimate}");
    }

    Ok(())
}

fn run_horcm(cli: &Cli, config: &AppConfig) -> anyhow::Result<()> {
    let server_ip = cli
        .server_ip
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Missing required argument: --server-ip"))?;
    let vsp1 = VspParams {
        serial: required(&cli.vsp1_serial, "--vsp1-serial")?,
        ip: required(&cli.vsp1_ip, "--vsp1-ip")?,
    };
    let vsp2 = VspParams {
        serial: required(&cli.vsp2_serial, "--vsp2-serial")?,
        ip: required(&cli.vsp2_ip, "--vsp2-ip")?,
    };

    let mut luns = Vec::new();
    for entry in &cli.luns {
        let fields: Vec<&str> = entry.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            anyhow::bail!("Invalid LUN entry '{entry}', expected GROUP,NAME,LDEV");
        }
        luns.push(LunEntry {
            group: fields[0].to_string(),
            name: fields[1].to_string(),
            ldev: fields[2].to_string(),
        });
    }

    let generator = HorcmGenerator::new(config.horcm.clone());
    generator.validate_inputs(server_ip, &vsp1, &vsp2, &luns)?;

    println!("=== horcm10.conf ===");
    println!("{}", generator.generate_primary(server_ip, &vsp1, &luns));
    println!();
    println!("=== horcm20.conf ===");
    println!("{}", generator.generate_secondary(server_ip, &vsp2, &luns));

    if let Some(dir) = &cli.out {
        let (primary, secondary) = generator.save(dir, server_ip, &vsp1, &vsp2, &luns)?;
        println!();
        println!("✅ Configuration files saved:");
        println!("   {}", primary.display());
        println!("   {}", secondary.display());
    }

    Ok(())
}

fn required(value: &Option<String>, flag: &str) -> anyhow::Result<String> {
    value
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Missing required argument: {flag}"))
}
