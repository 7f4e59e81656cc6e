use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use zinc_machines::registry::{self, MachineConfig};
use zinc_machines::rom_loader::RomImage;

mod config;

use config::{DumpConfig, RunnerConfig};

#[derive(Parser, Debug)]
#[command(name = "zinc", version, about = "Headless Z80 machine runner")]
struct Args {
    /// Program image to boot (overrides `program` in the config file)
    program: Option<PathBuf>,

    /// Machine to run (see --list)
    #[arg(long, short)]
    machine: Option<String>,

    /// Config file (defaults to <config dir>/zinc/runner.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "BYTES")]
    page_size: Option<usize>,

    #[arg(long, value_name = "HZ")]
    clock_hz: Option<u64>,

    #[arg(long, value_name = "HZ")]
    frame_hz: Option<u64>,

    /// Stop after this many frames (0 = until the CPU halts with interrupts off)
    #[arg(long)]
    max_frames: Option<u64>,

    /// Write the whole address space to this file when the run ends
    #[arg(long, value_name = "PATH")]
    dump: Option<PathBuf>,

    /// Log filter (tracing-subscriber EnvFilter syntax); RUST_LOG otherwise
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,

    /// List the registered machines and exit
    #[arg(long, action = clap::ArgAction::SetTrue)]
    list: bool,
}

fn init_logging(filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match filter {
        Some(f) => EnvFilter::try_new(f)
            .with_context(|| format!("invalid log filter {f:?}"))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// CLI flags take precedence over the config file.
fn apply_overrides(config: &mut RunnerConfig, args: &Args) {
    if let Some(machine) = &args.machine {
        config.machine = machine.clone();
    }
    if let Some(program) = &args.program {
        config.program = Some(program.clone());
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(clock_hz) = args.clock_hz {
        config.clock_hz = clock_hz;
    }
    if let Some(frame_hz) = args.frame_hz {
        config.frame_hz = frame_hz;
    }
    if let Some(max_frames) = args.max_frames {
        config.max_frames = max_frames;
    }
    if let Some(path) = &args.dump {
        config.dump = Some(DumpConfig {
            address: 0,
            length: 0x10000,
            path: path.clone(),
        });
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    if args.list {
        for entry in registry::all() {
            println!("{:<12} {}", entry.name, entry.description);
        }
        return Ok(());
    }

    let mut config = RunnerConfig::load(args.config.as_deref())?;
    apply_overrides(&mut config, &args);
    config.validate()?;
    debug!(?config, "effective configuration");

    let Some(entry) = registry::find(&config.machine) else {
        let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
        let machine = &config.machine;
        let available = names.join(", ");
        bail!("unknown machine {machine:?} (available: {available})");
    };

    let program = match &config.program {
        Some(path) => {
            let image = RomImage::from_file(path)
                .with_context(|| format!("loading program {}", path.display()))?;
            image.verify(config.program_crc32)?;
            Some(image)
        }
        None => None,
    };

    let machine_config = MachineConfig {
        page_size: config.page_size,
        frame_cycles: config.frame_cycles(),
        program,
    };
    let mut machine = (entry.create)(&machine_config)
        .with_context(|| format!("creating machine {}", entry.name))?;
    machine.reset();
    let frame_cycles = machine_config.frame_cycles;
    info!(machine = entry.name, frame_cycles, "starting");

    let mut frames = 0u64;
    while config.max_frames == 0 || frames < config.max_frames {
        machine.run_frame();
        frames += 1;
        let cpu = machine.cpu();
        if cpu.halted && !cpu.iff1 {
            info!(frames, pc = cpu.regs.get_pc(), "halted, interrupts off");
            break;
        }
    }
    info!(frames, cycles = machine.cycles(), "run finished");

    if let Some(dump) = &config.dump {
        machine
            .cpu()
            .mem
            .dump_to_file(dump.address, dump.length, &dump.path)
            .with_context(|| format!("writing memory dump {}", dump.path.display()))?;
    }

    let mut stdout = std::io::stdout().lock();
    machine.dump(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}
