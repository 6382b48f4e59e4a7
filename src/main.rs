// This is my entry point for the ledger CLI
// All the real work happens in the library; here I only wire config, logging and I/O together
use architect_ledger::{run_demo, run_shell, Command, Config, Ledger, Opt};
use clap::Parser;
use log::{error, LevelFilter};
use std::io;
use std::process;

fn main() {
    // Info level shows each block as it is mined without drowning the shell
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    // Defaults, then the config file, then LEDGER_* variables, then flags
    let mut config = Config::load(opt.config.as_deref())?;
    opt.apply_overrides(&mut config);
    config.validate()?;

    let mut ledger = Ledger::from_config(&config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match opt.command {
        Command::Shell => {
            println!(
                "Ledger ready (difficulty {}, reward {}, owner {}). Type 'help' for commands.",
                config.difficulty, config.mining_reward, config.owner
            );
            run_shell(&mut ledger, &config, io::stdin().lock(), &mut out)?;
            println!("User left");
        }
        Command::Demo => run_demo(&mut ledger, &config, &mut out)?,
    }
    Ok(())
}
