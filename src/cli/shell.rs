// The interactive shell: read a line, run it against the ledger, then re-check the chain
// I keep the reader and writer generic so the whole loop can be driven from tests

use crate::cli::commands::{ShellCommand, ShellLine};
use crate::config::Config;
use crate::core::{Ledger, Transaction};
use crate::error::Result;
use clap::Parser;
use log::error;
use std::io::{BufRead, Write};

/// What the shell should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub fn print_chain<W: Write>(ledger: &Ledger, out: &mut W, json: bool) -> Result<()> {
    for block in ledger.list_blocks() {
        let label = if block.is_genesis() {
            "Genesis Block".to_string()
        } else {
            format!("Block {}", block.get_index())
        };
        writeln!(out, "{label} (Hash: {}):", block.hash())?;
        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(block)?)?;
        } else {
            writeln!(out, "  previous: {}", block.get_previous_hash())?;
            writeln!(out, "  proof: {}", block.get_proof())?;
            for tx in block.get_transactions() {
                writeln!(out, "  - {tx}")?;
            }
        }
        writeln!(out)?;
    }
    writeln!(out, "{}", "-".repeat(40))?;
    Ok(())
}

pub fn execute<W: Write>(
    ledger: &mut Ledger,
    config: &Config,
    command: ShellCommand,
    out: &mut W,
) -> Result<Flow> {
    match command {
        ShellCommand::Send { to, amount, from } => {
            let sender = from.unwrap_or_else(|| config.owner.clone());
            match ledger.submit_transaction(&sender, &to, amount) {
                Ok(()) => writeln!(
                    out,
                    "Transaction added. Pending: {}. Mine a block to confirm it.",
                    ledger.pending_transactions().len()
                )?,
                Err(e) => writeln!(out, "Transaction rejected: {e}")?,
            }
        }
        ShellCommand::Mine { miner } => {
            let miner = miner.unwrap_or_else(|| config.owner.clone());
            match ledger.mine(&miner, config.mining_reward) {
                Ok(block) => writeln!(
                    out,
                    "Mined block {} ({}), {} rewarded {}",
                    block.get_index(),
                    block.hash(),
                    miner,
                    config.mining_reward
                )?,
                Err(e) => writeln!(out, "Mining failed: {e}")?,
            }
        }
        ShellCommand::Print { json } => print_chain(ledger, out, json)?,
        ShellCommand::Tamper { index } => {
            match ledger.tamper(index, vec![Transaction::new("Hacker", "Evil", 9999)]) {
                Ok(()) => writeln!(out, "Block {index} manipulated")?,
                Err(e) => writeln!(out, "Cannot manipulate: {e}")?,
            }
        }
        ShellCommand::Participants => {
            let participants: Vec<String> = ledger.participants().into_iter().collect();
            writeln!(out, "Participants: {}", participants.join(", "))?;
        }
        ShellCommand::Balance { participant } => {
            let details = ledger.balance_details(&participant);
            writeln!(
                out,
                "{participant}: balance {} (received {}, sent {})",
                details.balance, details.received, details.sent
            )?;
        }
        ShellCommand::VerifyPending => {
            if ledger.verify_pending_transactions() {
                writeln!(out, "All pending transactions are valid")?;
            } else {
                writeln!(out, "Some pending transactions are invalid")?;
            }
        }
        ShellCommand::Verify => match ledger.validate_report() {
            Ok(()) => writeln!(out, "Chain integrity OK")?,
            Err(violation) => writeln!(out, "Chain integrity compromised: {violation}")?,
        },
        ShellCommand::Exit => {
            print_chain(ledger, out, false)?;
            return Ok(Flow::Exit);
        }
    }
    Ok(Flow::Continue)
}

/// Run commands from `input` until `exit`, end of input, or a broken chain
pub fn run_shell<R: BufRead, W: Write>(
    ledger: &mut Ledger,
    config: &Config,
    input: R,
    out: &mut W,
) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            write!(out, "> ")?;
            out.flush()?;
            continue;
        }

        match ShellLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => {
                if execute(ledger, config, parsed.command, out)? == Flow::Exit {
                    return Ok(());
                }
            }
            Err(e) => writeln!(out, "{e}")?,
        }

        // Stop as soon as history is broken
        if let Err(violation) = ledger.validate_report() {
            print_chain(ledger, out, false)?;
            error!("Chain integrity compromised: {violation}");
            writeln!(out, "Chain integrity compromised! Exiting...")?;
            return Ok(());
        }

        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}

/// Scripted walk through submit, mine, balances, validation, and tamper detection
pub fn run_demo<W: Write>(ledger: &mut Ledger, config: &Config, out: &mut W) -> Result<()> {
    let owner = config.owner.as_str();
    let reward = config.mining_reward;

    execute(ledger, config, ShellCommand::Mine { miner: None }, out)?;
    let amount = reward / 2;
    if amount > 0 {
        execute(
            ledger,
            config,
            ShellCommand::Send {
                to: "B".to_string(),
                amount,
                from: None,
            },
            out,
        )?;
    }
    execute(
        ledger,
        config,
        ShellCommand::Mine {
            miner: Some("M".to_string()),
        },
        out,
    )?;

    for participant in [owner, "B", "M"] {
        execute(
            ledger,
            config,
            ShellCommand::Balance {
                participant: participant.to_string(),
            },
            out,
        )?;
    }
    execute(ledger, config, ShellCommand::Verify, out)?;
    execute(ledger, config, ShellCommand::Tamper { index: 1 }, out)?;
    execute(ledger, config, ShellCommand::Verify, out)?;
    Ok(())
}
