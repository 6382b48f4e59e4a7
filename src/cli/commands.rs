use crate::config::Config;
use crate::core::Amount;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "architect-ledger")]
pub struct Opt {
    #[arg(long, global = true, help = "TOML file with ledger settings")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Leading hex zeros required of a block hash")]
    pub difficulty: Option<u32>,
    #[arg(long, global = true, help = "Amount paid to the miner of each block")]
    pub reward: Option<Amount>,
    #[arg(long, global = true, help = "Default miner and sender")]
    pub owner: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

impl Opt {
    /// Command-line flags take precedence over file and environment
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(reward) = self.reward {
            config.mining_reward = reward;
        }
        if let Some(owner) = &self.owner {
            config.owner = owner.clone();
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "shell", about = "Start the interactive ledger shell")]
    Shell,
    #[command(name = "demo", about = "Run a scripted send, mine, and tamper scenario")]
    Demo,
}

/// One line typed at the shell prompt
#[derive(Debug, Parser)]
#[command(name = "ledger", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    #[command(name = "send", about = "Add a new transaction to the pool")]
    Send {
        #[arg(help = "Recipient")]
        to: String,
        #[arg(help = "Amount to send")]
        amount: Amount,
        #[arg(long, help = "Sender (defaults to the owner)")]
        from: Option<String>,
    },
    #[command(name = "mine", about = "Mine pending transactions into a block")]
    Mine {
        #[arg(help = "Miner to reward (defaults to the owner)")]
        miner: Option<String>,
    },
    #[command(name = "print", about = "Print all blocks")]
    Print {
        #[arg(long, help = "Render blocks as JSON")]
        json: bool,
    },
    #[command(name = "tamper", about = "Overwrite a block's transactions to test validation")]
    Tamper {
        #[arg(default_value_t = 1, help = "Block index to manipulate")]
        index: usize,
    },
    #[command(name = "participants", about = "List known participants")]
    Participants,
    #[command(name = "balance", about = "Show a participant's balance")]
    Balance {
        #[arg(help = "Participant name")]
        participant: String,
    },
    #[command(name = "verify-pending", about = "Check every pending transaction")]
    VerifyPending,
    #[command(name = "verify", about = "Validate the entire chain")]
    Verify,
    #[command(name = "exit", about = "Print the chain and leave")]
    Exit,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ShellCommand {
        ShellLine::try_parse_from(line.split_whitespace())
            .unwrap()
            .command
    }

    #[test]
    fn test_parse_send() {
        assert_eq!(
            parse("send bob 50"),
            ShellCommand::Send {
                to: "bob".to_string(),
                amount: 50,
                from: None
            }
        );
        assert_eq!(
            parse("send bob 5 --from alice"),
            ShellCommand::Send {
                to: "bob".to_string(),
                amount: 5,
                from: Some("alice".to_string())
            }
        );
    }

    #[test]
    fn test_negative_amount_is_a_parse_error() {
        assert!(ShellLine::try_parse_from("send bob -5".split_whitespace()).is_err());
    }

    #[test]
    fn test_tamper_defaults_to_first_mined_block() {
        assert_eq!(parse("tamper"), ShellCommand::Tamper { index: 1 });
    }

    #[test]
    fn test_overrides_take_precedence() {
        let opt = Opt::try_parse_from([
            "architect-ledger",
            "demo",
            "--difficulty",
            "2",
            "--owner",
            "zoe",
        ])
        .unwrap();
        let mut config = Config::default();
        opt.apply_overrides(&mut config);

        assert_eq!(config.difficulty, 2);
        assert_eq!(config.owner, "zoe");
        assert_eq!(config.mining_reward, Config::default().mining_reward);
    }
}
