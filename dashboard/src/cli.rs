//! # Command Line
//!
//! Argument parsing for the `dashboard` binary. Field values stay as text; the
//! flows validate them against the latest on-chain state.

use crate::flows::{ReceiverKind, VoteEntry};
use thiserror::Error;

pub const USAGE: &str = "\
Usage: dashboard <command> [args]

Commands:
  watch [address]                        Poll continuously and print cards until Ctrl-C
  snapshot [address] [--json]            Poll once and print cards
  deposit <amount> [receiver]            Approve if needed, then deposit PENDLE
  request-redemption <shares> [epoch]    Queue shares for redemption
  claim <shares>                         Claim available redemption
  claim-fees <total-wei> <proof>         Claim accrued fees with a merkle proof
  bridge <selector> <amount> [receiver]  Bridge shares over CCIP
  vote <pool=weight>...                  Cast governance votes
  set-fee-receiver <address>
  set-lp-fee-receiver <address>
  help";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument <{0}>")]
    MissingArgument(&'static str),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Invalid vote entry '{0}', expected pool=weight")]
    InvalidVote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Watch { account: Option<String> },
    Snapshot { account: Option<String>, json: bool },
    Deposit { amount: String, receiver: Option<String> },
    RequestRedemption { shares: String, epoch: Option<String> },
    Claim { shares: String },
    ClaimFees { total_accrued: String, proof: String },
    Bridge { chain_selector: String, amount: String, receiver: Option<String> },
    Vote { entries: Vec<VoteEntry> },
    SetReceiver { kind: ReceiverKind, receiver: String },
    Help,
}

impl Command {
    /// Parse arguments after the program name. No arguments means `watch`.
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = Args(args.into_iter().map(Into::into).collect::<Vec<_>>().into_iter());
        let Some(name) = args.0.next() else {
            return Ok(Command::Watch { account: None });
        };

        let command = match name.as_str() {
            "watch" => Command::Watch { account: args.optional() },
            "snapshot" => {
                let mut account = None;
                let mut json = false;
                for arg in args.0.by_ref() {
                    if arg == "--json" {
                        json = true;
                    } else if account.is_none() {
                        account = Some(arg);
                    } else {
                        return Err(CliError::UnexpectedArgument(arg));
                    }
                }
                Command::Snapshot { account, json }
            }
            "deposit" => Command::Deposit {
                amount: args.required("amount")?,
                receiver: args.optional(),
            },
            "request-redemption" => Command::RequestRedemption {
                shares: args.required("shares")?,
                epoch: args.optional(),
            },
            "claim" => Command::Claim { shares: args.required("shares")? },
            "claim-fees" => Command::ClaimFees {
                total_accrued: args.required("total-wei")?,
                proof: args.required("proof")?,
            },
            "bridge" => Command::Bridge {
                chain_selector: args.required("selector")?,
                amount: args.required("amount")?,
                receiver: args.optional(),
            },
            "vote" => {
                let entries = args
                    .0
                    .by_ref()
                    .map(|text| VoteEntry::parse(&text).ok_or(CliError::InvalidVote(text)))
                    .collect::<Result<Vec<_>, _>>()?;
                if entries.is_empty() {
                    return Err(CliError::MissingArgument("pool=weight"));
                }
                Command::Vote { entries }
            }
            "set-fee-receiver" => Command::SetReceiver {
                kind: ReceiverKind::Fee,
                receiver: args.required("address")?,
            },
            "set-lp-fee-receiver" => Command::SetReceiver {
                kind: ReceiverKind::LpFee,
                receiver: args.required("address")?,
            },
            "help" | "-h" | "--help" => Command::Help,
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };

        match args.0.next() {
            Some(extra) => Err(CliError::UnexpectedArgument(extra)),
            None => Ok(command),
        }
    }

    /// Whether the command sends a transaction.
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Command::Watch { .. } | Command::Snapshot { .. } | Command::Help
        )
    }
}

struct Args(std::vec::IntoIter<String>);

impl Args {
    fn required(&mut self, name: &'static str) -> Result<String, CliError> {
        self.0.next().ok_or(CliError::MissingArgument(name))
    }

    fn optional(&mut self) -> Option<String> {
        self.0.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_watch() {
        let args: [&str; 0] = [];
        assert_eq!(Command::parse(args), Ok(Command::Watch { account: None }));
    }

    #[test]
    fn test_write_commands() {
        assert_eq!(
            Command::parse(["deposit", "1.5"]),
            Ok(Command::Deposit {
                amount: "1.5".to_string(),
                receiver: None
            })
        );
        assert_eq!(
            Command::parse(["bridge", "4949039107694359620", "2", "0xabc"]),
            Ok(Command::Bridge {
                chain_selector: "4949039107694359620".to_string(),
                amount: "2".to_string(),
                receiver: Some("0xabc".to_string()),
            })
        );
        assert!(Command::parse(["claim", "1"]).unwrap().is_write());
        assert!(!Command::parse(["snapshot"]).unwrap().is_write());
    }

    #[test]
    fn test_snapshot_flags() {
        assert_eq!(
            Command::parse(["snapshot", "--json", "0xabc"]),
            Ok(Command::Snapshot {
                account: Some("0xabc".to_string()),
                json: true
            })
        );
        assert_eq!(
            Command::parse(["snapshot", "0xabc", "0xdef"]),
            Err(CliError::UnexpectedArgument("0xdef".to_string()))
        );
    }

    #[test]
    fn test_vote_entries() {
        let command = Command::parse(["vote", "0x1=10", "0x2=20"]).unwrap();
        assert_eq!(
            command,
            Command::Vote {
                entries: vec![VoteEntry::new("0x1", "10"), VoteEntry::new("0x2", "20")]
            }
        );
        assert_eq!(
            Command::parse(["vote", "0x1"]),
            Err(CliError::InvalidVote("0x1".to_string()))
        );
        assert_eq!(
            Command::parse(["vote"]),
            Err(CliError::MissingArgument("pool=weight"))
        );
    }

    #[test]
    fn test_argument_errors() {
        assert_eq!(
            Command::parse(["claim-fees", "100"]),
            Err(CliError::MissingArgument("proof"))
        );
        assert_eq!(
            Command::parse(["claim", "1", "2"]),
            Err(CliError::UnexpectedArgument("2".to_string()))
        );
        assert_eq!(
            Command::parse(["mint"]),
            Err(CliError::UnknownCommand("mint".to_string()))
        );
    }
}
