//! Subcommands and their rendered output.

use pico_args::Arguments;
use rand::RngCore;
use serde::Serialize;
use swiss_tournament::{
    PlayerId, RoundPairings, StandingRow, TournamentManager, TournamentResult,
    db::TournamentRepository,
};

/// Argument errors for subcommands
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No command given (see --help)")]
    MissingCommand,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Arguments(#[from] pico_args::Error),
}

/// A single tournament operation requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init,
    Register { name: String },
    Report { winner: PlayerId, loser: PlayerId },
    Standings,
    Pairings,
    Count,
    ResetMatches,
    ResetPlayers,
}

impl Command {
    /// Parse the subcommand and its positional arguments
    ///
    /// Flags must already have been taken out of `args`.
    pub fn parse(args: &mut Arguments) -> Result<Self, CommandError> {
        let name = args.subcommand()?.ok_or(CommandError::MissingCommand)?;

        let command = match name.as_str() {
            "init" => Self::Init,
            "register" => Self::Register {
                name: args.free_from_str()?,
            },
            "report" => Self::Report {
                winner: args.free_from_str()?,
                loser: args.free_from_str()?,
            },
            "standings" => Self::Standings,
            "pairings" => Self::Pairings,
            "count" => Self::Count,
            "reset-matches" => Self::ResetMatches,
            "reset-players" => Self::ResetPlayers,
            _ => return Err(CommandError::UnknownCommand(name)),
        };

        Ok(command)
    }

    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Register { .. } => "register",
            Self::Report { .. } => "report",
            Self::Standings => "standings",
            Self::Pairings => "pairings",
            Self::Count => "count",
            Self::ResetMatches => "reset-matches",
            Self::ResetPlayers => "reset-players",
        }
    }

    /// Run the command against a tournament
    pub async fn execute<R, G>(
        &self,
        manager: &TournamentManager<R, G>,
    ) -> TournamentResult<CommandOutput>
    where
        R: TournamentRepository,
        G: RngCore + Send,
    {
        let output = match self {
            Self::Init => {
                manager.ensure_schema().await?;
                CommandOutput::Done {
                    message: "Schema ready".to_string(),
                }
            }
            Self::Register { name } => {
                let id = manager.register_player(name).await?;
                CommandOutput::Registered { id }
            }
            Self::Report { winner, loser } => {
                manager.report_match(*winner, *loser).await?;
                CommandOutput::Reported {
                    winner: *winner,
                    loser: *loser,
                }
            }
            Self::Standings => CommandOutput::Standings {
                standings: manager.player_standings().await?,
            },
            Self::Pairings => CommandOutput::Round(manager.generate_round().await?),
            Self::Count => CommandOutput::Count {
                players: manager.count_players().await?,
            },
            Self::ResetMatches => {
                manager.reset_matches().await?;
                CommandOutput::Done {
                    message: "All matches deleted".to_string(),
                }
            }
            Self::ResetPlayers => {
                manager.reset_players().await?;
                CommandOutput::Done {
                    message: "All players and matches deleted".to_string(),
                }
            }
        };

        Ok(output)
    }
}

/// Result of a command, printable as text or JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandOutput {
    Done { message: String },
    Registered { id: PlayerId },
    Reported { winner: PlayerId, loser: PlayerId },
    Standings { standings: Vec<StandingRow> },
    Round(RoundPairings),
    Count { players: i64 },
}

impl CommandOutput {
    /// Render for stdout
    pub fn render(&self, json: bool) -> serde_json::Result<String> {
        if json {
            return serde_json::to_string_pretty(self);
        }

        let text = match self {
            Self::Done { message } => message.clone(),
            Self::Registered { id } => format!("Registered player {id}"),
            Self::Reported { winner, loser } => format!("Recorded: {winner} beat {loser}"),
            Self::Count { players } => players.to_string(),
            Self::Standings { standings } => render_standings(standings),
            Self::Round(round) => render_round(round),
        };

        Ok(text)
    }
}

fn render_standings(standings: &[StandingRow]) -> String {
    let mut lines = vec![format!(
        "{:>6}  {:<24} {:>5} {:>7}",
        "ID", "NAME", "WINS", "MATCHES"
    )];
    lines.extend(standings.iter().map(|row| {
        format!(
            "{:>6}  {:<24} {:>5} {:>7}",
            row.id, row.name, row.wins, row.matches
        )
    }));
    lines.join("\n")
}

fn render_round(round: &RoundPairings) -> String {
    let mut lines: Vec<String> = round
        .pairings
        .iter()
        .map(|p| {
            format!(
                "{} ({}) vs {} ({})",
                p.first.name, p.first.id, p.second.name, p.second.id
            )
        })
        .collect();

    if let Some(bye) = &round.bye {
        lines.push(format!("Bye: {} ({})", bye.player.name, bye.player.id));
    }
    if lines.is_empty() {
        lines.push("No pairings".to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{ffi::OsString, sync::Arc};
    use swiss_tournament::{ByeResolver, TournamentError, db::mock::MockTournamentRepository};

    fn args(items: &[&str]) -> Arguments {
        Arguments::from_vec(items.iter().map(OsString::from).collect())
    }

    fn manager() -> TournamentManager<MockTournamentRepository> {
        TournamentManager::with_bye_resolver(
            Arc::new(MockTournamentRepository::new()),
            ByeResolver::seeded(3),
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(&mut args(&["init"])).unwrap(), Command::Init);
        assert_eq!(
            Command::parse(&mut args(&["register", "Twilight Sparkle"])).unwrap(),
            Command::Register {
                name: "Twilight Sparkle".to_string()
            }
        );
        assert_eq!(
            Command::parse(&mut args(&["report", "4", "9"])).unwrap(),
            Command::Report { winner: 4, loser: 9 }
        );
        assert_eq!(
            Command::parse(&mut args(&["reset-players"])).unwrap(),
            Command::ResetPlayers
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Command::parse(&mut args(&[])),
            Err(CommandError::MissingCommand)
        ));
        assert!(matches!(
            Command::parse(&mut args(&["shuffle"])),
            Err(CommandError::UnknownCommand(name)) if name == "shuffle"
        ));
        assert!(matches!(
            Command::parse(&mut args(&["report", "4"])),
            Err(CommandError::Arguments(_))
        ));
        assert!(matches!(
            Command::parse(&mut args(&["report", "four", "9"])),
            Err(CommandError::Arguments(_))
        ));
    }

    #[test]
    fn test_name_matches_parse() {
        for name in [
            "init",
            "standings",
            "pairings",
            "count",
            "reset-matches",
            "reset-players",
        ] {
            assert_eq!(Command::parse(&mut args(&[name])).unwrap().name(), name);
        }
    }

    #[tokio::test]
    async fn test_execute_round_trip() {
        let manager = manager();

        let first = Command::Register {
            name: "Ann".to_string(),
        };
        let second = Command::Register {
            name: "Bob".to_string(),
        };
        assert_eq!(
            first.execute(&manager).await.unwrap(),
            CommandOutput::Registered { id: 1 }
        );
        assert_eq!(
            second.execute(&manager).await.unwrap(),
            CommandOutput::Registered { id: 2 }
        );

        Command::Report { winner: 2, loser: 1 }
            .execute(&manager)
            .await
            .unwrap();

        let output = Command::Standings.execute(&manager).await.unwrap();
        let text = output.render(false).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Bob"));
        assert!(lines[2].contains("Ann"));

        assert_eq!(
            Command::Count.execute(&manager).await.unwrap(),
            CommandOutput::Count { players: 2 }
        );
    }

    #[tokio::test]
    async fn test_execute_rejects_self_play() {
        let manager = manager();
        Command::Register {
            name: "Ann".to_string(),
        }
        .execute(&manager)
        .await
        .unwrap();

        let result = Command::Report { winner: 1, loser: 1 }
            .execute(&manager)
            .await;
        assert!(matches!(result, Err(TournamentError::InvalidMatch { .. })));
    }

    #[tokio::test]
    async fn test_pairings_render_bye() {
        let manager = manager();
        for name in ["Ann", "Bob", "Cid"] {
            Command::Register {
                name: name.to_string(),
            }
            .execute(&manager)
            .await
            .unwrap();
        }

        let output = Command::Pairings.execute(&manager).await.unwrap();
        let text = output.render(false).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains(" vs "));
        assert!(text.lines().last().unwrap().starts_with("Bye: "));

        let json: serde_json::Value = serde_json::from_str(&output.render(true).unwrap()).unwrap();
        assert_eq!(json["result"], "round");
        assert_eq!(json["pairings"].as_array().unwrap().len(), 1);
        assert_eq!(json["bye"]["player"]["wins"], 1);
    }

    #[test]
    fn test_render_json_tagged() {
        let output = CommandOutput::Count { players: 7 };
        let json: serde_json::Value = serde_json::from_str(&output.render(true).unwrap()).unwrap();
        assert_eq!(json["result"], "count");
        assert_eq!(json["players"], 7);
    }

    #[test]
    fn test_render_empty_round() {
        let output = CommandOutput::Round(RoundPairings {
            pairings: Vec::new(),
            bye: None,
        });
        assert_eq!(output.render(false).unwrap(), "No pairings");
    }
}
