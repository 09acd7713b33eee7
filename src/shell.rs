//! Line-oriented interactive session.
//!
//! Loads one player at a time and keeps their matches in memory so that
//! paging, drill-downs and stats do not refetch.

use std::collections::VecDeque;
use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::app::App;
use crate::calculate::aggregate;
use crate::config::DisplayConfig;
use crate::models::{MatchRecord, PlayerProfile};
use crate::render;

/// How many players the `recent` list remembers.
pub const RECENT_PLAYERS: usize = 5;

pub const HELP: &str = "\
Commands:
  player <nickname>     load a player and their recent matches
  matches               show the current page of matches
  next / prev           page through matches
  stats                 aggregate stats, streaks and K/D trend
  detail <n>            drill into match n from the list
  compare <nickname>    compare the loaded player with another
  lifetime              lifetime stats
  scoreboard <match id> full scoreboard for a match
  recent                recently viewed players
  help                  this text
  quit                  leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Player(String),
    Matches,
    Next,
    Prev,
    Stats,
    Detail(usize),
    Compare(String),
    Lifetime,
    Scoreboard(String),
    Recent,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Ok(None);
        };
        let arg = parts.next();

        let command = match (word.to_lowercase().as_str(), arg) {
            ("player" | "p", Some(nick)) => Command::Player(nick.to_string()),
            ("player" | "p", None) => return Err("usage: player <nickname>".to_string()),
            ("matches" | "m", _) => Command::Matches,
            ("next" | "n", _) => Command::Next,
            ("prev" | "previous", _) => Command::Prev,
            ("stats" | "s", _) => Command::Stats,
            ("detail" | "d", Some(n)) => Command::Detail(
                n.parse()
                    .map_err(|_| format!("not a match number: {}", n))?,
            ),
            ("detail" | "d", None) => return Err("usage: detail <n>".to_string()),
            ("compare" | "c", Some(nick)) => Command::Compare(nick.to_string()),
            ("compare" | "c", None) => return Err("usage: compare <nickname>".to_string()),
            ("lifetime" | "l", _) => Command::Lifetime,
            ("scoreboard" | "sb", Some(id)) => Command::Scoreboard(id.to_string()),
            ("scoreboard" | "sb", None) => return Err("usage: scoreboard <match id>".to_string()),
            ("recent" | "r", _) => Command::Recent,
            ("help" | "h" | "?", _) => Command::Help,
            ("quit" | "q" | "exit", _) => Command::Quit,
            (other, _) => return Err(format!("unknown command: {} (try help)", other)),
        };
        Ok(Some(command))
    }
}

/// Most recently viewed nicknames, newest first, without duplicates.
#[derive(Debug, Default, Clone)]
pub struct RecentPlayers {
    names: VecDeque<String>,
}

impl RecentPlayers {
    pub fn push(&mut self, nickname: &str) {
        self.names.retain(|n| !n.eq_ignore_ascii_case(nickname));
        self.names.push_front(nickname.to_string());
        self.names.truncate(RECENT_PLAYERS);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

struct Loaded {
    profile: PlayerProfile,
    matches: Vec<MatchRecord>,
}

pub struct Session {
    app: App,
    display: DisplayConfig,
    current: Option<Loaded>,
    page: usize,
    recent: RecentPlayers,
}

impl Session {
    pub fn new(app: App, display: DisplayConfig) -> Self {
        Self {
            app,
            display,
            current: None,
            page: 0,
            recent: RecentPlayers::default(),
        }
    }

    fn loaded(&self) -> Result<&Loaded, String> {
        self.current
            .as_ref()
            .ok_or_else(|| "no player loaded (use: player <nickname>)".to_string())
    }

    fn pages(&self) -> usize {
        self.current
            .as_ref()
            .map(|c| render::page_count(c.matches.len(), self.display.matches_per_page))
            .unwrap_or(0)
    }

    fn show_page(&self) -> Result<String, String> {
        let loaded = self.loaded()?;
        Ok(render::match_page(
            &loaded.matches,
            self.page,
            self.display.matches_per_page,
        ))
    }

    /// Run one command and return the text to print.
    pub async fn execute(&mut self, command: Command) -> Result<String, String> {
        debug!("Executing {:?}", command);
        match command {
            Command::Player(nickname) => {
                let summary = self
                    .app
                    .player_summary(&nickname, self.display.max_matches_to_load)
                    .await
                    .map_err(|e| e.to_string())?;
                self.recent.push(&summary.profile.nickname);
                let header = render::profile(&summary.profile, self.app.game());
                self.current = Some(Loaded {
                    profile: summary.profile,
                    matches: summary.matches,
                });
                self.page = 0;
                Ok(format!("{}\n\n{}", header, self.show_page()?))
            }
            Command::Matches => self.show_page(),
            Command::Next => {
                self.loaded()?;
                if self.page + 1 >= self.pages() {
                    return Err("already on the last page".to_string());
                }
                self.page += 1;
                self.show_page()
            }
            Command::Prev => {
                self.loaded()?;
                if self.page == 0 {
                    return Err("already on the first page".to_string());
                }
                self.page -= 1;
                self.show_page()
            }
            Command::Stats => {
                let loaded = self.loaded()?;
                Ok(render::stats(
                    &loaded.profile.nickname,
                    &aggregate(&loaded.matches),
                ))
            }
            Command::Detail(index) => {
                let loaded = self.loaded()?;
                let detail = self
                    .app
                    .match_detail(&loaded.profile.nickname, &loaded.matches, index)
                    .map_err(|e| e.to_string())?;
                Ok(render::match_detail(&detail))
            }
            Command::Compare(other) => {
                let nickname = self.loaded()?.profile.nickname.clone();
                let comparison = self
                    .app
                    .compare(&nickname, &other, self.display.comparison_matches)
                    .await
                    .map_err(|e| e.to_string())?;
                self.recent.push(&comparison.b.profile.nickname);
                Ok(render::comparison(&comparison))
            }
            Command::Lifetime => {
                let loaded = self.loaded()?;
                let stats = self
                    .app
                    .lifetime(&loaded.profile)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(render::lifetime(&loaded.profile.nickname, &stats))
            }
            Command::Scoreboard(match_id) => {
                let board = self
                    .app
                    .scoreboard(&match_id)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(render::scoreboard(&board))
            }
            Command::Recent => {
                if self.recent.is_empty() {
                    return Ok("No recent players".to_string());
                }
                Ok(self
                    .recent
                    .iter()
                    .enumerate()
                    .map(|(i, name)| format!("{}. {}", i + 1, name))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    /// Read commands from stdin until `quit` or end of input.
    pub async fn run(mut self, initial_player: Option<String>) -> std::io::Result<()> {
        if let Some(nickname) = initial_player.filter(|n| !n.trim().is_empty()) {
            let result = self.execute(Command::Player(nickname)).await;
            print_result(result);
        } else {
            println!("{}", HELP);
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            match Command::parse(&line) {
                Ok(None) => continue,
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => {
                    let result = self.execute(command).await;
                    print_result(result);
                }
                Err(usage) => eprintln!("{}", usage),
            }
        }
        Ok(())
    }
}

fn print_result(result: Result<String, String>) {
    match result {
        Ok(text) if !text.is_empty() => println!("{}", text),
        Ok(_) => {}
        Err(message) => eprintln!("error: {}", message),
    }
}
