//! XML parsers for the fantasy API responses
//!
//! - `parse_leagues`: the users/games/leagues listing
//! - `parse_scoreboard`: a league's scoreboard, reduced to the user's matchup

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::types::{Matchup, Team};
use crate::storage::League;
use crate::{FantasyWearError, Result};

const ROOT: &str = "fantasy_content";

/// Parse events, flattened into element starts and ends
enum Node {
    Start {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// `text` is the element's own text, meaningful for leaf elements
    End { name: String, text: String },
    Eof,
}

/// Pull reader that tracks the open element path
struct XmlCursor<'a> {
    reader: Reader<&'a [u8]>,
    stack: Vec<String>,
    text: String,
    pending_end: bool,
}

impl<'a> XmlCursor<'a> {
    fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            stack: Vec::new(),
            text: String::new(),
            pending_end: false,
        }
    }

    /// Number of open elements
    fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Open element names from `from` to the innermost
    fn path_from(&self, from: usize) -> Vec<&str> {
        self.stack
            .get(from..)
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect()
    }

    fn next(&mut self) -> Result<Node> {
        if self.pending_end {
            self.pending_end = false;
            return Ok(self.close());
        }
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => return self.open(&e),
                Event::Empty(e) => {
                    self.pending_end = true;
                    return self.open(&e);
                }
                Event::End(_) => return Ok(self.close()),
                Event::Text(t) => self.text.push_str(&t.unescape()?),
                Event::CData(c) => self.text.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::Eof => {
                    if !self.stack.is_empty() {
                        return Err(FantasyWearError::parse(format!(
                            "Unexpected end of document inside <{}>",
                            self.stack.join("/")
                        )));
                    }
                    return Ok(Node::Eof);
                }
                _ => {}
            }
        }
    }

    fn open(&mut self, e: &BytesStart) -> Result<Node> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        if self.stack.is_empty() && name != ROOT {
            return Err(FantasyWearError::parse(format!(
                "Expected <{ROOT}> but found <{name}>"
            )));
        }
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| FantasyWearError::parse(err.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        self.stack.push(name.clone());
        self.text.clear();
        Ok(Node::Start { name, attributes })
    }

    fn close(&mut self) -> Node {
        let name = self.stack.pop().unwrap_or_default();
        Node::End {
            name,
            text: std::mem::take(&mut self.text),
        }
    }
}

/// Parse the user's leagues. Only head-to-head leagues are returned; the
/// `account_name` of each league is left empty for the caller to fill.
pub fn parse_leagues(xml: &str) -> Result<Vec<League>> {
    let mut cursor = XmlCursor::new(xml);
    let mut leagues = Vec::new();
    // (league, depth of its children, head-to-head)
    let mut current: Option<(League, usize, bool)> = None;

    loop {
        match cursor.next()? {
            Node::Start { name, .. } if name == "league" && current.is_none() => {
                current = Some((League::default(), cursor.depth(), false));
            }
            Node::End { name, text } => {
                let Some((league, child_depth, supported)) = current.as_mut() else {
                    continue;
                };
                if cursor.depth() == *child_depth {
                    match name.as_str() {
                        "league_key" => league.league_key = text,
                        "name" => league.league_name = text,
                        "scoring_type" => *supported = text.contains("head"),
                        _ => {}
                    }
                } else if name == "league" && cursor.depth() + 1 == *child_depth {
                    if let Some((league, _, true)) = current.take() {
                        leagues.push(league);
                    }
                }
            }
            Node::Eof => break,
            _ => {}
        }
    }
    Ok(leagues)
}

/// Parse a scoreboard and return the first matchup involving the user's team.
pub fn parse_scoreboard(xml: &str) -> Result<Matchup> {
    let mut cursor = XmlCursor::new(xml);
    let mut teams: Vec<Team> = Vec::new();
    let mut in_teams = false;
    // (team, depth of its children)
    let mut current: Option<(Team, usize)> = None;

    loop {
        match cursor.next()? {
            Node::Start { name, attributes } => match name.as_str() {
                "teams" if cursor.path_from(0).contains(&"matchup") => {
                    let count = attributes
                        .iter()
                        .find(|(key, _)| key == "count")
                        .map(|(_, value)| value.as_str());
                    if count != Some("2") {
                        return Err(FantasyWearError::parse(
                            "Only head-to-head leagues are supported",
                        ));
                    }
                    in_teams = true;
                    teams.clear();
                }
                "team" if in_teams && current.is_none() => {
                    if teams.len() >= 2 {
                        return Err(FantasyWearError::parse("More teams than specified in count"));
                    }
                    current = Some((Team::default(), cursor.depth()));
                }
                _ => {}
            },
            Node::End { name, text } => {
                if let Some((team, child_depth)) = current.as_mut() {
                    let child_depth = *child_depth;
                    if name == "team" && cursor.depth() + 1 == child_depth {
                        if let Some((team, _)) = current.take() {
                            teams.push(team);
                        }
                        continue;
                    }
                    match (cursor.path_from(child_depth).as_slice(), name.as_str()) {
                        ([], "name") => team.name = text,
                        ([], "is_owned_by_current_login") => {
                            team.is_owned_by_current_login = text == "1"
                        }
                        (["team_logos", "team_logo"], "url") => team.logo_url = text,
                        (["team_points"], "total") => team.score = text,
                        _ => {}
                    }
                } else if name == "teams" && in_teams {
                    in_teams = false;
                    if teams.len() != 2 {
                        return Err(FantasyWearError::parse(format!(
                            "Found {} teams, expected 2",
                            teams.len()
                        )));
                    }
                    if let Some(matchup) = owned_matchup(&teams) {
                        return Ok(matchup);
                    }
                }
            }
            Node::Eof => break,
        }
    }
    Err(FantasyWearError::parse(
        "No matchup owned by the current login",
    ))
}

fn owned_matchup(teams: &[Team]) -> Option<Matchup> {
    match teams {
        [mine, theirs] if mine.is_owned_by_current_login => Some(Matchup {
            my_team: mine.clone(),
            opponent_team: theirs.clone(),
        }),
        [theirs, mine] if mine.is_owned_by_current_login => Some(Matchup {
            my_team: mine.clone(),
            opponent_team: theirs.clone(),
        }),
        _ => None,
    }
}
