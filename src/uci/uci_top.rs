//! UCI protocol front-end and command loop.
//!
//! Parses UCI commands, maintains the current position, runs searches on a
//! worker thread and emits protocol output through a channel. Any command
//! that needs the searcher first stops and joins the running search, so at
//! most one search is ever active.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Move;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_apply::make_move;
use crate::search::iterative_deepening::{
    format_pv, mate_in_moves, CancellationToken, SearchConfig, SearchInfo, SearchResult, Searcher,
};
use crate::search::time_management::{resolve_time_budget, GoParams};
use crate::search::transposition_table::entries_for_mb;
use crate::utils::long_algebraic::{format_move, parse_legal_move};

const UCI_ENGINE_NAME: &str = "Weever";
const UCI_ENGINE_AUTHOR: &str = "the Weever developers";
const DEFAULT_HASH_MB: usize = 16;
const MAX_HASH_MB: usize = 4096;
const INFINITE_POLL: Duration = Duration::from_millis(5);

pub fn run_stdio_loop() -> io::Result<()> {
    let (tx, rx) = mpsc::channel::<String>();
    let printer = thread::spawn(move || -> io::Result<()> {
        let mut stdout = io::stdout();
        for line in rx {
            writeln!(stdout, "{line}")?;
            stdout.flush()?;
        }
        Ok(())
    });

    let mut uci = UciState::new(tx);
    for line in io::stdin().lock().lines() {
        let line = line?;
        if uci.handle_command(&line) {
            break;
        }
    }
    uci.stop_search();
    drop(uci);

    printer
        .join()
        .map_err(|_| io::Error::other("output thread panicked"))?
}

fn parse_bool_option(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

pub struct UciState {
    out: Sender<String>,
    searcher: Option<Searcher>,
    worker: Option<JoinHandle<Searcher>>,
    cancel: CancellationToken,
    config: SearchConfig,
    position: Position,
    base_fen: String,
    moves: Vec<Move>,
    fixed_depth: Option<u8>,
    hash_mb: usize,
    debug: bool,
}

impl UciState {
    pub fn new(out: Sender<String>) -> Self {
        let config = SearchConfig {
            transposition_table_entries: entries_for_mb(DEFAULT_HASH_MB),
            ..SearchConfig::default()
        };
        let mut searcher = Searcher::new(config);
        let position = Self::build_position(&mut searcher, "", &[]);
        Self {
            out,
            searcher: Some(searcher),
            worker: None,
            cancel: CancellationToken::new(),
            config,
            position,
            base_fen: String::new(),
            moves: Vec::new(),
            fixed_depth: None,
            hash_mb: DEFAULT_HASH_MB,
            debug: false,
        }
    }

    fn build_position(searcher: &mut Searcher, fen: &str, moves: &[Move]) -> Position {
        if let Err(err) = searcher.set_position(fen, moves) {
            warn!("uci: could not load position: {err}");
        }
        searcher.position().clone()
    }

    fn send(&self, line: impl Into<String>) {
        // The receiver only disappears during shutdown.
        let _ = self.out.send(line.into());
    }

    /// `info string` diagnostics, only sent while `debug on` is active.
    fn send_info_string(&self, message: impl std::fmt::Display) {
        if self.debug {
            self.send(format!("info string {message}"));
        }
    }

    /// Handle one input line. Returns `true` when the engine should quit.
    pub fn handle_command(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return false;
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();

        match cmd {
            "uci" => {
                self.send(format!("id name {UCI_ENGINE_NAME}"));
                self.send(format!("id author {UCI_ENGINE_AUTHOR}"));
                self.send(format!(
                    "option name Hash type spin default {DEFAULT_HASH_MB} min 1 max {MAX_HASH_MB}"
                ));
                self.send("option name FixedDepth type spin default 0 min 0 max 64");
                self.send("option name UseHashTable type check default true");
                self.send("uciok");
            }
            "isready" => self.send("readyok"),
            "debug" => match parts.next() {
                Some("on") => self.debug = true,
                Some("off") => self.debug = false,
                _ => warn!("uci: expected 'debug on' or 'debug off', got '{trimmed}'"),
            },
            "register" => debug!("uci: registration not required, ignoring '{trimmed}'"),
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    warn!("uci: rejected '{trimmed}': {err}");
                    self.send_info_string(format_args!("setoption error: {err}"));
                }
            }
            "ucinewgame" => {
                self.stop_search();
                self.base_fen.clear();
                self.moves.clear();
                self.reload_position();
            }
            "position" => {
                if let Err(err) = self.handle_position(trimmed) {
                    warn!("uci: rejected '{trimmed}': {err}");
                    self.send_info_string(format_args!("position error: {err}"));
                }
            }
            "go" => {
                if let Err(err) = self.handle_go(trimmed) {
                    warn!("uci: rejected '{trimmed}': {err}");
                    self.send_info_string(format_args!("go error: {err}"));
                    self.send("bestmove 0000");
                }
            }
            "stop" => self.stop_search(),
            "d" => {
                for row in self.position.to_string().lines() {
                    self.send(row);
                }
            }
            "quit" => {
                self.stop_search();
                return true;
            }
            _ => {
                warn!("uci: unknown command '{trimmed}'");
            }
        }

        false
    }

    /// Cancel the running search, if any, and take the searcher back.
    pub fn stop_search(&mut self) {
        self.cancel.cancel();
        self.join_worker();
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            match handle.join() {
                Ok(searcher) => self.searcher = Some(searcher),
                Err(_) => {
                    warn!("uci: search thread panicked, rebuilding searcher");
                    let mut searcher = Searcher::new(self.config);
                    self.position =
                        Self::build_position(&mut searcher, &self.base_fen, &self.moves);
                    self.searcher = Some(searcher);
                }
            }
        }
    }

    fn searcher_mut(&mut self) -> &mut Searcher {
        self.stop_search();
        let config = self.config;
        self.searcher.get_or_insert_with(|| Searcher::new(config))
    }

    fn reload_position(&mut self) {
        self.stop_search();
        let config = self.config;
        let searcher = self.searcher.get_or_insert_with(|| Searcher::new(config));
        self.position = Self::build_position(searcher, &self.base_fen, &self.moves);
    }

    fn handle_setoption(&mut self, line: &str) -> Result<(), String> {
        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in line.split_whitespace().skip(1) {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }

        let name = name_tokens.join(" ");
        let value = value_tokens.join(" ");

        if name.eq_ignore_ascii_case("Hash") {
            let parsed = value
                .parse::<usize>()
                .map_err(|_| format!("invalid Hash value '{value}'"))?;
            self.hash_mb = parsed.clamp(1, MAX_HASH_MB);
            self.config.transposition_table_entries = entries_for_mb(self.hash_mb);
        } else if name.eq_ignore_ascii_case("FixedDepth") {
            let parsed = value
                .parse::<u8>()
                .map_err(|_| format!("invalid FixedDepth value '{value}'"))?;
            self.fixed_depth = if parsed == 0 { None } else { Some(parsed) };
        } else if name.eq_ignore_ascii_case("UseHashTable") {
            self.config.use_transposition_table = parse_bool_option(&value);
        } else {
            return Err(format!("unknown option '{name}'"));
        }

        let config = self.config;
        self.searcher_mut().set_config(config);
        Ok(())
    }

    fn handle_position(&mut self, line: &str) -> ChessResult<()> {
        let mut tokens = line.split_whitespace().skip(1).peekable();

        let base_fen = match tokens.next() {
            Some("startpos") => String::new(),
            Some("fen") => {
                let mut fen_parts = Vec::<&str>::new();
                while let Some(&next) = tokens.peek() {
                    if next == "moves" {
                        break;
                    }
                    fen_parts.push(next);
                    tokens.next();
                }
                if fen_parts.is_empty() {
                    return Err(ChessError::InvalidFen(
                        "missing FEN after 'position fen'".to_owned(),
                    ));
                }
                fen_parts.join(" ")
            }
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "unsupported position token '{}'",
                    other.unwrap_or_default()
                )))
            }
        };

        let mut scratch = Position::from_fen(&base_fen)?;
        let mut moves = Vec::new();
        if tokens.next() == Some("moves") {
            for text in tokens {
                let mv = parse_legal_move(&mut scratch, text)?;
                make_move(&mut scratch, mv)?;
                moves.push(mv);
            }
        }

        self.base_fen = base_fen;
        self.moves = moves;
        self.reload_position();
        Ok(())
    }

    fn handle_go(&mut self, line: &str) -> Result<(), String> {
        let params = parse_go_params(line)?;
        let budget = resolve_time_budget(self.position.side_to_move(), &params);

        let mut config = self.config;
        if let Some(depth) = params.depth.or(self.fixed_depth) {
            config.max_depth = depth;
        }

        let mut searcher = {
            let searcher = self.searcher_mut();
            searcher.set_config(config);
            self.searcher.take()
        }
        .ok_or_else(|| "searcher unavailable".to_owned())?;

        self.cancel = CancellationToken::new();
        let token = self.cancel.clone();
        let out = self.out.clone();
        let debug = self.debug;
        let hold_until_stop = params.infinite;

        info!("uci: go depth {} budget {:?}", config.max_depth, budget);
        self.worker = Some(thread::spawn(move || {
            let reporter = out.clone();
            let outcome = searcher.search_with_reporter(budget, &token, |info| {
                let _ = reporter.send(format_info(info));
            });
            let line = match outcome {
                Ok(result) => format_bestmove(&result),
                Err(err) => {
                    warn!("uci: search failed: {err}");
                    if debug {
                        let _ = out.send(format!("info string search error: {err}"));
                    }
                    "bestmove 0000".to_owned()
                }
            };
            // `go infinite` reports only after `stop`.
            while hold_until_stop && !token.is_cancelled() {
                thread::sleep(INFINITE_POLL);
            }
            let _ = out.send(line);
            searcher
        }));

        Ok(())
    }

    #[cfg(test)]
    fn wait_for_search(&mut self) {
        self.join_worker();
    }
}

impl Drop for UciState {
    fn drop(&mut self) {
        self.stop_search();
    }
}

pub fn format_info(info: &SearchInfo) -> String {
    let score = match mate_in_moves(info.score) {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {}", info.score),
    };
    let elapsed_ms = info.elapsed.as_millis() as u64;
    let nps = info.nodes.saturating_mul(1000) / elapsed_ms.max(1);
    format!(
        "info depth {} score {} nodes {} time {} nps {} pv {}",
        info.depth,
        score,
        info.nodes,
        elapsed_ms,
        nps,
        format_pv(&info.pv)
    )
}

fn format_bestmove(result: &SearchResult) -> String {
    match result.best_move {
        Some(mv) => format!("bestmove {}", format_move(mv)),
        None => "bestmove 0000".to_owned(),
    }
}

fn parse_go_params(line: &str) -> Result<GoParams, String> {
    fn value<T: std::str::FromStr>(tokens: &[&str], i: usize, name: &str) -> Result<T, String> {
        tokens
            .get(i)
            .and_then(|x| x.parse::<T>().ok())
            .ok_or_else(|| format!("invalid value for '{name}'"))
    }

    let mut params = GoParams::default();
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let mut i = 1usize;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                params.depth = Some(value(&tokens, i, "depth")?);
            }
            "movetime" => {
                i += 1;
                params.movetime_ms = Some(value(&tokens, i, "movetime")?);
            }
            "wtime" => {
                i += 1;
                params.wtime_ms = Some(value(&tokens, i, "wtime")?);
            }
            "btime" => {
                i += 1;
                params.btime_ms = Some(value(&tokens, i, "btime")?);
            }
            "winc" => {
                i += 1;
                params.winc_ms = Some(value(&tokens, i, "winc")?);
            }
            "binc" => {
                i += 1;
                params.binc_ms = Some(value(&tokens, i, "binc")?);
            }
            "movestogo" => {
                i += 1;
                params.movestogo = Some(value(&tokens, i, "movestogo")?);
            }
            "infinite" => params.infinite = true,
            other => warn!("uci: ignoring go token '{other}'"),
        }
        i += 1;
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::Receiver;

    use super::*;
    use crate::game_state::chess_types::Color;

    fn new_state() -> (UciState, Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        (UciState::new(tx), rx)
    }

    fn drain(rx: &Receiver<String>) -> Vec<String> {
        rx.try_iter().collect()
    }

    #[test]
    fn uci_handshake_lists_options() {
        let (mut state, rx) = new_state();
        assert!(!state.handle_command("uci"));
        state.handle_command("isready");
        let lines = drain(&rx);
        assert_eq!(lines[0], "id name Weever");
        assert!(lines.iter().any(|l| l.starts_with("option name Hash")));
        assert!(lines.contains(&"uciok".to_owned()));
        assert_eq!(lines.last().map(String::as_str), Some("readyok"));
    }

    #[test]
    fn position_startpos_with_moves_updates_state() {
        let (mut state, _rx) = new_state();
        state.handle_command("position startpos moves e2e4 e7e5 g1f3");
        assert_eq!(state.position.side_to_move(), Color::Black);
        assert_eq!(state.moves.len(), 3);
        assert_eq!(state.position.history().len(), 3);
    }

    #[test]
    fn position_fen_without_moves_updates_state() {
        let (mut state, _rx) = new_state();
        state.handle_command("position fen 8/8/8/8/8/8/4P3/4K2k w - - 0 1");
        assert_eq!(
            crate::utils::fen_generator::generate_fen(&state.position),
            "8/8/8/8/8/8/4P3/4K2k w - - 0 1"
        );
    }

    #[test]
    fn illegal_move_in_position_is_reported_and_ignored() {
        let (mut state, rx) = new_state();
        state.handle_command("debug on");
        state.handle_command("position startpos moves e2e4");
        state.handle_command("position startpos moves e2e5");
        let lines = drain(&rx);
        assert!(lines.iter().any(|l| l.starts_with("info string position error")));
        assert_eq!(state.position.history().len(), 1);
    }

    #[test]
    fn go_depth_reports_info_and_legal_bestmove() {
        let (mut state, rx) = new_state();
        state.handle_command("position startpos");
        state.handle_command("go depth 2");
        state.wait_for_search();
        let lines = drain(&rx);
        assert!(lines.iter().any(|l| l.starts_with("info depth 1 ")));
        assert!(lines.iter().any(|l| l.starts_with("info depth 2 ")));
        let best = lines.last().expect("bestmove line");
        assert!(best.starts_with("bestmove "));
        let mut position = Position::starting_position();
        assert!(parse_legal_move(&mut position, &best["bestmove ".len()..]).is_ok());
    }

    #[test]
    fn stop_ends_infinite_search_with_bestmove() {
        let (mut state, rx) = new_state();
        state.handle_command("go infinite");
        state.handle_command("stop");
        let lines = drain(&rx);
        assert!(lines.last().is_some_and(|l| l.starts_with("bestmove ") && l != "bestmove 0000"));
    }

    #[test]
    fn go_reports_mate_score() {
        let (mut state, rx) = new_state();
        state.handle_command("position fen 6k1/8/6K1/8/8/8/8/Q7 w - - 0 1");
        state.handle_command("go depth 2");
        state.wait_for_search();
        let lines = drain(&rx);
        assert!(lines.iter().any(|l| l.starts_with("info depth 2 score mate 1 ")));
    }

    #[test]
    fn setoption_updates_search_settings() {
        let (mut state, rx) = new_state();
        state.handle_command("setoption name FixedDepth value 4");
        assert_eq!(state.fixed_depth, Some(4));
        state.handle_command("setoption name FixedDepth value 0");
        assert_eq!(state.fixed_depth, None);

        state.handle_command("setoption name Hash value 1");
        assert_eq!(state.hash_mb, 1);
        assert_eq!(state.config.transposition_table_entries, entries_for_mb(1));

        state.handle_command("setoption name UseHashTable value false");
        assert!(!state.config.use_transposition_table);

        state.handle_command("debug on");
        state.handle_command("setoption name Hash value lots");
        assert!(drain(&rx).iter().any(|l| l.starts_with("info string setoption error")));
    }

    #[test]
    fn info_strings_follow_debug_flag() {
        let (mut state, rx) = new_state();
        state.handle_command("position fen not-a-fen");
        assert!(drain(&rx).is_empty());

        state.handle_command("debug on");
        assert!(state.debug);
        state.handle_command("position fen not-a-fen");
        assert!(drain(&rx).iter().any(|l| l.starts_with("info string position error")));

        state.handle_command("debug off");
        assert!(!state.debug);
        state.handle_command("position fen not-a-fen");
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn register_is_accepted_silently() {
        let (mut state, rx) = new_state();
        assert!(!state.handle_command("register later"));
        assert!(!state.handle_command("register name Someone code 1234"));
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn infinite_search_holds_bestmove_until_stop() {
        let (mut state, rx) = new_state();
        state.handle_command("position fen 6k1/6Q1/6K1/8/8/8/8/8 b - - 0 1");
        state.handle_command("go infinite");
        thread::sleep(Duration::from_millis(50));
        assert!(drain(&rx).iter().all(|l| !l.starts_with("bestmove")));

        state.handle_command("stop");
        assert_eq!(drain(&rx).last().map(String::as_str), Some("bestmove 0000"));
    }

    #[test]
    fn display_command_prints_board_and_fen() {
        let (mut state, rx) = new_state();
        state.handle_command("d");
        let lines = drain(&rx);
        assert!(lines.iter().any(|l| l.starts_with("Fen: rnbqkbnr/")));
    }

    #[test]
    fn parse_go_params_reads_clock_fields() {
        let params = parse_go_params("go wtime 120000 btime 60000 winc 1000 binc 500 movestogo 24")
            .expect("go params should parse");
        assert_eq!(params.movetime_ms, None);
        assert_eq!(params.wtime_ms, Some(120_000));
        assert_eq!(params.btime_ms, Some(60_000));
        assert_eq!(params.winc_ms, Some(1_000));
        assert_eq!(params.binc_ms, Some(500));
        assert_eq!(params.movestogo, Some(24));
        assert!(parse_go_params("go depth x").is_err());
    }

    #[test]
    fn quit_returns_true() {
        let (mut state, _rx) = new_state();
        assert!(state.handle_command("quit"));
    }
}
