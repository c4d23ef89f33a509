//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! `Searcher` owns the position being analysed, the key table it was built
//! with and an optional forgetful transposition table. Each `search` call
//! deepens one ply at a time and keeps the result of the last depth that
//! completed before the deadline or the cancellation token fired.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::errors::ChessResult;
use crate::game_state::chess_types::Move;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_apply::{make_move, undo_last_move};
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::legal_move_generator::get_legal_moves;
use crate::search::move_ordering::order_moves;
use crate::search::transposition_table::TranspositionTable;
use crate::search::zobrist::{ZobristKeys, DEFAULT_ZOBRIST_SEED};
use crate::utils::fen_parser::parse_fen_with_keys;
use crate::utils::long_algebraic::format_move;

pub const MATE_SCORE: i32 = 30_000;
pub const INFINITY: i32 = 32_000;
const MAX_MATE_PLY: i32 = 1_000;
const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_MATE_PLY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub use_transposition_table: bool,
    pub transposition_table_entries: usize,
    pub zobrist_seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            use_transposition_table: true,
            transposition_table_entries: 1 << 18,
            zobrist_seed: DEFAULT_ZOBRIST_SEED,
        }
    }
}

/// Cooperative stop signal shared between the searching thread and whoever
/// controls it. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Progress report emitted after each completed depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: u8,
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub pv: Vec<Move>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed_ms: u64,
    pub nps: u64,
    pub pv: Vec<Move>,
}

/// Signed number of moves to mate when `score` is a mate score.
pub fn mate_in_moves(score: i32) -> Option<i32> {
    if score >= MATE_THRESHOLD {
        Some((MATE_SCORE - score + 1) / 2)
    } else if score <= -MATE_THRESHOLD {
        Some(-((MATE_SCORE + score + 1) / 2))
    } else {
        None
    }
}

// Mate scores are stored relative to the node so they stay valid when the
// same position is reached at another ply.
#[inline]
fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

#[inline]
fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

struct SearchContext<'a> {
    cancel: &'a CancellationToken,
    deadline: Option<Instant>,
    tt: Option<&'a mut TranspositionTable>,
    previous_pv: Vec<Move>,
    nodes: u64,
    aborted: bool,
}

impl SearchContext<'_> {
    fn should_abort(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        let past_deadline = self.deadline.is_some_and(|limit| Instant::now() >= limit);
        if self.cancel.is_cancelled() || past_deadline {
            self.aborted = true;
        }
        self.aborted
    }
}

pub struct Searcher {
    position: Position,
    config: SearchConfig,
    zobrist: Arc<ZobristKeys>,
    tt: Option<TranspositionTable>,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        let zobrist = Arc::new(ZobristKeys::from_seed(config.zobrist_seed));
        Self {
            position: Position::new(Arc::clone(&zobrist)),
            config,
            tt: build_table(&config),
            zobrist,
        }
    }

    #[inline]
    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Replace the configuration, rebuilding the key table or the
    /// transposition table only when their settings changed.
    pub fn set_config(&mut self, config: SearchConfig) {
        if config.zobrist_seed != self.config.zobrist_seed {
            self.zobrist = Arc::new(ZobristKeys::from_seed(config.zobrist_seed));
        }
        let table_changed = config.use_transposition_table != self.config.use_transposition_table
            || config.transposition_table_entries != self.config.transposition_table_entries;
        self.config = config;
        if table_changed {
            self.tt = build_table(&config);
        }
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Build a fresh position from FEN (empty string for the start position)
    /// and play `moves` on it.
    pub fn set_position(&mut self, notation: &str, moves: &[Move]) -> ChessResult<()> {
        let mut position = parse_fen_with_keys(notation, Arc::clone(&self.zobrist))?;
        for &mv in moves {
            make_move(&mut position, mv)?;
        }
        self.position = position;
        Ok(())
    }

    pub fn search(
        &mut self,
        time_budget: Option<Duration>,
        cancel: &CancellationToken,
    ) -> ChessResult<SearchResult> {
        self.search_with_reporter(time_budget, cancel, |_| {})
    }

    pub fn search_with_reporter<F: FnMut(&SearchInfo)>(
        &mut self,
        time_budget: Option<Duration>,
        cancel: &CancellationToken,
        mut reporter: F,
    ) -> ChessResult<SearchResult> {
        let start = Instant::now();
        let max_depth = self.config.max_depth.max(1);

        let Self { position, tt, .. } = self;
        if let Some(table) = tt.as_mut() {
            table.clear();
        }

        let root_moves = get_legal_moves(position)?;
        if root_moves.is_empty() {
            let side = position.side_to_move();
            let best_score = if is_in_check(position, side)? { -MATE_SCORE } else { 0 };
            info!("search: no legal moves, score {best_score}");
            return Ok(SearchResult {
                best_score,
                nodes: 1,
                ..SearchResult::default()
            });
        }

        let mut ctx = SearchContext {
            cancel,
            deadline: time_budget.map(|budget| start + budget),
            tt: tt.as_mut(),
            previous_pv: Vec::new(),
            nodes: 0,
            aborted: false,
        };

        let mut result = SearchResult {
            best_move: root_moves.first().copied(),
            ..SearchResult::default()
        };

        for depth in 1..=max_depth {
            if depth > 1 && ctx.should_abort() {
                break;
            }

            let mut pv = Vec::new();
            let score = negamax(position, &mut ctx, depth, 0, -INFINITY, INFINITY, true, &mut pv)?;

            if ctx.aborted {
                if depth == 1 && !pv.is_empty() {
                    result.best_move = pv.first().copied();
                    result.best_score = score;
                    result.pv = pv;
                }
                debug!("search: depth {depth} interrupted after {} nodes", ctx.nodes);
                break;
            }

            result.best_move = pv.first().copied();
            result.best_score = score;
            result.reached_depth = depth;
            result.pv = pv.clone();

            let report = SearchInfo {
                depth,
                score,
                nodes: ctx.nodes,
                elapsed: start.elapsed(),
                pv: pv.clone(),
            };
            debug!(
                "search: depth {} score {} nodes {} pv {}",
                depth,
                score,
                ctx.nodes,
                format_pv(&pv)
            );
            reporter(&report);
            ctx.previous_pv = pv;
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        result.nodes = ctx.nodes;
        result.elapsed_ms = elapsed_ms;
        result.nps = ctx.nodes.saturating_mul(1000) / elapsed_ms.max(1);

        if let Some(table) = ctx.tt.as_deref() {
            let stats = table.stats();
            trace!(
                "tt: probes {} hits {} stores {} overwrites {}",
                stats.probes,
                stats.hits,
                stats.stores,
                stats.overwrites
            );
        }
        info!(
            "search: best {} score {} depth {} nodes {} time {}ms",
            result.best_move.map_or_else(|| "none".to_owned(), |mv| mv.to_string()),
            result.best_score,
            result.reached_depth,
            result.nodes,
            result.elapsed_ms
        );

        Ok(result)
    }
}

fn build_table(config: &SearchConfig) -> Option<TranspositionTable> {
    config
        .use_transposition_table
        .then(|| TranspositionTable::new(config.transposition_table_entries))
}

pub fn format_pv(pv: &[Move]) -> String {
    pv.iter().map(|&mv| format_move(mv)).collect::<Vec<_>>().join(" ")
}

#[allow(clippy::too_many_arguments)]
fn negamax(
    position: &mut Position,
    ctx: &mut SearchContext<'_>,
    depth: u8,
    ply: i32,
    mut alpha: i32,
    beta: i32,
    on_pv: bool,
    pv: &mut Vec<Move>,
) -> ChessResult<i32> {
    ctx.nodes += 1;
    pv.clear();

    if depth == 0 {
        return Ok(position.evaluation());
    }

    let key = position.hash();
    if ply > 0 {
        if let Some(table) = ctx.tt.as_deref_mut() {
            if let Some(score) = table.probe(key, depth) {
                return Ok(score_from_tt(score, ply));
            }
        }
    }

    let mut moves = get_legal_moves(position)?;
    if moves.is_empty() {
        let side = position.side_to_move();
        return Ok(if is_in_check(position, side)? {
            -(MATE_SCORE - ply)
        } else {
            0
        });
    }

    let pv_move = if on_pv {
        ctx.previous_pv.get(ply as usize).copied()
    } else {
        None
    };
    order_moves(position, &mut moves, pv_move);

    let original_alpha = alpha;
    let mut best = -INFINITY;
    let mut child_pv = Vec::new();

    for mv in moves {
        if ctx.should_abort() {
            break;
        }

        make_move(position, mv)?;
        let child = negamax(
            position,
            ctx,
            depth - 1,
            ply + 1,
            -beta,
            -alpha,
            on_pv && pv_move == Some(mv),
            &mut child_pv,
        );
        undo_last_move(position)?;
        let score = -child?;

        if score > best {
            best = score;
            pv.clear();
            pv.push(mv);
            pv.extend_from_slice(&child_pv);
        }
        if best > alpha {
            alpha = best;
        }
        if alpha >= beta {
            break;
        }
    }

    if best == -INFINITY {
        // Interrupted before the first move finished.
        return Ok(position.evaluation());
    }

    if !ctx.aborted && best > original_alpha && best < beta {
        if let Some(table) = ctx.tt.as_deref_mut() {
            table.store(key, depth, score_to_tt(best, ply));
        }
    }

    Ok(best)
}
