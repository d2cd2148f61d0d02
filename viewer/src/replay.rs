use std::collections::HashMap;
use std::future::Future;

use warroom_shared::ReplayEvent;

use crate::board::{BoardFrame, BoardRenderer};
use crate::tree::{TreeDiffTracker, TreeFrame};

pub const DEFAULT_STEP_SIZE: usize = 20;

/// Deep-link navigation parameters: 1-based start index, BOARD fast-forward
/// step size, and whether TREE events are kept in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavParams {
    pub start_index: Option<i64>,
    pub step_size: usize,
    pub include_tree_events: bool,
}

impl Default for NavParams {
    fn default() -> Self {
        Self {
            start_index: None,
            step_size: DEFAULT_STEP_SIZE,
            include_tree_events: false,
        }
    }
}

impl NavParams {
    /// Parse from an external key-value source (e.g. query parameters).
    /// Unparseable or out-of-range values fall back to the defaults.
    pub fn from_pairs(pairs: &HashMap<String, String>) -> Self {
        let start_index = pairs.get("idx").and_then(|raw| raw.parse::<i64>().ok());
        let step_size = pairs
            .get("stepSize")
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|&size| size >= 1)
            .unwrap_or(DEFAULT_STEP_SIZE);
        let include_tree_events = pairs
            .get("enableTree")
            .is_some_and(|raw| raw == "true");
        Self {
            start_index,
            step_size,
            include_tree_events,
        }
    }

    /// Clamp the 1-based start index into the log: indexes past the end land
    /// on the last event, zero and negative values on the first.
    pub fn initial_cursor(&self, len: usize) -> usize {
        let Some(index) = self.start_index else {
            return 0;
        };
        if index < 1 || len == 0 {
            return 0;
        }
        ((index - 1) as usize).min(len - 1)
    }
}

/// Output of dispatching one event.
#[derive(Debug, Clone)]
pub enum Rendered {
    Board(BoardFrame),
    Tree(TreeFrame),
    /// Event with an unrecognized type: the cursor advanced, nothing rendered.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Log index of the dispatched event.
    pub index: usize,
    pub rendered: Rendered,
}

/// Pacing and navigation state machine over the event log. The cursor is the
/// single position of truth, bounded to `0..=len`; each event dispatches to
/// the renderer matching its type.
pub struct Replayer {
    events: Vec<ReplayEvent>,
    cursor: usize,
    step_size: usize,
    tree_suppressed: bool,
    board: BoardRenderer,
    tree: TreeDiffTracker,
}

impl Replayer {
    /// Build a replayer over `events`. When tree events are excluded they are
    /// removed from the log up front, which changes the effective length and
    /// activates the BOARD fast-forward skip.
    pub fn new(mut events: Vec<ReplayEvent>, params: NavParams, board: BoardRenderer) -> Self {
        if !params.include_tree_events {
            events.retain(|event| !event.is_tree());
        }
        let cursor = params.initial_cursor(events.len());
        Self {
            events,
            cursor,
            step_size: params.step_size,
            tree_suppressed: !params.include_tree_events,
            board,
            tree: TreeDiffTracker::new(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.events.len()
    }

    /// Dispatch the event under the cursor and advance. No-op at end of log.
    pub fn step_once(&mut self) -> Option<StepOutcome> {
        let event = self.events.get(self.cursor)?;
        let rendered = match event {
            ReplayEvent::Board(snapshot) => Rendered::Board(self.board.render(snapshot)),
            ReplayEvent::Tree(snapshot) => Rendered::Tree(self.tree.observe(snapshot)),
            ReplayEvent::Unknown => Rendered::Skipped,
        };
        let index = self.cursor;
        self.cursor += 1;
        Some(StepOutcome { index, rendered })
    }

    /// Type-aware fast-forward.
    ///
    /// BOARD: step once, then (only while tree events are suppressed) jump
    /// the cursor ahead by step size, landing on the last event at most.
    /// TREE opening a new group: step once. TREE inside a group: move past
    /// the consecutive TREE run, back up onto its last event, then step
    /// twice — the final TREE state renders, then the following BOARD.
    /// Unrecognized events step once. No-op at end of log.
    pub fn finish_group_or_advance(&mut self) -> Vec<StepOutcome> {
        let Some(event) = self.events.get(self.cursor) else {
            return Vec::new();
        };
        match event {
            ReplayEvent::Board(_) => {
                let mut outcomes = Vec::new();
                outcomes.extend(self.step_once());
                if self.tree_suppressed {
                    self.cursor = (self.cursor + self.step_size - 1).min(self.events.len() - 1);
                }
                outcomes
            }
            ReplayEvent::Tree(_) => {
                let after_board = self.cursor > 0 && self.events[self.cursor - 1].is_board();
                if after_board {
                    return self.step_once().into_iter().collect();
                }
                while self
                    .events
                    .get(self.cursor)
                    .is_some_and(ReplayEvent::is_tree)
                {
                    self.cursor += 1;
                }
                self.cursor -= 1;
                let mut outcomes = Vec::new();
                outcomes.extend(self.step_once());
                outcomes.extend(self.step_once());
                outcomes
            }
            ReplayEvent::Unknown => self.step_once().into_iter().collect(),
        }
    }

    /// Auto-play: strictly sequential delay-then-step until the log is
    /// exhausted. The delay future comes from the caller, so the core owns no
    /// timer; a step never starts while a delay (or another step) is
    /// outstanding.
    pub async fn autoplay<D, F>(&mut self, mut delay: D, mut on_step: impl FnMut(StepOutcome))
    where
        D: FnMut() -> F,
        F: Future<Output = ()>,
    {
        while !self.is_finished() {
            delay().await;
            if let Some(outcome) = self.step_once() {
                on_step(outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use warroom_shared::{BoardSnapshot, ReplayEvent, TerritoryState, TreeSnapshot};

    use super::{NavParams, Rendered, Replayer, DEFAULT_STEP_SIZE};
    use crate::area::resolve_areas;
    use crate::board::BoardRenderer;
    use crate::template::parse_template;

    fn board_event(round: u32) -> ReplayEvent {
        ReplayEvent::Board(BoardSnapshot {
            territory_map: HashMap::from([(
                "aa".to_string(),
                TerritoryState {
                    occupant_player_id: 0,
                    troops: round as i32,
                },
            )]),
            player: None,
            round,
        })
    }

    fn tree_event(visits: u64) -> ReplayEvent {
        ReplayEvent::Tree(TreeSnapshot {
            visits,
            ..TreeSnapshot::default()
        })
    }

    fn renderer() -> BoardRenderer {
        let template = parse_template("+++++++++\n+2[aa]2+\n+++++++++", &[]).unwrap();
        let areas = resolve_areas(&template);
        BoardRenderer::new(template, areas)
    }

    fn replayer(events: Vec<ReplayEvent>, params: NavParams) -> Replayer {
        Replayer::new(events, params, renderer())
    }

    fn with_trees() -> NavParams {
        NavParams {
            include_tree_events: true,
            ..NavParams::default()
        }
    }

    #[test]
    fn nav_params_default_when_absent() {
        let params = NavParams::from_pairs(&HashMap::new());
        assert_eq!(params, NavParams::default());
        assert_eq!(params.step_size, DEFAULT_STEP_SIZE);
        assert!(!params.include_tree_events);
    }

    #[test]
    fn nav_params_parse_and_validate() {
        let pairs = HashMap::from([
            ("idx".to_string(), "7".to_string()),
            ("stepSize".to_string(), "5".to_string()),
            ("enableTree".to_string(), "true".to_string()),
        ]);
        let params = NavParams::from_pairs(&pairs);
        assert_eq!(params.start_index, Some(7));
        assert_eq!(params.step_size, 5);
        assert!(params.include_tree_events);
    }

    #[test]
    fn nav_params_reject_invalid_values() {
        let pairs = HashMap::from([
            ("idx".to_string(), "abc".to_string()),
            ("stepSize".to_string(), "0".to_string()),
            ("enableTree".to_string(), "yes".to_string()),
        ]);
        let params = NavParams::from_pairs(&pairs);
        assert_eq!(params.start_index, None);
        assert_eq!(params.step_size, DEFAULT_STEP_SIZE);
        assert!(!params.include_tree_events);
    }

    #[test]
    fn start_index_clamps_into_the_log() {
        let events: Vec<_> = (0..4).map(board_event).collect();
        let past_end = NavParams {
            start_index: Some(9),
            ..with_trees()
        };
        assert_eq!(replayer(events.clone(), past_end).cursor(), 3);

        let at_zero = NavParams {
            start_index: Some(0),
            ..with_trees()
        };
        assert_eq!(replayer(events.clone(), at_zero).cursor(), 0);

        let negative = NavParams {
            start_index: Some(-3),
            ..with_trees()
        };
        assert_eq!(replayer(events, negative).cursor(), 0);
    }

    #[test]
    fn step_once_dispatches_by_type_and_advances() {
        let mut replayer = replayer(
            vec![board_event(1), tree_event(4), ReplayEvent::Unknown],
            with_trees(),
        );

        let first = replayer.step_once().unwrap();
        assert_eq!(first.index, 0);
        assert!(matches!(first.rendered, Rendered::Board(_)));

        let second = replayer.step_once().unwrap();
        assert_eq!(second.index, 1);
        assert!(matches!(second.rendered, Rendered::Tree(_)));

        let third = replayer.step_once().unwrap();
        assert!(matches!(third.rendered, Rendered::Skipped));
        assert_eq!(replayer.cursor(), 3);
    }

    #[test]
    fn exhausted_log_makes_both_operations_no_ops() {
        let mut replayer = replayer(vec![board_event(1)], with_trees());
        replayer.step_once();
        assert!(replayer.is_finished());

        assert!(replayer.step_once().is_none());
        assert!(replayer.finish_group_or_advance().is_empty());
        assert_eq!(replayer.cursor(), 1);
    }

    #[test]
    fn first_tree_of_a_group_steps_once() {
        let events = vec![
            board_event(1),
            tree_event(1),
            tree_event(2),
            tree_event(3),
            board_event(2),
        ];
        let mut replayer = replayer(events, with_trees());
        replayer.step_once();
        assert_eq!(replayer.cursor(), 1);

        let outcomes = replayer.finish_group_or_advance();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].index, 1);
        assert!(matches!(outcomes[0].rendered, Rendered::Tree(_)));
        assert_eq!(replayer.cursor(), 2);
    }

    #[test]
    fn mid_group_tree_fast_forward_renders_last_tree_then_board() {
        let events = vec![
            board_event(1),
            tree_event(1),
            tree_event(2),
            tree_event(3),
            board_event(2),
        ];
        let mut replayer = replayer(events, with_trees());
        replayer.step_once();
        replayer.finish_group_or_advance();
        assert_eq!(replayer.cursor(), 2);

        let outcomes = replayer.finish_group_or_advance();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].index, 3);
        assert!(matches!(outcomes[0].rendered, Rendered::Tree(_)));
        assert_eq!(outcomes[1].index, 4);
        assert!(matches!(outcomes[1].rendered, Rendered::Board(_)));
        assert_eq!(replayer.cursor(), 5);
    }

    #[test]
    fn tree_group_at_end_of_log_clamps() {
        let events = vec![board_event(1), tree_event(1), tree_event(2), tree_event(3)];
        let mut replayer = replayer(events, with_trees());
        replayer.step_once();
        replayer.step_once();
        assert_eq!(replayer.cursor(), 2);

        let outcomes = replayer.finish_group_or_advance();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].index, 3);
        assert_eq!(replayer.cursor(), 4);
    }

    #[test]
    fn board_fast_forward_skips_only_under_tree_suppression() {
        let events: Vec<_> = (0..30).map(board_event).collect();

        let mut suppressed = replayer(events.clone(), NavParams::default());
        let outcomes = suppressed.finish_group_or_advance();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(suppressed.cursor(), DEFAULT_STEP_SIZE);

        let mut unsuppressed = replayer(events, with_trees());
        unsuppressed.finish_group_or_advance();
        assert_eq!(unsuppressed.cursor(), 1);
    }

    #[test]
    fn board_fast_forward_lands_on_the_last_event_at_most() {
        let events: Vec<_> = (0..5).map(board_event).collect();
        let mut replayer = replayer(events, NavParams::default());

        let outcomes = replayer.finish_group_or_advance();
        assert_eq!(outcomes[0].index, 0);
        // A skip past the end lands on the final event, not one past it, so
        // fast-forwarding there dispatches the final event again.
        assert_eq!(replayer.cursor(), 4);
        let outcomes = replayer.finish_group_or_advance();
        assert_eq!(outcomes[0].index, 4);
        assert_eq!(replayer.cursor(), 4);
    }

    #[test]
    fn tree_suppression_filters_the_log_before_replay() {
        let events = vec![board_event(1), tree_event(1), tree_event(2), board_event(2)];
        let replayer = replayer(events, NavParams::default());
        assert_eq!(replayer.len(), 2);
    }

    #[test]
    fn unknown_events_survive_tree_suppression() {
        let events = vec![board_event(1), ReplayEvent::Unknown, tree_event(1)];
        let replayer = replayer(events, NavParams::default());
        assert_eq!(replayer.len(), 2);
    }

    #[test]
    fn unknown_event_fast_forward_steps_once() {
        let events = vec![ReplayEvent::Unknown, board_event(1)];
        let mut replayer = replayer(events, with_trees());
        let outcomes = replayer.finish_group_or_advance();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0].rendered, Rendered::Skipped));
        assert_eq!(replayer.cursor(), 1);
    }

    #[test]
    fn autoplay_is_strictly_sequential() {
        let events: Vec<_> = (0..3).map(board_event).collect();
        let mut replayer = replayer(events, with_trees());

        let trace = RefCell::new(Vec::new());
        futures::executor::block_on(replayer.autoplay(
            || {
                trace.borrow_mut().push("delay");
                std::future::ready(())
            },
            |outcome| {
                trace.borrow_mut().push("step");
                assert!(matches!(outcome.rendered, Rendered::Board(_)));
            },
        ));

        assert_eq!(
            trace.into_inner(),
            vec!["delay", "step", "delay", "step", "delay", "step"]
        );
    }
}
