//! Property-based tests for the dealing engine.
//!
//! Random select/clear/swap traffic over two free dealers and a three-slot
//! bench sharing one pool, checked against the board audit, the attached
//! views and a plain model of the bench.

use proptest::prelude::*;

use super::*;

const POOL: [u8; 6] = [10, 11, 12, 13, 14, 15];
const FREE: usize = 2;
const BENCH: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Select { dealer: usize, row: usize },
    Clear { dealer: usize },
    Swap { position: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..FREE + BENCH, 0..POOL.len()).prop_map(|(dealer, row)| Op::Select { dealer, row }),
        2 => (0..FREE + BENCH).prop_map(|dealer| Op::Clear { dealer }),
        1 => (0..BENCH).prop_map(|position| Op::Swap { position }),
    ]
}

struct Rig {
    board: Board<u8>,
    dealers: Vec<DealerId>,
    seq: SequenceId,
    views: Vec<ListView<u8>>,
    seq_log: EventLog<u8>,
}

fn rig() -> Rig {
    let mut board = Board::new();
    let dealers = board.add_dealers(FREE + BENCH);
    let views: Vec<ListView<u8>> = dealers.iter().map(|_| ListView::new()).collect();
    for (id, view) in dealers.iter().zip(&views) {
        board.attach_view(*id, Box::new(view.clone())).unwrap();
    }
    board.initialize_group(&dealers, POOL.to_vec()).unwrap();
    let seq = board.create_sequence(&dealers[FREE..]).unwrap();
    let seq_log = EventLog::new();
    board.attach_sequence_listener(seq, Box::new(seq_log.clone())).unwrap();
    Rig { board, dealers, seq, views, seq_log }
}

fn snapshot(board: &Board<u8>) -> Vec<(Option<usize>, Vec<usize>, bool)> {
    board
        .dealers()
        .iter()
        .map(|d| (d.selection_index(), d.mask().indices().to_vec(), d.is_filling_enabled()))
        .collect()
}

fn bench_picks(rig: &Rig) -> Vec<Option<u8>> {
    rig.dealers[FREE..].iter().map(|id| rig.board.selection(*id).unwrap().copied()).collect()
}

/// Apply one op to the board and to the bench model.
fn apply(rig: &mut Rig, model: &mut Vec<Option<u8>>, op: &Op) -> Result<(), crate::DealError> {
    match *op {
        Op::Select { dealer, row } => {
            let id = rig.dealers[dealer];
            rig.board.select(id, row)?;
            if dealer >= FREE {
                model[dealer - FREE] = rig.board.selection(id).unwrap().copied();
            }
        }
        Op::Clear { dealer } => {
            let id = rig.dealers[dealer];
            let had = rig.board.selection(id).unwrap().is_some();
            rig.board.clear(id)?;
            if dealer >= FREE && had {
                model.remove(dealer - FREE);
                model.push(None);
            }
        }
        Op::Swap { position } => {
            let id = rig.dealers[FREE + position];
            rig.board.swap_right(rig.seq, id)?;
            model.swap(position, position + 1);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_invariants_hold_under_random_traffic(
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let mut rig = rig();
        let mut model: Vec<Option<u8>> = vec![None; BENCH];

        for op in &ops {
            let before = snapshot(&rig.board);
            if apply(&mut rig, &mut model, op).is_err() {
                // rejected calls leave no trace
                prop_assert_eq!(&before, &snapshot(&rig.board));
            }
            prop_assert!(rig.board.audit().is_ok(), "{:?}", rig.board.audit());
            prop_assert_eq!(&bench_picks(&rig), &model);

            let events = rig.seq_log.take();
            match op {
                Op::Swap { .. } => prop_assert!(events.is_empty()),
                Op::Clear { .. } => {
                    let only_empty =
                        events.iter().all(|e| matches!(e, LineupEvent::BecameEmpty { .. }));
                    prop_assert!(only_empty);
                }
                Op::Select { .. } => {
                    let only_filled =
                        events.iter().all(|e| matches!(e, LineupEvent::BecameFilled { .. }));
                    prop_assert!(only_filled);
                }
            }

            for (id, view) in rig.dealers.iter().zip(&rig.views) {
                let dealer = rig.board.dealer(*id).unwrap();
                let rows: Vec<u8> = dealer.visible_options().into_iter().copied().collect();
                let state = view.state();
                prop_assert_eq!(&state.options, &rows);
                prop_assert_eq!(state.selected_option(), dealer.selection());
            }
        }
    }

    #[test]
    fn prop_at_most_one_claimant(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut rig = rig();
        let mut model: Vec<Option<u8>> = vec![None; BENCH];
        for op in &ops {
            let _ = apply(&mut rig, &mut model, op);
            let mut picks: Vec<u8> = rig
                .dealers
                .iter()
                .filter_map(|id| rig.board.selection(*id).unwrap().copied())
                .collect();
            let total = picks.len();
            picks.sort_unstable();
            picks.dedup();
            prop_assert_eq!(picks.len(), total);

            let sequence = rig.board.sequence(rig.seq).unwrap();
            let fillable = rig.dealers[FREE..]
                .iter()
                .filter(|id| rig.board.dealer(**id).unwrap().is_filling_enabled())
                .count();
            prop_assert!(fillable <= 1);
            prop_assert_eq!(fillable == 0, sequence.is_full());
        }
    }

    #[test]
    fn prop_select_then_clear_round_trips(
        setup in prop::collection::vec(op_strategy(), 0..20),
        dealer in 0..FREE,
        row in 0..POOL.len(),
    ) {
        let mut rig = rig();
        let mut model: Vec<Option<u8>> = vec![None; BENCH];
        for op in &setup {
            let _ = apply(&mut rig, &mut model, op);
        }
        let id = rig.dealers[dealer];
        rig.board.clear(id).unwrap();
        let before = snapshot(&rig.board);

        if rig.board.select(id, row).is_ok() {
            rig.board.clear(id).unwrap();
        }
        prop_assert_eq!(before, snapshot(&rig.board));
    }

    #[test]
    fn prop_compaction_closes_the_gap(len in 2usize..6, removed in 0usize..6) {
        let removed = removed % len;
        let mut board: Board<u8> = Board::new();
        let dealers = board.add_dealers(len);
        board.initialize_group(&dealers, POOL.to_vec()).unwrap();
        let seq = board.create_sequence(&dealers).unwrap();
        for (id, option) in dealers.iter().zip(POOL) {
            board.set_selection(*id, Some(&option)).unwrap();
        }
        let log: EventLog<u8> = EventLog::new();
        board.attach_sequence_listener(seq, Box::new(log.clone())).unwrap();

        board.clear(dealers[removed]).unwrap();

        let mut expected: Vec<Option<u8>> = POOL[..len].iter().copied().map(Some).collect();
        expected.remove(removed);
        expected.push(None);
        let picks: Vec<Option<u8>> =
            dealers.iter().map(|id| board.selection(*id).unwrap().copied()).collect();
        prop_assert_eq!(picks, expected);
        prop_assert_eq!(
            board.sequence(seq).unwrap().rightmost_fillable(),
            RightmostFillable::At(len - 1)
        );
        let expected_events = if removed == len - 1 {
            Vec::new()
        } else {
            vec![LineupEvent::BecameEmpty { sequence: seq, dealer: dealers[len - 1] }]
        };
        prop_assert_eq!(log.take(), expected_events);
        prop_assert!(board.audit().is_ok());
    }

    #[test]
    fn prop_swap_is_silent(len in 2usize..6, position in 0usize..5) {
        let position = position % (len - 1);
        let mut board: Board<u8> = Board::new();
        let dealers = board.add_dealers(len);
        board.initialize_group(&dealers, POOL.to_vec()).unwrap();
        let seq = board.create_sequence(&dealers).unwrap();
        for (id, option) in dealers.iter().zip(POOL) {
            board.set_selection(*id, Some(&option)).unwrap();
        }
        let log: EventLog<u8> = EventLog::new();
        board.attach_sequence_listener(seq, Box::new(log.clone())).unwrap();

        board.swap_right(seq, dealers[position]).unwrap();

        let mut expected: Vec<Option<u8>> = POOL[..len].iter().copied().map(Some).collect();
        expected.swap(position, position + 1);
        let picks: Vec<Option<u8>> =
            dealers.iter().map(|id| board.selection(*id).unwrap().copied()).collect();
        prop_assert_eq!(picks, expected);
        prop_assert!(board.sequence(seq).unwrap().is_full());
        prop_assert!(log.is_empty());
        prop_assert!(board.audit().is_ok());
    }
}
