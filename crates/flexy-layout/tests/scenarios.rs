//! End-to-end scenarios driving the engine the way a host would.

use flexy_layout::{
    Block, BlockConfig, CompositeBlock, DragEffect, LayoutConfig, LayoutEngine, Movable,
    MoveOutcome, NoopReason,
};

const EPS: f64 = 1e-6;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

fn lengths(engine: &LayoutEngine) -> Vec<f64> {
    engine.lengths().collect()
}

#[test]
fn shrinking_past_zero_reports_what_was_applied() {
    let mut block = Block::new(0.0);
    block.move_length(200.0);
    assert_eq!(block.move_length(-300.0), -200.0);
    assert_eq!(block.length(), 0.0);
}

#[test]
fn saturated_member_shortfall_moves_to_the_others() {
    let mut roomy = Block::new(0.0).with_min_length(40.0);
    roomy.move_length(1040.0);
    let mut tight = Block::new(0.0).with_min_length(5.0);
    tight.move_length(15.0);
    assert_eq!(roomy.available_length(), 1000.0);
    assert_eq!(tight.available_length(), 10.0);

    let mut composite = CompositeBlock::from_members([&mut roomy, &mut tight]);
    assert_eq!(composite.available_length(), 1010.0);
    // tight is offered -150 but only holds 15; the rest lands on roomy in
    // the following round.
    let applied = composite.move_length(-300.0);
    composite.clean();

    assert_close(applied, -300.0);
    assert_close(tight.length(), 0.0);
    assert_close(roomy.length(), 1040.0 - 285.0);
}

#[test]
fn splitter_range_stops_at_neighbouring_splitters() {
    let mut engine = LayoutEngine::new(LayoutConfig::default().container_length(310.0)).unwrap();
    for i in 0..3 {
        if i > 0 {
            engine.add_splitter();
        }
        engine.add_block(BlockConfig::fixed(100.0)).unwrap();
    }
    assert_eq!(engine.len(), 5);
    assert_eq!(lengths(&engine), vec![100.0, 5.0, 100.0, 5.0, 100.0]);

    let range = engine.splitter_range(1).unwrap();
    assert_close(range.before, 100.0);
    assert_close(range.after, 100.0);
}

#[test]
fn splitter_range_covers_whole_run_after() {
    let mut engine = LayoutEngine::new(LayoutConfig::default().container_length(305.0)).unwrap();
    engine.add_block(BlockConfig::fixed(100.0)).unwrap();
    engine.add_splitter();
    engine.add_block(BlockConfig::fixed(100.0)).unwrap();
    engine.add_block(BlockConfig::fixed(100.0)).unwrap();

    let range = engine.splitter_range(1).unwrap();
    assert_close(range.before, engine.block(0).unwrap().length());
    assert_close(
        range.after,
        engine.block(2).unwrap().length() + engine.block(3).unwrap().length(),
    );
    assert_close(range.before + range.after, 300.0);
}

#[test]
fn locked_block_refuses_to_grow() {
    let mut engine = LayoutEngine::new(LayoutConfig::default().container_length(300.0)).unwrap();
    for _ in 0..3 {
        engine.add_block(BlockConfig::flexible()).unwrap();
    }
    let before = lengths(&engine);

    engine.toggle_lock_block(1, true);
    assert_eq!(
        engine.move_block_length(1, 50.0),
        MoveOutcome::Noop {
            reason: NoopReason::TargetCannotMove
        }
    );
    assert_eq!(lengths(&engine), before);
}

#[test]
fn host_session() {
    let config: LayoutConfig =
        serde_json::from_str(r#"{"orientation":"horizontal","splitter_length":4}"#).unwrap();
    let mut engine = LayoutEngine::new(config).unwrap();

    let nav = engine.add_block(BlockConfig::fixed(120.0)).unwrap();
    let first = engine.add_splitter();
    let main = engine.add_block(BlockConfig::flexible().min_length(200.0)).unwrap();
    let second = engine.add_splitter();
    let aside = engine.add_block(BlockConfig::flexible()).unwrap();

    engine.set_container_length(1008.0);
    assert_close(engine.block(nav).unwrap().length(), 120.0);
    assert_close(engine.block(main).unwrap().length(), 440.0);
    assert_close(engine.block(aside).unwrap().length(), 440.0);

    // drag the second splitter 100 px to the right
    engine.pointer_down_at(second, 700.0, 12.0);
    engine.pointer_move_at(760.0, 12.0);
    assert_close(engine.splitter(second).unwrap().ghost_position, 60.0);
    let commit = engine.pointer_up_at(800.0, 12.0);
    assert!(matches!(
        commit.effect,
        DragEffect::Committed { outcome, .. } if outcome.is_applied()
    ));
    assert_close(engine.block(main).unwrap().length(), 540.0);
    assert_close(engine.block(aside).unwrap().length(), 340.0);

    // the first splitter can only take what `main` has above its floor
    let range = engine.splitter_range(first).unwrap();
    assert_close(range.before, 120.0);
    assert_close(range.after, 340.0);

    // resize resets to the configured allocation
    engine.set_container_length(1408.0);
    assert_close(engine.block(nav).unwrap().length(), 120.0);
    assert_close(engine.block(main).unwrap().length(), 640.0);
    assert_close(engine.block(aside).unwrap().length(), 640.0);
    assert_close(engine.total_length(), 1408.0);
}
