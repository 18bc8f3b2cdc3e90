use std::cell::{Cell, RefCell};
use std::rc::Rc;

use maze_chase::events::{
    DotCollected, EventKind, EventMediator, GameEvent, GhostEaten, LevelLoaded, PacmanDied, ScoreChanged,
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

#[test]
fn test_listeners_run_in_registration_order() {
    let bus = EventMediator::new();
    let order = Rc::new(RefCell::new(Vec::new()));
    for n in 0..3 {
        let order = Rc::clone(&order);
        bus.register::<DotCollected, _>(move |_| order.borrow_mut().push(n));
    }

    bus.notify(DotCollected);
    assert_eq!(*order.borrow(), vec![0, 1, 2]);
}

#[test]
fn test_typed_payload_reaches_listener() {
    let bus = EventMediator::new();
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    bus.register::<LevelLoaded, _>(move |event| *sink.borrow_mut() = Some(event.clone()));

    bus.notify(LevelLoaded {
        level: 2,
        path: "levels/level2.txt".into(),
    });

    assert_eq!(
        *seen.borrow(),
        Some(LevelLoaded {
            level: 2,
            path: "levels/level2.txt".into()
        })
    );
}

#[test]
fn test_other_kinds_are_not_delivered() {
    let bus = EventMediator::new();
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    bus.register::<GhostEaten, _>(move |_| counter.set(counter.get() + 1));

    bus.notify(DotCollected);
    bus.notify(PacmanDied { game_over: false });
    assert_that(&hits.get()).is_equal_to(0);

    bus.notify(GhostEaten { ghost: 4 });
    assert_that(&hits.get()).is_equal_to(1);
}

#[test]
fn test_unregister() {
    let bus = EventMediator::new();
    let id = bus.register::<DotCollected, _>(|_| {});

    assert_that(&bus.listener_count(EventKind::DotCollected)).is_equal_to(1);
    assert_that(&bus.unregister(EventKind::GhostEaten, id)).is_false();
    assert_that(&bus.unregister(EventKind::DotCollected, id)).is_true();
    assert_that(&bus.unregister(EventKind::DotCollected, id)).is_false();
    assert_that(&bus.listener_count(EventKind::DotCollected)).is_equal_to(0);
}

#[test]
fn test_registration_during_dispatch_applies_next_time() {
    let bus = Rc::new(EventMediator::new());
    let late_hits = Rc::new(Cell::new(0));

    let weak = Rc::downgrade(&bus);
    let hits = Rc::clone(&late_hits);
    bus.register::<DotCollected, _>(move |_| {
        if let Some(bus) = weak.upgrade() {
            let hits = Rc::clone(&hits);
            bus.register::<DotCollected, _>(move |_| hits.set(hits.get() + 1));
        }
    });

    bus.notify(DotCollected);
    assert_that(&late_hits.get()).is_equal_to(0);

    bus.notify(DotCollected);
    assert_that(&late_hits.get()).is_equal_to(1);
}

#[test]
fn test_unregistration_during_dispatch_applies_next_time() {
    let bus = Rc::new(EventMediator::new());
    let second_hits = Rc::new(Cell::new(0));
    let second_id = Rc::new(Cell::new(None));

    let weak = Rc::downgrade(&bus);
    let target = Rc::clone(&second_id);
    bus.register::<DotCollected, _>(move |_| {
        if let (Some(bus), Some(id)) = (weak.upgrade(), target.get()) {
            bus.unregister(EventKind::DotCollected, id);
        }
    });
    let hits = Rc::clone(&second_hits);
    second_id.set(Some(bus.register::<DotCollected, _>(move |_| hits.set(hits.get() + 1))));

    bus.notify(DotCollected);
    assert_that(&second_hits.get()).is_equal_to(1);

    bus.notify(DotCollected);
    assert_that(&second_hits.get()).is_equal_to(1);
}

#[test]
fn test_nested_notify_dispatches_immediately() {
    let bus = Rc::new(EventMediator::new());
    let log = common::record_all(&bus);

    let weak = Rc::downgrade(&bus);
    bus.register::<DotCollected, _>(move |_| {
        if let Some(bus) = weak.upgrade() {
            bus.notify(ScoreChanged {
                score: 1.0,
                points_added: 1.0,
            });
        }
    });

    bus.notify(DotCollected);

    // The recorder for DotCollected was registered first, so it sees the dot
    // before the nested score change is dispatched.
    assert_eq!(common::kinds(&log), vec![EventKind::DotCollected, EventKind::ScoreChanged]);
}

#[test]
fn test_reset_drops_every_listener() {
    let bus = EventMediator::new();
    let log = common::record_all(&bus);
    bus.reset();

    bus.notify(DotCollected);
    assert_that(&log.borrow().is_empty()).is_true();
    assert_that(&bus.listener_count(EventKind::ScoreChanged)).is_equal_to(0);
}

#[test]
fn test_event_kind_matches_payload() {
    let event: GameEvent = GhostEaten { ghost: 1 }.into();
    assert_that(&event.kind()).is_equal_to(EventKind::GhostEaten);
}

#[test]
fn test_buses_are_isolated() {
    let first = EventMediator::new();
    let second = EventMediator::new();
    let log = common::record_all(&first);

    second.notify(DotCollected);
    assert_that(&log.borrow().is_empty()).is_true();
}
