// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests for the hover responder.

mod common;

use common::{DOC, Host, Recorder, TestTree, at, touch};
use kurbo::{Insets, Point, Rect};
use understory_event_state::drag::{DragConfig, drag};
use understory_event_state::hover::{HoverConfig, hover};
use understory_responder::event::EventData;
use understory_responder::types::{EventType, PointerType};

fn recorded(rec: &Recorder) -> HoverConfig<u32> {
    HoverConfig::new()
        .on_hover_in(rec.event())
        .on_hover_out(rec.event())
        .on_hover_move(rec.event())
        .on_hover_change(rec.change("hoverchange"))
}

/// A card (1) with a child (2), and a small target (3) with a 20px hit slop.
fn card(config: HoverConfig<u32>) -> TestTree {
    TestTree::new()
        .child(1, 0)
        .child(2, 1)
        .child(3, 0)
        .bounds(1, Rect::new(0.0, 0.0, 100.0, 100.0))
        .bounds(2, Rect::new(10.0, 10.0, 50.0, 50.0))
        .bounds(3, Rect::new(200.0, 0.0, 300.0, 100.0))
        .hit_slop(3, Insets::uniform(20.0))
        .attach(1, hover(config))
}

#[test]
fn hover_in_move_out() {
    let rec = Recorder::new();
    let mut host = Host::new(card(recorded(&rec)));

    host.send(at(EventType::PointerOver, 1, 50.0, 50.0).with_related_target(0));
    host.send(at(EventType::PointerMove, 1, 60.0, 50.0));
    host.send(at(EventType::PointerOut, 1, 150.0, 50.0).with_related_target(0));

    assert_eq!(
        rec.take(),
        [
            "hoverin",
            "hoverchange(true)",
            "hovermove",
            "hoverout",
            "hoverchange(false)"
        ]
    );
}

#[test]
fn hover_move_carries_the_position() {
    let rec = Recorder::new();
    let mut host = Host::new(card(HoverConfig::new().on_hover_move(rec.event())));

    host.send(at(EventType::PointerOver, 1, 50.0, 50.0));
    host.send(at(EventType::PointerMove, 2, 20.0, 30.0));

    let events = rec.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data, EventData::Position(Point::new(20.0, 30.0)));
    assert_eq!(events[0].target, 1);
}

#[test]
fn moving_between_own_children_is_not_reported() {
    let rec = Recorder::new();
    let mut host = Host::new(card(
        HoverConfig::new()
            .on_hover_in(rec.event())
            .on_hover_out(rec.event()),
    ));

    host.send(at(EventType::PointerOver, 1, 5.0, 5.0).with_related_target(0));
    // Into the child and back.
    host.send(at(EventType::PointerOut, 1, 20.0, 20.0).with_related_target(2));
    host.send(at(EventType::PointerOver, 2, 20.0, 20.0).with_related_target(1));
    host.send(at(EventType::PointerOut, 2, 5.0, 5.0).with_related_target(1));
    host.send(at(EventType::PointerOver, 1, 5.0, 5.0).with_related_target(2));
    assert_eq!(rec.take(), ["hoverin"]);

    // Leaving the whole card from the child.
    host.send(at(EventType::PointerOver, 2, 20.0, 20.0).with_related_target(1));
    host.send(at(EventType::PointerOut, 2, 150.0, 20.0).with_related_target(0));
    assert_eq!(rec.take(), ["hoverout"]);
}

#[test]
fn touch_never_hovers_until_reset() {
    let rec = Recorder::new();
    let mut host = Host::new(card(recorded(&rec)));

    host.send(touch(EventType::TouchStart, 1, 1, 50.0, 50.0));
    host.send(
        at(EventType::PointerOver, 1, 50.0, 50.0)
            .with_pointer_type(PointerType::Touch)
            .with_related_target(0),
    );
    // Compatibility mouse events emulated after the touch.
    host.send(at(EventType::MouseOver, 1, 50.0, 50.0).with_related_target(0));
    host.send(at(EventType::MouseMove, 1, 50.0, 50.0));
    assert!(rec.take().is_empty());

    host.send(at(EventType::MouseOut, 1, 150.0, 50.0).with_related_target(0));
    assert!(rec.take().is_empty());

    // A real mouse afterwards hovers again.
    host.send(at(EventType::PointerOver, 1, 50.0, 50.0).with_related_target(0));
    assert_eq!(rec.take(), ["hoverin", "hoverchange(true)"]);
}

#[test]
fn touch_pointer_out_resets_suppression() {
    let rec = Recorder::new();
    let mut host = Host::new(card(HoverConfig::new().on_hover_in(rec.event())));

    host.send(touch(EventType::TouchStart, 1, 1, 50.0, 50.0));
    host.send(at(EventType::PointerOut, 1, 50.0, 50.0).with_pointer_type(PointerType::Touch));
    host.send(at(EventType::PointerOver, 1, 50.0, 50.0).with_related_target(0));

    assert_eq!(rec.take(), ["hoverin"]);
}

#[test]
fn hit_slop_band_defers_and_demotes_hover() {
    let rec = Recorder::new();
    let tree = card(HoverConfig::new()).attach(3, hover(recorded(&rec)));
    let mut host = Host::new(tree);

    // Entering through the slop band does not hover.
    host.send(at(EventType::PointerOver, 3, 190.0, 50.0).with_related_target(0));
    host.send(at(EventType::PointerMove, 3, 195.0, 50.0));
    assert!(rec.take().is_empty());

    // Onto the real target.
    host.send(at(EventType::PointerMove, 3, 250.0, 50.0));
    assert_eq!(rec.take(), ["hoverin", "hoverchange(true)"]);

    host.send(at(EventType::PointerMove, 3, 260.0, 50.0));
    assert_eq!(rec.take(), ["hovermove"]);

    // Back into the band demotes without a pointer out.
    host.send(at(EventType::PointerMove, 3, 190.0, 50.0));
    assert_eq!(rec.take(), ["hoverout", "hoverchange(false)"]);

    // And leaving it re-hovers.
    host.send(at(EventType::PointerMove, 3, 210.0, 50.0));
    assert_eq!(rec.take(), ["hoverin", "hoverchange(true)"]);
}

#[test]
fn owned_document_blocks_hover() {
    let rec = Recorder::new();
    let tree = card(recorded(&rec))
        .child(4, 0)
        .bounds(4, Rect::new(0.0, 200.0, 100.0, 300.0))
        .attach(4, drag(DragConfig::new().on_should_claim_ownership(|_| true)));
    let mut host = Host::new(tree);

    host.send(at(EventType::PointerDown, 4, 50.0, 250.0));
    host.send(at(EventType::PointerMove, 4, 50.0, 150.0));
    assert_eq!(host.manager.owner(DOC), Some(4));

    host.send(at(EventType::PointerOver, 1, 50.0, 50.0).with_related_target(0));
    assert!(rec.take().is_empty());

    host.send(at(EventType::PointerUp, 1, 50.0, 50.0));
    host.send(at(EventType::PointerOut, 1, 150.0, 50.0).with_related_target(0));
    host.send(at(EventType::PointerOver, 1, 50.0, 50.0).with_related_target(0));
    assert_eq!(rec.take(), ["hoverin", "hoverchange(true)"]);
}

#[test]
fn disabled_hover_is_silent() {
    let rec = Recorder::new();
    let mut host = Host::new(card(recorded(&rec).disabled(true)));

    host.send(at(EventType::PointerOver, 1, 50.0, 50.0).with_related_target(0));
    host.send(at(EventType::PointerMove, 1, 60.0, 50.0));
    host.send(at(EventType::PointerOut, 1, 150.0, 50.0).with_related_target(0));

    assert!(rec.take().is_empty());
}

#[test]
fn cancel_ends_hover() {
    let rec = Recorder::new();
    let mut host = Host::new(card(recorded(&rec)));

    host.send(at(EventType::PointerOver, 1, 50.0, 50.0).with_related_target(0));
    host.send(at(EventType::PointerCancel, 1, 50.0, 50.0));

    assert_eq!(
        rec.take(),
        ["hoverin", "hoverchange(true)", "hoverout", "hoverchange(false)"]
    );
}
