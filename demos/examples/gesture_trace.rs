// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted input traces through `understory_gesture`.
//!
//! This example drives a [`GestureRecognizer`] from two mock hosts:
//! - a desktop canvas receiving a mouse tap, a drag and a wheel turn,
//! - a touch canvas receiving a one-finger tap and a two-finger pinch that ends
//!   by lifting the first finger.
//!
//! Each normalized event is printed as it is published.
//!
//! Run:
//! - `cargo run -p understory_gesture_demos --example gesture_trace`

use kurbo::{Point, Vec2};
use understory_gesture::{
    Buttons, ContactKind, GestureEvent, GestureRecognizer, InputHost, InputOutcome, LayoutOrigin,
    ListenerId, RawContact, RawEventKind, RawInput, TouchList,
};

/// A canvas nested in a scrolled container.
struct MockCanvas {
    touch: bool,
    next: u64,
}

impl InputHost for MockCanvas {
    fn supports_touch(&self) -> bool {
        self.touch
    }

    fn listen(&mut self, kind: RawEventKind) -> ListenerId {
        self.next += 1;
        println!("  host: listen {kind:?} -> #{}", self.next);
        ListenerId(self.next)
    }

    fn unlisten(&mut self, kind: RawEventKind, id: ListenerId) {
        println!("  host: unlisten {kind:?} #{}", id.0);
    }

    fn layout_origin(&self) -> Option<LayoutOrigin> {
        Some(LayoutOrigin::Container {
            container_offset: Vec2::new(40.0, 60.0),
        })
    }
}

fn print_event(ev: &GestureEvent) {
    match ev {
        GestureEvent::Zoom(z) => println!(
            "    {:?} {} value={:+.2} center=({:.1}, {:.1})",
            ev.kind(),
            channel(ev.contact()),
            z.value,
            z.center.x,
            z.center.y,
        ),
        GestureEvent::Click(c) => println!(
            "    Click at ({:.0}, {:.0}) button={:?}",
            c.position.x, c.position.y, c.button
        ),
        _ => println!(
            "    {:?} {} at ({:.0}, {:.0}) d=({:+.0}, {:+.0}) drag={}",
            ev.kind(),
            channel(ev.contact()),
            ev.position().x,
            ev.position().y,
            ev.delta().x,
            ev.delta().y,
            ev.drag(),
        ),
    }
}

fn channel(contact: Option<ContactKind>) -> &'static str {
    match contact {
        Some(ContactKind::Mouse) => "mouse",
        Some(ContactKind::Single) => "single",
        Some(ContactKind::Pinch) => "pinch",
        None => "-",
    }
}

fn touches(contacts: &[(u64, f64, f64)]) -> TouchList {
    contacts
        .iter()
        .map(|&(id, x, y)| RawContact::new(id, x, y))
        .collect()
}

/// Absolute position of a surface-local point in the mock container.
fn at(x: f64, y: f64) -> Point {
    Point::new(x + 40.0, y + 60.0)
}

fn mouse_move(x: f64, y: f64, buttons: Buttons, over_surface: bool) -> RawInput {
    RawInput::MouseMove {
        position: at(x, y),
        buttons,
        over_surface,
    }
}

fn wheel(x: f64, y: f64, delta_y: f64, over_surface: bool) -> RawInput {
    RawInput::Wheel {
        position: at(x, y),
        delta_y,
        over_surface,
    }
}

fn touch_start(contacts: &[(u64, f64, f64)]) -> RawInput {
    RawInput::TouchStart {
        touches: touches(contacts),
    }
}

fn touch_move(active: &[(u64, f64, f64)], changed: &[(u64, f64, f64)]) -> RawInput {
    RawInput::TouchMove {
        touches: touches(active),
        changed: touches(changed),
    }
}

fn touch_end(active: &[(u64, f64, f64)], changed: &[(u64, f64, f64)]) -> RawInput {
    RawInput::TouchEnd {
        touches: touches(active),
        changed: touches(changed),
    }
}

fn run(title: &str, touch: bool, script: &[(u64, RawInput)]) {
    println!("\n== {title} ==");
    let mut host = MockCanvas { touch, next: 0 };
    let mut recognizer = GestureRecognizer::default();
    recognizer.subscribe(print_event);
    recognizer.start(&mut host);

    for (now, input) in script {
        println!("  t={now:>4} {:?}", input.kind());
        if let InputOutcome::Ignored(reason) = recognizer.handle(input, *now) {
            println!("    (ignored: {reason:?})");
        }
    }

    recognizer.stop(&mut host);
}

fn main() {
    let none = Buttons::empty();
    let left = Buttons::PRIMARY;
    let right = Buttons::SECONDARY;

    run(
        "desktop",
        false,
        &[
            (0, mouse_move(10.0, 10.0, none, true)),
            (5, mouse_move(14.0, 13.0, none, true)),
            (
                10,
                RawInput::MouseDown {
                    position: at(100.0, 100.0),
                    buttons: left,
                },
            ),
            (110, mouse_move(102.0, 101.0, left, true)),
            (
                210,
                RawInput::MouseUp {
                    position: at(102.0, 101.0),
                },
            ),
            (
                400,
                RawInput::MouseDown {
                    position: at(20.0, 20.0),
                    buttons: right,
                },
            ),
            (450, mouse_move(-30.0, 40.0, right, false)),
            (
                500,
                RawInput::MouseUp {
                    position: at(-30.0, 40.0),
                },
            ),
            (600, wheel(50.0, 50.0, -30.0, true)),
            (650, wheel(500.0, 50.0, 10.0, false)),
        ],
    );

    // Touch coordinates are absolute; (140, 160) is surface-local (100, 100).
    run(
        "touch",
        true,
        &[
            (0, touch_start(&[(1, 140.0, 160.0)])),
            (80, touch_end(&[], &[(1, 141.0, 161.0)])),
            (500, touch_start(&[(7, 140.0, 160.0)])),
            (520, touch_start(&[(7, 140.0, 160.0), (8, 170.0, 200.0)])),
            (
                540,
                touch_move(
                    &[(7, 140.0, 160.0), (8, 170.0, 200.0)],
                    &[(8, 170.0, 200.0)],
                ),
            ),
            (
                560,
                touch_move(
                    &[(7, 140.0, 160.0), (8, 200.0, 240.0)],
                    &[(8, 200.0, 240.0)],
                ),
            ),
            (580, touch_end(&[(8, 200.0, 240.0)], &[(7, 140.0, 160.0)])),
            (600, touch_move(&[(8, 210.0, 240.0)], &[(8, 210.0, 240.0)])),
            (620, touch_end(&[], &[(8, 210.0, 240.0)])),
        ],
    );
}
