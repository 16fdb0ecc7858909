// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host surface boundary.
//!
//! The recognizer never talks to a windowing system directly. A host implements
//! [`InputHost`] to say what kind of input it produces, to register and remove
//! raw listeners, and to describe where the surface sits in its layout.
//!
//! Listener identity matters: the [`ListenerId`] a host returns from
//! [`InputHost::listen`] is stored by the recognizer and handed back, unchanged,
//! to [`InputHost::unlisten`] on stop. Hosts that remove callbacks by identity
//! can rely on getting the very handle they issued.

use crate::geometry::LayoutOrigin;
use crate::raw::RawEventKind;

/// Host-issued handle for a registered raw listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Input family a host produces; fixed for the lifetime of a started recognizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputMode {
    /// Mouse-only host: down/move/up and wheel.
    Mouse,
    /// Touch-capable host: touch start/move/end.
    Touch,
}

impl InputMode {
    /// The raw listeners this mode needs.
    pub fn listeners(self) -> &'static [RawEventKind] {
        match self {
            Self::Mouse => &RawEventKind::MOUSE,
            Self::Touch => &RawEventKind::TOUCH,
        }
    }

    /// Whether a raw notification belongs to this mode.
    pub fn accepts(self, kind: RawEventKind) -> bool {
        self.listeners().contains(&kind)
    }
}

/// What a recognizer needs from the surface it is attached to.
pub trait InputHost {
    /// True if the host delivers touch input; mouse input is used otherwise.
    fn supports_touch(&self) -> bool;

    /// Register for one kind of raw notification.
    fn listen(&mut self, kind: RawEventKind) -> ListenerId;

    /// Remove a listener previously returned by [`listen`](Self::listen).
    fn unlisten(&mut self, kind: RawEventKind, id: ListenerId);

    /// Where the surface's local origin is, or `None` if it cannot be resolved.
    fn layout_origin(&self) -> Option<LayoutOrigin>;

    /// The input family this host produces.
    fn input_mode(&self) -> InputMode {
        if self.supports_touch() {
            InputMode::Touch
        } else {
            InputMode::Mouse
        }
    }
}
