// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: responder modules for common UI interactions.
//!
//! This crate provides small, focused state machines that plug into the
//! `understory_responder` engine. Each module turns a specific pattern of
//! native events into high-level synthetic events:
//!
//! - [`press`]: press, long press and keyboard activation with press retention
//! - [`hover`]: hover in/out/move, suppressed for touch and in hit-slop bands
//! - [`drag`]: pointer drags with ownership claims and movement deltas
//! - [`swipe`]: horizontal swipes that follow a single touch
//! - [`focus`]: focus entering and leaving a subtree
//!
//! ## Design Philosophy
//!
//! Each module is:
//!
//! - **Minimal and focused**: one interaction pattern per module
//! - **Stateless itself**: per-node state lives in the engine's state arena
//! - **Configured, not subclassed**: a `*Config` builder holds the callbacks
//!   and options; absent callbacks simply mean the feature is off
//! - **Generic**: configurations are parameterized by the host's node type
//!
//! Attach a module to a node with its factory function (`press(config)`,
//! `drag(config)`, …), which returns an
//! [`understory_responder::module::Responder`] the host returns from
//! `ResponderTree::responders`.
//!
//! ## Callbacks
//!
//! Full-event callbacks receive the synthetic
//! [`ResponderEvent`](understory_responder::event::ResponderEvent), whose
//! `target` is the node the event is about and whose `data` carries movement
//! or position where relevant. Change callbacks (`on_press_change`,
//! `on_hover_change`, …) receive only the new boolean value.
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_event_state::press::PressConfig;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let (a, b) = (log.clone(), log.clone());
//! let config: PressConfig<u32> = PressConfig::new()
//!     .on_press(move |e| a.borrow_mut().push(format!("press {}", e.target)))
//!     .on_press_change(move |pressed| b.borrow_mut().push(format!("pressed: {pressed}")));
//! assert!(config.on_press.is_some());
//! assert!(config.on_long_press.is_none());
//! ```
//!
//! ## Gesture tracking
//!
//! Drag and swipe share [`track::Track`], which records where a gesture
//! started and reports displacement from there.
//!
//! This crate is `no_std` compatible (with `alloc`) for all modules.

#![no_std]

extern crate alloc;

pub mod callback;
pub mod drag;
pub mod focus;
pub mod hover;
pub mod press;
pub mod swipe;
pub mod track;
