//! Terminal input service: crossterm events translated into bar input events.
//!
//! Design invariants:
//! * Buttons fire on release; wheel motion has no release and fires immediately as
//!   buttons 4-7.
//! * A `Crossing` is emitted only when the pointer moves between regions (title, a slave
//!   row, outside); motion inside one region is silent.
//! * Hit-testing reads the latest `PointerLayout` published by the event loop, so title
//!   moves and collapses take effect on the next pointer event.

mod async_service;
mod key_map;
mod pointer;

pub use async_service::AsyncInputShutdown;
pub use pointer::PointerLayout;

use async_service::spawn_async_event_task;
use core_events::Event;
use std::sync::atomic::AtomicU64;
use tokio::sync::watch;
use tokio::task::JoinHandle;

// Pump counters, read by the shutdown log.
pub static PUMP_STARTS: AtomicU64 = AtomicU64::new(0);
pub static PUMP_STOPS: AtomicU64 = AtomicU64::new(0);
pub static KEYS_FORWARDED: AtomicU64 = AtomicU64::new(0);
pub static POINTER_EVENTS: AtomicU64 = AtomicU64::new(0);

/// Start the pointer/keyboard pump on the crossterm event stream. Hit-testing follows
/// `layout`; the returned handle stops the pump without waiting for the next terminal event.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
    layout: watch::Receiver<PointerLayout>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender, layout)
}
