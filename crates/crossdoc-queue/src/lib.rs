//! FIFO task scheduling for cross-document message delivery.
//!
//! This is the lowest layer of crossdoc: a minimal stand-in for the event
//! loop that a document runtime would provide. Every delivery in the stack is
//! deferred through a [`Scheduler`] so that `emit`/`subscribe`/`unsubscribe`
//! stay synchronous while delivery remains an asynchronous callback, in FIFO
//! order.

pub mod scheduler;

pub use scheduler::Scheduler;
