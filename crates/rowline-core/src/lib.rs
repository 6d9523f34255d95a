//! Core plumbing for Rowline.
//!
//! This crate provides the event-driven building blocks the list toolbar is
//! assembled from. None of it knows about rows, filters or columns:
//!
//! - **Signal/Slot System**: synchronous, blockable change notification
//! - **Task Queue**: effects deferred until the current synchronous batch ends
//! - **Debouncer**: coalescing of rapid successive input
//! - **Logging**: `tracing` targets and span names
//!
//! Everything is single-threaded and cooperative. Concurrency concerns are
//! about the ordering of deferred work, not about parallel execution.
//!
//! # Example
//!
//! ```
//! use rowline_core::{Debouncer, Signal};
//! use std::time::{Duration, Instant};
//!
//! let search = Signal::<String>::new();
//! search.connect(|text| println!("search: {text}"));
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(300));
//! let start = Instant::now();
//! debouncer.submit_at("ali".to_string(), start);
//! debouncer.submit_at("alice".to_string(), start + Duration::from_millis(100));
//!
//! if let Some(text) = debouncer.poll_at(start + Duration::from_millis(400)) {
//!     search.emit(text);
//! }
//! ```

pub mod debounce;
pub mod logging;
pub mod signal;
pub mod task;

pub use debounce::Debouncer;
pub use signal::{ConnectionId, Signal};
pub use task::{DeferredTask, TaskId, TaskQueue};
