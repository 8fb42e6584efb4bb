//! Application layer for murmur
//!
//! Pure state machines and a generic runtime for the single-room chat view,
//! so simulation tests drive the same code the terminal client runs.
//!
//! # Components
//!
//! - [`ChatView`]: view state machine (session, feed, composer)
//! - [`SessionManager`], [`FeedSubscriber`], [`Composer`]: its three parts
//! - [`Driver`]: trait for platform-specific input and rendering
//! - [`Runtime`]: async orchestration loop executing [`ViewAction`]s against
//!   the collaborators

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod composer;
mod driver;
mod event;
mod feed;
mod input;
mod runtime;
mod session;
mod state;
mod view;

pub use action::{LogLevel, ScrollDirection, ViewAction};
pub use composer::Composer;
pub use driver::Driver;
pub use event::{FeedId, SendId, ViewEvent};
pub use feed::FeedSubscriber;
pub use input::KeyInput;
pub use runtime::Runtime;
pub use session::SessionManager;
pub use state::ViewState;
pub use view::ChatView;
