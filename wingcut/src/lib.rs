//! Interactive segmentation of moth specimen photographs into forewings,
//! backwings and body.
//!
//! The engine is host-agnostic: a [`Session`] consumes pointer and key
//! events, keeps the user's annotations in a [`TraceStore`] and carves a
//! [`ComponentSet`] out of the original image whenever they change. Image
//! decoding, persistence and windowing belong to the host.

pub mod carving;
pub mod component;
pub mod compositor;
pub mod config;
pub mod debounce;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod record;
pub mod session;
pub mod shared;
pub mod store;

pub use component::{Component, ComponentKind, ComponentSet};
pub use config::SessionConfig;
pub use error::{Error, RecordError, Result, ThresholdError};
pub use geometry::MirrorLine;
pub use raster::{Canvas, Mask, Rect, Rgb};
pub use record::{SessionRecord, TrackingLabel};
pub use session::{
    Action, Button, Flow, InteractionMode, Key, KeyHandler, LoopState, PointerEvent,
    PointerHandler, RecomputeStats, Session, SessionStatus,
};
pub use shared::SharedSession;
pub use store::{ResetLevel, Side, Threshold, TraceStore};
