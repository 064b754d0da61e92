#![forbid(unsafe_code)]

//! Deterministic test host for glissade.
//!
//! [`host::RecordingHost`] implements every `glissade-core` collaborator
//! trait with recording, fault-injecting fakes and a virtual clock.
//! [`rig::Rig`] drives a carousel over it the way a browser would.

pub mod host;
pub mod rig;

pub use host::{
    InjectedFault, ManualTimers, RecordingButtons, RecordingHost, RecordingStyle,
    ScriptedGeometry,
};
pub use rig::Rig;
