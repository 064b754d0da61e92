#![forbid(unsafe_code)]

//! Browser adapter for glissade.
//!
//! The platform-independent pieces (CSS formatting, option parsing, frame
//! layout) build on every target. The DOM host and the exported
//! `WebCarousel` only exist on `wasm32`.
//!
//! ```js
//! import init, { WebCarousel } from "./glissade_web.js";
//! await init();
//! for (const el of document.querySelectorAll(".glissade")) {
//!   new WebCarousel(el);
//! }
//! ```

pub mod css;
pub mod layout;
pub mod options;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{DomError, WebCarousel};
