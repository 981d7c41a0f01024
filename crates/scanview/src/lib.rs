#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Camera geometry for rendering body scans from a calibrated capture rig: scene camera
//! settings to pinhole matrices in [`camera`], rig and export files in [`io`].

#[doc(inline)]
pub use scanview_camera as camera;

#[doc(inline)]
pub use scanview_io as io;
