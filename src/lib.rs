//! Generator for the SAFE app launcher icons.
//!
//! [`render::render`] draws one icon in memory; [`icon_gen::generate_icons`]
//! renders every entry of the output manifest and writes it as PNG.

pub mod draw;
pub mod font;
pub mod icon_gen;
pub mod render;
