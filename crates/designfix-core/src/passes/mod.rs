//! Conversion pass modules.
//!
//! Each pass is a self-contained mutation over the markup tree, executed in
//! priority order (file names carry the priority). The gaps at 10 and 30 are
//! reserved for the host application's structural-cleaning and
//! CSS-variable-extraction passes, which run between these.

pub mod p0_font_detection;
pub mod p20_post_fixes;
pub mod p40_tailwind;
