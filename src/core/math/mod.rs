//=========================================================================
// Math
//=========================================================================
//
// Thin layer over `glam`. Only the transform type lives here; vectors,
// matrices and quaternions are glam's own.
//
//=========================================================================

mod transform;

pub use transform::Transform;
