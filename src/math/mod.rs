//! Math utilities for the movement and collision core.
//!
//! This module provides the small amount of linear algebra the core needs:
//! a 3-component vector, a 4x4 affine matrix and a translation/rotation/scale
//! transform that can be composed with a parent to produce world-space matrices.
//!
//! # Module Organization
//!
//! - [`vec`] contains [`Vec3`] and its operators
//! - [`mat`] contains [`Mat4`] (row-vector convention, translation in the last row)
//! - [`transform`] contains [`Transform`] and parent/child composition
//!
//! All matrix and vector types are `bytemuck::Pod`, so a renderer can upload them
//! without conversion.

pub mod mat;
pub mod transform;
pub mod vec;

pub use mat::Mat4;
pub use transform::Transform;
pub use vec::Vec3;
