//! Scene graph nodes and the secondary animators that move them

pub mod animator;
pub mod graph;

pub use animator::{euler_xyz, from_euler_xyz, FaceCamera, FrameContext, SecondaryAnimator};
pub use graph::{SceneGraph, SceneNode};
