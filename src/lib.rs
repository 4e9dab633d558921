#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Loader and runtime for IMDL models.
//!
//! IMDL is a chunked little-endian container holding everything a renderer
//! needs for one model: embedded textures, PBR materials, interleaved
//! vertices, 32-bit indices, a node hierarchy and keyframe animation clips.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use imdl::{Animator, ImdlLoader, LoopMode};
//!
//! let model = Arc::new(ImdlLoader::default().load_file("robot.imdl")?);
//! let mut animator = Animator::new(model.clone());
//! animator.play(0, LoopMode::Loop);
//!
//! // every frame
//! animator.update(dt);
//! let world = animator.world_matrices();
//! ```

pub mod animation;
pub mod assets;
pub mod errors;
pub mod renderer;
pub mod scene;

pub use animation::{AnimationClip, Animator, LoopMode, PlayMode};
pub use assets::{ImdlLoader, ImdlWriter, LoaderSettings, Model, ModelData};
pub use errors::{ImdlError, Result};
pub use renderer::{DrawItem, ResourceRegistry, collect_draw_items};
pub use scene::{Hierarchy, Transform};
