use crate::frame::FrameError;
use crate::math::{Isometry, Real};

/// The identifier of a coordinate frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u32);

impl FrameId {
    /// The root frame of a [`FrameTree`].
    pub const WORLD: FrameId = FrameId(0);
}

/// Provider of the rigid transforms between coordinate frames.
pub trait FrameTransforms {
    /// The transform mapping coordinates expressed in `from` to coordinates expressed in
    /// `to`, if both frames are known and related.
    fn transform_between(&self, from: FrameId, to: FrameId) -> Option<Isometry<Real>>;

    /// Same as [`FrameTransforms::transform_between`] but reports which frame is missing.
    fn try_transform_between(
        &self,
        from: FrameId,
        to: FrameId,
    ) -> Result<Isometry<Real>, FrameError> {
        self.transform_between(from, to)
            .ok_or(FrameError::Disconnected { from, to })
    }
}

#[derive(Copy, Clone, Debug)]
struct FrameNode {
    parent: Option<FrameId>,
    to_parent: Isometry<Real>,
}

/// A tree of frames, each placed relative to its parent.
///
/// The root is [`FrameId::WORLD`].
#[derive(Clone, Debug)]
pub struct FrameTree {
    nodes: Vec<FrameNode>,
}

impl Default for FrameTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTree {
    /// A tree with only the world frame.
    pub fn new() -> Self {
        Self {
            nodes: vec![FrameNode {
                parent: None,
                to_parent: Isometry::identity(),
            }],
        }
    }

    /// Adds a frame whose coordinates are mapped to `parent` by `to_parent`.
    pub fn add_frame(
        &mut self,
        parent: FrameId,
        to_parent: Isometry<Real>,
    ) -> Result<FrameId, FrameError> {
        if !self.contains(parent) {
            return Err(FrameError::UnknownFrame(parent));
        }

        let id = FrameId(self.nodes.len() as u32);
        self.nodes.push(FrameNode {
            parent: Some(parent),
            to_parent,
        });
        Ok(id)
    }

    /// Moves `frame` relative to its parent.
    pub fn set_transform_to_parent(
        &mut self,
        frame: FrameId,
        to_parent: Isometry<Real>,
    ) -> Result<(), FrameError> {
        let node = self
            .nodes
            .get_mut(frame.0 as usize)
            .ok_or(FrameError::UnknownFrame(frame))?;
        node.to_parent = to_parent;
        Ok(())
    }

    /// Is `frame` part of this tree?
    pub fn contains(&self, frame: FrameId) -> bool {
        (frame.0 as usize) < self.nodes.len()
    }

    /// The parent of `frame`, `None` for the world frame and unknown frames.
    pub fn parent(&self, frame: FrameId) -> Option<FrameId> {
        self.nodes.get(frame.0 as usize)?.parent
    }

    /// The transform mapping coordinates expressed in `frame` to world coordinates.
    pub fn transform_to_world(&self, frame: FrameId) -> Option<Isometry<Real>> {
        let mut result = Isometry::identity();
        let mut node = self.nodes.get(frame.0 as usize)?;

        loop {
            result = node.to_parent * result;

            match node.parent {
                Some(parent) => node = self.nodes.get(parent.0 as usize)?,
                None => return Some(result),
            }
        }
    }
}

impl FrameTransforms for FrameTree {
    fn transform_between(&self, from: FrameId, to: FrameId) -> Option<Isometry<Real>> {
        if from == to {
            return self.contains(from).then(Isometry::identity);
        }

        let world_from = self.transform_to_world(from)?;
        let world_to = self.transform_to_world(to)?;
        Some(world_to.inv_mul(&world_from))
    }

    fn try_transform_between(
        &self,
        from: FrameId,
        to: FrameId,
    ) -> Result<Isometry<Real>, FrameError> {
        for frame in [from, to] {
            if !self.contains(frame) {
                return Err(FrameError::UnknownFrame(frame));
            }
        }

        self.transform_between(from, to)
            .ok_or(FrameError::Disconnected { from, to })
    }
}
