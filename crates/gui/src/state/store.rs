use shared::CuboidDescriptor;

use crate::error::{AnnotationError, AnnotationResult};

/// Finished cuboids in creation order
#[derive(Default, Debug, Clone)]
pub struct CuboidStore {
    cuboids: Vec<CuboidDescriptor>,
}

impl CuboidStore {
    /// Add to the end; returns the new cuboid's index
    pub fn append(&mut self, cuboid: CuboidDescriptor) -> usize {
        self.cuboids.push(cuboid);
        self.cuboids.len() - 1
    }

    pub fn replace_at(&mut self, index: usize, cuboid: CuboidDescriptor) -> AnnotationResult<()> {
        let len = self.cuboids.len();
        let slot = self
            .cuboids
            .get_mut(index)
            .ok_or(AnnotationError::IndexOutOfRange { index, len })?;
        *slot = cuboid;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&CuboidDescriptor> {
        self.cuboids.get(index)
    }

    pub fn len(&self) -> usize {
        self.cuboids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuboids.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CuboidDescriptor> {
        self.cuboids.iter()
    }

    pub fn as_slice(&self) -> &[CuboidDescriptor] {
        &self.cuboids
    }
}

impl<'a> IntoIterator for &'a CuboidStore {
    type Item = &'a CuboidDescriptor;
    type IntoIter = std::slice::Iter<'a, CuboidDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
