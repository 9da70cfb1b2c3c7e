//! Hot-swappable pack wrapper.

use parking_lot::RwLock;

use crate::pack::{BuildError, MessageBundle, MessagePack, MessagePackBuilder};

/// A [`MessagePack`] that can be rebuilt in place.
///
/// Readers grab a cheap clone via [`ReloadableMessagePack::pack`] and keep
/// rendering from it; a reload builds a complete replacement off to the
/// side and swaps it in atomically. A failed rebuild leaves the previous
/// pack serving.
pub struct ReloadableMessagePack {
    builder: RwLock<MessagePackBuilder>,
    current: RwLock<MessagePack>,
}

impl ReloadableMessagePack {
    pub fn new(builder: MessagePackBuilder) -> Result<Self, BuildError> {
        let pack = builder.build()?;
        Ok(Self {
            builder: RwLock::new(builder),
            current: RwLock::new(pack),
        })
    }

    /// A handle to the pack currently serving.
    pub fn pack(&self) -> MessagePack {
        self.current.read().clone()
    }

    /// Rebuild from the stored configuration and swap the result in.
    pub fn reload(&self) -> Result<(), BuildError> {
        let pack = self.builder.read().build()?;
        *self.current.write() = pack;
        Ok(())
    }

    /// Replace every bundle, rebuild, and swap the result in.
    pub fn reload_with(&self, bundles: Vec<MessageBundle>) -> Result<(), BuildError> {
        let mut builder = self.builder.write();
        let replaced = builder.clone().bundles(bundles);
        let pack = replaced.build()?;
        *builder = replaced;
        *self.current.write() = pack;
        Ok(())
    }
}
