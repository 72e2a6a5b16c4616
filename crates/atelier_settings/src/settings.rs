use atelier_meta::class::{ConstMetaInstance, MetaInstance, MetaObject, Reflected};
use atelier_meta::serialization::{DataBlock, deserialize_meta_instance, serialize_meta_instance};

/// A reflected struct managed by [`SettingsManager`](crate::SettingsManager).
///
/// The defaults write and read every serializable property; override them
/// to migrate old layouts.
pub trait Settings: MetaObject + Reflected + Default {
    fn to_data_block(&self, block: &mut DataBlock) -> bool {
        serialize_meta_instance(ConstMetaInstance::new(self), block)
    }

    fn load_from_data_block(&mut self, block: &DataBlock) -> bool {
        deserialize_meta_instance(&mut MetaInstance::new(self), block)
    }
}

/// Object-safe part of [`Settings`].
pub(crate) trait ErasedSettings: MetaObject {
    fn save_block(&self, block: &mut DataBlock) -> bool;

    fn load_block(&mut self, block: &DataBlock) -> bool;
}

impl<T: Settings> ErasedSettings for T {
    #[inline]
    fn save_block(&self, block: &mut DataBlock) -> bool {
        self.to_data_block(block)
    }

    #[inline]
    fn load_block(&mut self, block: &DataBlock) -> bool {
        self.load_from_data_block(block)
    }
}
