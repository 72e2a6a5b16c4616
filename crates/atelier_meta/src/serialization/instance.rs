//! Reflected objects to and from data blocks.
//!
//! Each serializable property becomes one entry named after it: a
//! parameter when the value is a single scalar, a child block otherwise.
//! Properties are visited from the most derived class up, and a property
//! hidden by a derived one of the same name is skipped.

use atelier_utils::hash::{FixedHashState, HashSet};

use crate::class::{ConstMetaInstance, MetaInstance};
use crate::serialization::{DataBlock, VALUE_PARAM};

/// Writes every serializable property of `instance` into `block`.
///
/// Returns `false` if any property failed; the others are still written.
pub fn serialize_meta_instance(instance: ConstMetaInstance<'_>, block: &mut DataBlock) -> bool {
    let mut seen: HashSet<&str> = HashSet::with_hasher(FixedHashState);
    let mut ok = true;

    for class in instance.meta_class().all_ancestors() {
        for property in class.properties() {
            if !seen.insert(property.name()) || !property.is_data_block_serializable() {
                continue;
            }
            let mut child = DataBlock::new(property.name());
            if !property.to_data_block(instance, &mut child) {
                log::warn!("Failed to serialize `{}.{}`.", class.name(), property.name());
                ok = false;
                continue;
            }
            match child.take_single_value() {
                Some(param) => block.set_param(property.name(), param),
                None => {
                    block.add_data_block(child);
                }
            }
        }
    }
    ok
}

/// Loads every serializable property of `instance` found in `block`.
///
/// Properties missing from the block keep their value. Returns `false` if
/// any present entry could not be applied; the others are still loaded.
pub fn deserialize_meta_instance(instance: &mut MetaInstance<'_>, block: &DataBlock) -> bool {
    let mut seen: HashSet<&str> = HashSet::with_hasher(FixedHashState);
    let mut ok = true;

    for class in instance.meta_class().all_ancestors() {
        for property in class.properties() {
            if !seen.insert(property.name()) || !property.is_data_block_serializable() {
                continue;
            }
            let loaded = if let Some(param) = block.get_param(property.name()) {
                let mut child = DataBlock::new(property.name());
                child.set_param(VALUE_PARAM, param.clone());
                property.set_data_block(instance, &child)
            } else if let Some(child) = block.get_data_block(property.name()) {
                property.set_data_block(instance, child)
            } else {
                continue;
            };
            if !loaded {
                log::warn!("Failed to load `{}.{}`.", class.name(), property.name());
                ok = false;
            }
        }
    }
    ok
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use glam::Vec3;

    use crate::class::{ConstMetaInstance, MetaInstance, Reflected};
    use crate::serialization::{DataBlock, DataBlockParam};
    use crate::value::SharedObject;
    use crate::{impl_meta_class, impl_meta_class_value, meta_enum};

    use super::*;

    meta_enum! {
        pub enum Shading {
            Flat = 1,
            Smooth,
        }
    }

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Material {
        tint: Vec3,
        shading: Shading,
    }

    impl_meta_class!(Material {
        "tint": Vec3 => |s| s.tint, |s, v| s.tint = v;
        "shading": Shading => |s| s.shading, |s, v| s.shading = v;
    });
    impl_meta_class_value!(Material);

    #[derive(Clone, Default)]
    struct Opaque;

    impl crate::value::MetaValue for Opaque {}

    #[derive(Default)]
    struct SerialEntity {
        label: String,
        layer: u8,
    }

    #[derive(Default)]
    struct SerialMesh {
        entity: SerialEntity,
        // Shadows `SerialEntity::label`.
        label: String,
        material: Material,
        lods: Vec<f32>,
        shared: Option<Arc<SerialEntity>>,
        any: SharedObject,
        opaque: Opaque,
    }

    impl_meta_class!(SerialEntity {
        "label": String => |s| s.label.clone(), |s, v| s.label = v;
        "layer": u8 => |s| s.layer, |s, v| s.layer = v;
    });

    impl_meta_class!(SerialMesh: SerialEntity(entity) {
        "label": String => |s| s.label.clone(), |s, v| s.label = v;
        "material": Material => |s| s.material.clone(), |s, v| s.material = v;
        "lods": Vec<f32> => |s| s.lods.clone(), |s, v| s.lods = v;
        "shared": Option<Arc<SerialEntity>> => |s| s.shared.clone(), |s, v| s.shared = v;
        "any": SharedObject => |s| s.any.clone(), |s, v| s.any = v;
        "opaque": Opaque => |s| s.opaque.clone(), |s, v| s.opaque = v;
    });

    fn sample() -> SerialMesh {
        SerialMesh {
            entity: SerialEntity {
                label: "hidden".into(),
                layer: 3,
            },
            label: "mesh".into(),
            material: Material {
                tint: Vec3::new(1.0, 0.5, 0.0),
                shading: Shading::Smooth,
            },
            lods: vec![1.0, 0.5],
            shared: Some(Arc::new(SerialEntity {
                label: "pointee".into(),
                layer: 1,
            })),
            any: Some(Arc::new(SerialEntity {
                label: "dynamic".into(),
                layer: 2,
            })),
            opaque: Opaque,
        }
    }

    #[test]
    fn layout_of_serialized_block() {
        let mesh = sample();
        let mut block = DataBlock::new("mesh");
        assert!(serialize_meta_instance(ConstMetaInstance::new(&mesh), &mut block));

        assert_eq!(block.get_string("label", ""), "mesh");
        // The shadowed base property is not written a second time.
        assert_eq!(block.params_named("label").count(), 1);
        assert_eq!(block.get_param("layer"), Some(&DataBlockParam::U32(3)));

        let material = block.get_data_block("material").unwrap();
        assert_eq!(material.get_vec3f("tint", Vec3::ZERO), Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(material.get_string("shading", ""), "Smooth");

        let lods = block.get_data_block("lods").unwrap();
        assert_eq!(lods.params_named("item").count(), 2);

        let shared = block.get_data_block("shared").unwrap();
        assert_eq!(shared.get_string("label", ""), "pointee");
        assert_eq!(shared.get_string(crate::serialization::CLASS_PARAM, ""), "SerialEntity");

        let any = block.get_data_block("any").unwrap();
        assert_eq!(any.data_block_at(0).unwrap().name(), SerialEntity::meta_class().name());

        assert!(block.get_param("opaque").is_none());
        assert!(block.get_data_block("opaque").is_none());
    }

    #[test]
    fn round_trip_restores_values() {
        let mesh = sample();
        let mut block = DataBlock::new("mesh");
        assert!(serialize_meta_instance(ConstMetaInstance::new(&mesh), &mut block));

        let mut loaded = SerialMesh::default();
        assert!(deserialize_meta_instance(&mut MetaInstance::new(&mut loaded), &block));

        assert_eq!(loaded.label, "mesh");
        assert_eq!(loaded.entity.layer, 3);
        // Only reachable through the base class, so not restored.
        assert_eq!(loaded.entity.label, "");
        assert_eq!(loaded.material, mesh.material);
        assert_eq!(loaded.lods, mesh.lods);

        let shared = loaded.shared.as_deref().unwrap();
        assert_eq!((shared.label.as_str(), shared.layer), ("pointee", 1));

        let any = loaded.any.as_deref().unwrap();
        let any = ConstMetaInstance::new(any).dynamic_cast::<SerialEntity>().unwrap();
        assert_eq!((any.label.as_str(), any.layer), ("dynamic", 2));
    }

    #[test]
    fn empty_pointer_round_trips_as_none() {
        let mut mesh = sample();
        mesh.shared = None;
        mesh.any = None;
        let mut block = DataBlock::new("mesh");
        assert!(serialize_meta_instance(ConstMetaInstance::new(&mesh), &mut block));
        assert!(block.get_data_block("shared").unwrap().is_empty());

        let mut loaded = sample();
        assert!(deserialize_meta_instance(&mut MetaInstance::new(&mut loaded), &block));
        assert!(loaded.shared.is_none());
        assert!(loaded.any.is_none());
    }

    #[test]
    fn bad_entries_fail_without_stopping() {
        let mut block = DataBlock::new("mesh");
        block.set_param("layer", DataBlockParam::String("three".into()));
        block.set_param("label", DataBlockParam::String("renamed".into()));

        let mut mesh = sample();
        assert!(!deserialize_meta_instance(&mut MetaInstance::new(&mut mesh), &block));
        assert_eq!(mesh.entity.layer, 3);
        assert_eq!(mesh.label, "renamed");
        assert_eq!(mesh.lods, [1.0, 0.5]);
    }
}
