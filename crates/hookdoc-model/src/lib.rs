//! hookdoc-model: the normalized document model and its factories.

pub mod docblock;
pub mod entity;
pub mod factory;

pub use docblock::{DocTag, Docblock};
pub use entity::{
    ArgumentEntity, ClassEntity, ConstantEntity, FunctionEntity, HookEntity, HookRef,
    IncludeEntity, MethodEntity, PropertyEntity, SourceFile, Uses,
};
pub use factory::{source_file, ModelError};
