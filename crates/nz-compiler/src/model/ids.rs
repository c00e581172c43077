//! Typed indices into the declaration store.
//!
//! Declarations live in per-module vectors inside a [`Program`](super::Program);
//! these ids name them without borrowing. Two structs with the same name in
//! different modules have different ids.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

impl ModuleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

macro_rules! declaration_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            pub module: ModuleId,
            pub index: u32,
        }

        impl $name {
            #[inline]
            pub fn new(module: ModuleId, index: usize) -> Self {
                Self {
                    module,
                    index: index as u32,
                }
            }

            #[inline]
            pub fn slot(self) -> usize {
                self.index as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}.{}", stringify!($name), self.module.0, self.index)
            }
        }
    };
}

declaration_id!(
    /// Index of a [`StructDeclaration`](super::StructDeclaration).
    StructId
);
declaration_id!(
    /// Index of a [`SpecDeclaration`](super::SpecDeclaration).
    SpecId
);
declaration_id!(
    /// Index of a [`FunDeclaration`](super::FunDeclaration).
    FunId
);

/// The declaration that owns a list of type parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenericOwner {
    Struct(StructId),
    Spec(SpecId),
    /// The `index`th signature inside a spec, which may have its own
    /// type parameters in addition to the spec's.
    SpecSignature(SpecId, u32),
    Fun(FunId),
}

/// A type parameter, identified by its owner and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamId {
    pub owner: GenericOwner,
    pub index: u32,
}

impl TypeParamId {
    #[inline]
    pub fn slot(self) -> usize {
        self.index as usize
    }
}

/// A local bound by a `Let`, unique within one function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalId(pub u32);

/// A call expression, unique within one function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallSiteId(pub u32);
