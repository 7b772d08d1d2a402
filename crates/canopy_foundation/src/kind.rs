//! Entity kinds and the parent/child relationships they declare.
//!
//! Every entity in the ownership tree has exactly one [`EntityKind`]. A kind
//! declares which [`Relation`] it binds into as a child and which relations
//! it exposes as a parent. Binding is checked against [`Relation::accepts`],
//! so the set of legal trees is closed and known at compile time.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Call signature of a lisp function overload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OverloadSignature {
    /// No arguments.
    Nullary,
    /// Exactly one argument.
    Unary,
    /// Exactly two arguments.
    Binary,
    /// Any number of arguments.
    Variadic,
}

impl OverloadSignature {
    /// Returns true if a call with `argc` arguments matches this signature.
    #[must_use]
    pub const fn accepts_arity(self, argc: usize) -> bool {
        match self {
            Self::Nullary => argc == 0,
            Self::Unary => argc == 1,
            Self::Binary => argc == 2,
            Self::Variadic => true,
        }
    }
}

/// The closed set of entity kinds that can live in the ownership tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityKind {
    /// The simulation root. Owns scenes and consoles.
    Universe,
    /// Root of a renderable subtree.
    Scene,
    /// Shader program, child of a scene.
    Shader,
    /// Material, child of a shader.
    Material,
    /// Species (shared mesh), child of a material.
    Species,
    /// Object instance, child of a species.
    Object,
    /// In-game console, child of the universe.
    Console,
    /// Named lisp function exposed through a console.
    LispFunction,
    /// One concrete overload of a lisp function.
    LispFunctionOverload(OverloadSignature),
}

impl EntityKind {
    /// Every overload signature kind, for table-driven tests and iteration.
    pub const OVERLOADS: [EntityKind; 4] = [
        Self::LispFunctionOverload(OverloadSignature::Nullary),
        Self::LispFunctionOverload(OverloadSignature::Unary),
        Self::LispFunctionOverload(OverloadSignature::Binary),
        Self::LispFunctionOverload(OverloadSignature::Variadic),
    ];

    /// Returns the relation this kind binds into as a child.
    ///
    /// `None` for the root kind, which has no parent.
    #[must_use]
    pub const fn child_relation(self) -> Option<Relation> {
        match self {
            Self::Universe => None,
            Self::Scene => Some(Relation::Scenes),
            Self::Shader => Some(Relation::Shaders),
            Self::Material => Some(Relation::Materials),
            Self::Species => Some(Relation::Species),
            Self::Object => Some(Relation::Objects),
            Self::Console => Some(Relation::Consoles),
            Self::LispFunction => Some(Relation::LispFunctions),
            Self::LispFunctionOverload(_) => Some(Relation::LispFunctionOverloads),
        }
    }

    /// Returns the relations this kind exposes as a parent, in teardown order.
    #[must_use]
    pub const fn parent_relations(self) -> &'static [Relation] {
        match self {
            Self::Universe => &[Relation::Scenes, Relation::Consoles],
            Self::Scene => &[Relation::Shaders],
            Self::Shader => &[Relation::Materials],
            Self::Material => &[Relation::Species],
            Self::Species => &[Relation::Objects],
            Self::Console => &[Relation::LispFunctions],
            Self::LispFunction => &[Relation::LispFunctionOverloads],
            Self::Object | Self::LispFunctionOverload(_) => &[],
        }
    }

    /// Returns true if this kind exposes the given relation as a parent.
    #[must_use]
    pub fn exposes(self, relation: Relation) -> bool {
        self.parent_relations().contains(&relation)
    }

    /// Returns true for the scene kind, where `get_scene` walks stop.
    #[must_use]
    pub const fn is_scene(self) -> bool {
        matches!(self, Self::Scene)
    }

    /// Returns true for every concrete lisp function overload kind.
    #[must_use]
    pub const fn is_lisp_function_overload(self) -> bool {
        matches!(self, Self::LispFunctionOverload(_))
    }

    /// Returns the type name used for introspection (`info` output, logs).
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Universe => "canopy::Universe*",
            Self::Scene => "canopy::Scene*",
            Self::Shader => "canopy::Shader*",
            Self::Material => "canopy::Material*",
            Self::Species => "canopy::Species*",
            Self::Object => "canopy::Object*",
            Self::Console => "canopy::Console*",
            Self::LispFunction => "canopy::LispFunction*",
            Self::LispFunctionOverload(_) => "canopy::LispFunctionOverload*",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universe => write!(f, "universe"),
            Self::Scene => write!(f, "scene"),
            Self::Shader => write!(f, "shader"),
            Self::Material => write!(f, "material"),
            Self::Species => write!(f, "species"),
            Self::Object => write!(f, "object"),
            Self::Console => write!(f, "console"),
            Self::LispFunction => write!(f, "lisp-function"),
            Self::LispFunctionOverload(sig) => write!(f, "lisp-function-overload<{sig:?}>"),
        }
    }
}

/// A declared parent/child relationship ("parent of scenes", ...).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Relation {
    /// Universe → scenes.
    Scenes,
    /// Universe → consoles.
    Consoles,
    /// Scene → shaders.
    Shaders,
    /// Shader → materials.
    Materials,
    /// Material → species.
    Species,
    /// Species → objects.
    Objects,
    /// Console → lisp functions.
    LispFunctions,
    /// Lisp function → overloads.
    LispFunctionOverloads,
}

impl Relation {
    /// Capability check: does a child of `kind` satisfy this relation?
    #[must_use]
    pub const fn accepts(self, kind: EntityKind) -> bool {
        match self {
            Self::Scenes => matches!(kind, EntityKind::Scene),
            Self::Consoles => matches!(kind, EntityKind::Console),
            Self::Shaders => matches!(kind, EntityKind::Shader),
            Self::Materials => matches!(kind, EntityKind::Material),
            Self::Species => matches!(kind, EntityKind::Species),
            Self::Objects => matches!(kind, EntityKind::Object),
            Self::LispFunctions => matches!(kind, EntityKind::LispFunction),
            Self::LispFunctionOverloads => kind.is_lisp_function_overload(),
        }
    }

    /// Returns the conventional name of the parent-side module.
    #[must_use]
    pub const fn module_name(self) -> &'static str {
        match self {
            Self::Scenes => "parent_of_scenes",
            Self::Consoles => "parent_of_consoles",
            Self::Shaders => "parent_of_shaders",
            Self::Materials => "parent_of_materials",
            Self::Species => "parent_of_species",
            Self::Objects => "parent_of_objects",
            Self::LispFunctions => "parent_of_lisp_functions",
            Self::LispFunctionOverloads => "parent_of_lisp_function_overloads",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.module_name())
    }
}
