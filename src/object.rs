//! Parameter/result objects: a struct whose fields are each individually
//! resolved from, or scattered into, the container rather than passed
//! in or returned as a whole.
//!
//! Rust structs have no runtime-queryable fields or tags, so rather than
//! parse attributes off a derive input we give each field tag its own
//! small trait ([`Param`] for a plain/default-named dependency,
//! [`NamedParam`] for `name:"..."`, [`GroupParam`] for `group:"..."`) and
//! a pair of declarative macros, [`define_params!`] and [`define_results!`],
//! that wire a plain struct's fields up to whichever trait its block asked
//! for. `name` and `group` are mutually exclusive by construction — a field
//! can only ever appear in one of the macro's three blocks — so there is
//! no "`name` and `group` both set" case to validate at runtime; the
//! macro's own grammar already rules it out.
//!
//! `optional` is spelled the idiomatic way: wrap the field in `Option<_>`
//! rather than pairing a `Arc<T>` field with a boolean tag.

use std::sync::Arc;

use crate::build::ParamNode;
use crate::container::Scope;
use crate::error::Result;
use crate::group::Group;
use crate::key::{GroupKey, ValueKey};

/// A value a constructor or invoked function can accept as one parameter
/// slot: either a plain `Arc<T>`/`Option<Arc<T>>` leaf, or a struct built
/// by [`define_params!`].
pub trait Param: Sized {
    fn shape() -> ParamNode;
    fn build(scope: &Scope) -> Result<Self>;
}

impl<T: Send + Sync + 'static> Param for Arc<T> {
    fn shape() -> ParamNode {
        ParamNode::Single {
            key: ValueKey::unnamed::<T>(),
            optional: false,
        }
    }

    fn build(scope: &Scope) -> Result<Self> {
        scope.resolve_value::<T>(&ValueKey::unnamed::<T>())
    }
}

impl<T: Send + Sync + 'static> Param for Option<Arc<T>> {
    fn shape() -> ParamNode {
        ParamNode::Single {
            key: ValueKey::unnamed::<T>(),
            optional: true,
        }
    }

    fn build(scope: &Scope) -> Result<Self> {
        Ok(scope.try_resolve_value::<T>(&ValueKey::unnamed::<T>()))
    }
}

/// A field tagged `name:"..."` inside a [`define_params!`] block.
pub trait NamedParam: Sized {
    fn named_shape(name: &'static str) -> ParamNode;
    fn build_named(scope: &Scope, name: &'static str) -> Result<Self>;
}

impl<T: Send + Sync + 'static> NamedParam for Arc<T> {
    fn named_shape(name: &'static str) -> ParamNode {
        ParamNode::Single {
            key: ValueKey::new::<T>(name),
            optional: false,
        }
    }

    fn build_named(scope: &Scope, name: &'static str) -> Result<Self> {
        scope.resolve_value::<T>(&ValueKey::new::<T>(name))
    }
}

impl<T: Send + Sync + 'static> NamedParam for Option<Arc<T>> {
    fn named_shape(name: &'static str) -> ParamNode {
        ParamNode::Single {
            key: ValueKey::new::<T>(name),
            optional: true,
        }
    }

    fn build_named(scope: &Scope, name: &'static str) -> Result<Self> {
        Ok(scope.try_resolve_value::<T>(&ValueKey::new::<T>(name)))
    }
}

/// A field tagged `group:"..."` inside a [`define_params!`] block; must be
/// `Group<T>`; `group` is only legal on a slice field.
pub trait GroupParam: Sized {
    fn group_shape(group: &'static str) -> ParamNode;
    fn build_group(scope: &Scope, group: &'static str) -> Result<Self>;
}

impl<T: Send + Sync + 'static> GroupParam for Group<T> {
    fn group_shape(group: &'static str) -> ParamNode {
        ParamNode::GroupSlice {
            key: GroupKey::new::<T>(group),
        }
    }

    fn build_group(scope: &Scope, group: &'static str) -> Result<Self> {
        scope.resolve_group::<T>(group)
    }
}

/// A result a constructor can return as one of its productions: either a
/// plain unnamed value or a struct built by [`define_results!`].
///
/// `scatter` distributes `self` into `staging` and can't itself fail —
/// by the time a constructor's return value reaches here, the only
/// remaining failure channel is the constructor's own trailing
/// `Result::Err`, handled in `src/provider.rs` before `scatter` ever
/// runs.
pub trait ResultsObject: Sized + Send + Sync + 'static {
    fn shape() -> crate::build::ResultNode;
    fn scatter(self, staging: &mut crate::staging::Staging);
}

/// Declares a struct whose fields are resolved from the container rather
/// than passed in by the caller.
///
/// ```ignore
/// define_params! {
///     struct Deps {
///         plain {
///             logger: Arc<Logger>,
///             cache: Option<Arc<Cache>>,
///         }
///         named {
///             primary_db: Arc<Database> = "primary",
///         }
///         grouped {
///             handlers: Group<Handler> = "handlers",
///         }
///     }
/// }
/// ```
///
/// Any block may be omitted. Field build order is plain, then named, then
/// grouped, each in declaration order within its block — only a
/// function's top-level parameter list needs left-to-right order, not an
/// object's internal fields.
#[macro_export]
macro_rules! define_params {
    (
        $(#[$smeta:meta])*
        $svis:vis struct $name:ident {
            $(plain { $( $pf:ident : $pty:ty ),* $(,)? })?
            $(named { $( $nf:ident : $nty:ty = $nname:literal ),* $(,)? })?
            $(grouped { $( $gf:ident : $gty:ty = $gname:literal ),* $(,)? })?
        }
    ) => {
        $(#[$smeta])*
        $svis struct $name {
            $($( pub $pf : $pty , )*)?
            $($( pub $nf : $nty , )*)?
            $($( pub $gf : $gty , )*)?
        }

        impl $crate::object::Param for $name {
            fn shape() -> $crate::build::ParamNode {
                #[allow(unused_mut)]
                let mut fields: ::std::vec::Vec<(&'static str, $crate::build::ParamNode)> = ::std::vec::Vec::new();
                $($(
                    fields.push((::std::stringify!($pf), <$pty as $crate::object::Param>::shape()));
                )*)?
                $($(
                    fields.push((::std::stringify!($nf), <$nty as $crate::object::NamedParam>::named_shape($nname)));
                )*)?
                $($(
                    fields.push((::std::stringify!($gf), <$gty as $crate::object::GroupParam>::group_shape($gname)));
                )*)?
                $crate::build::ParamNode::Object {
                    type_name: ::std::any::type_name::<$name>(),
                    fields,
                }
            }

            fn build(scope: &$crate::container::Scope) -> $crate::error::Result<Self> {
                ::std::result::Result::Ok($name {
                    $($( $pf: <$pty as $crate::object::Param>::build(scope)?, )*)?
                    $($( $nf: <$nty as $crate::object::NamedParam>::build_named(scope, $nname)?, )*)?
                    $($( $gf: <$gty as $crate::object::GroupParam>::build_group(scope, $gname)?, )*)?
                })
            }
        }
    };
}

/// Declares a struct whose fields are productions a constructor scatters
/// into the container rather than values it hands back to its caller
/// directly.
///
/// Each field names the *produced* type directly; the macro wraps it in
/// `Arc` for you both in the generated struct and in the `ValueKey`/
/// `GroupKey` it registers.
///
/// ```ignore
/// define_results! {
///     struct Out {
///         plain {
///             service: Service,
///         }
///         named {
///             primary_db: Database = "primary",
///         }
///         grouped {
///             handler: Handler = "handlers",
///         }
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_results {
    (
        $(#[$smeta:meta])*
        $svis:vis struct $name:ident {
            $(plain { $( $pf:ident : $pty:ty ),* $(,)? })?
            $(named { $( $nf:ident : $nty:ty = $nname:literal ),* $(,)? })?
            $(grouped { $( $gf:ident : $gty:ty = $gname:literal ),* $(,)? })?
        }
    ) => {
        $(#[$smeta])*
        $svis struct $name {
            $($( pub $pf : ::std::sync::Arc<$pty> , )*)?
            $($( pub $nf : ::std::sync::Arc<$nty> , )*)?
            $($( pub $gf : ::std::sync::Arc<$gty> , )*)?
        }

        impl $crate::object::ResultsObject for $name {
            fn shape() -> $crate::build::ResultNode {
                #[allow(unused_mut)]
                let mut fields: ::std::vec::Vec<(&'static str, $crate::build::ResultNode)> = ::std::vec::Vec::new();
                $($(
                    fields.push((
                        ::std::stringify!($pf),
                        $crate::build::ResultNode::Single($crate::key::ValueKey::unnamed::<$pty>()),
                    ));
                )*)?
                $($(
                    fields.push((
                        ::std::stringify!($nf),
                        $crate::build::ResultNode::Single($crate::key::ValueKey::new::<$nty>($nname)),
                    ));
                )*)?
                $($(
                    fields.push((
                        ::std::stringify!($gf),
                        $crate::build::ResultNode::Grouped($crate::key::GroupKey::new::<$gty>($gname)),
                    ));
                )*)?
                $crate::build::ResultNode::Object {
                    type_name: ::std::any::type_name::<$name>(),
                    fields,
                }
            }

            fn scatter(self, staging: &mut $crate::staging::Staging) {
                $($(
                    staging.put_value($crate::key::ValueKey::unnamed::<$pty>(), self.$pf);
                )*)?
                $($(
                    staging.put_value($crate::key::ValueKey::new::<$nty>($nname), self.$nf);
                )*)?
                $($(
                    staging.add_group($crate::key::GroupKey::new::<$gty>($gname), self.$gf);
                )*)?
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    define_params! {
        struct Deps {
            plain {
                a: Arc<A>,
                b: Option<Arc<B>>,
            }
        }
    }

    #[test]
    fn shape_reports_object_with_both_fields() {
        let shape = Deps::shape();
        match shape {
            ParamNode::Object { fields, .. } => assert_eq!(fields.len(), 2),
            _ => panic!("expected Object node"),
        }
    }

    define_results! {
        struct Produced {
            plain {
                a: A,
            }
            named {
                b: B = "secondary",
            }
        }
    }

    #[test]
    fn result_shape_separates_plain_and_named_fields() {
        match Produced::shape() {
            crate::build::ResultNode::Object { fields, .. } => {
                assert_eq!(fields.len(), 2);
            }
            _ => panic!("expected Object node"),
        }
    }
}
