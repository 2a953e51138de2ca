//! Lifts a plain Rust function of arbitrary (small) arity into something
//! the container can call with arguments it builds itself.
//!
//! This is the same trick `axum`'s `Handler` and `bevy`'s `System` use to
//! reflect over function arity without a proc-macro: one trait impl per
//! arity, generated by [`impl_constructor_fn`], where each parameter
//! position is bounded by [`crate::object::Param`].

use crate::build::ParamNode;
use crate::container::Scope;
use crate::error::Result;

/// A function the container can call once it has built `Args` for it.
///
/// `Args` is the tuple of parameter types; it exists purely to let more
/// than one arity be implemented for the same closure type `Self` (a
/// concrete `F: Fn(A) -> Out` only ever satisfies one arity's bound, but
/// nothing stops the trait itself from being implemented for every
/// arity's distinct tuple shape).
pub trait ConstructorFn<Args>: Send + Sync {
    type Output;

    fn call_with(&self, scope: &Scope) -> Result<Self::Output>;
    fn shape() -> ParamNode;
}

macro_rules! impl_constructor_fn {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> ConstructorFn<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out + Send + Sync,
            $($arg: crate::object::Param,)*
        {
            type Output = Out;

            #[allow(non_snake_case, unused_variables)]
            fn call_with(&self, scope: &Scope) -> Result<Out> {
                $(let $arg = $arg::build(scope)?;)*
                Ok((self)($($arg),*))
            }

            fn shape() -> ParamNode {
                ParamNode::List(vec![$($arg::shape()),*])
            }
        }
    };
}

impl_constructor_fn!();
impl_constructor_fn!(A1);
impl_constructor_fn!(A1, A2);
impl_constructor_fn!(A1, A2, A3);
impl_constructor_fn!(A1, A2, A3, A4);
impl_constructor_fn!(A1, A2, A3, A4, A5);
impl_constructor_fn!(A1, A2, A3, A4, A5, A6);
impl_constructor_fn!(A1, A2, A3, A4, A5, A6, A7);
impl_constructor_fn!(A1, A2, A3, A4, A5, A6, A7, A8);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use std::sync::Arc;

    struct A(i32);
    struct B(i32);

    #[test]
    fn zero_and_two_arity_constructors_both_build() {
        let container = Container::new();
        container
            .provide(|| A(1), Default::default())
            .expect("provide A");
        container
            .provide(|a: Arc<A>| B(a.0 + 1), Default::default())
            .expect("provide B");
        let b = container.resolve::<B>().expect("resolve B");
        assert_eq!(b.0, 2);
    }
}
