use std::error::Error;

use crate::container::injector::{Injector, InjectorError, TypedInjector};
use crate::container::Managed;
use crate::key;
use crate::provider::closure::Closure;

macro_rules! impl_closure {
    ($($dep:ident),*) => {
        #[allow(non_snake_case)]
        impl<F, T, E, $($dep,)*> Closure<($($dep,)*)> for F
        where
            F: Fn($($dep,)*) -> Result<T, E> + Send + Sync + 'static,
            T: Managed,
            E: Into<Box<dyn Error + Send + Sync>>,
            $($dep: Managed,)*
        {
            type Constructed = T;

            type Error = E;

            fn run(
                &self,
                injector: &dyn Injector,
            ) -> Result<Result<Self::Constructed, Self::Error>, InjectorError> {
                let _ = injector;
                $(
                    let $dep = injector.make(key::of::<$dep>())?;
                )*
                Ok(self($($dep,)*))
            }
        }
    };
}

/// Implements [`Closure`] for every arity from the length of the list down
/// to zero.
macro_rules! impl_closure_down_to_zero {
    () => {
        impl_closure!();
    };
    ($head:ident $(, $tail:ident)*) => {
        impl_closure!($head $(, $tail)*);
        impl_closure_down_to_zero!($($tail),*);
    };
}

impl_closure_down_to_zero!(D12, D11, D10, D9, D8, D7, D6, D5, D4, D3, D2, D1);
