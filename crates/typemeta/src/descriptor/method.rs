// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Method and parameter descriptors.
//!
//! A registered method is stored as a type-erased thunk plus a [`Signature`]
//! fingerprint. The thunk takes the receiver as `&mut dyn Any` and its
//! arguments as `Vec<Box<dyn Any>>`; it returns the boxed result, or `None`
//! when the receiver or one of the arguments has an unexpected type.
//!
//! Any `Fn(&T, A1, .., An) -> R` or `Fn(&mut T, A1, .., An) -> R` with up to
//! four arguments can be registered (see [`IntoMethod`]).

use crate::descriptor::member::Upcast;
use crate::descriptor::TypeToken;
use crate::identity::TypeIdentity;
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Signature fingerprint: return type and ordered parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    return_type: TypeToken,
    params: Vec<TypeToken>,
}

impl Signature {
    pub fn new(return_type: TypeToken, params: Vec<TypeToken>) -> Self {
        Self {
            return_type,
            params,
        }
    }

    /// Signature of a callable returning `R` and taking `A`.
    pub fn of<R: Any, A: Arguments>() -> Self {
        Self::new(TypeToken::of::<R>(), A::tokens())
    }

    pub fn return_type(&self) -> TypeToken {
        self.return_type
    }

    pub fn params(&self) -> &[TypeToken] {
        &self.params
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Type-erased invocation entry point of a method.
pub trait MethodThunk: Send + Sync {
    fn invoke(&self, object: &mut dyn Any, args: Vec<Box<dyn Any>>) -> Option<Box<dyn Any>>;
}

/// Conversion of a Rust callable into a method of `T`.
///
/// `Marker` disambiguates receivers and arities; it is inferred.
pub trait IntoMethod<T, Marker>: Send + Sync + 'static {
    fn signature() -> Signature;

    fn into_thunk(self) -> Arc<dyn MethodThunk>;
}

/// Argument tuple accepted by a resolved method.
pub trait Arguments: 'static {
    fn tokens() -> Vec<TypeToken>;

    fn into_boxed(self) -> Vec<Box<dyn Any>>;
}

struct RefThunk<T, F, A, R> {
    f: F,
    _marker: PhantomData<fn(&T, A) -> R>,
}

struct MutThunk<T, F, A, R> {
    f: F,
    _marker: PhantomData<fn(&mut T, A) -> R>,
}

macro_rules! impl_arity {
    ($($arg:ident $val:ident),*) => {
        impl<$($arg: Any,)*> Arguments for ($($arg,)*) {
            fn tokens() -> Vec<TypeToken> {
                vec![$(TypeToken::of::<$arg>()),*]
            }

            #[allow(unused_mut)]
            fn into_boxed(self) -> Vec<Box<dyn Any>> {
                let ($($val,)*) = self;
                let mut boxed: Vec<Box<dyn Any>> = Vec::new();
                $(boxed.push(Box::new($val));)*
                boxed
            }
        }

        impl<T, F, R, $($arg,)*> MethodThunk for RefThunk<T, F, ($($arg,)*), R>
        where
            T: Any,
            R: Any,
            $($arg: Any,)*
            F: Fn(&T, $($arg,)*) -> R + Send + Sync,
        {
            #[allow(unused_mut, unused_variables)]
            fn invoke(
                &self,
                object: &mut dyn Any,
                args: Vec<Box<dyn Any>>,
            ) -> Option<Box<dyn Any>> {
                let receiver = (&*object).downcast_ref::<T>()?;
                if args.len() != <($($arg,)*) as Arguments>::tokens().len() {
                    return None;
                }
                let mut args = args.into_iter();
                $(let $val = *args.next()?.downcast::<$arg>().ok()?;)*
                let ret: Box<dyn Any> = Box::new((self.f)(receiver, $($val,)*));
                Some(ret)
            }
        }

        impl<T, F, R, $($arg,)*> MethodThunk for MutThunk<T, F, ($($arg,)*), R>
        where
            T: Any,
            R: Any,
            $($arg: Any,)*
            F: Fn(&mut T, $($arg,)*) -> R + Send + Sync,
        {
            #[allow(unused_mut, unused_variables)]
            fn invoke(
                &self,
                object: &mut dyn Any,
                args: Vec<Box<dyn Any>>,
            ) -> Option<Box<dyn Any>> {
                let receiver = object.downcast_mut::<T>()?;
                if args.len() != <($($arg,)*) as Arguments>::tokens().len() {
                    return None;
                }
                let mut args = args.into_iter();
                $(let $val = *args.next()?.downcast::<$arg>().ok()?;)*
                let ret: Box<dyn Any> = Box::new((self.f)(receiver, $($val,)*));
                Some(ret)
            }
        }

        impl<T, F, R, $($arg,)*> IntoMethod<T, fn(&T, $($arg,)*) -> R> for F
        where
            T: Any,
            R: Any,
            $($arg: Any,)*
            F: Fn(&T, $($arg,)*) -> R + Send + Sync + 'static,
        {
            fn signature() -> Signature {
                Signature::of::<R, ($($arg,)*)>()
            }

            fn into_thunk(self) -> Arc<dyn MethodThunk> {
                Arc::new(RefThunk::<T, F, ($($arg,)*), R> {
                    f: self,
                    _marker: PhantomData,
                })
            }
        }

        impl<T, F, R, $($arg,)*> IntoMethod<T, fn(&mut T, $($arg,)*) -> R> for F
        where
            T: Any,
            R: Any,
            $($arg: Any,)*
            F: Fn(&mut T, $($arg,)*) -> R + Send + Sync + 'static,
        {
            fn signature() -> Signature {
                Signature::of::<R, ($($arg,)*)>()
            }

            fn into_thunk(self) -> Arc<dyn MethodThunk> {
                Arc::new(MutThunk::<T, F, ($($arg,)*), R> {
                    f: self,
                    _marker: PhantomData,
                })
            }
        }
    };
}

impl_arity!();
impl_arity!(A1 a1);
impl_arity!(A1 a1, A2 a2);
impl_arity!(A1 a1, A2 a2, A3 a3);
impl_arity!(A1 a1, A2 a2, A3 a3, A4 a4);

/// Thunk of an inherited method: upcast the receiver, then call the base.
struct RebasedThunk {
    upcast: Arc<dyn Upcast>,
    inner: Arc<dyn MethodThunk>,
}

impl MethodThunk for RebasedThunk {
    fn invoke(&self, object: &mut dyn Any, args: Vec<Box<dyn Any>>) -> Option<Box<dyn Any>> {
        self.inner.invoke(self.upcast.upcast_mut(object)?, args)
    }
}

/// Describes one declared parameter of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    name: String,
    param_type: TypeIdentity,
    param_token: TypeToken,
}

impl ParameterDescriptor {
    pub(crate) fn new(
        name: impl Into<String>,
        param_type: TypeIdentity,
        param_token: TypeToken,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            param_token,
        }
    }

    /// Parameter name (empty when registered without names).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_type(&self) -> &TypeIdentity {
        &self.param_type
    }

    pub fn param_type_id(&self) -> TypeId {
        self.param_token.id()
    }
}

/// Describes one registered method of a type.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    owner: TypeIdentity,
    return_type: TypeIdentity,
    parameters: Vec<ParameterDescriptor>,
    signature: Signature,
    thunk: Arc<dyn MethodThunk>,
}

impl MethodDescriptor {
    pub(crate) fn new(
        name: impl Into<String>,
        owner: TypeIdentity,
        return_type: TypeIdentity,
        parameters: Vec<ParameterDescriptor>,
        signature: Signature,
        thunk: Arc<dyn MethodThunk>,
    ) -> Self {
        Self {
            name: name.into(),
            owner,
            return_type,
            parameters,
            signature,
            thunk,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type that declared the method.
    pub fn owner(&self) -> &TypeIdentity {
        &self.owner
    }

    pub fn return_type(&self) -> &TypeIdentity {
        &self.return_type
    }

    pub fn return_type_id(&self) -> TypeId {
        self.signature.return_type().id()
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Check the registered signature against `R(A..)`.
    pub fn matches<R: Any, A: Arguments>(&self) -> bool {
        self.signature == Signature::of::<R, A>()
    }

    /// Invoke the method on `object`.
    ///
    /// Returns `None` if `object` is not a receiver of this method or an
    /// argument does not have the declared type.
    pub fn invoke(&self, object: &mut dyn Any, args: Vec<Box<dyn Any>>) -> Option<Box<dyn Any>> {
        let ret = self.thunk.invoke(object, args);
        if ret.is_none() {
            log::debug!(
                "[method] invocation of {}.{} rejected (receiver or argument type)",
                self.owner,
                self.name
            );
        }
        ret
    }

    pub(crate) fn rebased(&self, upcast: Arc<dyn Upcast>) -> Self {
        Self {
            thunk: Arc::new(RebasedThunk {
                upcast,
                inner: Arc::clone(&self.thunk),
            }),
            ..self.clone()
        }
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("owner", &self.owner.name())
            .field("return_type", &self.return_type.name())
            .field("parameters", &self.parameters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        value: i64,
    }

    impl Counter {
        fn get(&self) -> i64 {
            self.value
        }

        fn add(&mut self, delta: i64) {
            self.value += delta;
        }
    }

    fn thunk_of<F, M>(f: F) -> (Signature, Arc<dyn MethodThunk>)
    where
        F: IntoMethod<Counter, M>,
    {
        (F::signature(), f.into_thunk())
    }

    #[test]
    fn test_signature_fingerprint() {
        let (sig, _) = thunk_of(Counter::add);
        assert_eq!(sig, Signature::of::<(), (i64,)>());
        assert_eq!(sig.arity(), 1);

        let (sig, _) = thunk_of(Counter::get);
        assert_eq!(sig, Signature::of::<i64, ()>());
        assert_ne!(sig, Signature::of::<i32, ()>());
    }

    #[test]
    fn test_invoke_mut_and_ref_receivers() {
        let (_, add) = thunk_of(Counter::add);
        let (_, get) = thunk_of(Counter::get);
        let mut counter = Counter::default();

        add.invoke(&mut counter, vec![Box::new(5i64)]).expect("add");
        add.invoke(&mut counter, vec![Box::new(-2i64)]).expect("add");
        let ret = get.invoke(&mut counter, Vec::new()).expect("get");
        assert_eq!(ret.downcast_ref::<i64>(), Some(&3));
    }

    #[test]
    fn test_invoke_rejects_bad_arguments() {
        let (_, add) = thunk_of(Counter::add);
        let mut counter = Counter::default();

        assert!(add.invoke(&mut counter, vec![Box::new(5i32)]).is_none());
        assert!(add.invoke(&mut counter, Vec::new()).is_none());
        assert!(add
            .invoke(&mut counter, vec![Box::new(1i64), Box::new(2i64)])
            .is_none());
        assert!(add.invoke(&mut 0u8, vec![Box::new(1i64)]).is_none());
        assert_eq!(counter.value, 0);
    }

    #[test]
    fn test_invoke_without_arguments() {
        let (_, get) = thunk_of(Counter::get);
        let (_, reset) = thunk_of(|c: &mut Counter| c.value = 0);
        let mut counter = Counter { value: 9 };

        assert!(get.invoke(&mut counter, vec![Box::new(1i64)]).is_none());
        let ret = reset.invoke(&mut counter, Vec::new()).expect("reset");
        assert!(ret.downcast_ref::<()>().is_some());
        assert_eq!(counter.value, 0);
    }

    #[test]
    fn test_closure_with_several_arguments() {
        let (sig, thunk) =
            thunk_of(|c: &mut Counter, a: i64, b: i64, label: String| -> String {
                c.value = a * b;
                format!("{label}={}", c.value)
            });
        assert_eq!(sig.arity(), 3);

        let mut counter = Counter::default();
        let args: Vec<Box<dyn Any>> = (6i64, 7i64, "answer".to_string()).into_boxed();
        let ret = thunk.invoke(&mut counter, args).expect("invoke");
        assert_eq!(ret.downcast_ref::<String>().map(String::as_str), Some("answer=42"));
    }
}
