//! Range-clamped, resettable values attached to a world.
//!
//! [`Parameter`] holds one value, [`VectorParameter`] one value per tile
//! (flat index `x * depth + y`). [`ParameterStore`] keys either kind by name
//! and recovers the value type at lookup; asking for an unregistered name or
//! the wrong type yields `None`.
//!
//! The fire simulation registers only its wind scalars here and keeps its
//! per-tile vectors in its own typed struct. Named vectors in the store are
//! for simulations that attach per-tile state without a dedicated struct.

use std::collections::HashMap;

use crate::error::{Error, Result};
use sealed::{Scalar, Vector};

/// Clamp into `[min, max]`. Values that do not compare (NaN) fall to `min`.
fn clamp<T: PartialOrd + Copy>(value: T, min: T, max: T) -> T {
    if !(value >= min) {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter<T> {
    initial: T,
    value: T,
    min: T,
    max: T,
}

impl<T: PartialOrd + Copy> Parameter<T> {
    /// The initial value is clamped like any other.
    pub fn new(initial: T, min: T, max: T) -> Self {
        let initial = clamp(initial, min, max);
        Self { initial, value: initial, min, max }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = clamp(value, self.min, self.max);
    }

    pub fn reset(&mut self) {
        self.value = self.initial;
    }

    pub fn initial(&self) -> T {
        self.initial
    }

    pub fn bounds(&self) -> (T, T) {
        (self.min, self.max)
    }
}

/// One clamped value per tile, each remembering its own initial value.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorParameter<T> {
    initial: Vec<T>,
    values: Vec<T>,
    min: T,
    max: T,
}

impl<T: PartialOrd + Copy> VectorParameter<T> {
    pub fn new(len: usize, initial: T, min: T, max: T) -> Self {
        Self::from_values(vec![initial; len], min, max)
    }

    /// Per-element initial values, clamped into range.
    pub fn from_values(values: Vec<T>, min: T, max: T) -> Self {
        let initial: Vec<T> = values.into_iter().map(|v| clamp(v, min, max)).collect();
        Self { values: initial.clone(), initial, min, max }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<T> {
        self.values
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange { index, len: self.values.len() })
    }

    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.values.len();
        let slot = self.values.get_mut(index).ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = clamp(value, self.min, self.max);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.values.copy_from_slice(&self.initial);
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn bounds(&self) -> (T, T) {
        (self.min, self.max)
    }
}

/// Value types a [`ParameterStore`] can hold.
pub trait ParamValue: PartialOrd + Copy + sealed::Sealed {
    #[doc(hidden)]
    fn wrap(p: Parameter<Self>) -> Scalar;
    #[doc(hidden)]
    fn wrap_vector(p: VectorParameter<Self>) -> Vector;
    #[doc(hidden)]
    fn scalar(s: &Scalar) -> Option<&Parameter<Self>>;
    #[doc(hidden)]
    fn scalar_mut(s: &mut Scalar) -> Option<&mut Parameter<Self>>;
    #[doc(hidden)]
    fn vector(v: &Vector) -> Option<&VectorParameter<Self>>;
    #[doc(hidden)]
    fn vector_mut(v: &mut Vector) -> Option<&mut VectorParameter<Self>>;
}

mod sealed {
    use super::{Parameter, VectorParameter};

    pub trait Sealed {}

    #[derive(Debug, Clone, PartialEq)]
    pub enum Scalar {
        Bool(Parameter<bool>),
        Int(Parameter<i32>),
        Float(Parameter<f32>),
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum Vector {
        Bool(VectorParameter<bool>),
        Int(VectorParameter<i32>),
        Float(VectorParameter<f32>),
    }

    impl Sealed for bool {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
}

macro_rules! param_value {
    ($ty:ty, $variant:ident) => {
        impl ParamValue for $ty {
            fn wrap(p: Parameter<Self>) -> Scalar {
                Scalar::$variant(p)
            }
            fn wrap_vector(p: VectorParameter<Self>) -> Vector {
                Vector::$variant(p)
            }
            fn scalar(s: &Scalar) -> Option<&Parameter<Self>> {
                match s {
                    Scalar::$variant(p) => Some(p),
                    _ => None,
                }
            }
            fn scalar_mut(s: &mut Scalar) -> Option<&mut Parameter<Self>> {
                match s {
                    Scalar::$variant(p) => Some(p),
                    _ => None,
                }
            }
            fn vector(v: &Vector) -> Option<&VectorParameter<Self>> {
                match v {
                    Vector::$variant(p) => Some(p),
                    _ => None,
                }
            }
            fn vector_mut(v: &mut Vector) -> Option<&mut VectorParameter<Self>> {
                match v {
                    Vector::$variant(p) => Some(p),
                    _ => None,
                }
            }
        }
    };
}

param_value!(bool, Bool);
param_value!(i32, Int);
param_value!(f32, Float);

/// Named scalar and vector parameters of mixed types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterStore {
    scalars: HashMap<String, Scalar>,
    vectors: HashMap<String, Vector>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a scalar parameter.
    pub fn add<T: ParamValue>(&mut self, name: &str, parameter: Parameter<T>) {
        self.scalars.insert(name.to_string(), T::wrap(parameter));
    }

    pub fn add_vector<T: ParamValue>(&mut self, name: &str, parameter: VectorParameter<T>) {
        self.vectors.insert(name.to_string(), T::wrap_vector(parameter));
    }

    pub fn get<T: ParamValue>(&self, name: &str) -> Option<&Parameter<T>> {
        self.scalars.get(name).and_then(T::scalar)
    }

    pub fn get_mut<T: ParamValue>(&mut self, name: &str) -> Option<&mut Parameter<T>> {
        self.scalars.get_mut(name).and_then(T::scalar_mut)
    }

    pub fn vector<T: ParamValue>(&self, name: &str) -> Option<&VectorParameter<T>> {
        self.vectors.get(name).and_then(T::vector)
    }

    pub fn vector_mut<T: ParamValue>(&mut self, name: &str) -> Option<&mut VectorParameter<T>> {
        self.vectors.get_mut(name).and_then(T::vector_mut)
    }

    /// Current value of a scalar, if registered under that type.
    pub fn value<T: ParamValue>(&self, name: &str) -> Option<T> {
        self.get::<T>(name).map(Parameter::value)
    }

    /// Set a scalar; returns `false` when no such parameter of type `T` exists.
    pub fn set<T: ParamValue>(&mut self, name: &str, value: T) -> bool {
        match self.get_mut::<T>(name) {
            Some(p) => {
                p.set(value);
                true
            }
            None => false,
        }
    }

    /// Restore every scalar and vector to its initial value.
    pub fn reset(&mut self) {
        for scalar in self.scalars.values_mut() {
            match scalar {
                Scalar::Bool(p) => p.reset(),
                Scalar::Int(p) => p.reset(),
                Scalar::Float(p) => p.reset(),
            }
        }
        for vector in self.vectors.values_mut() {
            match vector {
                Vector::Bool(p) => p.reset(),
                Vector::Int(p) => p.reset(),
                Vector::Float(p) => p.reset(),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.scalars.len() + self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clamps_to_bounds() {
        let mut p = Parameter::new(5.0f32, 0.0, 50.0);
        p.set(-3.0);
        assert_eq!(p.value(), 0.0);
        p.set(80.0);
        assert_eq!(p.value(), 50.0);
        p.set(12.5);
        assert_eq!(p.value(), 12.5);
        p.set(f32::NAN);
        assert_eq!(p.value(), 0.0, "NaN falls to the minimum");
    }

    #[test]
    fn initial_value_is_clamped() {
        let p = Parameter::new(500i32, 0, 360);
        assert_eq!(p.value(), 360);
        assert_eq!(p.initial(), 360);
    }

    #[test]
    fn reset_restores_initial_after_many_sets() {
        let mut p = Parameter::new(7i32, 0, 10);
        for v in [1, 9, -4, 30, 3] {
            p.set(v);
        }
        p.reset();
        assert_eq!(p.value(), 7);
        p.reset();
        assert_eq!(p.value(), 7);
    }

    #[test]
    fn vector_access_is_bounds_checked() {
        let mut v = VectorParameter::new(4, 0i32, 0, 5);
        assert_eq!(v.get(4), Err(Error::IndexOutOfRange { index: 4, len: 4 }));
        assert!(v.set(9, 1).is_err());
        v.set(2, 99).unwrap();
        assert_eq!(v.get(2).unwrap(), 5);
    }

    #[test]
    fn vector_reset_restores_per_element_initials() {
        let mut v = VectorParameter::from_values(vec![1, 2, 3, 4], 0i32, 5);
        for i in 0..4 {
            v.set(i, 0).unwrap();
        }
        v.reset();
        assert_eq!(v.values(), &[1, 2, 3, 4]);
    }

    #[test]
    fn store_lookup_checks_name_and_type() {
        let mut store = ParameterStore::new();
        store.add("speed", Parameter::new(5.0f32, 0.0, 50.0));
        store.add_vector("lit", VectorParameter::new(3, false, false, true));

        assert!(store.get::<f32>("speed").is_some());
        assert!(store.get::<i32>("speed").is_none(), "wrong type is absent");
        assert!(store.get::<f32>("nope").is_none(), "unknown name is absent");
        assert!(store.vector::<bool>("lit").is_some());
        assert!(store.vector::<f32>("lit").is_none());
        assert!(!store.set("speed", 3i32));
    }

    #[test]
    fn store_reset_covers_scalars_and_vectors() {
        let mut store = ParameterStore::new();
        store.add("dir", Parameter::new(90i32, 0, 360));
        store.add_vector("lit", VectorParameter::new(2, false, false, true));
        assert!(store.set("dir", 180i32));
        store.vector_mut::<bool>("lit").unwrap().set(1, true).unwrap();

        store.reset();
        assert_eq!(store.value::<i32>("dir"), Some(90));
        assert_eq!(store.vector::<bool>("lit").unwrap().values(), &[false, false]);
    }
}
