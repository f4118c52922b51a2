//! Field value types and their scalar components.
//!
//! Every value type is a fixed-length bundle of `f64` components. The
//! reconstruction never works on a non-scalar value directly; it slices the
//! value into components, runs the scalar machinery per component and
//! reassembles the result.

/// Rank/symmetry tag of a field value type.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FieldKind {
    Scalar,
    Vector,
    Tensor,
    SymmTensor,
    SphericalTensor,
}

impl FieldKind {
    /// Number of independent scalar components.
    pub fn n_components(self) -> usize {
        match self {
            FieldKind::Scalar => 1,
            FieldKind::Vector => 3,
            FieldKind::Tensor => 9,
            FieldKind::SymmTensor => 6,
            FieldKind::SphericalTensor => 1,
        }
    }

    /// Returns a stable string label for the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Scalar => "scalar",
            FieldKind::Vector => "vector",
            FieldKind::Tensor => "tensor",
            FieldKind::SymmTensor => "symmTensor",
            FieldKind::SphericalTensor => "sphericalTensor",
        }
    }
}

/// A value that can be reconstructed component by component.
pub trait FieldValue: Copy + Default + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    const KIND: FieldKind;
    const N_COMPONENTS: usize;

    /// Component `c`.
    ///
    /// # Panics
    /// Panics if `c >= N_COMPONENTS`.
    fn component(&self, c: usize) -> f64;

    /// Mutable component `c`.
    ///
    /// # Panics
    /// Panics if `c >= N_COMPONENTS`.
    fn component_mut(&mut self, c: usize) -> &mut f64;

    /// Assemble from exactly `N_COMPONENTS` values.
    fn from_components(comps: &[f64]) -> Self {
        debug_assert_eq!(comps.len(), Self::N_COMPONENTS);
        let mut v = Self::default();
        for (c, &x) in comps.iter().enumerate() {
            *v.component_mut(c) = x;
        }
        v
    }

    /// Component-wise `self - other`.
    fn sub(&self, other: &Self) -> Self {
        let mut out = *self;
        for c in 0..Self::N_COMPONENTS {
            *out.component_mut(c) -= other.component(c);
        }
        out
    }
}

impl FieldValue for f64 {
    const KIND: FieldKind = FieldKind::Scalar;
    const N_COMPONENTS: usize = 1;

    #[inline]
    fn component(&self, c: usize) -> f64 {
        assert_eq!(c, 0, "scalar has a single component");
        *self
    }

    #[inline]
    fn component_mut(&mut self, c: usize) -> &mut f64 {
        assert_eq!(c, 0, "scalar has a single component");
        self
    }
}

macro_rules! impl_array_value {
    ($(#[$meta:meta])* $name:ident, $n:expr, $kind:expr) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub [f64; $n]);

        impl FieldValue for $name {
            const KIND: FieldKind = $kind;
            const N_COMPONENTS: usize = $n;

            #[inline]
            fn component(&self, c: usize) -> f64 {
                self.0[c]
            }

            #[inline]
            fn component_mut(&mut self, c: usize) -> &mut f64 {
                &mut self.0[c]
            }
        }
    };
}

impl_array_value!(
    /// Cartesian vector `(x, y, z)`.
    Vector3, 3, FieldKind::Vector
);
impl_array_value!(
    /// Full second-rank tensor, row-major `xx xy xz yx yy yz zx zy zz`.
    Tensor3, 9, FieldKind::Tensor
);
impl_array_value!(
    /// Symmetric tensor `xx xy xz yy yz zz`.
    SymmTensor3, 6, FieldKind::SymmTensor
);
impl_array_value!(
    /// Spherical tensor `s * I`, stored as `s`.
    SphericalTensor3, 1, FieldKind::SphericalTensor
);
