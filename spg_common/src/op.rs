//! Operator boilerplate for single-field newtypes.
//!
//! `op!(binary Rupees, Add, add)` expands to the `Add` impl that forwards to the inner value, and similarly for
//! `inplace` and `unary` operators.

#[macro_export]
macro_rules! op {
    (binary $ty:ty, $op:ident, $method:ident) => {
        impl std::ops::$op for $ty {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self(std::ops::$op::$method(self.0, rhs.0))
            }
        }
    };
    (inplace $ty:ty, $op:ident, $method:ident) => {
        impl std::ops::$op for $ty {
            fn $method(&mut self, rhs: Self) {
                std::ops::$op::$method(&mut self.0, rhs.0)
            }
        }
    };
    (unary $ty:ty, $op:ident, $method:ident) => {
        impl std::ops::$op for $ty {
            type Output = Self;

            fn $method(self) -> Self::Output {
                Self(std::ops::$op::$method(self.0))
            }
        }
    };
}
