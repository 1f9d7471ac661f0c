//! Addition without arithmetic operators.
//!
//! Sums are built from XOR (add without carrying) and AND shifted left by
//! one (the carry), repeated until the carry is zero. Shifting a fixed-width
//! integer drops the bit carried out of the top, so overflow wraps exactly
//! like native `wrapping_add`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-width signed integer exposing only the bit operations the adder may use.
pub trait BitWord: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    const BITS: u32;
    const ZERO: Self;

    fn xor(self, other: Self) -> Self;
    fn and(self, other: Self) -> Self;
    /// Shift left by one, discarding the top bit.
    fn shl1(self) -> Self;
}

macro_rules! impl_bit_word {
    ($($t:ty),*) => {
        $(
            impl BitWord for $t {
                const BITS: u32 = <$t>::BITS;
                const ZERO: Self = 0;

                #[inline]
                fn xor(self, other: Self) -> Self {
                    self ^ other
                }

                #[inline]
                fn and(self, other: Self) -> Self {
                    self & other
                }

                #[inline]
                fn shl1(self) -> Self {
                    self << 1
                }
            }
        )*
    };
}

impl_bit_word!(i8, i16, i32, i64);

/// Sum of `a` and `b` with two's-complement wraparound, using only XOR, AND and shift.
///
/// ```
/// use bitadd::adder::add_no_arithmetic;
/// assert_eq!(add_no_arithmetic(15, 17), 32);
/// assert_eq!(add_no_arithmetic(i32::MAX, 1), i32::MIN);
/// ```
pub fn add_no_arithmetic(a: i32, b: i32) -> i32 {
    add_words(a, b)
}

/// Width-generic form of [`add_no_arithmetic`]. Terminates within `T::BITS` rounds:
/// after round k the low k bits of the carry are zero.
pub fn add_words<T: BitWord>(mut a: T, mut b: T) -> T {
    loop {
        let partial_sum = a.xor(b);
        let carry = a.and(b).shl1();
        if carry == T::ZERO {
            return partial_sum;
        }
        a = partial_sum;
        b = carry;
    }
}

/// Recursive form of the same algorithm. Recursion depth is bounded by the bit width.
pub fn add_recursive(a: i32, b: i32) -> i32 {
    let partial_sum = a ^ b;
    let carry = (a & b) << 1;
    if carry == 0 {
        return partial_sum;
    }
    add_recursive(partial_sum, carry)
}

/// One round of carry propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryStep<T> {
    pub partial_sum: T,
    pub carry: T,
}

/// Every round taken to compute `a + b`. The last step always has a zero carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTrace<T> {
    pub bits: u32,
    pub a: T,
    pub b: T,
    pub steps: Vec<CarryStep<T>>,
    pub sum: T,
}

impl<T: Copy> AddTrace<T> {
    /// Re-express the trace in another integer type (lossless widening).
    pub fn widen<U: From<T>>(&self) -> AddTrace<U> {
        AddTrace {
            bits: self.bits,
            a: self.a.into(),
            b: self.b.into(),
            steps: self
                .steps
                .iter()
                .map(|s| CarryStep {
                    partial_sum: s.partial_sum.into(),
                    carry: s.carry.into(),
                })
                .collect(),
            sum: self.sum.into(),
        }
    }
}

pub fn trace_add<T: BitWord>(a: T, b: T) -> AddTrace<T> {
    let mut steps = Vec::with_capacity(T::BITS as usize);
    let (mut x, mut y) = (a, b);
    let sum = loop {
        let partial_sum = x.xor(y);
        let carry = x.and(y).shl1();
        steps.push(CarryStep { partial_sum, carry });
        if carry == T::ZERO {
            break partial_sum;
        }
        x = partial_sum;
        y = carry;
    };
    AddTrace {
        bits: T::BITS,
        a,
        b,
        steps,
        sum,
    }
}
