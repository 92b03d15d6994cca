use std::{
    fmt::{Display, Formatter},
    ops::Sub,
};

use proptest::prelude::*;

/// A decimal value written as `whole.fraction`.
///
/// Keys order lexicographically: `whole` first, `fraction` on a tie. The two fields are never
/// normalized against each other, so `1.5` and `1.50` are different keys, and `1.10` sorts
/// after `1.9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Key {
    whole: i64,
    fraction: i64,
}

impl Key {
    pub const ZERO: Key = Key::new(0, 0);

    pub const fn new(whole: i64, fraction: i64) -> Self {
        Self { whole, fraction }
    }

    pub fn whole(&self) -> i64 {
        self.whole
    }

    pub fn fraction(&self) -> i64 {
        self.fraction
    }

    /// Componentwise distance to `target`, as used by approximate search.
    ///
    /// It is not the numeric distance between the represented decimals: from `3.0`, the key
    /// `2.9` is at `(1, -9)`.
    pub fn distance(&self, target: &Key) -> Difference {
        (*self - *target).abs()
    }
}

/// Componentwise difference of two keys.
///
/// Fields are `i128`, so the difference of any two keys and its magnitude are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Difference {
    whole: i128,
    fraction: i128,
}

impl Difference {
    pub const ZERO: Difference = Difference::new(0, 0);

    pub const fn new(whole: i128, fraction: i128) -> Self {
        Self { whole, fraction }
    }

    pub fn whole(&self) -> i128 {
        self.whole
    }

    pub fn fraction(&self) -> i128 {
        self.fraction
    }

    /// Both fields are negated when the difference sorts below zero.
    pub fn abs(self) -> Self {
        if self < Self::ZERO {
            Self::new(-self.whole, -self.fraction)
        } else {
            self
        }
    }
}

impl Sub for Key {
    type Output = Difference;

    fn sub(self, rhs: Self) -> Self::Output {
        Difference::new(
            i128::from(self.whole) - i128::from(rhs.whole),
            i128::from(self.fraction) - i128::from(rhs.fraction),
        )
    }
}

impl From<(i64, i64)> for Key {
    fn from((whole, fraction): (i64, i64)) -> Self {
        Self::new(whole, fraction)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.whole, self.fraction)
    }
}

impl Arbitrary for Key {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (-100i64..100, 0i64..10)
            .prop_map(|(whole, fraction)| Self::new(whole, fraction))
            .boxed()
    }
}
