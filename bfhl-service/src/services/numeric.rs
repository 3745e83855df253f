//! Pure numeric utilities behind the `fibonacci`, `prime`, `lcm` and `hcf` operations.

use num_bigint::BigUint;
use thiserror::Error;

/// Arithmetic that left the supported integer range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    #[error("lcm of {0} and {1} exceeds the supported integer range")]
    LcmOverflow(i64, i64),
}

/// First `n` terms of `0, 1, 1, 2, 3, ...`. Non-positive `n` yields an empty sequence.
///
/// Terms are unbounded; callers cap `n` before asking for a long series.
pub fn fibonacci(n: i64) -> Vec<BigUint> {
    let count = usize::try_from(n).unwrap_or(0);

    let mut series = Vec::new();
    let mut a = BigUint::from(0u32);
    let mut b = BigUint::from(1u32);
    for _ in 0..count {
        let next = &a + &b;
        series.push(std::mem::replace(&mut a, std::mem::replace(&mut b, next)));
    }
    series
}

/// Trial division by 2, then by odd divisors up to `sqrt(x)`.
pub fn is_prime(x: i64) -> bool {
    if x < 2 {
        return false;
    }
    if x % 2 == 0 {
        return x == 2;
    }
    let mut i = 3;
    while i <= x / i {
        if x % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Euclid's algorithm without sign normalisation, so `gcd(a, 0) == a`.
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a.wrapping_rem(b));
    }
    a
}

/// `|a * b| / gcd(a, b)`, or `0` when either operand is zero.
pub fn lcm(a: i64, b: i64) -> Result<i64, NumericError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    let product = (i128::from(a) * i128::from(b)).abs();
    let value = product / i128::from(gcd(a, b));
    i64::try_from(value).map_err(|_| NumericError::LcmOverflow(a, b))
}

/// Left fold of [`lcm`]. `None` for an empty slice; callers must check.
pub fn reduce_lcm(values: &[i64]) -> Result<Option<i64>, NumericError> {
    let Some((&first, rest)) = values.split_first() else {
        return Ok(None);
    };
    rest.iter()
        .try_fold(first, |acc, &value| lcm(acc, value))
        .map(Some)
}

/// Left fold of [`gcd`]. `None` for an empty slice; callers must check.
pub fn reduce_hcf(values: &[i64]) -> Option<i64> {
    values.iter().copied().reduce(gcd)
}
