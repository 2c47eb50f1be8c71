//! Primality testing.
//!
//! The reference tables only ever ask about numbers below a few hundred, but
//! the test is the deterministic Miller-Rabin variant for all of `u32`.

use super::mod_pow;

/// Test if a number is prime using the Miller-Rabin primality test.
///
/// Deterministic for every `u32` with the fixed witness set below.
///
/// # Examples
///
/// ```
/// use exdesign::utils::is_prime;
///
/// assert!(is_prime(2));
/// assert!(!is_prime(9));
/// assert!(is_prime(47));
/// assert!(!is_prime(91));
/// ```
#[must_use]
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 || n == 3 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    if n < 9 {
        return true;
    }
    if n % 3 == 0 {
        return false;
    }

    let witnesses: &[u64] = &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    // n-1 = 2^r * d with d odd
    let n64 = u64::from(n);
    let n_minus_1 = n64 - 1;
    let r = n_minus_1.trailing_zeros();
    let d = n_minus_1 >> r;

    'witness: for &a in witnesses {
        if a >= n64 {
            continue;
        }

        let mut x = mod_pow(a, d, n64);
        if x == 1 || x == n_minus_1 {
            continue 'witness;
        }

        for _ in 0..(r - 1) {
            x = x * x % n64;
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}
