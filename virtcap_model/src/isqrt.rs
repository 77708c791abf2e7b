//! Rounded integer square root.
//!
//! Digit-by-digit binary method: walks the powers of four from the highest
//! one not above the input down to 1, building the root one bit at a time.
//! A final step rounds to nearest with ties up, so the result `r` satisfies
//! `r² − r ≤ n ≤ r² + r`.
//!
//! Fixed iteration count (≤ 16 for `u32`), no floating point.

/// Square root of `n`, rounded to the nearest integer (0.5 rounds up).
///
/// ```
/// use virtcap_model::isqrt::sqrt_rounded;
///
/// assert_eq!(sqrt_rounded(2), 1);
/// assert_eq!(sqrt_rounded(3), 2);
/// assert_eq!(sqrt_rounded(9), 3);
/// ```
#[inline]
pub const fn sqrt_rounded(n: u32) -> u32 {
    let mut rem = n;
    let mut root = 0u32;
    let mut bit = 1u32 << 30;

    while bit > rem {
        bit >>= 2;
    }

    while bit != 0 {
        if rem >= root + bit {
            rem -= root + bit;
            root += 2 * bit;
        }
        root >>= 1;
        bit >>= 2;
    }

    // `root` is now floor(sqrt(n)) and `rem` is n − root².
    if rem > root {
        root += 1;
    }
    root
}
