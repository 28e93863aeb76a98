/// Returns `true` if `n` is prime.
///
/// Trial division by odd divisors up to `isqrt(n)`. Pure and allocation-free,
/// so any number of workers may call it concurrently.
///
/// # Example
///
/// ```
/// use primesweep::is_prime;
///
/// assert!(is_prime(29));
/// assert!(!is_prime(1));
/// assert!(!is_prime(91));
/// ```
#[must_use]
pub const fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let limit = n.isqrt();
    let mut i = 3;
    while i <= limit {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}
