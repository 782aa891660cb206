use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, ToPrimitive};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Largest modulus (in bits) whose `p - 1` is factored by trial division.
const TRIAL_FACTOR_MAX_BITS: u64 = 40;

/// Derives the secret exponent from a password.
///
/// SHA-256 of the UTF-8 bytes, read big-endian, reduced mod `modulus - 1`.
pub fn hash_password_to_secret(password: &str, modulus: &BigUint) -> BigUint {
    let digest = Zeroizing::new(<[u8; 32]>::from(Sha256::digest(password.as_bytes())));
    let order = modulus - BigUint::one();

    BigUint::from_bytes_be(&digest[..]) % order
}

pub fn compute_public_key(g: &BigUint, x: &BigUint, p: &BigUint) -> BigUint {
    g.modpow(x, p)
}

pub fn compute_commitment(g: &BigUint, r: &BigUint, p: &BigUint) -> BigUint {
    g.modpow(r, p)
}

// s = r + c*x, left unreduced
pub fn compute_response(r: &BigUint, c: &BigUint, x: &BigUint) -> BigUint {
    r + c * x
}

/// Checks `g^s mod p == t * y^c mod p`.
pub fn verify_response(
    g: &BigUint,
    y: &BigUint,
    t: &BigUint,
    c: &BigUint,
    s: &BigUint,
    p: &BigUint,
) -> bool {
    let lhs = g.modpow(s, p);
    let rhs = (t * y.modpow(c, p)) % p;

    lhs == rhs
}

/// Uniform nonce in `[1, p - 2]`.
pub fn generate_nonce_with<R: RngCore + CryptoRng>(rng: &mut R, p: &BigUint) -> BigUint {
    let p_minus_1 = p - BigUint::one();
    rng.gen_biguint_range(&BigUint::one(), &p_minus_1)
}

/// Uniform challenge in `[1, bound]`.
pub fn generate_challenge_with<R: RngCore + CryptoRng>(rng: &mut R, bound: &BigUint) -> BigUint {
    let upper = bound + BigUint::one();
    rng.gen_biguint_range(&BigUint::one(), &upper)
}

// Miller-Rabin
pub fn is_probably_prime(n: &BigUint, rounds: usize) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    if n == &two || n == &BigUint::from(3u32) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // n - 1 = d * 2^r
    let n_minus_1 = n - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    let mut rng = OsRng;

    'witness_loop: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, n);

        if x.is_one() || x == n_minus_1 {
            continue 'witness_loop;
        }

        for _ in 1..r {
            x = x.modpow(&two, n);
            if x == n_minus_1 {
                continue 'witness_loop;
            }
        }
        return false;
    }
    true
}

/// Exact check that `g` has order `p - 1`, for moduli small enough to factor.
///
/// Returns `None` when `p - 1` is too large to factor by trial division.
pub fn is_primitive_root(g: &BigUint, p: &BigUint) -> Option<bool> {
    if p.bits() > TRIAL_FACTOR_MAX_BITS {
        return None;
    }
    let order = (p - BigUint::one()).to_u64()?;

    Some(
        prime_factors(order)
            .into_iter()
            .all(|f| !g.modpow(&BigUint::from(order / f), p).is_one()),
    )
}

fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut f = 2u64;
    while f * f <= n {
        if n % f == 0 {
            factors.push(f);
            while n % f == 0 {
                n /= f;
            }
        }
        f += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn password_hash_matches_sha256_reduction() {
        // sha256("secret123") mod 48610
        assert_eq!(hash_password_to_secret("secret123", &big(48611)), big(2310));
        // sha256("") mod 48610
        assert_eq!(hash_password_to_secret("", &big(48611)), big(42849));
    }

    #[test]
    fn public_key_for_known_secret() {
        assert_eq!(compute_public_key(&big(19), &big(2310), &big(48611)), big(26202));
    }

    #[test]
    fn response_is_not_reduced() {
        let p = big(48611);
        let s = compute_response(&big(48000), &big(100), &big(48000));
        assert_eq!(s, big(48000 + 100 * 48000));
        assert!(s > p);
    }

    #[test]
    fn nonce_and_challenge_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let p = big(11);
        let bound = big(3);
        for _ in 0..500 {
            let r = generate_nonce_with(&mut rng, &p);
            assert!(r >= big(1) && r <= big(9));
            let c = generate_challenge_with(&mut rng, &bound);
            assert!(c >= big(1) && c <= big(3));
        }
    }

    #[test]
    fn primality() {
        assert!(is_probably_prime(&big(48611), 20));
        assert!(is_probably_prime(&big(2), 20));
        assert!(is_probably_prime(&big(3), 20));
        assert!(!is_probably_prime(&big(1), 20));
        assert!(!is_probably_prime(&big(48612), 20));
        // Carmichael number
        assert!(!is_probably_prime(&big(561), 20));
    }

    #[test]
    fn primitive_root_detection() {
        assert_eq!(is_primitive_root(&big(19), &big(48611)), Some(true));
        // 4 is a square, so its order divides (p - 1) / 2
        assert_eq!(is_primitive_root(&big(4), &big(48611)), Some(false));
        assert_eq!(prime_factors(48610), vec![2, 5, 4861]);
    }
}
