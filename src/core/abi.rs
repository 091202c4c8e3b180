use ethers::types::{Bytes, U256, U512};
use sha3::{Digest, Keccak256};

use super::errors::{Result, UtilsError};

/// Compute the first 4 bytes (function selector) from a signature string, e.g. "_sharesPerFragment()".
pub fn selector_from_signature(signature: &str) -> [u8; 4] {
    let mut keccak = Keccak256::new();
    keccak.update(signature.as_bytes());
    let out = keccak.finalize();
    [out[0], out[1], out[2], out[3]]
}

/// Calldata for a view function that takes no arguments.
pub fn no_arg_calldata(signature: &str) -> Bytes {
    Bytes::from(selector_from_signature(signature).to_vec())
}

/// Decode the first 32-byte big-endian ABI word as an unsigned integer.
pub fn decode_uint256_word(data: &[u8]) -> Result<U256> {
    if data.len() < 32 {
        return Err(UtilsError::Decode(format!(
            "expected a 32-byte uint256 word, got {} bytes",
            data.len()
        )));
    }
    Ok(U256::from_big_endian(&data[..32]))
}

/// Nearest f64 to `numerator / denominator`, computed from the exact integers.
///
/// Returns `None` when `denominator` is zero.
pub fn u256_ratio_to_f64(numerator: U256, denominator: U256) -> Option<f64> {
    if denominator.is_zero() {
        return None;
    }
    if numerator.is_zero() {
        return Some(0.0);
    }

    // Scale so the integer quotient carries 55 or 56 significant bits: 53 for the
    // mantissa, one rounding bit, and a sticky bit folded in from the remainder.
    let scale = 55 - (numerator.bits() as i32 - denominator.bits() as i32);
    let (num, den) = if scale >= 0 {
        (U512::from(numerator) << scale as usize, U512::from(denominator))
    } else {
        (U512::from(numerator), U512::from(denominator) << (-scale) as usize)
    };

    let (quotient, remainder) = num.div_mod(den);
    let mut quotient = quotient.low_u64();
    if !remainder.is_zero() {
        quotient |= 1;
    }
    Some(quotient as f64 * pow2(-scale))
}

/// 2^exp for exponents in the normal f64 range.
fn pow2(exp: i32) -> f64 {
    debug_assert!((-1022..=1023).contains(&exp));
    f64::from_bits(((1023 + exp) as u64) << 52)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_from_signature() {
        // transfer(address,uint256) -> a9059cbb
        let sel = selector_from_signature("transfer(address,uint256)");
        assert_eq!(sel, [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_no_arg_calldata_is_selector_only() {
        let data = no_arg_calldata("_sharesPerFragment()");
        assert_eq!(data.len(), 4);
        assert_eq!(data.as_ref(), &selector_from_signature("_sharesPerFragment()"));
    }

    #[test]
    fn test_decode_uint256_word() {
        let mut word = [0u8; 32];
        word[31] = 42;
        assert_eq!(decode_uint256_word(&word).unwrap(), U256::from(42u64));

        // trailing bytes beyond the first word are ignored
        let mut long = word.to_vec();
        long.extend_from_slice(&[0xff; 32]);
        assert_eq!(decode_uint256_word(&long).unwrap(), U256::from(42u64));
    }

    #[test]
    fn test_decode_uint256_word_too_short() {
        let err = decode_uint256_word(&[0u8; 31]).unwrap_err();
        assert!(matches!(err, UtilsError::Decode(_)));
        assert!(err.to_string().contains("31 bytes"));
    }

    #[test]
    fn test_ratio_matches_exact_division() {
        let ratio = |n: &str, d: &str| {
            u256_ratio_to_f64(U256::from_dec_str(n).unwrap(), U256::from_dec_str(d).unwrap())
        };

        assert_eq!(ratio("1", "2"), Some(0.5));
        assert_eq!(ratio("42", "1"), Some(42.0));
        assert_eq!(ratio("0", "7"), Some(0.0));
        assert_eq!(ratio("7", "0"), None);
        assert_eq!(ratio("1000", "3"), Some(1_000.0 / 3.0));
        // 2^64 + 2^63 + 6143: summing rounded 64-bit limbs lands one ulp too high
        assert_eq!(ratio("27670116110564333567", "1"), Some(2.767011611056433e19));
        let max = U256::MAX.to_string();
        assert_eq!(ratio(&max, "1"), Some(max.parse::<f64>().unwrap()));
        assert_eq!(
            ratio("58039863746413614660051888441913", "1000000000000000000000"),
            Some(58039863746.41361)
        );
        // dividing the two rounded operands would give 1.4242267729088792e22
        assert_eq!(
            ratio(
                "1441008282123858376827740924670906913962249362422670620962",
                "101178289127419221945301652128890859"
            ),
            Some(1.4242267729088794e22)
        );
    }
}
