//! Check-digit validation for taxpayer identifiers.
//!
//! Individual identifiers have 11 digits and entity identifiers have 14; both
//! end in two modulo-11 check digits. The routines here expect a string that
//! has already been reduced to digits (see [`digits_only`]) and return `false`
//! for anything else, including non-digit characters.

/// Length of an individual taxpayer identifier.
pub const INDIVIDUAL_ID_LEN: usize = 11;

/// Length of an entity taxpayer identifier.
pub const ENTITY_ID_LEN: usize = 14;

/// Strip every character that is not an ASCII digit.
///
/// `"123.456.789-01"` becomes `"12345678901"`.
pub fn digits_only(input: &str) -> String {
  input.chars().filter(char::is_ascii_digit).collect()
}

/// Validate an 11-digit individual identifier.
pub fn is_valid_individual_id(input: &str) -> bool {
  let Some(digits) = parse_digits::<INDIVIDUAL_ID_LEN>(input) else {
    return false;
  };
  if all_same(&digits) {
    return false;
  }

  individual_check_digit(&digits[..9]) == digits[9]
    && individual_check_digit(&digits[..10]) == digits[10]
}

/// Validate a 14-digit entity identifier.
pub fn is_valid_entity_id(input: &str) -> bool {
  let Some(digits) = parse_digits::<ENTITY_ID_LEN>(input) else {
    return false;
  };
  if all_same(&digits) {
    return false;
  }

  entity_check_digit(&digits[..12]) == digits[12]
    && entity_check_digit(&digits[..13]) == digits[13]
}

/// Weights run from `len + 1` down to 2; a remainder of 10 or 11 maps to 0.
fn individual_check_digit(base: &[u32]) -> u32 {
  let top = base.len() as u32 + 1;
  let sum: u32 = base
    .iter()
    .enumerate()
    .map(|(i, d)| d * (top - i as u32))
    .sum();

  match (sum * 10) % 11 {
    10 | 11 => 0,
    r => r,
  }
}

/// Weights start at `len - 7` (5 for 12 digits, 6 for 13) and count down,
/// wrapping back to 9 after 2.
fn entity_check_digit(base: &[u32]) -> u32 {
  let mut weight = base.len() as u32 - 7;
  let mut sum = 0;
  for d in base {
    sum += d * weight;
    weight = if weight == 2 { 9 } else { weight - 1 };
  }

  match sum % 11 {
    r if r < 2 => 0,
    r => 11 - r,
  }
}

fn parse_digits<const N: usize>(input: &str) -> Option<[u32; N]> {
  if input.len() != N {
    return None;
  }
  let mut digits = [0; N];
  for (slot, ch) in digits.iter_mut().zip(input.chars()) {
    *slot = ch.to_digit(10)?;
  }
  Some(digits)
}

fn all_same(digits: &[u32]) -> bool {
  digits.windows(2).all(|pair| pair[0] == pair[1])
}
