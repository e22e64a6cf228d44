use rand::Rng;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// 大写字母与数字组成的随机码，去掉易混淆的 0/O/1/I
pub fn generate_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// 定长数字串
pub fn generate_digits(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// 随机初始密码，保证含大小写字母与数字
pub fn generate_password(len: usize) -> String {
    let len = len.max(8);
    let mut rng = rand::rng();
    let mut password: String = (0..len - 3)
        .map(|_| char::from(rng.sample(rand::distr::Alphanumeric)))
        .collect();
    password.push(char::from(b'A' + rng.random_range(0..26u8)));
    password.push(char::from(b'a' + rng.random_range(0..26u8)));
    password.push(char::from(b'0' + rng.random_range(0..10u8)));
    password
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code() {
        let code = generate_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generate_digits() {
        let digits = generate_digits(6);
        assert_eq!(digits.len(), 6);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_password_meets_policy() {
        let password = generate_password(16);
        assert_eq!(password.len(), 16);
        assert!(crate::utils::validate::validate_password(&password).is_valid);
    }
}
