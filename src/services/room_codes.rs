//! Room-code generation.

use rand::seq::IndexedRandom;

use crate::config::AppConfig;

/// Generate a join code from the configured alphabet.
///
/// Codes are stored and compared in upper case; the configured alphabet is
/// expected to be upper case already.
pub fn generate_code(config: &AppConfig) -> String {
    let alphabet: Vec<char> = config.code_alphabet().chars().collect();
    let mut rng = rand::rng();
    (0..config.code_length())
        .map(|_| {
            *alphabet
                .choose(&mut rng)
                .expect("configured code alphabet is never empty")
        })
        .collect()
}

/// Normalize a client-supplied code for storage and lookup.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_have_configured_shape() {
        let config = AppConfig::default();
        for _ in 0..32 {
            let code = generate_code(&config);
            assert_eq!(code.len(), config.code_length());
            assert!(code.chars().all(|c| config.code_alphabet().contains(c)));
        }
    }

    #[test]
    fn normalize_upcases_and_trims() {
        assert_eq!(normalize_code("  ab12cd "), "AB12CD");
    }
}
