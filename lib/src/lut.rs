//! Code point to output character lookup
//!
//! Some code points the index can return are invisible or reorder the
//! surrounding text when printed (DEL, C1 controls, bidi marks). Those are
//! swapped for a plain substitute before they reach the output.

use crate::config::AsciiConfig;

/// Get the character to emit for a looked-up code
///
/// # Arguments
/// * `code` - Code point returned by the density index
/// * `config` - Supplies the denylist and the substitute character
///
/// # Returns
/// The character itself, or `config.substitute` if the code is denylisted
/// or is not a valid char
pub fn display_char(code: u32, config: &AsciiConfig) -> char {
    if config.denylist.contains(&code) {
        return config.substitute;
    }
    char::from_u32(code).unwrap_or(config.substitute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_codes_pass_through() {
        let config = AsciiConfig::default();
        assert_eq!(display_char('#' as u32, &config), '#');
        assert_eq!(display_char(0x2588, &config), '█');
    }

    #[test]
    fn test_denylist_substituted() {
        let config = AsciiConfig::default();
        for code in [0x7F, 0x9F, 0x200F, 0x202E] {
            assert_eq!(display_char(code, &config), '.');
        }
    }

    #[test]
    fn test_invalid_code_substituted() {
        let config = AsciiConfig::default();
        assert_eq!(display_char(0xD800, &config), '.');
        assert_eq!(display_char(0x110000, &config), '.');
    }

    #[test]
    fn test_custom_substitute() {
        let config = AsciiConfig {
            substitute: ' ',
            denylist: vec!['x' as u32],
            ..Default::default()
        };
        assert_eq!(display_char('x' as u32, &config), ' ');
        assert_eq!(display_char(0x7F, &config), '\u{7f}');
    }
}
